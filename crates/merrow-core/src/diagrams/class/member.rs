use super::{ClassMember, Classifier, MemberKind, Visibility};

fn split_visibility(s: &str) -> (Option<Visibility>, &str) {
    match s.chars().next().and_then(Visibility::from_char) {
        Some(v) => (Some(v), &s[1..]),
        None => (None, s),
    }
}

fn split_trailing_classifier(s: &str) -> (&str, Option<Classifier>) {
    match s.chars().last().and_then(Classifier::from_char) {
        Some(c) => (s[..s.len() - 1].trim_end(), Some(c)),
        None => (s, None),
    }
}

/// `ty name` or `name`, splitting on the last whitespace run.
fn split_type_and_name(s: &str) -> (Option<String>, String) {
    match s.rsplit_once(char::is_whitespace) {
        Some((ty, name)) if !ty.trim().is_empty() => {
            (Some(ty.trim().to_string()), name.trim().to_string())
        }
        _ => (None, s.trim().to_string()),
    }
}

/// Parses one member line of a class body (or the text after `Name :`).
///
/// Methods are recognised by a `(`. The classifier may follow the closing paren or end the
/// line; the return type may follow the paren (`name(p) Ret`, `name(p) : Ret`) or precede the
/// name (`Ret name(p)`).
pub fn parse_member(input: &str) -> Option<ClassMember> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    let (visibility, rest) = split_visibility(s);
    let rest = rest.trim_start();

    let method = rest
        .find('(')
        .zip(rest.rfind(')'))
        .filter(|(open, close)| open < close);
    let Some((open, close)) = method else {
        let (body, classifier) = split_trailing_classifier(rest);
        let (ty, name) = split_type_and_name(body);
        return Some(ClassMember {
            visibility,
            classifier,
            kind: MemberKind::Attribute { ty, name },
        });
    };

    let head = rest[..open].trim();
    let params = rest[open + 1..close].trim().to_string();
    let mut after = rest[close + 1..].trim();

    let mut classifier = None;
    if let Some(c) = after.chars().next().and_then(Classifier::from_char) {
        classifier = Some(c);
        after = after[1..].trim();
    }
    if classifier.is_none() {
        let (stripped, c) = split_trailing_classifier(after);
        classifier = c;
        after = stripped;
    }
    let after = after.trim_start_matches(':').trim();

    let (prefix, name) = split_type_and_name(head);
    let return_type = if after.is_empty() {
        prefix
    } else {
        Some(after.to_string())
    };

    Some(ClassMember {
        visibility,
        classifier,
        kind: MemberKind::Method {
            name,
            params,
            return_type,
        },
    })
}

/// Canonical member text: `+ty name$` or `+name(params)$ Ret`.
pub(super) fn member_source(member: &ClassMember) -> String {
    let mut out = String::new();
    if let Some(v) = member.visibility {
        out.push(v.as_char());
    }
    match &member.kind {
        MemberKind::Attribute { ty, name } => {
            if let Some(ty) = ty {
                out.push_str(ty);
                out.push(' ');
            }
            out.push_str(name);
            if let Some(c) = member.classifier {
                out.push(c.as_char());
            }
        }
        MemberKind::Method {
            name,
            params,
            return_type,
        } => {
            out.push_str(name);
            out.push('(');
            out.push_str(params);
            out.push(')');
            if let Some(c) = member.classifier {
                out.push(c.as_char());
            }
            if let Some(ret) = return_type {
                out.push(' ');
                out.push_str(ret);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_forms() {
        let m = parse_member("+String name").unwrap();
        assert_eq!(m.visibility, Some(Visibility::Public));
        assert_eq!(
            m.kind,
            MemberKind::Attribute {
                ty: Some("String".to_string()),
                name: "name".to_string()
            }
        );

        let m = parse_member("-int count$").unwrap();
        assert_eq!(m.classifier, Some(Classifier::Static));
        assert_eq!(member_source(&m), "-int count$");

        let m = parse_member("List~int~ ids").unwrap();
        assert_eq!(m.visibility, None);
        assert_eq!(member_source(&m), "List~int~ ids");
    }

    #[test]
    fn method_forms_normalise_to_one_spelling() {
        let a = parse_member("+getArea(int scale)$ double").unwrap();
        let b = parse_member("+double getArea(int scale)$").unwrap();
        let c = parse_member("+getArea(int scale) : double$").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(member_source(&a), "+getArea(int scale)$ double");
        assert_eq!(parse_member(&member_source(&a)), Some(a));
    }

    #[test]
    fn abstract_method_without_return_type() {
        let m = parse_member("#draw()*").unwrap();
        assert_eq!(m.visibility, Some(Visibility::Protected));
        assert_eq!(m.classifier, Some(Classifier::Abstract));
        assert!(m.is_method());
        assert_eq!(member_source(&m), "#draw()*");
    }

    #[test]
    fn blank_lines_are_not_members() {
        assert_eq!(parse_member("   "), None);
    }
}
