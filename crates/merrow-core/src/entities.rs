use std::borrow::Cow;

/// Length of a `#name;` / `#123;` shorthand at the start of `s`, including `#` and `;`.
fn shorthand_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix('#')?;
    let end = body.find(';')?;
    let entity = &body[..end];
    if entity.is_empty()
        || entity.len() > 64
        || !entity
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '+')
    {
        return None;
    }
    Some(end + 2)
}

/// Decodes Mermaid's `#...;` entity shorthand (`#quot;`, `#35;`, `#9829;`) into Unicode.
///
/// Plain `&...;` references are left alone so that decoding is idempotent over generated text.
pub fn decode_shorthand(input: &str) -> Cow<'_, str> {
    if !input.contains('#') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(idx) = rest.find('#') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        let Some(len) = shorthand_len(tail) else {
            out.push('#');
            rest = &tail[1..];
            continue;
        };
        let entity = &tail[1..len - 1];
        let html = if entity.chars().all(|c| c.is_ascii_digit() || c == '+') {
            format!("&#{};", entity.trim_start_matches('+'))
        } else {
            format!("&{entity};")
        };
        let decoded = htmlize::unescape(&html);
        if decoded == html {
            // Unknown entity name: keep the source spelling.
            out.push_str(&tail[..len]);
        } else {
            out.push_str(&decoded);
        }
        rest = &tail[len..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Inverse of [`decode_shorthand`] for generated text: protects every `#` that would otherwise
/// start a shorthand, and optionally every `"` (for text written inside double quotes).
pub fn encode_shorthand(input: &str, quotes: bool) -> Cow<'_, str> {
    let needs_quote = quotes && input.contains('"');
    let needs_hash = input
        .char_indices()
        .any(|(i, c)| c == '#' && shorthand_len(&input[i..]).is_some());
    if !needs_quote && !needs_hash {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for (i, c) in input.char_indices() {
        match c {
            '"' if quotes => out.push_str("#quot;"),
            '#' if shorthand_len(&input[i..]).is_some() => out.push_str("#35;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Writes `<`, `>` and backticks as shorthand so that decoded plain text cannot read back as HTML
/// or markdown.
pub fn encode_markup(input: &str) -> Cow<'_, str> {
    if !input.contains(['<', '>', '`']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '<' => out.push_str("#lt;"),
            '>' => out.push_str("#gt;"),
            '`' => out.push_str("#96;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
