use super::member::member_source;
use super::{ClassDef, ClassDiagram, ClassRelation};
use crate::codegen::Writer;
use crate::diagram::GenerateOptions;

pub fn generate_class(diagram: &ClassDiagram, options: &GenerateOptions) -> String {
    let mut w = Writer::new(options.indent);
    w.line(if diagram.v2 {
        "classDiagram-v2"
    } else {
        "classDiagram"
    });
    w.indented(|w| {
        for class in &diagram.classes {
            write_class(w, class);
        }
        for relation in &diagram.relations {
            w.line(relation_source(relation));
        }
    });
    let out = w.finish();
    tracing::trace!(bytes = out.len(), "generated class diagram");
    out
}

fn write_class(w: &mut Writer, class: &ClassDef) {
    let generic = class
        .generic
        .as_deref()
        .map(|g| format!("~{g}~"))
        .unwrap_or_default();
    if class.members.is_empty() && class.annotation.is_none() {
        w.line(format!("class {}{generic}", class.name));
        return;
    }
    w.line(format!("class {}{generic} {{", class.name));
    w.indented(|w| {
        if let Some(annotation) = &class.annotation {
            w.line(format!("<<{annotation}>>"));
        }
        for member in &class.members {
            w.line(member_source(member));
        }
    });
    w.line("}");
}

fn relation_source(r: &ClassRelation) -> String {
    let mut out = r.from.clone();
    if let Some(card) = &r.from_cardinality {
        out.push_str(&format!(" \"{card}\""));
    }
    out.push(' ');
    out.push_str(r.kind.operator(r.direction));
    if let Some(card) = &r.to_cardinality {
        out.push_str(&format!(" \"{card}\""));
    }
    out.push(' ');
    out.push_str(&r.to);
    if let Some(label) = &r.label {
        out.push_str(" : ");
        out.push_str(label);
    }
    out
}
