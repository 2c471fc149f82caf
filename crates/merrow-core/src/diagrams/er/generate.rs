use super::{Entity, EntityAttribute, ErDiagram, Relationship};
use crate::codegen::Writer;
use crate::diagram::GenerateOptions;

/// Every entity is written before the relationships, so implicit entities come back in the
/// same order. Labels are always quoted.
pub fn generate_er(diagram: &ErDiagram, options: &GenerateOptions) -> String {
    let mut w = Writer::new(options.indent);
    w.line("erDiagram");
    w.indented(|w| {
        for entity in &diagram.entities {
            write_entity(w, entity);
        }
        for rel in &diagram.relationships {
            w.line(relationship_source(rel));
        }
    });
    let out = w.finish();
    tracing::trace!(bytes = out.len(), "generated er diagram");
    out
}

fn write_entity(w: &mut Writer, entity: &Entity) {
    let head = match &entity.alias {
        Some(alias) => format!("{}[\"{alias}\"]", entity.name),
        None => entity.name.clone(),
    };
    if entity.attributes.is_empty() {
        w.line(head);
        return;
    }
    w.line(format!("{head} {{"));
    w.indented(|w| {
        for attr in &entity.attributes {
            w.line(attribute_source(attr));
        }
    });
    w.line("}");
}

fn attribute_source(attr: &EntityAttribute) -> String {
    let mut out = format!("{} {}", attr.ty, attr.name);
    if !attr.keys.is_empty() {
        let keys: Vec<&str> = attr.keys.iter().map(|k| k.as_str()).collect();
        out.push(' ');
        out.push_str(&keys.join(", "));
    }
    if let Some(comment) = &attr.comment {
        out.push_str(&format!(" \"{comment}\""));
    }
    out
}

fn relationship_source(rel: &Relationship) -> String {
    let mut out = format!(
        "{} {}{}{} {}",
        rel.from,
        rel.from_cardinality.left_symbol(),
        rel.identification.separator(),
        rel.to_cardinality.right_symbol(),
        rel.to
    );
    if let Some(label) = &rel.label {
        out.push_str(&format!(" : \"{label}\""));
    }
    out
}
