use super::{FlowEdge, FlowNode, FlowStatement, Flowchart, Subgraph};
use crate::codegen::{Writer, is_bare};
use crate::content::{Content, RichKind, RichText};
use crate::diagram::GenerateOptions;

pub fn generate_flowchart(chart: &Flowchart, options: &GenerateOptions) -> String {
    let mut w = Writer::new(options.indent);
    w.line(format!("{} {}", options.flowchart_keyword, chart.direction));
    w.indented(|w| write_statements(w, &chart.statements));
    let out = w.finish();
    tracing::trace!(bytes = out.len(), "generated flowchart");
    out
}

fn write_statements(w: &mut Writer, statements: &[FlowStatement]) {
    for stmt in statements {
        match stmt {
            FlowStatement::Node(node) => w.line(node_source(node)),
            FlowStatement::Edge(edge) => w.line(edge_source(edge)),
            FlowStatement::Subgraph(sg) => write_subgraph(w, sg),
        }
    }
}

fn write_subgraph(w: &mut Writer, sg: &Subgraph) {
    match &sg.title {
        Some(title) => w.line(format!("subgraph {} [{}]", sg.id, label_source(title))),
        None => w.line(format!("subgraph {}", sg.id)),
    }
    w.indented(|w| {
        if let Some(direction) = sg.direction {
            w.line(format!("direction {direction}"));
        }
        write_statements(w, &sg.statements);
    });
    w.line("end");
}

fn node_source(node: &FlowNode) -> String {
    let Some((open, close)) = node.shape.delimiters() else {
        return node.id.clone();
    };
    let label = node.label.as_ref().map(label_source).unwrap_or_default();
    format!("{}{open}{label}{close}", node.id)
}

fn edge_source(edge: &FlowEdge) -> String {
    let op = edge.style.operator();
    match &edge.label {
        Some(label) => format!("{} {op}|{}| {}", edge.from, label_source(label), edge.to),
        None => format!("{} {op} {}", edge.from, edge.to),
    }
}

/// Label text as it goes between delimiters.
pub(super) fn label_source(label: &Content) -> String {
    match label {
        Content::Plain(text)
            if is_bare(text, |c| matches!(c, '_' | '.' | ',' | '!' | '?' | '\'' | '-' | ':')) =>
        {
            text.clone()
        }
        Content::Plain(_) => format!("\"{}\"", label.to_source(true)),
        Content::Rich(RichText {
            kind: RichKind::Markdown,
            ..
        }) => format!("\"{}\"", label.to_source(true)),
        Content::Rich(RichText { raw, .. }) if raw.contains('"') => raw.clone(),
        Content::Rich(RichText { raw, .. }) => format!("\"{raw}\""),
    }
}
