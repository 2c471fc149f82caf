use super::{Activation, Block, Message, Note, SequenceDiagram, SequenceStatement};
use crate::codegen::Writer;
use crate::content::Content;
use crate::diagram::GenerateOptions;

pub fn generate_sequence(diagram: &SequenceDiagram, options: &GenerateOptions) -> String {
    let mut w = Writer::new(options.indent);
    w.line("sequenceDiagram");
    w.indented(|w| {
        if let Some(title) = &diagram.title {
            w.line(format!("title {title}"));
        }
        write_statements(w, &diagram.statements);
    });
    let out = w.finish();
    tracing::trace!(bytes = out.len(), "generated sequence diagram");
    out
}

fn write_statements(w: &mut Writer, statements: &[SequenceStatement]) {
    for stmt in statements {
        match stmt {
            SequenceStatement::Participant(p) => match &p.alias {
                Some(alias) => w.line(format!("{} {} as {alias}", p.kind.keyword(), p.id)),
                None => w.line(format!("{} {}", p.kind.keyword(), p.id)),
            },
            SequenceStatement::Message(m) => w.line(message_source(m)),
            SequenceStatement::Note(n) => w.line(note_source(n)),
            SequenceStatement::Block(b) => write_block(w, b),
            SequenceStatement::Activate { actor } => w.line(format!("activate {actor}")),
            SequenceStatement::Deactivate { actor } => w.line(format!("deactivate {actor}")),
            SequenceStatement::Autonumber { start, step } => {
                let mut line = String::from("autonumber");
                for n in [start, step].into_iter().flatten() {
                    line.push_str(&format!(" {n}"));
                }
                w.line(line);
            }
        }
    }
}

fn header(keyword: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{keyword} {label}"),
        None => keyword.to_string(),
    }
}

fn write_block(w: &mut Writer, block: &Block) {
    w.line(header(block.kind.keyword(), block.label.as_deref()));
    w.indented(|w| write_statements(w, &block.statements));
    if let Some(branch_keyword) = block.kind.branch_keyword() {
        for branch in &block.branches {
            w.line(header(branch_keyword, branch.label.as_deref()));
            w.indented(|w| write_statements(w, &branch.statements));
        }
    }
    w.line("end");
}

/// `: text`, or a bare `:` for empty text.
fn text_suffix(text: &Content) -> String {
    if text.is_empty() {
        ":".to_string()
    } else {
        format!(": {}", text.to_source(false))
    }
}

fn message_source(m: &Message) -> String {
    let activation = match m.activation {
        Some(Activation::Activate) => "+",
        Some(Activation::Deactivate) => "-",
        None => "",
    };
    format!(
        "{}{}{activation}{}{}",
        m.from,
        m.arrow.operator(),
        m.to,
        text_suffix(&m.text)
    )
}

fn note_source(n: &Note) -> String {
    format!(
        "note {} {}{}",
        n.placement.keyword(),
        n.actors.join(", "),
        text_suffix(&n.text)
    )
}
