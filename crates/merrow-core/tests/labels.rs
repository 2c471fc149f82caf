//! Plain labels must come back as the same plain text after generate and reparse.

use merrow_core::ast::{FlowStatement, SequenceStatement};
use merrow_core::{Content, Diagram, Program, generate, parse};
use proptest::prelude::*;

/// Label text mixing words, keywords, markup characters and shorthand fragments.
fn label_strategy() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "a", "Z", "7", " ", "end", "loop", "title", "section", "as", "else", "<", ">", "/", "b",
        "`", "#", "lt", "gt", "96", "quot", ";", "\"", "&", "amp", "|", "[", "]", "(", ")", "{",
        "}", "-", ":", ",", ".", "\\",
    ]);
    prop::collection::vec(pieces, 1..10)
        .prop_map(|parts| parts.concat().trim().to_string())
        .prop_filter("non-empty label", |label| !label.is_empty())
}

fn reparse(program: &Program) -> Program {
    let text = generate(program);
    parse(&text).unwrap_or_else(|e| panic!("{e}\n--- generated ---\n{text}"))
}

fn with_flowchart_labels(label: &str) -> Program {
    let mut program = parse("flowchart LR\nA[x] -->|y| B").unwrap();
    let Diagram::Flowchart(chart) = &mut program.diagrams[0] else {
        panic!("expected a flowchart");
    };
    for stmt in &mut chart.statements {
        match stmt {
            FlowStatement::Node(node) if node.label.is_some() => {
                node.label = Some(Content::plain(label));
            }
            FlowStatement::Edge(edge) => edge.label = Some(Content::plain(label)),
            _ => {}
        }
    }
    program
}

fn with_sequence_text(label: &str) -> Program {
    let mut program = parse("sequenceDiagram\nA->>B: x\nnote over A: y").unwrap();
    let Diagram::Sequence(diagram) = &mut program.diagrams[0] else {
        panic!("expected a sequence diagram");
    };
    for stmt in &mut diagram.statements {
        match stmt {
            SequenceStatement::Message(message) => message.text = Content::plain(label),
            SequenceStatement::Note(note) => note.text = Content::plain(label),
            _ => {}
        }
    }
    program
}

proptest! {
    #[test]
    fn flowchart_plain_labels_survive_generation(label in label_strategy()) {
        let program = with_flowchart_labels(&label);
        prop_assert_eq!(reparse(&program), program);
    }

    #[test]
    fn sequence_plain_text_survives_generation(label in label_strategy()) {
        let program = with_sequence_text(&label);
        prop_assert_eq!(reparse(&program), program);
    }
}
