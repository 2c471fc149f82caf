//! Arbitrary input must never panic or hang the lexers and parsers.

use merrow_core::{Dialect, TokenKind, parse, tokenize};
use proptest::prelude::*;

const HEADERS: &[&str] = &[
    "flowchart LR",
    "graph TD",
    "sequenceDiagram",
    "classDiagram",
    "erDiagram",
    "stateDiagram-v2",
    "gantt",
];

/// Lines built from the punctuation and keywords the dialects care about.
fn line_strategy() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "A", "B", "-->", "->>", "||--o{", "}|..|{", "[*]", "<|--", "[", "]", "(", ")", "{", "}",
        "|", ":", "\"", "<<", ">>", "~", "%%", ";", ",", "&", "+", "-", "end", "loop", "alt",
        "else", "subgraph", "state", "note", "left of", "section", "after", "1d", "2024-01-01",
        "#", "$", " ", "\t",
    ]);
    prop::collection::vec(pieces, 0..12).prop_map(|parts| parts.concat())
}

fn document_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::select(HEADERS.to_vec()),
        prop::collection::vec(line_strategy(), 0..10),
    )
        .prop_map(|(header, lines)| format!("{header}\n{}", lines.join("\n")))
}

proptest! {
    #[test]
    fn tokenize_consumes_any_input(text in "\\PC{0,80}") {
        for dialect in Dialect::ALL {
            let tokens = tokenize(&text, dialect);
            prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
            prop_assert!(tokens.len() <= text.len() * 3 + 1);
        }
    }

    #[test]
    fn parse_terminates_on_noise(text in document_strategy()) {
        let _ = parse(&text);
    }

    #[test]
    fn parse_terminates_on_arbitrary_text(text in "\\PC{0,120}") {
        let _ = parse(&text);
    }
}
