use super::*;

fn kinds(text: &str, dialect: Dialect) -> Vec<(TokenKind, &str)> {
    tokenize(text, dialect)
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect()
}

#[test]
fn flowchart_edge_and_shapes() {
    use TokenKind::*;
    assert_eq!(
        kinds("A[Start] --> B((End))", Dialect::Flowchart),
        vec![
            (Ident, "A"),
            (Open, "["),
            (Text, "Start"),
            (Close, "]"),
            (Arrow, "-->"),
            (Ident, "B"),
            (Open, "(("),
            (Text, "End"),
            (Close, "))"),
            (Eof, ""),
        ]
    );
}

#[test]
fn identifiers_keep_inner_dashes_but_stop_at_operators() {
    use TokenKind::*;
    assert_eq!(
        kinds("node-1-->node-2", Dialect::Flowchart),
        vec![(Ident, "node-1"), (Arrow, "-->"), (Ident, "node-2"), (Eof, "")]
    );
    assert_eq!(
        kinds("stateDiagram-v2", Dialect::State),
        vec![(Ident, "stateDiagram-v2"), (Eof, "")]
    );
}

#[test]
fn self_message_lexes_as_one_statement() {
    use TokenKind::*;
    assert_eq!(
        kinds("A->>A: talk to myself", Dialect::Sequence),
        vec![
            (Ident, "A"),
            (Arrow, "->>"),
            (Ident, "A"),
            (Colon, ":"),
            (Text, "talk to myself"),
            (Eof, ""),
        ]
    );
}

#[test]
fn line_keywords_take_the_rest_of_the_line() {
    use TokenKind::*;
    assert_eq!(
        kinds("loop Every minute\nend", Dialect::Sequence),
        vec![
            (Ident, "loop"),
            (Text, "Every minute"),
            (Newline, "\n"),
            (Ident, "end"),
            (Eof, ""),
        ]
    );
    assert_eq!(
        kinds("dateFormat YYYY-MM-DD", Dialect::Gantt),
        vec![(Ident, "dateFormat"), (Text, "YYYY-MM-DD"), (Eof, "")]
    );
}

#[test]
fn line_keywords_only_start_a_line() {
    use TokenKind::*;
    assert_eq!(
        kinds("Review section two :1d", Dialect::Gantt),
        vec![
            (Ident, "Review"),
            (Ident, "section"),
            (Ident, "two"),
            (Colon, ":"),
            (Text, "1d"),
            (Eof, ""),
        ]
    );
    assert_eq!(
        kinds("participant A as Bob\n  Loop x", Dialect::Sequence),
        vec![
            (Ident, "participant"),
            (Ident, "A"),
            (Ident, "as"),
            (Ident, "Bob"),
            (Newline, "\n"),
            (Ident, "Loop"),
            (Text, "x"),
            (Eof, ""),
        ]
    );
}

#[test]
fn er_cardinality_is_one_arrow() {
    use TokenKind::*;
    assert_eq!(
        kinds("CUSTOMER ||--o{ ORDER : places", Dialect::Er),
        vec![
            (Ident, "CUSTOMER"),
            (Arrow, "||--o{"),
            (Ident, "ORDER"),
            (Colon, ":"),
            (Text, "places"),
            (Eof, ""),
        ]
    );
}

#[test]
fn state_sentinel_is_its_own_token() {
    use TokenKind::*;
    assert_eq!(
        kinds("[*] --> S1", Dialect::State),
        vec![(Sentinel, "[*]"), (Arrow, "-->"), (Ident, "S1"), (Eof, "")]
    );
}

#[test]
fn comments_and_semicolons() {
    use TokenKind::*;
    assert_eq!(
        kinds("%% note\nA;B", Dialect::Flowchart),
        vec![
            (Comment, "%% note"),
            (Newline, "\n"),
            (Ident, "A"),
            (Newline, ";"),
            (Ident, "B"),
            (Eof, ""),
        ]
    );
    assert_eq!(
        kinds("# hash comment\nA->>B: x", Dialect::Sequence)[0],
        (Comment, "# hash comment")
    );
}

#[test]
fn strings_exclude_quotes() {
    let tokens = tokenize(r#"state "Long name" as S"#, Dialect::State);
    assert_eq!(tokens[1].kind, TokenKind::Str);
    assert_eq!(tokens[1].text, "Long name");
}

#[test]
fn unknown_characters_do_not_abort() {
    let tokens = tokenize("A --> B $ ^", Dialect::Flowchart);
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Unknown && t.text == "$"));
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}

#[test]
fn positions_track_lines_and_columns() {
    let tokens = tokenize("flowchart LR\n  A --> B", Dialect::Flowchart);
    let a = tokens.iter().find(|t| t.text == "A").unwrap();
    assert_eq!(a.start, Position { line: 2, column: 2, offset: 15 });
    let b = tokens.iter().find(|t| t.text == "B").unwrap();
    assert_eq!(b.end.column, 9);
}

#[test]
fn origin_offsets_apply_to_segments() {
    let origin = Position {
        line: 5,
        column: 0,
        offset: 40,
    };
    let tokens = tokenize_at("gantt", origin, Dialect::Gantt);
    assert_eq!(tokens[0].start, origin);
    assert_eq!(tokens[1].start.offset, 45);
}

#[test]
fn tokens_advance_through_the_input() {
    let text = "A-->B ||--o{ [*] <<x>> ~T~ \"q\" : rest\n%%c\n\u{1F600} - + & ,";
    for dialect in Dialect::ALL {
        let tokens = tokenize(text, dialect);
        for pair in tokens.windows(2) {
            assert!(pair[1].start.offset >= pair[0].end.offset, "{dialect}: {pair:?}");
        }
        for tok in &tokens {
            // Enclosure contents may be empty; everything else consumes input.
            if !matches!(tok.kind, TokenKind::Eof | TokenKind::Text) {
                assert!(tok.end.offset > tok.start.offset, "{dialect}: {tok:?}");
            }
        }
        assert_eq!(tokens.last().map(|t| t.end.offset), Some(text.len()));
    }
}
