use super::*;
use crate::detect;

#[test]
fn headers_select_the_dialect() {
    let cases = [
        ("flowchart LR\nA", Dialect::Flowchart),
        ("graph TD\nA", Dialect::Flowchart),
        ("sequenceDiagram\nA->>B: x", Dialect::Sequence),
        ("classDiagram\nclass A", Dialect::Class),
        ("classDiagram-v2\nclass A", Dialect::Class),
        ("erDiagram\nA", Dialect::Er),
        ("stateDiagram\nA", Dialect::State),
        ("stateDiagram-v2\nA", Dialect::State),
        ("gantt\nA :1d", Dialect::Gantt),
    ];
    for (text, dialect) in cases {
        assert_eq!(detect::detect_dialect(text).unwrap(), dialect, "{text}");
    }
}

#[test]
fn leading_comments_and_blank_lines_are_skipped() {
    let program = parse("%% leading\n\n  \nerDiagram\nA\n").unwrap();
    assert_eq!(program.diagrams[0].dialect(), Dialect::Er);
}

#[test]
fn unknown_header_is_an_error() {
    let err = parse("pie title Pets\n\"Dogs\" : 3\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownDiagramType);
    assert_eq!(err.position().line, 1);

    assert_eq!(parse("").unwrap_err().kind(), ErrorKind::UnknownDiagramType);
    assert_eq!(parse("%% only\n").unwrap_err().kind(), ErrorKind::UnknownDiagramType);
}

#[test]
fn headers_are_case_sensitive() {
    assert_eq!(
        parse("Flowchart LR\nA-->B").unwrap_err().kind(),
        ErrorKind::UnknownDiagramType
    );
}

#[test]
fn blank_lines_separate_diagrams() {
    let text = "flowchart LR\nA-->B\n\nsequenceDiagram\nA->>B: hi\n\ngantt\nT :1d\n";
    let segments = split_segments(text).unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[1].dialect, Dialect::Sequence);
    assert_eq!(segments[1].origin.line, 4);
    assert!(segments[1].text.starts_with("sequenceDiagram"));

    let program = parse(text).unwrap();
    let dialects: Vec<Dialect> = program.diagrams.iter().map(Diagram::dialect).collect();
    assert_eq!(dialects, vec![Dialect::Flowchart, Dialect::Sequence, Dialect::Gantt]);
}

#[test]
fn header_word_without_a_blank_line_stays_in_the_diagram() {
    let program = parse("flowchart LR\nA --> gantt\n").unwrap();
    assert_eq!(program.diagrams.len(), 1);
}

#[test]
fn error_positions_are_document_relative() {
    let err = parse("flowchart LR\nA-->B\n\nsequenceDiagram\nloop x\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnterminatedBlock);
    assert_eq!(err.position().line, 5);
}

#[test]
fn parse_diagram_wants_exactly_one() {
    let engine = Engine::new();
    let err = engine
        .parse_diagram("flowchart LR\nA-->B\n\nerDiagram\nX\n")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
    assert_eq!(err.position().line, 4);
    assert!(engine.parse_diagram("erDiagram\nX\n").is_ok());
}

#[test]
fn multi_diagram_documents_round_trip() {
    let program = assert_round_trip(
        "flowchart LR\nA-->B\n\nclassDiagram\nA <|-- B\n\nstateDiagram-v2\n[*] --> S\n",
    );
    let out = generate(&program);
    assert!(out.contains("\n\nclassDiagram\n"));
    assert!(out.ends_with('\n'));
}
