use merrow::ast::*;
use merrow::{Dialect, Error, RenameIds, Transform, ValidationError, validate};

fn parse(text: &str) -> Program {
    merrow::parse(text).unwrap_or_else(|e| panic!("{e}"))
}

#[test]
fn parsed_documents_are_valid() {
    let docs = [
        "flowchart LR\n    A[Start] --> B{ok?}\n    subgraph s\n        B --> C\n    end\n",
        "sequenceDiagram\n    participant A\n    loop x\n        A->>B: hi\n    end\n",
        "classDiagram\n    Animal <|-- Duck\n    Animal : +int age\n",
        "erDiagram\n    CUSTOMER ||--o{ ORDER : places\n",
        "stateDiagram-v2\n    [*] --> S1\n    S1 --> [*]\n",
        "gantt\n    a :a, 2024-01-01, 1d\n    b :b, after a, 2d\n    c :c, after a b, 1d\n",
    ];
    for doc in docs {
        assert_eq!(validate(&parse(doc)), Ok(()), "{doc}");
    }
}

#[test]
fn renaming_into_a_keyword_is_reported_once() {
    let program = parse("flowchart LR\n    A --> B\n    B --> C\n");
    let renamed = RenameIds::new().rename("B", "end").fold_program(program);
    assert_eq!(
        validate(&renamed),
        Err(vec![ValidationError::ReservedIdentifier {
            dialect: Dialect::Flowchart,
            ident: "end".to_string(),
        }])
    );
}

#[test]
fn keywords_are_per_dialect() {
    // `loop` is only reserved in sequence diagrams.
    let program = parse("flowchart LR\n    A --> B\n\nsequenceDiagram\n    A->>B: hi\n");
    let renamed = RenameIds::new().rename("A", "loop").fold_program(program);
    let errors = validate(&renamed).unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::ReservedIdentifier {
            dialect: Dialect::Sequence,
            ident: "loop".to_string(),
        }]
    );
}

#[test]
fn malformed_identifiers() {
    let program = parse("erDiagram\n    A ||--o{ B : owns\n\nstateDiagram-v2\n    S1 --> S2\n");
    let renamed = RenameIds::new()
        .rename("A", "two words")
        .rename("S2", "")
        .fold_program(program);
    assert_eq!(
        validate(&renamed),
        Err(vec![
            ValidationError::InvalidCharacters {
                dialect: Dialect::Er,
                ident: "two words".to_string(),
            },
            ValidationError::EmptyIdentifier {
                dialect: Dialect::State,
            },
        ])
    );
}

#[test]
fn unknown_dependencies_are_reported() {
    let mut program = parse("gantt\n    a :a, 2024-01-01, 1d\n    b :b, after a, 1d\n");
    if let Some(Diagram::Gantt(chart)) = program.diagrams.first_mut() {
        chart.sections[0].tasks[1].start = TaskStart::After(vec!["missing".to_string()]);
    }
    assert_eq!(
        validate(&program),
        Err(vec![ValidationError::UnknownReference {
            from: "b".to_string(),
            to: "missing".to_string(),
        }])
    );
}

#[test]
fn dependency_cycles_from_json_input() {
    // Trees handed over as JSON never went through the parser's ordering checks.
    let json = r#"{
        "diagrams": [{
            "type": "gantt",
            "sections": [{
                "tasks": [
                    { "id": "a", "name": "A", "start": { "kind": "after", "value": ["c"] },
                      "end": { "kind": "duration", "amount": 1, "unit": "days" } },
                    { "id": "b", "name": "B", "start": { "kind": "after", "value": ["a"] },
                      "end": { "kind": "duration", "amount": 1, "unit": "days" } },
                    { "id": "c", "name": "C", "start": { "kind": "after", "value": ["b"] },
                      "end": { "kind": "duration", "amount": 1, "unit": "days" } },
                    { "id": "d", "name": "D", "start": { "kind": "date", "value": "2024-01-01" },
                      "end": { "kind": "duration", "amount": 1, "unit": "days" } }
                ]
            }]
        }]
    }"#;
    let program: Program = serde_json::from_str(json).unwrap();
    let errors = validate(&program).unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::DependencyCycle {
            path: vec!["a".into(), "c".into(), "b".into(), "a".into()],
        }]
    );
    assert_eq!(
        errors[0].to_string(),
        "task dependency cycle: a -> c -> b -> a"
    );
}

#[test]
fn validation_errors_convert_into_the_facade_error() {
    let program = parse("sequenceDiagram\n    A->>B: hi\n");
    let renamed = RenameIds::new().rename("B", "Note").fold_program(program);
    let mut errors = validate(&renamed).unwrap_err();
    let err: Error = errors.remove(0).into();
    assert_eq!(err.to_string(), "`Note` is a reserved word in sequence diagrams");
}
