use super::*;
use crate::ast::*;

fn er(text: &str) -> ErDiagram {
    match only(parse(text).unwrap()) {
        Diagram::Er(diagram) => diagram,
        other => panic!("expected an er diagram, got {:?}", other.dialect()),
    }
}

#[test]
fn relationship_creates_both_entities() {
    let diagram = er("erDiagram\nCUSTOMER ||--o{ ORDER : places");
    let names: Vec<&str> = diagram.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["CUSTOMER", "ORDER"]);
    assert!(diagram.entities.iter().all(|e| e.attributes.is_empty()));

    let rel = &diagram.relationships[0];
    assert_eq!(rel.from_cardinality, Cardinality::ExactlyOne);
    assert_eq!(rel.to_cardinality, Cardinality::ZeroOrMore);
    assert_eq!(rel.identification, Identification::Identifying);
    assert_eq!(rel.label.as_deref(), Some("places"));
}

#[test]
fn every_cardinality_pair_is_recognised() {
    let diagram = er(
        "erDiagram\nA |o--o| B : x\nC }|..|{ D : \"many to many\"\nE ||--|| F\nG }o--o{ H",
    );
    let rels = &diagram.relationships;
    assert_eq!(rels[0].from_cardinality, Cardinality::ZeroOrOne);
    assert_eq!(rels[0].to_cardinality, Cardinality::ZeroOrOne);
    assert_eq!(rels[1].from_cardinality, Cardinality::OneOrMore);
    assert_eq!(rels[1].to_cardinality, Cardinality::OneOrMore);
    assert_eq!(rels[1].identification, Identification::NonIdentifying);
    assert_eq!(rels[1].label.as_deref(), Some("many to many"));
    assert_eq!(rels[2].label, None);
    assert_eq!(rels[3].to_cardinality, Cardinality::ZeroOrMore);
}

#[test]
fn alias_and_attributes() {
    let diagram = er(r#"erDiagram
foo["bar"] {
  string title PK, FK "comment"
  varchar(255) body
  int owner_id fk
}
"#);
    let foo = diagram.entity("foo").unwrap();
    assert_eq!(foo.alias.as_deref(), Some("bar"));
    assert_eq!(foo.attributes.len(), 3);
    assert_eq!(foo.attributes[0].ty, "string");
    assert_eq!(foo.attributes[0].name, "title");
    assert_eq!(foo.attributes[0].keys, vec![KeyKind::Pk, KeyKind::Fk]);
    assert_eq!(foo.attributes[0].comment.as_deref(), Some("comment"));
    assert_eq!(foo.attributes[1].ty, "varchar(255)");
    assert_eq!(foo.attributes[2].keys, vec![KeyKind::Fk]);
}

#[test]
fn standalone_entities() {
    let diagram = er("erDiagram\nISLAND\nMAINLAND\n");
    assert_eq!(diagram.entities.len(), 2);
    assert!(diagram.relationships.is_empty());
}

#[test]
fn malformed_cardinality_is_reported_as_such() {
    let err = parse("erDiagram\nA ||-x B\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnrecognizedCardinality);
    assert!(matches!(err, Error::UnrecognizedCardinality { ref text, .. } if text == "||-x"));
    assert_eq!(err.position().line, 2);
}

#[test]
fn unknown_key_is_rejected() {
    let err = parse("erDiagram\nA {\n  int id XK\n}\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
}

#[test]
fn unclosed_entity_body() {
    let err = parse("erDiagram\nA {\n  int id\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnterminatedBlock);
    assert_eq!(err.position().line, 2);
}

#[test]
fn round_trips() {
    assert_round_trip(
        r#"erDiagram
CUSTOMER["Customer Name"] {
    string name PK "full name"
    string email UK
}
CUSTOMER ||--o{ ORDER : places
ORDER ||--|{ LINE-ITEM : contains
CUSTOMER }|..|{ DELIVERY-ADDRESS : uses
PRODUCT"#,
    );
}
