use super::*;
use crate::ast::*;

fn class_diagram(text: &str) -> ClassDiagram {
    match only(parse(text).unwrap()) {
        Diagram::Class(diagram) => diagram,
        other => panic!("expected a class diagram, got {:?}", other.dialect()),
    }
}

#[test]
fn class_body_members_and_annotation() {
    let diagram = class_diagram(
        "classDiagram
class Animal {
    <<interface>>
    +String name
    +eat(food) bool
    -int age$
}",
    );
    let animal = diagram.class("Animal").unwrap();
    assert_eq!(animal.annotation.as_deref(), Some("interface"));
    assert_eq!(animal.members.len(), 3);
    assert_eq!(animal.members[0].name(), "name");
    assert!(animal.members[1].is_method());
    assert_eq!(
        animal.members[1].kind,
        MemberKind::Method {
            name: "eat".to_string(),
            params: "food".to_string(),
            return_type: Some("bool".to_string()),
        }
    );
    assert_eq!(animal.members[2].classifier, Some(Classifier::Static));
}

#[test]
fn relations_create_classes_implicitly() {
    let diagram = class_diagram("classDiagram\nAnimal <|-- Duck : extends\nDuck \"1\" *-- \"many\" Egg");
    assert_eq!(diagram.classes.len(), 3);
    let r = &diagram.relations[0];
    assert_eq!(r.kind, RelationKind::Inheritance);
    assert_eq!(r.direction, RelationDirection::Backward);
    assert_eq!(r.label.as_deref(), Some("extends"));

    let r = &diagram.relations[1];
    assert_eq!(r.kind, RelationKind::Composition);
    assert_eq!(r.from_cardinality.as_deref(), Some("1"));
    assert_eq!(r.to_cardinality.as_deref(), Some("many"));
}

#[test]
fn colon_members_and_generics() {
    let diagram = class_diagram("classDiagram-v2\nclass Box~T~\nBox : +T item\nBox : +get() T");
    assert!(diagram.v2);
    let b = diagram.class("Box").unwrap();
    assert_eq!(b.generic.as_deref(), Some("T"));
    assert_eq!(b.members.len(), 2);
}

#[test]
fn unclosed_class_body() {
    let err = parse("classDiagram\nclass A {\n  +x\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnterminatedBlock);
    assert_eq!(err.position().line, 2);
}

#[test]
fn round_trips() {
    assert_round_trip(
        "classDiagram
class Shape {
    <<abstract>>
    #draw()*
    +getArea(int scale)$ double
}
class List~int~
Shape <|-- Circle
Circle \"1\" o-- \"*\" Point : centre
Shape ..> Canvas
Canvas ..|> Drawable
Point -- Line",
    );
}
