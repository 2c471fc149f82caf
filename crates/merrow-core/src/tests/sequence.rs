use super::*;
use crate::ast::*;

fn sequence(text: &str) -> SequenceDiagram {
    match only(parse(text).unwrap()) {
        Diagram::Sequence(diagram) => diagram,
        other => panic!("expected a sequence diagram, got {:?}", other.dialect()),
    }
}

#[test]
fn self_message_is_an_ordinary_message() {
    let diagram = sequence("sequenceDiagram\nA->>A: talk to myself");
    let messages = diagram.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].from, "A");
    assert_eq!(messages[0].to, "A");
    assert_eq!(messages[0].arrow, ArrowKind::SolidArrow);
    assert_eq!(messages[0].text, Content::plain("talk to myself"));
    assert_eq!(diagram.participants().len(), 1);
}

#[test]
fn participants_keep_declaration_details_and_first_use_order() {
    let diagram = sequence(
        "sequenceDiagram\nB->>C: hi\nactor C\nparticipant A as Alice\nA-->>B: back",
    );
    let participants = diagram.participants();
    let ids: Vec<&str> = participants.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["B", "C", "A"]);
    assert_eq!(participants[1].kind, ParticipantKind::Actor);
    assert_eq!(participants[2].alias.as_deref(), Some("Alice"));
}

#[test]
fn alt_with_else_nested_in_loop() {
    let diagram = sequence(
        "sequenceDiagram
    loop Every minute
        alt ok
            A->>B: hi
        else failure
            B--xA: no
        end
    end",
    );
    assert_eq!(diagram.statements.len(), 1);
    let SequenceStatement::Block(outer) = &diagram.statements[0] else {
        panic!("expected a block");
    };
    assert_eq!(outer.kind, BlockKind::Loop);
    assert_eq!(outer.label.as_deref(), Some("Every minute"));
    assert_eq!(outer.statements.len(), 1);

    let SequenceStatement::Block(inner) = &outer.statements[0] else {
        panic!("expected a nested block");
    };
    assert_eq!(inner.kind, BlockKind::Alt);
    assert_eq!(inner.statements.len(), 1);
    assert_eq!(inner.branches.len(), 1);
    assert_eq!(inner.branches[0].label.as_deref(), Some("failure"));
    assert_eq!(diagram.messages().len(), 2);
}

#[test]
fn unterminated_loop_reports_its_opening_line() {
    let err = parse("sequenceDiagram\nloop forever\n  A->>B: ping\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnterminatedBlock);
    assert_eq!(err.position().line, 2);
    assert!(matches!(err, Error::UnterminatedBlock { ref block, .. } if block == "loop"));
}

#[test]
fn else_outside_alt_is_rejected() {
    let err = parse("sequenceDiagram\nloop x\nelse y\nend\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
}

#[test]
fn notes_activations_and_autonumber() {
    let diagram = sequence(
        "sequenceDiagram\nautonumber 10 5\nA->>+B: open\nnote over A, B: shared\nB-->>-A: close\ndeactivate A",
    );
    assert!(matches!(
        diagram.statements[0],
        SequenceStatement::Autonumber {
            start: Some(10),
            step: Some(5)
        }
    ));
    let messages = diagram.messages();
    assert_eq!(messages[0].activation, Some(Activation::Activate));
    assert_eq!(messages[1].activation, Some(Activation::Deactivate));
    let SequenceStatement::Note(note) = &diagram.statements[2] else {
        panic!("expected a note");
    };
    assert_eq!(note.placement, NotePlacement::Over);
    assert_eq!(note.actors, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn block_keywords_are_reserved_as_participants() {
    let err = parse("sequenceDiagram\nparticipant loop\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
}

#[test]
fn round_trips() {
    assert_round_trip("sequenceDiagram\nA->>A: talk to myself");
    assert_round_trip(
        "sequenceDiagram
    title Checkout
    actor U as User
    participant S
    U->>+S: pay
    loop retry
        S-)S: poll
    end
    par first
        S->>U: receipt
    and second
        S--)U: email
    end
    critical commit
        S->>S: write
    option rollback
        S-xS: undo
    end
    note right of S: done
    S-->>-U:",
    );
}

#[test]
fn block_words_after_the_line_head_are_not_keywords() {
    let diagram = sequence(
        "sequenceDiagram\nparticipant A as Loop as needed\nA->>B: title and else\nnote over B: end",
    );
    let participants = diagram.participants();
    assert_eq!(participants[0].alias.as_deref(), Some("Loop as needed"));
    assert_eq!(diagram.title, None);
    assert_eq!(diagram.messages()[0].text, Content::plain("title and else"));
    assert_round_trip("sequenceDiagram\nparticipant A as Loop as needed\nA->>B: title and else");
}

#[test]
fn alias_needs_text_after_as() {
    let err = parse("sequenceDiagram\nparticipant A as\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
}

#[test]
fn decoded_markup_in_messages_stays_plain() {
    let program = assert_round_trip(
        "sequenceDiagram\nA->>B: #lt;b#gt;bold#lt;/b#gt;\nnote over A: #96;code#96;",
    );
    let Diagram::Sequence(diagram) = only(program) else {
        panic!("expected a sequence diagram");
    };
    assert_eq!(diagram.messages()[0].text, Content::plain("<b>bold</b>"));
    let SequenceStatement::Note(note) = &diagram.statements[1] else {
        panic!("expected a note");
    };
    assert_eq!(note.text, Content::plain("`code`"));
}
