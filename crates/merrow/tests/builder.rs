use merrow::ast::*;
use merrow::{
    Error, FlowchartBuilder, GanttBuilder, NodeId, ParticipantId, SequenceBuilder, TaskId,
    push_diagram,
};

fn node(id: &str) -> NodeId {
    NodeId::new(id).unwrap()
}

fn actor(id: &str) -> ParticipantId {
    ParticipantId::new(id).unwrap()
}

/// Built trees must be exactly what the parser produces from their generated text.
fn assert_reparses(program: &Program) -> String {
    let text = merrow::generate(program);
    let reparsed = merrow::parse(&text).unwrap_or_else(|e| panic!("{e}\n{text}"));
    assert_eq!(&reparsed, program, "generated text:\n{text}");
    text
}

#[test]
fn flowchart_builder_generates_parseable_text() {
    let (a, b, c) = (node("A"), node("B"), node("C"));
    let chart = FlowchartBuilder::new(Direction::Lr)
        .node(&a, NodeShape::Square, "Start")
        .node(&b, NodeShape::Rhombus, "Is it ok?")
        .edge(&a, EdgeStyle::Arrow, &b)
        .labeled_edge(&b, EdgeStyle::DottedArrow, "yes", &c)
        .subgraph(&node("grp"), Some("Group"), |sg| sg.bare_node(&c))
        .build();

    let program = push_diagram(Program::default(), chart);
    let text = assert_reparses(&program);
    assert!(text.starts_with("flowchart LR\n    A[Start]\n"), "{text}");
    assert!(text.contains("B -.->|yes| C"), "{text}");
}

#[test]
fn default_shape_nodes_carry_no_label() {
    let chart = FlowchartBuilder::new(Direction::Tb)
        .node(&node("A"), NodeShape::Default, "ignored")
        .build();
    assert_eq!(chart.statements, vec![FlowStatement::Node(FlowNode::bare("A"))]);
}

#[test]
fn editing_a_parsed_flowchart() {
    let parsed = merrow::parse("flowchart TD\n    A --> B\n    subgraph s\n        B --> C\n        C --> D\n    end\n")
        .unwrap();
    let Some(Diagram::Flowchart(chart)) = parsed.diagrams.into_iter().next() else {
        panic!("expected a flowchart");
    };

    let edited = FlowchartBuilder::from_chart(chart)
        .remove_node(&node("C"))
        .edge(&node("B"), EdgeStyle::ThickArrow, &node("D"))
        .build();

    let edges: Vec<(&str, &str)> = edited
        .edges()
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert_eq!(edges, vec![("A", "B"), ("B", "D")]);
    assert!(!edited.nodes().contains_key("C"));
    assert_reparses(&push_diagram(Program::default(), edited));
}

#[test]
fn sequence_builder_nests_blocks() {
    let (alice, bob) = (actor("Alice"), actor("Bob"));
    let diagram = SequenceBuilder::new()
        .title("Checkout")
        .participant(ParticipantKind::Actor, &alice, None)
        .participant(ParticipantKind::Participant, &bob, None)
        .autonumber(None, None)
        .open_block(BlockKind::Loop, Some("Every minute"))
        .message(&alice, ArrowKind::SolidArrow, &bob, "Ping")
        .open_block(BlockKind::Alt, Some("healthy"))
        .message(&bob, ArrowKind::DottedArrow, &alice, "Pong")
        .branch(Some("down"))
        .unwrap()
        .note(NotePlacement::RightOf, &bob, "no answer")
        .end()
        .unwrap()
        .end()
        .unwrap()
        .message(&alice, ArrowKind::SolidArrow, &alice, "Wait")
        .note_spanning(&alice, &bob, "done")
        .build()
        .unwrap();

    assert_eq!(diagram.messages().len(), 3);
    let SequenceStatement::Block(outer) = &diagram.statements[3] else {
        panic!("expected the loop block");
    };
    assert_eq!(outer.kind, BlockKind::Loop);
    let SequenceStatement::Block(inner) = &outer.statements[1] else {
        panic!("expected the alt block");
    };
    assert_eq!(inner.branches.len(), 1);
    assert_eq!(inner.branches[0].label.as_deref(), Some("down"));

    assert_reparses(&push_diagram(Program::default(), diagram));
}

#[test]
fn sequence_builder_rejects_unbalanced_blocks() {
    let unclosed = SequenceBuilder::new()
        .open_block(BlockKind::Opt, None)
        .build();
    assert_eq!(unclosed, Err(Error::UnclosedBlock(BlockKind::Opt)));

    assert_eq!(SequenceBuilder::new().end().err(), Some(Error::NoOpenBlock));
    assert_eq!(
        SequenceBuilder::new().branch(None).err(),
        Some(Error::NoOpenBlock)
    );
    assert_eq!(
        SequenceBuilder::new()
            .open_block(BlockKind::Loop, None)
            .branch(Some("again"))
            .err(),
        Some(Error::NoBranches(BlockKind::Loop))
    );
}

#[test]
fn sequence_builder_continues_a_parsed_diagram() {
    let parsed = merrow::parse("sequenceDiagram\n    A->>B: first\n").unwrap();
    let Some(Diagram::Sequence(diagram)) = parsed.diagrams.into_iter().next() else {
        panic!("expected a sequence diagram");
    };
    let extended = SequenceBuilder::from_diagram(diagram)
        .activate(&actor("B"))
        .message(&actor("B"), ArrowKind::DottedArrow, &actor("A"), "second")
        .deactivate(&actor("B"))
        .build()
        .unwrap();

    let texts: Vec<&str> = extended.messages().iter().map(|m| m.text.text()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert_reparses(&push_diagram(Program::default(), extended));
}

#[test]
fn gantt_builder_resolves_schedules() {
    let (spec, build) = (TaskId::new("spec").unwrap(), TaskId::new("build").unwrap());
    let days = |amount| TaskEnd::Duration {
        amount,
        unit: DurationUnit::Days,
    };
    let chart = GanttBuilder::new()
        .title("Plan")
        .date_format("YYYY-MM-DD")
        .section("Design")
        .task("Write spec", Some(&spec), TaskStart::Date("2024-01-01".into()), days(3))
        .status(TaskStatus::Done)
        .section("Work")
        .task("Build it", Some(&build), TaskStart::After(vec!["spec".into()]), days(2))
        .status(TaskStatus::Crit)
        .task("Ship", None, TaskStart::Previous, days(1))
        .build()
        .unwrap();

    let end = |id: &str| chart.task(id).and_then(|t| t.schedule).map(|s| s.end.date().to_string());
    assert_eq!(end("spec").as_deref(), Some("2024-01-04"));
    assert_eq!(end("build").as_deref(), Some("2024-01-06"));
    let ship = chart.tasks().last().and_then(|t| t.schedule).map(|s| s.end.date().to_string());
    assert_eq!(ship.as_deref(), Some("2024-01-07"));

    assert_reparses(&push_diagram(Program::default(), chart));
}

#[test]
fn gantt_builder_skips_excluded_days() {
    let t = TaskId::new("t").unwrap();
    let chart = GanttBuilder::new()
        .excludes(["Weekends"])
        .task("Fri start", Some(&t), TaskStart::Date("2024-01-05".into()), TaskEnd::Duration {
            amount: 2,
            unit: DurationUnit::Days,
        })
        .build()
        .unwrap();
    assert_eq!(chart.excludes, vec!["weekends"]);
    let end = chart.task("t").and_then(|t| t.schedule).map(|s| s.end.date().to_string());
    assert_eq!(end.as_deref(), Some("2024-01-09"));
}

#[test]
fn gantt_builder_reports_unknown_dependencies() {
    let result = GanttBuilder::new()
        .task("Orphan", None, TaskStart::After(vec!["ghost".into()]), TaskEnd::Duration {
            amount: 1,
            unit: DurationUnit::Days,
        })
        .build();
    let err = match result {
        Err(Error::Parse(err)) => err,
        other => panic!("expected a parse error, got {other:?}"),
    };
    assert_eq!(err.kind(), merrow::ErrorKind::InvalidIdentifier);
}

#[test]
fn push_diagram_appends_in_order() {
    let program = push_diagram(Program::default(), FlowchartBuilder::new(Direction::Lr).build());
    let program = push_diagram(program, SequenceBuilder::new().build().unwrap());
    let dialects: Vec<_> = program.diagrams.iter().map(Diagram::dialect).collect();
    assert_eq!(dialects, vec![merrow::Dialect::Flowchart, merrow::Dialect::Sequence]);
}
