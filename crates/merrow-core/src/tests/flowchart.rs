use super::*;
use crate::ast::*;

fn flowchart(text: &str) -> Flowchart {
    match only(parse(text).unwrap()) {
        Diagram::Flowchart(chart) => chart,
        other => panic!("expected a flowchart, got {:?}", other.dialect()),
    }
}

#[test]
fn two_nodes_one_edge() {
    let chart = flowchart("flowchart LR\nA-->B");
    assert_eq!(chart.direction, Direction::Lr);
    assert_eq!(chart.nodes().len(), 2);
    assert_eq!(chart.edges().len(), 1);

    let out = generate(&Program::new(vec![chart.into()]));
    assert!(out.contains("flowchart LR"));
    assert!(out.contains("A --> B"));
}

#[test]
fn graph_header_and_td_direction() {
    let chart = flowchart("graph TD\n  A --> B");
    assert_eq!(chart.direction, Direction::Tb);
}

#[test]
fn shaped_endpoints_are_declared_before_the_edge() {
    let chart = flowchart("flowchart TB\nA[Start] -->|yes| B{Is it?}");
    let nodes = chart.nodes();
    assert_eq!(nodes["A"].shape, NodeShape::Square);
    assert_eq!(nodes["A"].label, Some(Content::plain("Start")));
    assert_eq!(nodes["B"].shape, NodeShape::Rhombus);

    let edges = chart.edges();
    assert_eq!(edges[0].label, Some(Content::plain("yes")));
    assert!(matches!(chart.statements[0], FlowStatement::Node(_)));
    assert!(matches!(chart.statements[2], FlowStatement::Edge(_)));
}

#[test]
fn chains_and_groups_expand_to_every_pair() {
    let chart = flowchart("flowchart LR\nA & B --> C --> D");
    let pairs: Vec<(&str, &str)> = chart
        .edges()
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert_eq!(pairs, vec![("A", "C"), ("B", "C"), ("C", "D")]);
}

#[test]
fn nested_subgraphs() {
    let chart = flowchart(
        "flowchart TB\nsubgraph outer [Outer box]\n  direction LR\n  subgraph inner\n    a --> b\n  end\nend\nb --> c",
    );
    let subgraphs = chart.subgraphs();
    assert_eq!(subgraphs.len(), 2);
    assert_eq!(subgraphs[0].id, "outer");
    assert_eq!(subgraphs[0].title, Some(Content::plain("Outer box")));
    assert_eq!(subgraphs[0].direction, Some(Direction::Lr));
    assert_eq!(subgraphs[1].id, "inner");
    assert_eq!(chart.nodes().len(), 3);
}

#[test]
fn unclosed_subgraph_reports_where_it_opened() {
    let err = parse("flowchart TB\nsubgraph one\nA --> B\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnterminatedBlock);
    assert_eq!(err.position().line, 2);
}

#[test]
fn stray_end_is_an_error() {
    let err = parse("flowchart TB\nA --> B\nend\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
}

#[test]
fn reserved_words_are_not_node_ids() {
    let err = parse("flowchart TB\nA --> subgraph\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
}

#[test]
fn bad_direction_is_rejected() {
    let err = parse("flowchart XY\nA --> B").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
}

#[test]
fn rich_and_entity_labels() {
    let chart = flowchart("flowchart LR\nA[\"`**bold**`\"] --> B[\"a #quot;b#quot;\"]");
    let nodes = chart.nodes();
    assert!(nodes["A"].label.as_ref().is_some_and(Content::is_rich));
    assert_eq!(nodes["B"].label, Some(Content::plain("a \"b\"")));
}

#[test]
fn round_trips() {
    assert_round_trip("flowchart LR\nA-->B");
    assert_round_trip(
        "flowchart TB\n  A[Start] -->|yes| B{Is it?}\n  B -.-> C((Circle))\n  C ==> D>Flag]\n  D --- E[(Disk)]",
    );
    assert_round_trip(
        "graph LR\nsubgraph one [First part]\n  direction TB\n  a1 --> a2\nend\nsubgraph two\n  b1\nend\none --> two",
    );
    assert_round_trip("flowchart LR\nA[\"quoted, with a #quot; inside\"] --> B(\"`markdown *label*`\")");
}

#[test]
fn generator_honours_indent_and_keyword_config() {
    let engine = Engine::new().with_config(Config::from_value(serde_json::json!({
        "generate": { "indent": 2 },
        "flowchart": { "keyword": "graph" },
    })));
    let program = engine.parse("flowchart LR\nA-->B").unwrap();
    assert_eq!(engine.generate(&program), "graph LR\n  A --> B\n");
}

#[test]
fn shared_openers_close_at_the_nearest_closer() {
    let chart = flowchart("flowchart LR\nA[/in\\] --> B[/out/]\nC[\\up/] --> D[\\down\\]");
    let nodes = chart.nodes();
    assert_eq!(nodes["A"].shape, NodeShape::Trapezoid);
    assert_eq!(nodes["A"].label, Some(Content::plain("in")));
    assert_eq!(nodes["B"].shape, NodeShape::LeanRight);
    assert_eq!(nodes["B"].label, Some(Content::plain("out")));
    assert_eq!(nodes["C"].shape, NodeShape::InvTrapezoid);
    assert_eq!(nodes["D"].shape, NodeShape::LeanLeft);
    assert_eq!(chart.edges().len(), 2);
}

#[test]
fn decoded_markup_labels_stay_plain() {
    let program = assert_round_trip(
        "flowchart LR\nA[\"#lt;b#gt;x#lt;/b#gt;\"] -->|\"#96;tick#96;\"| B",
    );
    let Diagram::Flowchart(chart) = only(program) else {
        panic!("expected a flowchart");
    };
    assert_eq!(chart.nodes()["A"].label, Some(Content::plain("<b>x</b>")));
    assert_eq!(chart.edges()[0].label, Some(Content::plain("`tick`")));
}
