use crate::*;

mod class;
mod detect;
mod er;
mod flowchart;
mod gantt;
mod sequence;

/// Parses `text`, checks that regenerating and reparsing gives the same program, and returns the
/// first parse.
fn assert_round_trip(text: &str) -> Program {
    let first = parse(text).unwrap();
    let generated = generate(&first);
    let second = parse(&generated).unwrap_or_else(|e| panic!("{e}\n--- generated ---\n{generated}"));
    assert_eq!(first, second, "generated:\n{generated}");
    first
}

fn only(program: Program) -> Diagram {
    assert_eq!(program.diagrams.len(), 1);
    program.diagrams.into_iter().next().unwrap()
}
