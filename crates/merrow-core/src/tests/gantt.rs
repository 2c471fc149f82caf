use super::*;
use crate::ast::*;
use chrono::NaiveDate;

fn gantt(text: &str) -> GanttDiagram {
    match only(parse(text).unwrap()) {
        Diagram::Gantt(diagram) => diagram,
        other => panic!("expected a gantt chart, got {:?}", other.dialect()),
    }
}

fn day(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn duration_in_days_sets_the_end() {
    let diagram = gantt("gantt\ndateFormat YYYY-MM-DD\nsection A\nTask one :t1, 2024-01-01, 5d");
    let task = diagram.task("t1").unwrap();
    assert_eq!(task.name, "Task one");
    assert_eq!(
        task.end,
        TaskEnd::Duration {
            amount: 5,
            unit: DurationUnit::Days
        }
    );
    let schedule = task.schedule.unwrap();
    assert_eq!(schedule.start, day(2024, 1, 1));
    assert_eq!(schedule.end, day(2024, 1, 6));
}

#[test]
fn after_and_previous_starts_chain() {
    let diagram = gantt(
        "gantt
dateFormat YYYY-MM-DD
title Plan
section Build
Design :done, des1, 2024-01-01, 2024-01-03
Code :active, code, after des1, 3d
Test :2d
section Ship
Release :crit, milestone, rel, after code des1, 1d",
    );
    assert_eq!(diagram.title.as_deref(), Some("Plan"));
    assert_eq!(diagram.sections.len(), 2);
    assert_eq!(diagram.sections[0].name.as_deref(), Some("Build"));

    let design = diagram.task("des1").unwrap();
    assert_eq!(design.status, vec![TaskStatus::Done]);
    assert_eq!(design.schedule.unwrap().end, day(2024, 1, 3));

    let code = diagram.task("code").unwrap();
    assert_eq!(code.start, TaskStart::After(vec!["des1".to_string()]));
    assert_eq!(code.schedule.unwrap().start, day(2024, 1, 3));
    assert_eq!(code.schedule.unwrap().end, day(2024, 1, 6));

    let test = &diagram.sections[0].tasks[2];
    assert_eq!(test.id, None);
    assert_eq!(test.start, TaskStart::Previous);
    assert_eq!(test.schedule.unwrap().end, day(2024, 1, 8));

    let release = diagram.task("rel").unwrap();
    assert_eq!(release.status, vec![TaskStatus::Crit, TaskStatus::Milestone]);
    assert_eq!(release.schedule.unwrap().start, day(2024, 1, 6));
}

#[test]
fn two_part_tasks_tell_ids_from_dates() {
    let diagram = gantt("gantt\nA :a1, 2024-03-01, 1d\nB :b1, 2d\nC :2024-03-10, 1w");
    assert_eq!(diagram.task("b1").unwrap().start, TaskStart::Previous);
    let c = &diagram.sections[0].tasks[2];
    assert_eq!(c.id, None);
    assert_eq!(c.start, TaskStart::Date("2024-03-10".to_string()));
    assert_eq!(c.schedule.unwrap().end, day(2024, 3, 17));
}

#[test]
fn excluded_weekends_push_durations_out() {
    let diagram = gantt(
        "gantt\ndateFormat YYYY-MM-DD\nexcludes weekends\nWork :w1, 2024-01-05, 2d",
    );
    assert_eq!(diagram.excludes, vec!["weekends".to_string()]);
    assert_eq!(diagram.task("w1").unwrap().schedule.unwrap().end, day(2024, 1, 9));
}

#[test]
fn hours_with_a_time_format() {
    let diagram = gantt("gantt\ndateFormat YYYY-MM-DD HH:mm\nCall :c1, 2024-01-01 09:00, 2h");
    let schedule = diagram.task("c1").unwrap().schedule.unwrap();
    assert_eq!(schedule.end, day(2024, 1, 1) + chrono::Duration::hours(11));
}

#[test]
fn date_format_falls_back_to_config() {
    let engine = Engine::new().with_config(Config::from_value(serde_json::json!({
        "gantt": { "dateFormat": "DD/MM/YYYY" },
    })));
    let program = engine.parse("gantt\nA :a1, 05/01/2024, 1d").unwrap();
    let Diagram::Gantt(diagram) = &program.diagrams[0] else {
        panic!("expected a gantt chart");
    };
    assert_eq!(diagram.date_format, None);
    assert_eq!(diagram.task("a1").unwrap().schedule.unwrap().end, day(2024, 1, 6));
}

#[test]
fn malformed_durations() {
    for end in ["1.5d", "3x", "2days"] {
        let err = parse(&format!("gantt\nA :a1, 2024-01-01, {end}")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDuration, "{end}");
    }
}

#[test]
fn malformed_dates() {
    let err = parse("gantt\nA :a1, 2024-13-45, 1d").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDate);
    assert_eq!(err.position().line, 2);

    let err = parse("gantt\ndateFormat YYYY-MM-DD\nA :a1, 2024-01-01, soon").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDate);
}

#[test]
fn after_must_name_an_earlier_task() {
    let err = parse("gantt\nA :a1, after nope, 1d").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
}

#[test]
fn round_trips() {
    assert_round_trip(
        "gantt
    title A Gantt Diagram
    dateFormat YYYY-MM-DD
    axisFormat %m/%d
    tickInterval 1week
    excludes weekends, 2024-01-10
    includes 2024-01-13
    todayMarker off
    Kickoff :k, 2024-01-01, 1d
    section Section
    A task :a1, 2024-01-02, 30d
    Another task :after a1, 20d
    section Another
    Task in sec :done, 2024-01-12, 12d
    another task :crit, active, 24d",
    );
}

#[test]
fn resolving_again_reproduces_parsed_schedules() {
    let parsed = gantt(
        "gantt\nexcludes weekends\nsection S\nA :a, 2024-01-04, 3d\nB :b, after a, 1w\nC :1d",
    );
    let mut rebuilt = parsed.clone();
    for section in &mut rebuilt.sections {
        for task in &mut section.tasks {
            task.schedule = None;
        }
    }
    rebuilt.resolve_schedules("YYYY-MM-DD").unwrap();
    assert_eq!(rebuilt, parsed);
}

#[test]
fn directive_words_inside_task_names_are_plain_text() {
    let text = "gantt
dateFormat YYYY-MM-DD
section Plan
Review section two :a1, 2024-01-01, 2d
Fix the title bar :a2, after a1, 1d
Check excludes list :1d";
    let diagram = gantt(text);
    assert_eq!(diagram.sections.len(), 1);
    assert_eq!(diagram.title, None);
    let names: Vec<&str> = diagram.tasks().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Review section two", "Fix the title bar", "Check excludes list"]);
    assert_eq!(diagram.task("a1").unwrap().schedule.unwrap().end, day(2024, 1, 3));
    assert_eq!(diagram.task("a2").unwrap().schedule.unwrap().end, day(2024, 1, 4));
    assert!(diagram.excludes.is_empty());
    assert_round_trip(text);
}
