use super::{GanttDiagram, Task, TaskEnd, TaskStart};
use crate::codegen::Writer;
use crate::diagram::GenerateOptions;

pub fn generate_gantt(diagram: &GanttDiagram, options: &GenerateOptions) -> String {
    let mut w = Writer::new(options.indent);
    w.line("gantt");
    w.indented(|w| {
        let directives = [
            ("title", diagram.title.clone()),
            ("dateFormat", diagram.date_format.clone()),
            ("axisFormat", diagram.axis_format.clone()),
            ("tickInterval", diagram.tick_interval.clone()),
            ("excludes", list(&diagram.excludes)),
            ("includes", list(&diagram.includes)),
            ("todayMarker", diagram.today_marker.clone()),
        ];
        for (keyword, value) in directives {
            if let Some(value) = value {
                w.line(format!("{keyword} {value}"));
            }
        }
        for section in &diagram.sections {
            match &section.name {
                Some(name) => {
                    w.line(format!("section {name}"));
                    w.indented(|w| {
                        for task in &section.tasks {
                            w.line(task_source(task));
                        }
                    });
                }
                None => {
                    for task in &section.tasks {
                        w.line(task_source(task));
                    }
                }
            }
        }
    });
    let out = w.finish();
    tracing::trace!(bytes = out.len(), "generated gantt diagram");
    out
}

fn list(items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| items.join(", "))
}

/// `Name :status, id, start, end`, with absent parts left out.
fn task_source(task: &Task) -> String {
    let mut parts: Vec<String> = task.status.iter().map(|s| s.as_str().to_string()).collect();
    if let Some(id) = &task.id {
        parts.push(id.clone());
    }
    match &task.start {
        TaskStart::Date(date) => parts.push(date.clone()),
        TaskStart::After(ids) => parts.push(format!("after {}", ids.join(" "))),
        TaskStart::Previous => {}
    }
    parts.push(match &task.end {
        TaskEnd::Duration { amount, unit } => format!("{amount}{}", unit.suffix()),
        TaskEnd::Date { value } => value.clone(),
    });
    format!("{} :{}", task.name, parts.join(", "))
}
