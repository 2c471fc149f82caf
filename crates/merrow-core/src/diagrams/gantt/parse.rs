use super::date::parse_date;
use super::schedule::Calendar;
use super::{
    DurationUnit, GanttDiagram, Schedule, Section, Task, TaskEnd, TaskStart, TaskStatus,
    VOCABULARY,
};
use crate::cursor::Cursor;
use crate::diagram::ParseContext;
use crate::lexer::{Position, Token, TokenKind};
use crate::reserved::is_reserved;
use crate::{Dialect, Error, Result};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?)([a-zA-Z]+)$").expect("valid regex"))
}

fn list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s,]+").expect("valid regex"))
}

fn split_list_lower(text: &str) -> Vec<String> {
    list_re()
        .split(&text.to_lowercase())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn looks_like_id(text: &str) -> bool {
    text.starts_with(|c: char| c.is_alphabetic() || c == '_')
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-'))
}

pub fn parse_gantt(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<GanttDiagram> {
    let mut cur = Cursor::new(tokens, ctx.source, Dialect::Gantt);
    cur.skip_newlines();
    if !cur.eat_word("gantt") {
        return Err(cur.unexpected("`gantt`"));
    }
    cur.expect_line_end()?;

    let mut diagram = GanttDiagram::default();
    let mut raw_tasks: Vec<(usize, Task, Position)> = Vec::new();

    loop {
        cur.skip_newlines();
        if cur.at_eof() {
            break;
        }
        let before = cur.index();
        let head = cur.peek();

        let directive = VOCABULARY
            .line_keywords
            .iter()
            .copied()
            .find(|kw| head.kind == TokenKind::Ident && head.text.eq_ignore_ascii_case(kw));

        if let Some(keyword) = directive {
            cur.advance();
            let value = cur.eat(TokenKind::Text).map(|t| t.text.trim().to_string());
            apply_directive(&mut diagram, keyword, value, head.start)?;
        } else {
            if diagram.sections.is_empty() {
                diagram.sections.push(Section::default());
            }
            let section = diagram.sections.len() - 1;
            let at = cur.position();
            let date_format = diagram
                .date_format
                .as_deref()
                .unwrap_or_else(|| ctx.config.gantt_date_format());
            let task = parse_task(&mut cur, date_format)?;
            raw_tasks.push((section, task, at));
        }

        cur.ensure_progress(before, "gantt statement")?;
        cur.expect_line_end()?;
    }

    let date_format = diagram
        .date_format
        .clone()
        .unwrap_or_else(|| ctx.config.gantt_date_format().to_string());
    resolve_tasks(&mut diagram, raw_tasks, &date_format)?;
    Ok(diagram)
}

fn apply_directive(
    diagram: &mut GanttDiagram,
    keyword: &str,
    value: Option<String>,
    at: Position,
) -> Result<()> {
    let required = |value: Option<String>| {
        value.ok_or_else(|| Error::unexpected(format!("value after `{keyword}`"), "end of line", at))
    };
    match keyword {
        "title" => diagram.title = value,
        "dateFormat" => diagram.date_format = Some(required(value)?),
        "axisFormat" => diagram.axis_format = Some(required(value)?),
        "tickInterval" => diagram.tick_interval = Some(required(value)?),
        "todayMarker" => diagram.today_marker = Some(required(value)?),
        "excludes" => diagram.excludes.extend(split_list_lower(&required(value)?)),
        "includes" => diagram.includes.extend(split_list_lower(&required(value)?)),
        _ => {
            tracing::trace!(section = value.as_deref().unwrap_or_default(), "open section");
            diagram.sections.push(Section {
                name: Some(required(value)?),
                tasks: Vec::new(),
            });
        }
    }
    Ok(())
}

/// `Name : [status, ...] [id,] [start,] end`. With two parts the first is an id when it is
/// not a date but reads like an identifier. Dates are validated in [`resolve_tasks`].
fn parse_task(cur: &mut Cursor<'_>, date_format: &str) -> Result<Task> {
    let name = cur.take_line(|t| t.kind == TokenKind::Colon).to_string();
    if cur.eat(TokenKind::Colon).is_none() {
        return Err(cur.unexpected("`:` after the task name"));
    }
    let data_tok = cur.expect(TokenKind::Text, "task data")?;

    let mut parts: Vec<&str> = data_tok.text.split(',').map(str::trim).collect();
    let mut status = Vec::new();
    while let Some(tag) = parts.first().and_then(|p| TaskStatus::parse(p)) {
        status.push(tag);
        parts.remove(0);
    }

    let (id, start, end) = match parts.as_slice() {
        [end] => (None, None, *end),
        [first, end] if looks_like_id(first) && parse_date(first, date_format).is_none() => {
            (Some(*first), None, *end)
        }
        [start, end] => (None, Some(*start), *end),
        [id, start, end] => (Some(*id), Some(*start), *end),
        _ => {
            return Err(Error::unexpected(
                "`[id,] [start,] end`",
                format!("`{}`", data_tok.text),
                data_tok.start,
            ));
        }
    };

    if let Some(id) = id {
        if is_reserved(Dialect::Gantt, id) || !looks_like_id(id) {
            return Err(Error::InvalidIdentifier {
                ident: id.to_string(),
                position: data_tok.start,
            });
        }
    }

    let start = match start {
        None => TaskStart::Previous,
        Some(text) => match text.strip_prefix("after") {
            Some(rest) if rest.starts_with(char::is_whitespace) => {
                TaskStart::After(rest.split_whitespace().map(str::to_string).collect())
            }
            _ => TaskStart::Date(text.to_string()),
        },
    };

    let end = match duration_re().captures(end) {
        _ if parse_date(end, date_format).is_some() => TaskEnd::Date {
            value: end.to_string(),
        },
        Some(caps) => {
            let unit = caps[2]
                .chars()
                .next()
                .filter(|_| caps[2].len() == 1)
                .and_then(DurationUnit::from_suffix);
            let amount = caps[1].parse::<u64>().ok();
            match (amount, unit) {
                (Some(amount), Some(unit)) => TaskEnd::Duration { amount, unit },
                _ => {
                    return Err(Error::MalformedDuration {
                        text: end.to_string(),
                        position: data_tok.start,
                    });
                }
            }
        }
        None => TaskEnd::Date {
            value: end.to_string(),
        },
    };

    Ok(Task {
        id: id.map(str::to_string),
        name,
        status,
        start,
        end,
        schedule: None,
    })
}

/// Validates dates and `after` references in document order and computes each schedule.
pub(super) fn resolve_tasks(
    diagram: &mut GanttDiagram,
    raw_tasks: Vec<(usize, Task, Position)>,
    date_format: &str,
) -> Result<()> {
    let calendar = Calendar {
        date_format,
        excludes: &diagram.excludes,
        includes: &diagram.includes,
    };
    let malformed_date = |text: &str, position: Position| Error::MalformedDate {
        text: text.to_string(),
        format: date_format.to_string(),
        position,
    };

    let mut ends: FxHashMap<String, Option<Schedule>> = FxHashMap::default();
    let mut previous: Option<Schedule> = None;
    let mut resolved = Vec::with_capacity(raw_tasks.len());

    for (section, mut task, at) in raw_tasks {
        if let TaskEnd::Date { value } = &task.end {
            if parse_date(value, date_format).is_none() {
                return Err(malformed_date(value, at));
            }
        }

        let start = match &task.start {
            TaskStart::Date(text) => {
                Some(parse_date(text, date_format).ok_or_else(|| malformed_date(text, at))?)
            }
            TaskStart::Previous => previous.map(|s| s.end),
            TaskStart::After(ids) => {
                let mut latest = None;
                for id in ids {
                    let Some(dep) = ends.get(id.as_str()) else {
                        return Err(Error::InvalidIdentifier {
                            ident: id.clone(),
                            position: at,
                        });
                    };
                    latest = match (latest, dep.map(|s| s.end)) {
                        (Some(a), Some(b)) => Some(std::cmp::max(a, b)),
                        (a, b) => a.or(b),
                    };
                }
                latest
            }
        };

        task.schedule = start.and_then(|start| calendar.resolve(start, &task.end));
        previous = task.schedule;
        if let Some(id) = &task.id {
            ends.insert(id.clone(), task.schedule);
        }
        resolved.push((section, task));
    }

    for (section, task) in resolved {
        if let Some(section) = diagram.sections.get_mut(section) {
            section.tasks.push(task);
        }
    }
    Ok(())
}
