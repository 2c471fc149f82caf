use crate::ast::Diagram;
use crate::diagram::{GenerateOptions, ParseContext};
use crate::lexer::{Family, Position, Token, TokenKind, Vocabulary};
use crate::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod date;
mod generate;
mod parse;
mod schedule;

pub use generate::generate_gantt;
pub use parse::parse_gantt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Done,
    Active,
    Crit,
    Milestone,
}

impl TaskStatus {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "done" => Some(Self::Done),
            "active" => Some(Self::Active),
            "crit" => Some(Self::Crit),
            "milestone" => Some(Self::Milestone),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Active => "active",
            Self::Crit => "crit",
            Self::Milestone => "milestone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum TaskStart {
    /// A literal date in the diagram's date format, kept as written.
    Date(String),
    /// `after a b`: the latest end among the named tasks.
    After(Vec<String>),
    /// No start given: right after the previous task.
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DurationUnit {
    Days,
    Weeks,
    Hours,
}

impl DurationUnit {
    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Days),
            'w' => Some(Self::Weeks),
            'h' => Some(Self::Hours),
            _ => None,
        }
    }

    pub fn suffix(self) -> char {
        match self {
            Self::Days => 'd',
            Self::Weeks => 'w',
            Self::Hours => 'h',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TaskEnd {
    Duration { amount: u64, unit: DurationUnit },
    /// A literal end date, kept as written.
    Date { value: String },
}

/// Start and end a task resolves to once dependencies and exclusions are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<TaskStatus>,
    pub start: TaskStart,
    pub end: TaskEnd,
    /// Derived while parsing; `None` when the start cannot be resolved to a date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// `None` for tasks written before the first `section` line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttDiagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The `dateFormat` directive, if written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval: Option<String>,
    /// Lower-cased entries: `weekends`, weekday names or literal dates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_marker: Option<String>,
    pub sections: Vec<Section>,
}

impl GanttDiagram {
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.sections.iter().flat_map(|s| s.tasks.iter())
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks().find(|t| t.id.as_deref() == Some(id))
    }

    /// Recomputes every task's schedule in document order, the way the parser does.
    /// `default_date_format` applies when the chart has no `dateFormat` of its own. Errors carry
    /// the start-of-document position since built charts have no source.
    pub fn resolve_schedules(&mut self, default_date_format: &str) -> Result<()> {
        let date_format = self
            .date_format
            .clone()
            .unwrap_or_else(|| default_date_format.to_string());
        let mut raw_tasks = Vec::new();
        for (idx, section) in self.sections.iter_mut().enumerate() {
            for task in section.tasks.drain(..) {
                raw_tasks.push((idx, task, Position::START));
            }
        }
        parse::resolve_tasks(self, raw_tasks, &date_format)
    }
}

fn operator(_rest: &str) -> Option<(TokenKind, usize)> {
    None
}

pub const VOCABULARY: Vocabulary = Vocabulary {
    family: Family::LineOriented,
    operator,
    enclosures: &[],
    line_keywords: &[
        "title",
        "dateFormat",
        "axisFormat",
        "tickInterval",
        "excludes",
        "includes",
        "todayMarker",
        "section",
    ],
};

pub fn parse_diagram(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<Diagram> {
    parse_gantt(tokens, ctx).map(Diagram::Gantt)
}

pub fn generate_diagram(diagram: &Diagram, options: &GenerateOptions) -> String {
    match diagram {
        Diagram::Gantt(gantt) => generate_gantt(gantt, options),
        _ => String::new(),
    }
}
