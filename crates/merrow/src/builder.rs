//! Building and editing diagrams without writing source text.
//!
//! Each builder owns a working copy of its diagram and hands back a finished tree from `build`.
//! Identifiers come in as validated newtypes, so a built diagram always generates text that
//! parses back to the same tree. Labels go through [`Content::from_source`], the same
//! classification the parsers apply.

use crate::ast::*;
use crate::config::DEFAULT_DATE_FORMAT;
use crate::ids::{NodeId, ParticipantId, TaskId};
use crate::{Error, Result};

fn label(text: &str) -> Option<Content> {
    let text = text.trim();
    (!text.is_empty()).then(|| Content::from_source(text))
}

fn keyword_label(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Appends `diagram` to a program.
pub fn push_diagram(mut program: Program, diagram: impl Into<Diagram>) -> Program {
    program.diagrams.push(diagram.into());
    program
}

#[derive(Debug, Clone, Default)]
pub struct FlowchartBuilder {
    chart: Flowchart,
}

impl FlowchartBuilder {
    pub fn new(direction: Direction) -> Self {
        Self {
            chart: Flowchart {
                direction,
                statements: Vec::new(),
            },
        }
    }

    pub fn from_chart(chart: Flowchart) -> Self {
        Self { chart }
    }

    /// Declares a node. A `Default` shape writes the bare id, so its label is dropped.
    pub fn node(mut self, id: &NodeId, shape: NodeShape, text: &str) -> Self {
        let label = match shape {
            NodeShape::Default => None,
            _ => label(text),
        };
        self.chart.statements.push(FlowStatement::Node(FlowNode {
            id: id.to_string(),
            shape,
            label,
        }));
        self
    }

    pub fn bare_node(mut self, id: &NodeId) -> Self {
        self.chart
            .statements
            .push(FlowStatement::Node(FlowNode::bare(id.as_str())));
        self
    }

    pub fn edge(self, from: &NodeId, style: EdgeStyle, to: &NodeId) -> Self {
        self.labeled_edge(from, style, "", to)
    }

    pub fn labeled_edge(mut self, from: &NodeId, style: EdgeStyle, text: &str, to: &NodeId) -> Self {
        self.chart.statements.push(FlowStatement::Edge(FlowEdge {
            from: from.to_string(),
            to: to.to_string(),
            style,
            label: label(text),
        }));
        self
    }

    /// Adds a subgraph whose statements are built by `body`.
    pub fn subgraph(
        mut self,
        id: &NodeId,
        title: Option<&str>,
        body: impl FnOnce(FlowchartBuilder) -> FlowchartBuilder,
    ) -> Self {
        let inner = body(FlowchartBuilder::new(self.chart.direction)).chart;
        self.chart.statements.push(FlowStatement::Subgraph(Subgraph {
            id: id.to_string(),
            title: title.and_then(label),
            direction: None,
            statements: inner.statements,
        }));
        self
    }

    /// Drops every declaration of `id` and every edge touching it, at any depth.
    pub fn remove_node(mut self, id: &NodeId) -> Self {
        fn retain(statements: &mut Vec<FlowStatement>, id: &str) {
            statements.retain(|stmt| match stmt {
                FlowStatement::Node(node) => node.id != id,
                FlowStatement::Edge(edge) => edge.from != id && edge.to != id,
                FlowStatement::Subgraph(_) => true,
            });
            for stmt in statements {
                if let FlowStatement::Subgraph(sg) = stmt {
                    retain(&mut sg.statements, id);
                }
            }
        }
        retain(&mut self.chart.statements, id.as_str());
        self
    }

    pub fn build(self) -> Flowchart {
        self.chart
    }
}

#[derive(Debug, Clone)]
struct OpenBlock {
    kind: BlockKind,
    label: Option<String>,
    statements: Vec<SequenceStatement>,
    branches: Vec<Branch>,
}

impl OpenBlock {
    fn statements_mut(&mut self) -> &mut Vec<SequenceStatement> {
        match self.branches.last_mut() {
            Some(branch) => &mut branch.statements,
            None => &mut self.statements,
        }
    }
}

/// Sequence diagrams with nested blocks. Blocks are opened with [`open_block`], split with
/// [`branch`] and closed with [`end`], mirroring the source text.
///
/// [`open_block`]: SequenceBuilder::open_block
/// [`branch`]: SequenceBuilder::branch
/// [`end`]: SequenceBuilder::end
#[derive(Debug, Clone, Default)]
pub struct SequenceBuilder {
    title: Option<String>,
    statements: Vec<SequenceStatement>,
    open: Vec<OpenBlock>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues an existing diagram; new statements go after its last one.
    pub fn from_diagram(diagram: SequenceDiagram) -> Self {
        Self {
            title: diagram.title,
            statements: diagram.statements,
            open: Vec::new(),
        }
    }

    fn push(mut self, statement: SequenceStatement) -> Self {
        match self.open.last_mut() {
            Some(block) => block.statements_mut().push(statement),
            None => self.statements.push(statement),
        }
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = keyword_label(Some(title));
        self
    }

    pub fn participant(self, kind: ParticipantKind, id: &ParticipantId, alias: Option<&str>) -> Self {
        self.push(SequenceStatement::Participant(Participant {
            kind,
            id: id.to_string(),
            alias: keyword_label(alias),
        }))
    }

    pub fn message(self, from: &ParticipantId, arrow: ArrowKind, to: &ParticipantId, text: &str) -> Self {
        self.push(SequenceStatement::Message(Message {
            from: from.to_string(),
            to: to.to_string(),
            arrow,
            activation: None,
            text: label(text).unwrap_or_else(|| Content::plain("")),
        }))
    }

    pub fn note(self, placement: NotePlacement, actor: &ParticipantId, text: &str) -> Self {
        self.push(SequenceStatement::Note(Note {
            placement,
            actors: vec![actor.to_string()],
            text: label(text).unwrap_or_else(|| Content::plain("")),
        }))
    }

    /// `note over A, B`.
    pub fn note_spanning(self, first: &ParticipantId, last: &ParticipantId, text: &str) -> Self {
        self.push(SequenceStatement::Note(Note {
            placement: NotePlacement::Over,
            actors: vec![first.to_string(), last.to_string()],
            text: label(text).unwrap_or_else(|| Content::plain("")),
        }))
    }

    pub fn activate(self, actor: &ParticipantId) -> Self {
        self.push(SequenceStatement::Activate {
            actor: actor.to_string(),
        })
    }

    pub fn deactivate(self, actor: &ParticipantId) -> Self {
        self.push(SequenceStatement::Deactivate {
            actor: actor.to_string(),
        })
    }

    pub fn autonumber(self, start: Option<u64>, step: Option<u64>) -> Self {
        // A step is only written after a start.
        let step = start.and(step);
        self.push(SequenceStatement::Autonumber { start, step })
    }

    pub fn open_block(mut self, kind: BlockKind, label: Option<&str>) -> Self {
        tracing::trace!(block = kind.keyword(), "open block");
        self.open.push(OpenBlock {
            kind,
            label: keyword_label(label),
            statements: Vec::new(),
            branches: Vec::new(),
        });
        self
    }

    /// Starts the next `else` / `and` / `option` branch of the innermost block.
    pub fn branch(mut self, label: Option<&str>) -> Result<Self> {
        let block = self.open.last_mut().ok_or(Error::NoOpenBlock)?;
        if block.kind.branch_keyword().is_none() {
            return Err(Error::NoBranches(block.kind));
        }
        block.branches.push(Branch {
            label: keyword_label(label),
            statements: Vec::new(),
        });
        Ok(self)
    }

    pub fn end(mut self) -> Result<Self> {
        let block = self.open.pop().ok_or(Error::NoOpenBlock)?;
        tracing::trace!(block = block.kind.keyword(), "close block");
        Ok(self.push(SequenceStatement::Block(Block {
            kind: block.kind,
            label: block.label,
            statements: block.statements,
            branches: block.branches,
        })))
    }

    pub fn build(self) -> Result<SequenceDiagram> {
        if let Some(block) = self.open.last() {
            return Err(Error::UnclosedBlock(block.kind));
        }
        Ok(SequenceDiagram {
            title: self.title,
            statements: self.statements,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct GanttBuilder {
    diagram: GanttDiagram,
}

impl GanttBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_diagram(diagram: GanttDiagram) -> Self {
        Self { diagram }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.diagram.title = keyword_label(Some(title));
        self
    }

    pub fn date_format(mut self, format: &str) -> Self {
        self.diagram.date_format = keyword_label(Some(format));
        self
    }

    /// Adds `excludes` entries: `weekends`, weekday names or dates in the chart's format.
    pub fn excludes<'a>(mut self, entries: impl IntoIterator<Item = &'a str>) -> Self {
        self.diagram.excludes.extend(
            entries
                .into_iter()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty()),
        );
        self
    }

    pub fn section(mut self, name: &str) -> Self {
        self.diagram.sections.push(Section {
            name: keyword_label(Some(name)),
            tasks: Vec::new(),
        });
        self
    }

    /// Adds a task to the last section, opening an unnamed one when there is none yet.
    pub fn task(mut self, name: &str, id: Option<&TaskId>, start: TaskStart, end: TaskEnd) -> Self {
        if self.diagram.sections.is_empty() {
            self.diagram.sections.push(Section::default());
        }
        if let Some(section) = self.diagram.sections.last_mut() {
            section.tasks.push(Task {
                id: id.map(TaskId::to_string),
                name: name.trim().to_string(),
                status: Vec::new(),
                start,
                end,
                schedule: None,
            });
        }
        self
    }

    /// Tags the most recently added task.
    pub fn status(mut self, status: TaskStatus) -> Self {
        let last = self
            .diagram
            .sections
            .iter_mut()
            .rev()
            .find_map(|s| s.tasks.last_mut());
        if let Some(task) = last {
            if !task.status.contains(&status) {
                task.status.push(status);
            }
        }
        self
    }

    /// Resolves every schedule. Fails on the same malformed dates and unknown `after` references
    /// the parser rejects.
    pub fn build(self) -> Result<GanttDiagram> {
        self.build_with_default_format(DEFAULT_DATE_FORMAT)
    }

    /// [`build`](Self::build) with the date format assumed when none was set.
    pub fn build_with_default_format(mut self, date_format: &str) -> Result<GanttDiagram> {
        self.diagram.resolve_schedules(date_format)?;
        Ok(self.diagram)
    }
}
