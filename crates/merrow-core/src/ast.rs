//! Document-level syntax tree. Dialect node types live in their `diagrams::*` modules and are
//! re-exported here.

use crate::Dialect;
use serde::{Deserialize, Serialize};

pub use crate::content::{Content, RichKind, RichText};
pub use crate::diagrams::class::{
    ClassDef, ClassDiagram, ClassMember, ClassRelation, Classifier, MemberKind, RelationDirection,
    RelationKind, Visibility,
};
pub use crate::diagrams::er::{
    Cardinality, Entity, EntityAttribute, ErDiagram, Identification, KeyKind, Relationship,
};
pub use crate::diagrams::flowchart::{
    Direction, EdgeStyle, FlowEdge, FlowNode, FlowStatement, Flowchart, NodeShape, Subgraph,
};
pub use crate::diagrams::gantt::{
    DurationUnit, GanttDiagram, Schedule, Section, Task, TaskEnd, TaskStart, TaskStatus,
};
pub use crate::diagrams::sequence::{
    Activation, ArrowKind, Block, BlockKind, Branch, Message, Note, NotePlacement, Participant,
    ParticipantKind, SequenceDiagram, SequenceStatement,
};
pub use crate::diagrams::state::{
    NotePosition, PseudoKind, PseudoTransition, StateDef, StateDiagram, StateNote, StateRef,
    StateScope, StateVersion, Transition,
};

/// A parsed document: its diagrams in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub diagrams: Vec<Diagram>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Diagram {
    Flowchart(Flowchart),
    Sequence(SequenceDiagram),
    Class(ClassDiagram),
    Er(ErDiagram),
    State(StateDiagram),
    Gantt(GanttDiagram),
}

impl Diagram {
    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Flowchart(_) => Dialect::Flowchart,
            Self::Sequence(_) => Dialect::Sequence,
            Self::Class(_) => Dialect::Class,
            Self::Er(_) => Dialect::Er,
            Self::State(_) => Dialect::State,
            Self::Gantt(_) => Dialect::Gantt,
        }
    }
}

impl Program {
    pub fn new(diagrams: Vec<Diagram>) -> Self {
        Self { diagrams }
    }
}

impl From<Flowchart> for Diagram {
    fn from(value: Flowchart) -> Self {
        Self::Flowchart(value)
    }
}

impl From<SequenceDiagram> for Diagram {
    fn from(value: SequenceDiagram) -> Self {
        Self::Sequence(value)
    }
}

impl From<ClassDiagram> for Diagram {
    fn from(value: ClassDiagram) -> Self {
        Self::Class(value)
    }
}

impl From<ErDiagram> for Diagram {
    fn from(value: ErDiagram) -> Self {
        Self::Er(value)
    }
}

impl From<StateDiagram> for Diagram {
    fn from(value: StateDiagram) -> Self {
        Self::State(value)
    }
}

impl From<GanttDiagram> for Diagram {
    fn from(value: GanttDiagram) -> Self {
        Self::Gantt(value)
    }
}
