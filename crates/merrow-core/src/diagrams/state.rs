use crate::ast::Diagram;
use crate::diagram::{GenerateOptions, ParseContext};
use crate::diagrams::flowchart::Direction;
use crate::lexer::{Family, Token, TokenKind, Vocabulary};
use crate::Result;
use serde::{Deserialize, Serialize};

mod generate;
mod parse;

pub use generate::generate_state;
pub use parse::parse_state;

/// Id the `[*]` marker resolves to when it is a transition source.
pub const ENTRY_ID: &str = "[*]start";
/// Id the `[*]` marker resolves to when it is a transition target.
pub const EXIT_ID: &str = "[*]end";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateVersion {
    /// `stateDiagram`
    V1,
    /// `stateDiagram-v2`
    #[default]
    V2,
}

impl StateVersion {
    pub fn header(self) -> &'static str {
        match self {
            Self::V1 => "stateDiagram",
            Self::V2 => "stateDiagram-v2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PseudoKind {
    Choice,
    Fork,
    Join,
}

impl PseudoKind {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "choice" => Some(Self::Choice),
            "fork" => Some(Self::Fork),
            "join" => Some(Self::Join),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Choice => "choice",
            Self::Fork => "fork",
            Self::Join => "join",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDef {
    pub id: String,
    /// From `state "label" as id` or `id : label`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<StateScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudo: Option<PseudoKind>,
}

impl StateDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// `[*] --> state` (an entry) or `state --> [*]` (an exit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PseudoTransition {
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotePosition {
    Left,
    Right,
}

impl NotePosition {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateNote {
    pub target: String,
    pub position: NotePosition,
    /// Lines are joined with `\n`.
    pub text: String,
}

/// One level of a state diagram: the root, or the inside of a composite state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub states: Vec<StateDef>,
    pub transitions: Vec<Transition>,
    pub entries: Vec<PseudoTransition>,
    pub exits: Vec<PseudoTransition>,
    pub notes: Vec<StateNote>,
}

/// An endpoint of an edge, with the two pseudostates kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateRef<'a> {
    Entry,
    Exit,
    State(&'a str),
}

impl<'a> StateRef<'a> {
    pub fn id(self) -> &'a str {
        match self {
            Self::Entry => ENTRY_ID,
            Self::Exit => EXIT_ID,
            Self::State(id) => id,
        }
    }
}

impl StateScope {
    /// Entries, named transitions and exits of this scope as uniform edges.
    pub fn edges(&self) -> impl Iterator<Item = (StateRef<'_>, StateRef<'_>, Option<&str>)> {
        let entries = self
            .entries
            .iter()
            .map(|e| (StateRef::Entry, StateRef::State(&e.state), e.label.as_deref()));
        let transitions = self.transitions.iter().map(|t| {
            (
                StateRef::State(t.from.as_str()),
                StateRef::State(t.to.as_str()),
                t.label.as_deref(),
            )
        });
        let exits = self
            .exits
            .iter()
            .map(|e| (StateRef::State(&e.state), StateRef::Exit, e.label.as_deref()));
        entries.chain(transitions).chain(exits)
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
            && self.transitions.is_empty()
            && self.entries.is_empty()
            && self.exits.is_empty()
            && self.notes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDiagram {
    pub version: StateVersion,
    pub body: StateScope,
}

impl StateDiagram {
    /// Every scope, root first, then composites in pre-order.
    pub fn scopes(&self) -> impl Iterator<Item = &StateScope> {
        let mut pending = vec![&self.body];
        std::iter::from_fn(move || {
            let scope = pending.pop()?;
            for state in scope.states.iter().rev() {
                if let Some(inner) = &state.composite {
                    pending.push(inner);
                }
            }
            Some(scope)
        })
    }

    /// Every state at any depth.
    pub fn states(&self) -> impl Iterator<Item = &StateDef> {
        self.scopes().flat_map(|scope| scope.states.iter())
    }

    pub fn state(&self, id: &str) -> Option<&StateDef> {
        self.states().find(|s| s.id == id)
    }
}

fn operator(rest: &str) -> Option<(TokenKind, usize)> {
    if rest.starts_with("[*]") {
        Some((TokenKind::Sentinel, 3))
    } else if rest.starts_with("-->") {
        Some((TokenKind::Arrow, 3))
    } else {
        None
    }
}

pub const VOCABULARY: Vocabulary = Vocabulary {
    family: Family::Structural,
    operator,
    enclosures: &[("<<", ">>")],
    line_keywords: &[],
};

pub fn parse_diagram(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<Diagram> {
    parse_state(tokens, ctx).map(Diagram::State)
}

pub fn generate_diagram(diagram: &Diagram, options: &GenerateOptions) -> String {
    match diagram {
        Diagram::State(state) => generate_state(state, options),
        _ => String::new(),
    }
}
