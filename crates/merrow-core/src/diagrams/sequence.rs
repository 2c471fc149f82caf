use crate::ast::Diagram;
use crate::content::Content;
use crate::diagram::{GenerateOptions, ParseContext};
use crate::lexer::{Family, Token, TokenKind, Vocabulary};
use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod generate;
mod parse;

pub use generate::generate_sequence;
pub use parse::parse_sequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrowKind {
    /// `->`
    Solid,
    /// `-->`
    Dotted,
    /// `->>`
    SolidArrow,
    /// `-->>`
    DottedArrow,
    /// `-x`
    SolidCross,
    /// `--x`
    DottedCross,
    /// `-)`
    SolidAsync,
    /// `--)`
    DottedAsync,
    /// `<<->>`
    BidirectionalSolid,
    /// `<<-->>`
    BidirectionalDotted,
}

const ARROWS: &[(&str, ArrowKind)] = &[
    ("<<-->>", ArrowKind::BidirectionalDotted),
    ("<<->>", ArrowKind::BidirectionalSolid),
    ("-->>", ArrowKind::DottedArrow),
    ("->>", ArrowKind::SolidArrow),
    ("-->", ArrowKind::Dotted),
    ("--x", ArrowKind::DottedCross),
    ("--)", ArrowKind::DottedAsync),
    ("->", ArrowKind::Solid),
    ("-x", ArrowKind::SolidCross),
    ("-)", ArrowKind::SolidAsync),
];

impl ArrowKind {
    pub fn from_operator(op: &str) -> Option<Self> {
        ARROWS.iter().find(|(t, _)| *t == op).map(|(_, k)| *k)
    }

    pub fn operator(self) -> &'static str {
        ARROWS
            .iter()
            .find(|(_, k)| *k == self)
            .map(|(t, _)| *t)
            .unwrap_or("->>")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticipantKind {
    #[default]
    Participant,
    Actor,
}

impl ParticipantKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Actor => "actor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub kind: ParticipantKind,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Activation {
    /// `+` before the target.
    Activate,
    /// `-` before the target.
    Deactivate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub from: String,
    pub to: String,
    pub arrow: ArrowKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<Activation>,
    pub text: Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotePlacement {
    LeftOf,
    RightOf,
    Over,
}

impl NotePlacement {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::LeftOf => "left of",
            Self::RightOf => "right of",
            Self::Over => "over",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub placement: NotePlacement,
    /// One actor, or two for a note spanning `over A, B`.
    pub actors: Vec<String>,
    pub text: Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Loop,
    Alt,
    Opt,
    Par,
    Critical,
    Break,
    Rect,
}

impl BlockKind {
    pub fn from_keyword(word: &str) -> Option<Self> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "loop" => Self::Loop,
            "alt" => Self::Alt,
            "opt" => Self::Opt,
            "par" => Self::Par,
            "critical" => Self::Critical,
            "break" => Self::Break,
            "rect" => Self::Rect,
            _ => return None,
        };
        Some(kind)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Loop => "loop",
            Self::Alt => "alt",
            Self::Opt => "opt",
            Self::Par => "par",
            Self::Critical => "critical",
            Self::Break => "break",
            Self::Rect => "rect",
        }
    }

    /// Keyword that starts another branch of this block, if it has branches.
    pub fn branch_keyword(self) -> Option<&'static str> {
        match self {
            Self::Alt => Some("else"),
            Self::Par => Some("and"),
            Self::Critical => Some("option"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub statements: Vec<SequenceStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Statements of the first branch.
    pub statements: Vec<SequenceStatement>,
    /// `else` / `and` / `option` branches, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "statement")]
pub enum SequenceStatement {
    Participant(Participant),
    Message(Message),
    Note(Note),
    Block(Block),
    Activate { actor: String },
    Deactivate { actor: String },
    Autonumber {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceDiagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub statements: Vec<SequenceStatement>,
}

impl SequenceDiagram {
    /// Pre-order walk over all statements, descending into blocks and their branches.
    pub fn walk(&self) -> impl Iterator<Item = &SequenceStatement> {
        let mut stack = vec![self.statements.iter()];
        std::iter::from_fn(move || {
            loop {
                let iter = stack.last_mut()?;
                match iter.next() {
                    Some(stmt) => {
                        if let SequenceStatement::Block(block) = stmt {
                            for branch in block.branches.iter().rev() {
                                stack.push(branch.statements.iter());
                            }
                            stack.push(block.statements.iter());
                        }
                        return Some(stmt);
                    }
                    None => {
                        stack.pop();
                    }
                }
            }
        })
    }

    /// Declared and implicitly referenced participants, in first-appearance order.
    pub fn participants(&self) -> Vec<Participant> {
        let mut seen: IndexMap<String, Participant> = IndexMap::new();
        let mut touch = |id: &str| {
            if !seen.contains_key(id) {
                seen.insert(
                    id.to_string(),
                    Participant {
                        kind: ParticipantKind::Participant,
                        id: id.to_string(),
                        alias: None,
                    },
                );
            }
        };
        let mut declared = Vec::new();
        for stmt in self.walk() {
            match stmt {
                SequenceStatement::Participant(p) => {
                    touch(&p.id);
                    declared.push(p);
                }
                SequenceStatement::Message(m) => {
                    touch(&m.from);
                    touch(&m.to);
                }
                SequenceStatement::Note(n) => n.actors.iter().for_each(|a| touch(a)),
                SequenceStatement::Activate { actor } | SequenceStatement::Deactivate { actor } => {
                    touch(actor)
                }
                _ => {}
            }
        }
        for p in declared {
            if let Some(slot) = seen.get_mut(&p.id) {
                *slot = p.clone();
            }
        }
        seen.into_values().collect()
    }

    pub fn messages(&self) -> Vec<&Message> {
        self.walk()
            .filter_map(|stmt| match stmt {
                SequenceStatement::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

fn operator(rest: &str) -> Option<(TokenKind, usize)> {
    ARROWS
        .iter()
        .find(|(op, _)| rest.starts_with(op))
        .map(|(op, _)| (TokenKind::Arrow, op.len()))
}

pub const VOCABULARY: Vocabulary = Vocabulary {
    family: Family::LineOriented,
    operator,
    enclosures: &[],
    line_keywords: &[
        "loop", "alt", "else", "opt", "par", "and", "critical", "option", "break", "rect",
        "title",
    ],
};

pub fn parse_diagram(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<Diagram> {
    parse_sequence(tokens, ctx).map(Diagram::Sequence)
}

pub fn generate_diagram(diagram: &Diagram, options: &GenerateOptions) -> String {
    match diagram {
        Diagram::Sequence(seq) => generate_sequence(seq, options),
        _ => String::new(),
    }
}
