use crate::ast::Diagram;
use crate::diagram::{GenerateOptions, ParseContext};
use crate::lexer::{Family, Token, TokenKind, Vocabulary};
use crate::Result;
use serde::{Deserialize, Serialize};

mod generate;
mod parse;

pub use generate::generate_er;
pub use parse::parse_er;

/// Relationship multiplicity at one end of an ER relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    ZeroOrOne,
    ExactlyOne,
    ZeroOrMore,
    OneOrMore,
}

const LEFT_SYMBOLS: &[(&str, Cardinality)] = &[
    ("|o", Cardinality::ZeroOrOne),
    ("||", Cardinality::ExactlyOne),
    ("}o", Cardinality::ZeroOrMore),
    ("}|", Cardinality::OneOrMore),
];

const RIGHT_SYMBOLS: &[(&str, Cardinality)] = &[
    ("o|", Cardinality::ZeroOrOne),
    ("||", Cardinality::ExactlyOne),
    ("o{", Cardinality::ZeroOrMore),
    ("|{", Cardinality::OneOrMore),
];

fn lookup(table: &[(&'static str, Cardinality)], symbol: &str) -> Option<Cardinality> {
    table.iter().find(|(s, _)| *s == symbol).map(|(_, c)| *c)
}

fn symbol(table: &[(&'static str, Cardinality)], card: Cardinality) -> &'static str {
    table
        .iter()
        .find(|(_, c)| *c == card)
        .map(|(s, _)| *s)
        .unwrap_or("||")
}

impl Cardinality {
    /// Symbol written on the `from` side of the line (`|o`, `||`, `}o`, `}|`).
    pub fn from_left(symbol: &str) -> Option<Self> {
        lookup(LEFT_SYMBOLS, symbol)
    }

    /// Symbol written on the `to` side of the line (`o|`, `||`, `o{`, `|{`).
    pub fn from_right(symbol: &str) -> Option<Self> {
        lookup(RIGHT_SYMBOLS, symbol)
    }

    pub fn left_symbol(self) -> &'static str {
        symbol(LEFT_SYMBOLS, self)
    }

    pub fn right_symbol(self) -> &'static str {
        symbol(RIGHT_SYMBOLS, self)
    }
}

/// `--` is identifying, `..` non-identifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Identification {
    #[default]
    Identifying,
    NonIdentifying,
}

impl Identification {
    pub fn from_separator(sep: &str) -> Option<Self> {
        match sep {
            "--" => Some(Self::Identifying),
            ".." => Some(Self::NonIdentifying),
            _ => None,
        }
    }

    pub fn separator(self) -> &'static str {
        match self {
            Self::Identifying => "--",
            Self::NonIdentifying => "..",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyKind {
    Pk,
    Fk,
    Uk,
}

impl KeyKind {
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_uppercase().as_str() {
            "PK" => Some(Self::Pk),
            "FK" => Some(Self::Fk),
            "UK" => Some(Self::Uk),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pk => "PK",
            Self::Fk => "FK",
            Self::Uk => "UK",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAttribute {
    pub ty: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<KeyKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    /// Display name from `NAME["alias"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub attributes: Vec<EntityAttribute>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub from_cardinality: Cardinality,
    pub to_cardinality: Cardinality,
    pub identification: Identification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErDiagram {
    /// Entities in order of first appearance, explicit or implicit.
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl ErDiagram {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

fn is_cardinality_char(c: u8) -> bool {
    c == b'o' || (c.is_ascii_punctuation() && !matches!(c, b'"' | b'-' | b'.'))
}

/// `XX--YY` or `XX..YY` where both ends are two symbol chars. Ends outside the cardinality
/// tables still lex as one arrow so the parser can name them in its error.
fn operator(rest: &str) -> Option<(TokenKind, usize)> {
    let bytes = rest.as_bytes();
    if bytes.len() < 6 {
        return None;
    }
    let ends = [bytes[0], bytes[1], bytes[4], bytes[5]];
    if !ends.into_iter().all(is_cardinality_char) {
        return None;
    }
    match rest.get(2..4)? {
        "--" | ".." => Some((TokenKind::Arrow, 6)),
        _ => None,
    }
}

pub const VOCABULARY: Vocabulary = Vocabulary {
    family: Family::Structural,
    operator,
    enclosures: &[("[", "]")],
    line_keywords: &[],
};

pub fn parse_diagram(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<Diagram> {
    parse_er(tokens, ctx).map(Diagram::Er)
}

pub fn generate_diagram(diagram: &Diagram, options: &GenerateOptions) -> String {
    match diagram {
        Diagram::Er(er) => generate_er(er, options),
        _ => String::new(),
    }
}
