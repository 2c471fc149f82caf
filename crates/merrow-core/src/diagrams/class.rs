use crate::ast::Diagram;
use crate::diagram::{GenerateOptions, ParseContext};
use crate::lexer::{Family, Token, TokenKind, Vocabulary};
use crate::Result;
use serde::{Deserialize, Serialize};

mod generate;
mod member;
mod parse;

pub use generate::generate_class;
pub use member::parse_member;
pub use parse::parse_class;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    /// `+`
    Public,
    /// `-`
    Private,
    /// `#`
    Protected,
    /// `~`
    Package,
}

impl Visibility {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Public),
            '-' => Some(Self::Private),
            '#' => Some(Self::Protected),
            '~' => Some(Self::Package),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Public => '+',
            Self::Private => '-',
            Self::Protected => '#',
            Self::Package => '~',
        }
    }
}

/// Member modifier, written as a trailing `$` (static) or `*` (abstract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Classifier {
    Static,
    Abstract,
}

impl Classifier {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '$' => Some(Self::Static),
            '*' => Some(Self::Abstract),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Static => '$',
            Self::Abstract => '*',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum MemberKind {
    Attribute {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ty: Option<String>,
        name: String,
    },
    Method {
        name: String,
        params: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        return_type: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<Classifier>,
    pub kind: MemberKind,
}

impl ClassMember {
    pub fn name(&self) -> &str {
        match &self.kind {
            MemberKind::Attribute { name, .. } | MemberKind::Method { name, .. } => name,
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDef {
    pub name: String,
    /// Contents of a `~T~` suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic: Option<String>,
    /// Contents of a `<<stereotype>>` annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    pub members: Vec<ClassMember>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    Inheritance,
    Composition,
    Aggregation,
    Association,
    Dependency,
    Realization,
    /// Solid line, `--`.
    Link,
    /// Dashed line, `..`.
    DashedLink,
}

/// Which end carries the relation marker. `Forward` means the `to` side (`A --|> B`),
/// `Backward` the `from` side (`A <|-- B`). Plain links are always `Forward`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationDirection {
    #[default]
    Forward,
    Backward,
}

const RELATIONS: &[(&str, RelationKind, RelationDirection)] = &[
    ("<|--", RelationKind::Inheritance, RelationDirection::Backward),
    ("--|>", RelationKind::Inheritance, RelationDirection::Forward),
    ("*--", RelationKind::Composition, RelationDirection::Backward),
    ("--*", RelationKind::Composition, RelationDirection::Forward),
    ("o--", RelationKind::Aggregation, RelationDirection::Backward),
    ("--o", RelationKind::Aggregation, RelationDirection::Forward),
    ("<--", RelationKind::Association, RelationDirection::Backward),
    ("-->", RelationKind::Association, RelationDirection::Forward),
    ("<..", RelationKind::Dependency, RelationDirection::Backward),
    ("..>", RelationKind::Dependency, RelationDirection::Forward),
    ("<|..", RelationKind::Realization, RelationDirection::Backward),
    ("..|>", RelationKind::Realization, RelationDirection::Forward),
    ("--", RelationKind::Link, RelationDirection::Forward),
    ("..", RelationKind::DashedLink, RelationDirection::Forward),
];

impl RelationKind {
    pub fn from_operator(op: &str) -> Option<(Self, RelationDirection)> {
        RELATIONS
            .iter()
            .find(|(text, _, _)| *text == op)
            .map(|(_, kind, dir)| (*kind, *dir))
    }

    pub fn operator(self, direction: RelationDirection) -> &'static str {
        let direction = match self {
            Self::Link | Self::DashedLink => RelationDirection::Forward,
            _ => direction,
        };
        RELATIONS
            .iter()
            .find(|(_, kind, dir)| *kind == self && *dir == direction)
            .map(|(text, _, _)| *text)
            .unwrap_or("--")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRelation {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
    pub direction: RelationDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_cardinality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_cardinality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDiagram {
    /// `classDiagram-v2` header.
    #[serde(default)]
    pub v2: bool,
    pub classes: Vec<ClassDef>,
    pub relations: Vec<ClassRelation>,
}

impl ClassDiagram {
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.name == name)
    }
}

/// Relation operator: optional head (`<|`, `*`, `o`, `<`), a `--` or `..` line, optional tail
/// head (`|>`, `*`, `o`, `>`). The parser rejects shapes outside the known set.
fn operator(rest: &str) -> Option<(TokenKind, usize)> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    if rest.starts_with("<|") {
        i = 2;
    } else if matches!(bytes.first(), Some(b'*' | b'o' | b'<')) {
        i = 1;
    }
    let line = rest.get(i..i + 2)?;
    if line != "--" && line != ".." {
        return None;
    }
    i += 2;
    let tail = &rest[i..];
    if tail.starts_with("|>") {
        i += 2;
    } else if matches!(tail.as_bytes().first(), Some(b'*' | b'>'))
        || (tail.starts_with('o') && !tail[1..].starts_with(|c: char| c.is_alphanumeric()))
    {
        i += 1;
    }
    Some((TokenKind::Arrow, i))
}

pub const VOCABULARY: Vocabulary = Vocabulary {
    family: Family::Structural,
    operator,
    enclosures: &[("<<", ">>"), ("~", "~")],
    line_keywords: &[],
};

pub fn parse_diagram(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<Diagram> {
    parse_class(tokens, ctx).map(Diagram::Class)
}

pub fn generate_diagram(diagram: &Diagram, options: &GenerateOptions) -> String {
    match diagram {
        Diagram::Class(class) => generate_class(class, options),
        _ => String::new(),
    }
}
