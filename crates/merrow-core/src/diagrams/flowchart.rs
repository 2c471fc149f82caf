use crate::ast::Diagram;
use crate::content::Content;
use crate::diagram::{GenerateOptions, ParseContext};
use crate::lexer::{Family, Token, TokenKind, Vocabulary};
use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

mod generate;
mod parse;

pub use generate::generate_flowchart;
pub use parse::parse_flowchart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Tb,
    Bt,
    Lr,
    Rl,
}

impl Direction {
    /// Accepts `TB`, `TD` (same as `TB`), `BT`, `LR` and `RL`.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "TB" | "TD" => Some(Self::Tb),
            "BT" => Some(Self::Bt),
            "LR" => Some(Self::Lr),
            "RL" => Some(Self::Rl),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tb => "TB",
            Self::Bt => "BT",
            Self::Lr => "LR",
            Self::Rl => "RL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeShape {
    /// A bare id with no delimiters.
    #[default]
    Default,
    Square,
    Round,
    Stadium,
    Subroutine,
    Cylinder,
    Circle,
    DoubleCircle,
    Rhombus,
    Hexagon,
    LeanRight,
    LeanLeft,
    Trapezoid,
    InvTrapezoid,
    Asymmetric,
}

const SHAPE_DELIMITERS: &[(NodeShape, &str, &str)] = &[
    (NodeShape::DoubleCircle, "(((", ")))"),
    (NodeShape::Circle, "((", "))"),
    (NodeShape::Stadium, "([", "])"),
    (NodeShape::Subroutine, "[[", "]]"),
    (NodeShape::Cylinder, "[(", ")]"),
    (NodeShape::LeanRight, "[/", "/]"),
    (NodeShape::Trapezoid, "[/", "\\]"),
    (NodeShape::LeanLeft, "[\\", "\\]"),
    (NodeShape::InvTrapezoid, "[\\", "/]"),
    (NodeShape::Hexagon, "{{", "}}"),
    (NodeShape::Square, "[", "]"),
    (NodeShape::Round, "(", ")"),
    (NodeShape::Rhombus, "{", "}"),
    (NodeShape::Asymmetric, ">", "]"),
];

impl NodeShape {
    pub fn from_delimiters(open: &str, close: &str) -> Option<Self> {
        SHAPE_DELIMITERS
            .iter()
            .find(|(_, o, c)| *o == open && *c == close)
            .map(|(shape, _, _)| *shape)
    }

    /// Opening and closing delimiters; `None` for [`NodeShape::Default`].
    pub fn delimiters(self) -> Option<(&'static str, &'static str)> {
        SHAPE_DELIMITERS
            .iter()
            .find(|(shape, _, _)| *shape == self)
            .map(|(_, o, c)| (*o, *c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeStyle {
    /// `-->`
    Arrow,
    /// `---`
    Line,
    /// `-.->`
    DottedArrow,
    /// `-.-`
    DottedLine,
    /// `==>`
    ThickArrow,
    /// `===`
    ThickLine,
    /// `~~~`
    Invisible,
    /// `--o`
    CircleEnd,
    /// `--x`
    CrossEnd,
}

const EDGE_OPERATORS: &[(&str, EdgeStyle)] = &[
    ("-.->", EdgeStyle::DottedArrow),
    ("-.-", EdgeStyle::DottedLine),
    ("-->", EdgeStyle::Arrow),
    ("---", EdgeStyle::Line),
    ("--o", EdgeStyle::CircleEnd),
    ("--x", EdgeStyle::CrossEnd),
    ("==>", EdgeStyle::ThickArrow),
    ("===", EdgeStyle::ThickLine),
    ("~~~", EdgeStyle::Invisible),
];

impl EdgeStyle {
    pub fn from_operator(op: &str) -> Option<Self> {
        EDGE_OPERATORS
            .iter()
            .find(|(text, _)| *text == op)
            .map(|(_, style)| *style)
    }

    pub fn operator(self) -> &'static str {
        EDGE_OPERATORS
            .iter()
            .find(|(_, style)| *style == self)
            .map(|(text, _)| *text)
            .unwrap_or("-->")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    pub shape: NodeShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Content>,
}

impl FlowNode {
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shape: NodeShape::Default,
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    pub style: EdgeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subgraph {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub statements: Vec<FlowStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum FlowStatement {
    Node(FlowNode),
    Edge(FlowEdge),
    Subgraph(Subgraph),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flowchart {
    pub direction: Direction,
    pub statements: Vec<FlowStatement>,
}

impl Flowchart {
    /// Every node of the chart, subgraphs included, in first-reference order. Nodes that only
    /// appear on edges get the default shape; a later shaped declaration replaces an earlier one.
    pub fn nodes(&self) -> IndexMap<String, FlowNode> {
        let mut nodes: IndexMap<String, FlowNode> = IndexMap::new();
        for stmt in self.walk() {
            match stmt {
                FlowStatement::Node(node) => match nodes.get_mut(&node.id) {
                    Some(existing) if node.shape != NodeShape::Default => {
                        existing.shape = node.shape;
                        existing.label = node.label.clone();
                    }
                    Some(_) => {}
                    None => {
                        nodes.insert(node.id.clone(), node.clone());
                    }
                },
                FlowStatement::Edge(edge) => {
                    for id in [&edge.from, &edge.to] {
                        if !nodes.contains_key(id) {
                            nodes.insert(id.clone(), FlowNode::bare(id.as_str()));
                        }
                    }
                }
                FlowStatement::Subgraph(_) => {}
            }
        }
        nodes
    }

    pub fn edges(&self) -> Vec<&FlowEdge> {
        self.walk()
            .filter_map(|stmt| match stmt {
                FlowStatement::Edge(edge) => Some(edge),
                _ => None,
            })
            .collect()
    }

    pub fn subgraphs(&self) -> Vec<&Subgraph> {
        self.walk()
            .filter_map(|stmt| match stmt {
                FlowStatement::Subgraph(sg) => Some(sg),
                _ => None,
            })
            .collect()
    }

    /// Pre-order walk over all statements, descending into subgraphs.
    pub fn walk(&self) -> impl Iterator<Item = &FlowStatement> {
        let mut stack = vec![self.statements.iter()];
        std::iter::from_fn(move || {
            loop {
                let iter = stack.last_mut()?;
                match iter.next() {
                    Some(stmt) => {
                        if let FlowStatement::Subgraph(sg) = stmt {
                            stack.push(sg.statements.iter());
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
}

fn operator(rest: &str) -> Option<(TokenKind, usize)> {
    EDGE_OPERATORS
        .iter()
        .find(|(op, _)| rest.starts_with(op))
        .map(|(op, _)| (TokenKind::Arrow, op.len()))
}

pub const VOCABULARY: Vocabulary = Vocabulary {
    family: Family::Structural,
    operator,
    enclosures: &[
        ("(((", ")))"),
        ("((", "))"),
        ("([", "])"),
        ("[[", "]]"),
        ("[(", ")]"),
        ("[/", "/]"),
        ("[/", "\\]"),
        ("[\\", "\\]"),
        ("[\\", "/]"),
        ("{{", "}}"),
        ("[", "]"),
        ("(", ")"),
        ("{", "}"),
        (">", "]"),
        ("|", "|"),
    ],
    line_keywords: &[],
};

pub fn parse_diagram(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<Diagram> {
    parse_flowchart(tokens, ctx).map(Diagram::Flowchart)
}

pub fn generate_diagram(diagram: &Diagram, options: &GenerateOptions) -> String {
    match diagram {
        Diagram::Flowchart(chart) => generate_flowchart(chart, options),
        _ => String::new(),
    }
}
