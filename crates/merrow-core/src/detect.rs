//! Header detection and document segmentation.
//!
//! A document holds one or more diagrams. A diagram starts at a header line (`flowchart LR`,
//! `sequenceDiagram`, ...) that is either the first non-blank, non-comment line of the document or
//! follows a blank line; it runs until the next such header.

use crate::lexer::{Position, Vocabulary};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dialect {
    Flowchart,
    Sequence,
    Class,
    Er,
    State,
    Gantt,
}

impl Dialect {
    pub const ALL: [Dialect; 6] = [
        Dialect::Flowchart,
        Dialect::Sequence,
        Dialect::Class,
        Dialect::Er,
        Dialect::State,
        Dialect::Gantt,
    ];

    /// Maps a header keyword to its dialect. Header keywords are case-sensitive.
    pub fn from_header(keyword: &str) -> Option<Self> {
        match keyword {
            "flowchart" | "graph" => Some(Self::Flowchart),
            "sequenceDiagram" => Some(Self::Sequence),
            "classDiagram" | "classDiagram-v2" => Some(Self::Class),
            "erDiagram" => Some(Self::Er),
            "stateDiagram" | "stateDiagram-v2" => Some(Self::State),
            "gantt" => Some(Self::Gantt),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Sequence => "sequence",
            Self::Class => "class",
            Self::Er => "er",
            Self::State => "state",
            Self::Gantt => "gantt",
        }
    }

    pub fn vocabulary(self) -> Vocabulary {
        use crate::diagrams;
        match self {
            Self::Flowchart => diagrams::flowchart::VOCABULARY,
            Self::Sequence => diagrams::sequence::VOCABULARY,
            Self::Class => diagrams::class::VOCABULARY,
            Self::Er => diagrams::er::VOCABULARY,
            Self::State => diagrams::state::VOCABULARY,
            Self::Gantt => diagrams::gantt::VOCABULARY,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One diagram's slice of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub dialect: Dialect,
    pub text: &'a str,
    /// Position of `text`'s first byte within the whole document.
    pub origin: Position,
}

/// Header keyword of a line: its first whitespace-delimited word, minus a trailing `;`.
fn header_keyword(trimmed: &str) -> &str {
    let word = trimmed.split_whitespace().next().unwrap_or_default();
    word.split(';').next().unwrap_or_default()
}

/// Dialect of the first significant line of `text`.
pub fn detect_dialect(text: &str) -> Result<Dialect> {
    let segments = split_segments(text)?;
    segments
        .first()
        .map(|s| s.dialect)
        .ok_or(Error::UnknownDiagramType {
            position: Position::START,
        })
}

/// Splits a document into per-diagram segments. Never returns an empty list.
pub fn split_segments(text: &str) -> Result<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut current: Option<(Dialect, usize, usize)> = None;
    let mut after_blank = true;
    let mut offset = 0usize;

    for (idx, raw_line) in text.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += raw_line.len();
        let trimmed = raw_line.trim();

        if trimmed.is_empty() {
            after_blank = true;
            continue;
        }
        if trimmed.starts_with("%%") {
            continue;
        }

        let header = Dialect::from_header(header_keyword(trimmed));
        match (header, current) {
            (Some(dialect), None) => {
                current = Some((dialect, line_start, idx + 1));
            }
            (Some(dialect), Some((prev, start, line))) if after_blank => {
                segments.push(segment(text, prev, start, line_start, line));
                current = Some((dialect, line_start, idx + 1));
            }
            (None, None) => {
                let indent = raw_line.chars().take_while(|c| c.is_whitespace()).count();
                return Err(Error::UnknownDiagramType {
                    position: Position {
                        line: idx + 1,
                        column: indent,
                        offset: line_start + (raw_line.len() - raw_line.trim_start().len()),
                    },
                });
            }
            _ => {}
        }
        after_blank = false;
    }

    match current {
        Some((dialect, start, line)) => segments.push(segment(text, dialect, start, text.len(), line)),
        None => {
            return Err(Error::UnknownDiagramType {
                position: Position {
                    line: text.split_inclusive('\n').count().max(1),
                    column: 0,
                    offset: text.len(),
                },
            });
        }
    }

    tracing::trace!(count = segments.len(), "split document into diagram segments");
    Ok(segments)
}

fn segment(text: &str, dialect: Dialect, start: usize, end: usize, line: usize) -> Segment<'_> {
    Segment {
        dialect,
        text: &text[start..end],
        origin: Position {
            line,
            column: 0,
            offset: start,
        },
    }
}
