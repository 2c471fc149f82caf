use crate::lexer::Position;

pub type Result<T> = std::result::Result<T, Error>;

/// Discriminant of [`Error`], for callers that branch on the failure class only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownDiagramType,
    UnexpectedToken,
    UnterminatedBlock,
    InvalidIdentifier,
    MalformedDuration,
    MalformedDate,
    UnrecognizedCardinality,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{position}: no recognized diagram header (flowchart, graph, sequenceDiagram, classDiagram, erDiagram, stateDiagram, gantt)")]
    UnknownDiagramType { position: Position },

    #[error("{position}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("{opened_at}: `{block}` block opened here is never closed")]
    UnterminatedBlock { block: String, opened_at: Position },

    #[error("{position}: `{ident}` cannot be used as an identifier")]
    InvalidIdentifier { ident: String, position: Position },

    #[error("{position}: malformed duration `{text}` (expected <integer><d|w|h>)")]
    MalformedDuration { text: String, position: Position },

    #[error("{position}: malformed date `{text}` for format `{format}`")]
    MalformedDate {
        text: String,
        format: String,
        position: Position,
    },

    #[error("{position}: unrecognized cardinality `{text}`")]
    UnrecognizedCardinality { text: String, position: Position },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownDiagramType { .. } => ErrorKind::UnknownDiagramType,
            Self::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            Self::UnterminatedBlock { .. } => ErrorKind::UnterminatedBlock,
            Self::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Self::MalformedDuration { .. } => ErrorKind::MalformedDuration,
            Self::MalformedDate { .. } => ErrorKind::MalformedDate,
            Self::UnrecognizedCardinality { .. } => ErrorKind::UnrecognizedCardinality,
        }
    }

    /// Source position the failure is attributed to. For unterminated blocks this is where the
    /// block was opened.
    pub fn position(&self) -> Position {
        match self {
            Self::UnknownDiagramType { position }
            | Self::UnexpectedToken { position, .. }
            | Self::InvalidIdentifier { position, .. }
            | Self::MalformedDuration { position, .. }
            | Self::MalformedDate { position, .. }
            | Self::UnrecognizedCardinality { position, .. } => *position,
            Self::UnterminatedBlock { opened_at, .. } => *opened_at,
        }
    }

    pub(crate) fn unexpected(expected: impl Into<String>, found: impl Into<String>, position: Position) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            position,
        }
    }
}
