//! Tokenizers shared by every dialect.
//!
//! Two families exist. The structural family (flowchart, class, ER, state) produces strict
//! identifiers and bracket/enclosure tokens; the line-oriented family (sequence, gantt) produces
//! loose words and turns keyword-led lines into a keyword plus one rest-of-line text token. Both
//! share [`Token`], [`Position`] and the character scanner, and both are total: anything they do
//! not recognise becomes a one-character [`TokenKind::Unknown`] token.

use serde::{Deserialize, Serialize};
use std::fmt;

mod line;
mod scan;
mod structural;

pub use line::LineLexer;
pub use structural::StructuralLexer;

use crate::Dialect;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// 1-based line.
    pub line: usize,
    /// 0-based column, counted in chars.
    pub column: usize,
    /// Byte offset into the whole document.
    pub offset: usize,
}

impl Position {
    pub const START: Position = Position {
        line: 1,
        column: 0,
        offset: 0,
    };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    /// Double-quoted string; `text` excludes the quotes.
    Str,
    Number,
    Newline,
    Comment,
    Eof,
    /// Edge, message, relation or transition operator (`-->`, `->>`, `||--o{`, ...).
    Arrow,
    /// The `[*]` pseudostate marker.
    Sentinel,
    /// Opening delimiter; `text` carries its spelling (`[`, `([`, `<<`, `|`, `{`, ...).
    Open,
    /// Closing delimiter; `text` carries its spelling.
    Close,
    /// Raw text: enclosure contents or the remainder of a line.
    Text,
    Colon,
    Comma,
    Amp,
    Plus,
    Minus,
    Unknown,
}

impl TokenKind {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Ident => "identifier",
            Self::Str => "string",
            Self::Number => "number",
            Self::Newline => "newline",
            Self::Comment => "comment",
            Self::Eof => "end of input",
            Self::Arrow => "arrow",
            Self::Sentinel => "`[*]`",
            Self::Open => "opening delimiter",
            Self::Close => "closing delimiter",
            Self::Text => "text",
            Self::Colon => "`:`",
            Self::Comma => "`,`",
            Self::Amp => "`&`",
            Self::Plus => "`+`",
            Self::Minus => "`-`",
            Self::Unknown => "unrecognized character",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'input> {
    pub kind: TokenKind,
    pub text: &'input str,
    pub start: Position,
    pub end: Position,
}

impl Token<'_> {
    /// Human readable rendering used in `UnexpectedToken` errors.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof | TokenKind::Newline => self.kind.describe().to_string(),
            _ => format!("`{}`", self.text),
        }
    }

    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.is(TokenKind::Ident, word)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Structural,
    LineOriented,
}

/// Dialect-specific lexical rules fed to a family tokenizer.
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    pub family: Family,
    /// Returns the kind and byte length of the operator the input starts with, if any.
    pub operator: fn(&str) -> Option<(TokenKind, usize)>,
    /// Opener/closer pairs whose contents are taken verbatim as one text token. Longer openers
    /// must come before their prefixes.
    pub enclosures: &'static [(&'static str, &'static str)],
    /// Keywords that, as the first word of a line, make the rest of the line one text token.
    pub line_keywords: &'static [&'static str],
}

/// Tokenizes a whole document for one dialect. Never fails; the last token is always `Eof`.
pub fn tokenize(text: &str, dialect: Dialect) -> Vec<Token<'_>> {
    tokenize_at(text, Position::START, dialect)
}

/// Like [`tokenize`], for a slice that starts at `origin` inside a larger document.
pub fn tokenize_at(text: &str, origin: Position, dialect: Dialect) -> Vec<Token<'_>> {
    let vocabulary = dialect.vocabulary();
    let (mut out, end) = match vocabulary.family {
        Family::Structural => {
            let mut lexer = StructuralLexer::new(text, origin, vocabulary);
            let tokens: Vec<Token<'_>> = lexer.by_ref().collect();
            (tokens, lexer.position())
        }
        Family::LineOriented => {
            let mut lexer = LineLexer::new(text, origin, vocabulary);
            let tokens: Vec<Token<'_>> = lexer.by_ref().collect();
            (tokens, lexer.position())
        }
    };
    out.push(Token {
        kind: TokenKind::Eof,
        text: "",
        start: end,
        end,
    });
    out
}

#[cfg(test)]
mod tests;
