use crate::lexer::{Position, Token, TokenKind};
use crate::reserved::is_reserved;
use crate::{Dialect, Error, Result};

/// Token stream with one-token lookahead shared by the dialect parsers. Comments are dropped
/// up front; the stream always ends in `Eof`.
pub(crate) struct Cursor<'input> {
    tokens: Vec<Token<'input>>,
    index: usize,
    source: &'input str,
    dialect: Dialect,
}

impl<'input> Cursor<'input> {
    /// `source` is the document the token offsets point into.
    pub(crate) fn new(tokens: &[Token<'input>], source: &'input str, dialect: Dialect) -> Self {
        let mut kept: Vec<Token<'input>> = tokens
            .iter()
            .copied()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        if kept.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let end = kept.last().map(|t| t.end).unwrap_or(Position::START);
            kept.push(Token {
                kind: TokenKind::Eof,
                text: "",
                start: end,
                end,
            });
        }
        Self {
            tokens: kept,
            index: 0,
            source,
            dialect,
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn peek(&self) -> Token<'input> {
        self.peek_nth(0)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Token<'input> {
        let last = self.tokens.len() - 1;
        self.tokens[(self.index + n).min(last)]
    }

    pub(crate) fn position(&self) -> Position {
        self.peek().start
    }

    pub(crate) fn advance(&mut self) -> Token<'input> {
        let tok = self.peek();
        if tok.kind != TokenKind::Eof {
            self.index += 1;
        }
        tok
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    pub(crate) fn at_line_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof)
    }

    /// Exact identifier match.
    pub(crate) fn at_word(&self, word: &str) -> bool {
        self.peek().is_word(word)
    }

    /// Case-insensitive identifier match.
    pub(crate) fn at_keyword(&self, word: &str) -> bool {
        let tok = self.peek();
        tok.kind == TokenKind::Ident && tok.text.eq_ignore_ascii_case(word)
    }

    pub(crate) fn at_delim(&self, kind: TokenKind, text: &str) -> bool {
        self.peek().is(kind, text)
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token<'input>> {
        self.at(kind).then(|| self.advance())
    }

    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        let hit = self.at_word(word);
        if hit {
            self.advance();
        }
        hit
    }

    pub(crate) fn eat_keyword(&mut self, word: &str) -> bool {
        let hit = self.at_keyword(word);
        if hit {
            self.advance();
        }
        hit
    }

    pub(crate) fn eat_delim(&mut self, kind: TokenKind, text: &str) -> bool {
        let hit = self.at_delim(kind, text);
        if hit {
            self.advance();
        }
        hit
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token<'input>> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn expect_delim(&mut self, kind: TokenKind, text: &str) -> Result<Token<'input>> {
        if self.at_delim(kind, text) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("`{text}`")))
        }
    }

    pub(crate) fn expect_keyword(&mut self, word: &str) -> Result<Token<'input>> {
        if self.at_keyword(word) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("`{word}`")))
        }
    }

    /// An identifier (or number) that is not a reserved word of the dialect.
    pub(crate) fn expect_ident(&mut self, what: &str) -> Result<Token<'input>> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Ident | TokenKind::Number => {
                if is_reserved(self.dialect, tok.text) {
                    return Err(Error::InvalidIdentifier {
                        ident: tok.text.to_string(),
                        position: tok.start,
                    });
                }
                Ok(self.advance())
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// Consumes a `Newline`, or accepts `Eof` without consuming.
    pub(crate) fn expect_line_end(&mut self) -> Result<()> {
        match self.peek().kind {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Source text between two positions of the document.
    pub(crate) fn slice(&self, from: Position, to: Position) -> &'input str {
        self.source.get(from.offset..to.offset).unwrap_or_default()
    }

    /// Consumes the tokens up to the end of the line, or up to the first token `stop` accepts,
    /// and returns the source text they span. Empty when the line is already over.
    pub(crate) fn take_line(&mut self, stop: impl Fn(&Token<'input>) -> bool) -> &'input str {
        let first = self.peek();
        let mut last_end = first.start;
        while !self.at_line_end() && !stop(&self.peek()) {
            last_end = self.advance().end;
        }
        self.slice(first.start, last_end).trim()
    }

    pub(crate) fn unexpected(&self, expected: &str) -> Error {
        let tok = self.peek();
        Error::unexpected(expected, tok.describe(), tok.start)
    }

    /// Fails when a statement parser returned without consuming anything.
    pub(crate) fn ensure_progress(&self, before: usize, expected: &str) -> Result<()> {
        if self.index > before {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }
}
