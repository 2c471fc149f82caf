use super::scan::{Scanner, classify_word};
use super::{Position, Token, TokenKind, Vocabulary};
use std::collections::VecDeque;

/// Tokenizer for the line-oriented dialects (sequence, gantt).
///
/// Words are loose: anything up to whitespace, `:`, `,`, `;`, `&`, `+`, a quote or the start of
/// an operator. A `#` as the first non-blank char of a line starts a comment. Line keywords only
/// count as the first word of a line.
pub struct LineLexer<'input> {
    scan: Scanner<'input>,
    vocabulary: Vocabulary,
    pending: VecDeque<Token<'input>>,
    at_line_start: bool,
}

impl<'input> LineLexer<'input> {
    pub fn new(input: &'input str, origin: Position, vocabulary: Vocabulary) -> Self {
        Self {
            scan: Scanner::new(input, origin),
            vocabulary,
            pending: VecDeque::new(),
            at_line_start: true,
        }
    }

    pub fn position(&self) -> Position {
        self.scan.position()
    }

    fn lex_operator(&mut self) -> Option<Token<'input>> {
        let (kind, len) = (self.vocabulary.operator)(self.scan.rest())?;
        if len == 0 {
            return None;
        }
        let start = self.scan.mark();
        self.scan.bump_bytes(len);
        Some(self.scan.token_from(kind, start))
    }

    fn ends_word(&self, c: char) -> bool {
        c.is_whitespace()
            || matches!(c, ':' | ',' | ';' | '&' | '+' | '"')
            || self.scan.rest().starts_with("%%")
            || (matches!(c, '-' | '<') && (self.vocabulary.operator)(self.scan.rest()).is_some())
    }

    fn lex_word(&mut self) -> Option<Token<'input>> {
        let first = self.scan.peek()?;
        if self.ends_word(first) {
            return None;
        }
        let start = self.scan.mark();
        while let Some(c) = self.scan.peek() {
            if self.ends_word(c) {
                break;
            }
            self.scan.bump();
        }
        let tok = self.scan.token_from(TokenKind::Ident, start);
        let is_line_keyword = self.at_line_start
            && self
                .vocabulary
                .line_keywords
                .iter()
                .any(|kw| kw.eq_ignore_ascii_case(tok.text));
        if is_line_keyword {
            if let Some(text) = self.scan.lex_rest_of_line() {
                self.pending.push_back(text);
            }
        }
        Some(Token {
            kind: classify_word(tok.text),
            ..tok
        })
    }

    fn lex_one(&mut self) -> Token<'input> {
        if let Some(tok) = self.scan.lex_newline() {
            return tok;
        }
        if let Some(tok) = self.scan.lex_comment() {
            return tok;
        }
        if self.at_line_start && self.scan.peek() == Some('#') {
            return self.scan.lex_to_line_end(TokenKind::Comment);
        }
        if let Some(tok) = self.scan.lex_string() {
            return tok;
        }
        if let Some(tok) = self.lex_operator() {
            return tok;
        }
        if let Some(tok) = self.scan.lex_colon(&mut self.pending) {
            return tok;
        }
        if let Some(tok) = self.scan.lex_punct() {
            return tok;
        }
        if let Some(tok) = self.lex_word() {
            return tok;
        }
        self.scan.lex_unknown()
    }
}

impl<'input> Iterator for LineLexer<'input> {
    type Item = Token<'input>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(tok) = self.pending.pop_front() {
            return Some(tok);
        }
        self.scan.skip_blanks();
        if self.scan.is_eof() {
            return None;
        }
        let before = self.scan.byte_pos();
        let tok = self.lex_one();
        if self.scan.byte_pos() == before {
            // A rule matched without consuming input; never hand out a zero-width token.
            return Some(self.scan.lex_unknown());
        }
        self.at_line_start = tok.kind == TokenKind::Newline;
        Some(tok)
    }
}
