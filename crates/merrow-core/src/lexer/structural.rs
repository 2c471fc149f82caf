use super::scan::{Scanner, classify_word, is_ident_char};
use super::{Position, Token, TokenKind, Vocabulary};
use std::collections::VecDeque;

/// Tokenizer for the brace/bracket dialects (flowchart, class, ER, state).
pub struct StructuralLexer<'input> {
    scan: Scanner<'input>,
    vocabulary: Vocabulary,
    pending: VecDeque<Token<'input>>,
}

impl<'input> StructuralLexer<'input> {
    pub fn new(input: &'input str, origin: Position, vocabulary: Vocabulary) -> Self {
        Self {
            scan: Scanner::new(input, origin),
            vocabulary,
            pending: VecDeque::new(),
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

    /// Identifiers may contain inner `-` and `.` as long as they do not begin an operator and
    /// are followed by another identifier char (`stateDiagram-v2`, `node-1`, `a.b`).
    fn lex_ident(&mut self) -> Option<Token<'input>> {
        if !self.scan.peek().is_some_and(is_ident_char) {
            return None;
        }
        let start = self.scan.mark();
        while let Some(c) = self.scan.peek() {
            if is_ident_char(c) {
                self.scan.bump();
                continue;
            }
            if matches!(c, '-' | '.')
                && (self.vocabulary.operator)(self.scan.rest()).is_none()
                && self.scan.peek_second().is_some_and(is_ident_char)
            {
                self.scan.bump();
                continue;
            }
            break;
        }
        let tok = self.scan.token_from(TokenKind::Ident, start);
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
        if let Some(tok) = self.scan.lex_string() {
            return tok;
        }
        if let Some(tok) = self.lex_operator() {
            return tok;
        }
        if let Some(tok) = self
            .scan
            .lex_enclosure(self.vocabulary.enclosures, &mut self.pending)
        {
            return tok;
        }
        if let Some(tok) = self.scan.lex_colon(&mut self.pending) {
            return tok;
        }
        if let Some(tok) = self.scan.lex_punct() {
            return tok;
        }
        if let Some(tok) = self.lex_ident() {
            return tok;
        }
        self.scan.lex_unknown()
    }
}

impl<'input> Iterator for StructuralLexer<'input> {
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
        Some(tok)
    }
}
