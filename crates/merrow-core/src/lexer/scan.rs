use super::{Position, Token, TokenKind};
use std::collections::VecDeque;

/// Char-level cursor shared by both tokenizer families.
///
/// Every `lex_*` helper either returns `None` without moving, or consumes at least one char.
pub(super) struct Scanner<'input> {
    input: &'input str,
    pos: usize,
    line: usize,
    column: usize,
    origin_offset: usize,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Mark {
    pos: usize,
    at: Position,
}

impl<'input> Scanner<'input> {
    pub(super) fn new(input: &'input str, origin: Position) -> Self {
        Self {
            input,
            pos: 0,
            line: origin.line.max(1),
            column: origin.column,
            origin_offset: origin.offset,
        }
    }

    pub(super) fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.origin_offset + self.pos,
        }
    }

    pub(super) fn byte_pos(&self) -> usize {
        self.pos
    }

    pub(super) fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            at: self.position(),
        }
    }

    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(super) fn rest(&self) -> &'input str {
        &self.input[self.pos..]
    }

    pub(super) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(super) fn peek_second(&self) -> Option<char> {
        let mut it = self.rest().chars();
        it.next();
        it.next()
    }

    pub(super) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Advances over `len` bytes, which must end on a char boundary of the remaining input.
    pub(super) fn bump_bytes(&mut self, len: usize) {
        let target = (self.pos + len).min(self.input.len());
        while self.pos < target {
            if self.bump().is_none() {
                break;
            }
        }
    }

    pub(super) fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.bump();
        }
    }

    pub(super) fn token_from(&self, kind: TokenKind, from: Mark) -> Token<'input> {
        Token {
            kind,
            text: &self.input[from.pos..self.pos],
            start: from.at,
            end: self.position(),
        }
    }

    fn token_span(&self, kind: TokenKind, from: Mark, to: Mark) -> Token<'input> {
        Token {
            kind,
            text: &self.input[from.pos..to.pos],
            start: from.at,
            end: to.at,
        }
    }

    pub(super) fn lex_newline(&mut self) -> Option<Token<'input>> {
        let start = self.mark();
        match self.peek()? {
            '\n' | ';' => {
                self.bump();
                Some(self.token_from(TokenKind::Newline, start))
            }
            _ => None,
        }
    }

    pub(super) fn lex_comment(&mut self) -> Option<Token<'input>> {
        if !self.rest().starts_with("%%") {
            return None;
        }
        Some(self.lex_to_line_end(TokenKind::Comment))
    }

    /// Consumes up to (not including) the next newline.
    pub(super) fn lex_to_line_end(&mut self, kind: TokenKind) -> Token<'input> {
        let start = self.mark();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        self.token_from(kind, start)
    }

    pub(super) fn lex_string(&mut self) -> Option<Token<'input>> {
        if self.peek()? != '"' {
            return None;
        }
        let rest = &self.rest()[1..];
        let close = rest.find(['"', '\n'])?;
        if !rest[close..].starts_with('"') {
            return None;
        }
        let start = self.mark();
        self.bump();
        let inner_start = self.mark();
        self.bump_bytes(close);
        let inner_end = self.mark();
        self.bump();
        Some(Token {
            kind: TokenKind::Str,
            text: &self.input[inner_start.pos..inner_end.pos],
            start: start.at,
            end: self.position(),
        })
    }

    /// Remainder of the current line as one trimmed text token; `None` (after consuming the
    /// blanks) when nothing but whitespace is left.
    pub(super) fn lex_rest_of_line(&mut self) -> Option<Token<'input>> {
        self.skip_blanks();
        if matches!(self.peek(), None | Some('\n')) {
            return None;
        }
        let start = self.mark();
        let mut last = self.mark();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
            if !c.is_whitespace() {
                last = self.mark();
            }
        }
        Some(self.token_span(TokenKind::Text, start, last))
    }

    /// `:` followed by the rest of the line as text.
    pub(super) fn lex_colon(
        &mut self,
        pending: &mut VecDeque<Token<'input>>,
    ) -> Option<Token<'input>> {
        if self.peek()? != ':' {
            return None;
        }
        let start = self.mark();
        self.bump();
        let colon = self.token_from(TokenKind::Colon, start);
        if let Some(text) = self.lex_rest_of_line() {
            pending.push_back(text);
        }
        Some(colon)
    }

    /// Matches the first enclosure whose closer appears later on the same line (outside double
    /// quotes) and emits opener, contents and closer. When several closers share that opener, the
    /// nearest one wins.
    pub(super) fn lex_enclosure(
        &mut self,
        enclosures: &[(&str, &str)],
        pending: &mut VecDeque<Token<'input>>,
    ) -> Option<Token<'input>> {
        let rest = self.rest();
        let closed_by = |open: &str, close: &str| {
            let body = rest.strip_prefix(open)?;
            find_closer(body, close)
        };
        let open = enclosures
            .iter()
            .find(|(open, close)| closed_by(open, close).is_some())
            .map(|(open, _)| *open)?;
        let (content_len, close) = enclosures
            .iter()
            .filter(|(candidate, _)| *candidate == open)
            .filter_map(|(_, close)| closed_by(open, close).map(|len| (len, *close)))
            .min_by_key(|(len, _)| *len)?;

        let start = self.mark();
        self.bump_bytes(open.len());
        let opener = self.token_from(TokenKind::Open, start);
        let content_start = self.mark();
        self.bump_bytes(content_len);
        pending.push_back(self.token_from(TokenKind::Text, content_start));
        let close_start = self.mark();
        self.bump_bytes(close.len());
        pending.push_back(self.token_from(TokenKind::Close, close_start));
        Some(opener)
    }

    pub(super) fn lex_punct(&mut self) -> Option<Token<'input>> {
        let kind = match self.peek()? {
            ',' => TokenKind::Comma,
            '&' => TokenKind::Amp,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '{' | '[' | '(' => TokenKind::Open,
            '}' | ']' | ')' => TokenKind::Close,
            _ => return None,
        };
        let start = self.mark();
        self.bump();
        Some(self.token_from(kind, start))
    }

    pub(super) fn lex_unknown(&mut self) -> Token<'input> {
        let start = self.mark();
        self.bump();
        self.token_from(TokenKind::Unknown, start)
    }
}

/// Byte length of `body` before `close`, skipping quoted runs; `None` if the line ends first.
fn find_closer(body: &str, close: &str) -> Option<usize> {
    let mut in_quote = false;
    for (i, c) in body.char_indices() {
        if c == '\n' {
            return None;
        }
        if c == '"' {
            in_quote = !in_quote;
            continue;
        }
        if !in_quote && body[i..].starts_with(close) {
            return Some(i);
        }
    }
    None
}

pub(super) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub(super) fn classify_word(word: &str) -> TokenKind {
    let mut parts = word.splitn(2, '.');
    let int = parts.next().unwrap_or_default();
    let frac = parts.next();
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if digits(int) && frac.is_none_or(digits) {
        TokenKind::Number
    } else {
        TokenKind::Ident
    }
}
