use super::{
    NotePosition, PseudoKind, PseudoTransition, StateDef, StateDiagram, StateNote, StateScope,
    StateVersion, Transition,
};
use crate::cursor::Cursor;
use crate::diagram::ParseContext;
use crate::diagrams::flowchart::Direction;
use crate::lexer::{Position, Token, TokenKind};
use crate::{Dialect, Error, Result};
use rustc_hash::FxHashSet;

/// An open `state X {` block.
struct Frame {
    id: String,
    opened_at: Position,
    scope: StateScope,
}

/// Parser state: the root scope, the open composite frames and every state id seen so far.
/// Ids are global across scopes; a state lives in the scope where it is first mentioned.
struct Builder {
    root: StateScope,
    stack: Vec<Frame>,
    declared: FxHashSet<String>,
}

/// First state named `id` anywhere below `scope`.
fn find_state<'a>(scope: &'a mut StateScope, id: &str) -> Option<&'a mut StateDef> {
    let mut pending = vec![scope];
    while let Some(scope) = pending.pop() {
        for state in scope.states.iter_mut() {
            if state.id == id {
                return Some(state);
            }
            if let Some(inner) = state.composite.as_mut() {
                pending.push(inner);
            }
        }
    }
    None
}

fn merge_scope(into: &mut StateScope, from: StateScope) {
    if from.direction.is_some() {
        into.direction = from.direction;
    }
    into.states.extend(from.states);
    into.transitions.extend(from.transitions);
    into.entries.extend(from.entries);
    into.exits.extend(from.exits);
    into.notes.extend(from.notes);
}

impl Builder {
    fn new() -> Self {
        Self {
            root: StateScope::default(),
            stack: Vec::new(),
            declared: FxHashSet::default(),
        }
    }

    fn scope(&mut self) -> &mut StateScope {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.scope,
            None => &mut self.root,
        }
    }

    /// Adds `id` to the current scope unless it was seen before.
    fn ensure(&mut self, id: &str) {
        if self.declared.insert(id.to_string()) {
            self.scope().states.push(StateDef::new(id));
        }
    }

    fn lookup(&mut self, id: &str) -> Option<&mut StateDef> {
        let Self { root, stack, .. } = self;
        std::iter::once(root)
            .chain(stack.iter_mut().map(|f| &mut f.scope))
            .find_map(|scope| find_state(scope, id))
    }

    /// Declares `id` and returns it for updating.
    fn declare(&mut self, id: &str) -> Option<&mut StateDef> {
        self.ensure(id);
        self.lookup(id)
    }

    fn open(&mut self, id: &str, opened_at: Position) {
        self.ensure(id);
        tracing::trace!(state = id, depth = self.stack.len() + 1, "open composite state");
        self.stack.push(Frame {
            id: id.to_string(),
            opened_at,
            scope: StateScope::default(),
        });
    }

    fn close(&mut self, at: Position) -> Result<()> {
        let Some(frame) = self.stack.pop() else {
            return Err(Error::unexpected("state statement", "`}`", at));
        };
        tracing::trace!(state = %frame.id, "close composite state");
        let Some(state) = self.lookup(&frame.id) else {
            return Err(Error::InvalidIdentifier {
                ident: frame.id,
                position: frame.opened_at,
            });
        };
        match state.composite.as_mut() {
            Some(existing) => merge_scope(existing, frame.scope),
            None => state.composite = Some(frame.scope),
        }
        Ok(())
    }
}

pub fn parse_state(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<StateDiagram> {
    let mut cur = Cursor::new(tokens, ctx.source, Dialect::State);
    cur.skip_newlines();
    let version = if cur.eat_word("stateDiagram-v2") {
        StateVersion::V2
    } else if cur.eat_word("stateDiagram") {
        StateVersion::V1
    } else {
        return Err(cur.unexpected("`stateDiagram`"));
    };
    cur.expect_line_end()?;

    let mut b = Builder::new();
    loop {
        cur.skip_newlines();
        if cur.at_eof() {
            break;
        }
        let before = cur.index();

        if cur.at_delim(TokenKind::Close, "}") {
            let at = cur.advance().start;
            b.close(at)?;
        } else if cur.at_word("direction") {
            cur.advance();
            let tok = cur.expect(TokenKind::Ident, "direction")?;
            let direction = Direction::parse(tok.text)
                .ok_or_else(|| Error::unexpected("TB, TD, BT, LR or RL", tok.describe(), tok.start))?;
            b.scope().direction = Some(direction);
        } else if cur.at_word("state") {
            cur.advance();
            parse_state_decl(&mut cur, &mut b)?;
        } else if cur.at_word("note") {
            cur.advance();
            parse_note(&mut cur, &mut b)?;
        } else {
            parse_statement(&mut cur, &mut b)?;
        }

        cur.ensure_progress(before, "state statement")?;
        if !cur.at_delim(TokenKind::Close, "}") {
            cur.expect_line_end()?;
        }
    }

    if let Some(frame) = b.stack.last() {
        return Err(Error::UnterminatedBlock {
            block: frame.id.clone(),
            opened_at: frame.opened_at,
        });
    }
    Ok(StateDiagram {
        version,
        body: b.root,
    })
}

/// After `state`: `"label" as id`, `id <<kind>>`, `id {`, or a bare `id`.
fn parse_state_decl(cur: &mut Cursor<'_>, b: &mut Builder) -> Result<()> {
    let (id, label) = if let Some(label) = cur.eat(TokenKind::Str) {
        if !cur.eat_word("as") {
            return Err(cur.unexpected("`as`"));
        }
        let id = cur.expect_ident("state id")?.text;
        (id, Some(label.text.to_string()))
    } else {
        (cur.expect_ident("state id")?.text, None)
    };

    let pseudo = if cur.at_delim(TokenKind::Open, "<<") {
        cur.advance();
        let tok = cur.expect(TokenKind::Text, "choice, fork or join")?;
        let kind = PseudoKind::parse(tok.text)
            .ok_or_else(|| Error::unexpected("choice, fork or join", tok.describe(), tok.start))?;
        cur.expect_delim(TokenKind::Close, ">>")?;
        Some(kind)
    } else {
        None
    };

    if let Some(state) = b.declare(id) {
        if label.is_some() {
            state.label = label;
        }
        if pseudo.is_some() {
            state.pseudo = pseudo;
        }
    }

    if cur.at_delim(TokenKind::Open, "{") {
        let opened_at = cur.advance().start;
        b.open(id, opened_at);
    }
    Ok(())
}

/// After `note`: `left of X : text`, or `left of X` followed by lines up to `end note`.
fn parse_note(cur: &mut Cursor<'_>, b: &mut Builder) -> Result<()> {
    let position = if cur.eat_word("left") {
        NotePosition::Left
    } else if cur.eat_word("right") {
        NotePosition::Right
    } else {
        return Err(cur.unexpected("`left of` or `right of`"));
    };
    if !cur.eat_word("of") {
        return Err(cur.unexpected("`of`"));
    }
    let target = cur.expect_ident("state id")?.text;
    b.ensure(target);

    let text = if cur.eat(TokenKind::Colon).is_some() {
        cur.eat(TokenKind::Text)
            .map(|t| t.text.trim().to_string())
            .unwrap_or_default()
    } else {
        let opened_at = cur.position();
        cur.expect_line_end()?;
        let body_start = cur.position();
        loop {
            if cur.at_eof() {
                return Err(Error::UnterminatedBlock {
                    block: "note".to_string(),
                    opened_at,
                });
            }
            if cur.at_word("end") && cur.peek_nth(1).is_word("note") {
                break;
            }
            cur.advance();
        }
        let body = cur.slice(body_start, cur.position());
        cur.advance();
        cur.advance();
        body.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    };

    b.scope().notes.push(StateNote {
        target: target.to_string(),
        position,
        text,
    });
    Ok(())
}

#[derive(Clone, Copy)]
enum Endpoint<'input> {
    Pseudo,
    State(&'input str),
}

fn parse_endpoint<'input>(cur: &mut Cursor<'input>) -> Result<Endpoint<'input>> {
    if cur.eat(TokenKind::Sentinel).is_some() {
        Ok(Endpoint::Pseudo)
    } else {
        Ok(Endpoint::State(cur.expect_ident("state id or `[*]`")?.text))
    }
}

/// Transitions, `id : description` and bare ids.
fn parse_statement(cur: &mut Cursor<'_>, b: &mut Builder) -> Result<()> {
    let at = cur.position();
    let from = parse_endpoint(cur)?;

    if let Endpoint::State(id) = from {
        if cur.eat(TokenKind::Colon).is_some() {
            let text = cur.eat(TokenKind::Text).map(|t| t.text.trim()).unwrap_or_default();
            if let Some(state) = b.declare(id) {
                state.label = Some(text.to_string()).filter(|t| !t.is_empty());
            }
            return Ok(());
        }
        if cur.at_line_end() {
            b.ensure(id);
            return Ok(());
        }
    }

    cur.expect(TokenKind::Arrow, "`-->`")?;
    let to = parse_endpoint(cur)?;
    let label = if cur.eat(TokenKind::Colon).is_some() {
        cur.eat(TokenKind::Text)
            .map(|t| t.text.trim().to_string())
            .filter(|t| !t.is_empty())
    } else {
        None
    };

    match (from, to) {
        (Endpoint::Pseudo, Endpoint::State(state)) => {
            b.ensure(state);
            b.scope().entries.push(PseudoTransition {
                state: state.to_string(),
                label,
            });
        }
        (Endpoint::State(state), Endpoint::Pseudo) => {
            b.ensure(state);
            b.scope().exits.push(PseudoTransition {
                state: state.to_string(),
                label,
            });
        }
        (Endpoint::State(from), Endpoint::State(to)) => {
            b.ensure(from);
            b.ensure(to);
            b.scope().transitions.push(Transition {
                from: from.to_string(),
                to: to.to_string(),
                label,
            });
        }
        (Endpoint::Pseudo, Endpoint::Pseudo) => {
            return Err(Error::unexpected("state id", "`[*]`", at));
        }
    }
    Ok(())
}
