use super::{
    Activation, ArrowKind, Block, BlockKind, Branch, Message, Note, NotePlacement, Participant,
    ParticipantKind, SequenceDiagram, SequenceStatement,
};
use crate::content::Content;
use crate::cursor::Cursor;
use crate::diagram::ParseContext;
use crate::lexer::{Position, Token, TokenKind};
use crate::{Dialect, Error, Result};

struct Frame {
    block: Block,
    opened_at: Position,
}

/// Statement list new statements go to: the current branch of the innermost open block, or the
/// diagram itself.
fn target<'a>(
    root: &'a mut Vec<SequenceStatement>,
    stack: &'a mut [Frame],
) -> &'a mut Vec<SequenceStatement> {
    match stack.last_mut() {
        Some(Frame { block, .. }) => match block.branches.last_mut() {
            Some(branch) => &mut branch.statements,
            None => &mut block.statements,
        },
        None => root,
    }
}

pub fn parse_sequence(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<SequenceDiagram> {
    let mut cur = Cursor::new(tokens, ctx.source, Dialect::Sequence);
    cur.skip_newlines();
    if !cur.eat_word("sequenceDiagram") {
        return Err(cur.unexpected("`sequenceDiagram`"));
    }
    cur.expect_line_end()?;

    let mut diagram = SequenceDiagram::default();
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        cur.skip_newlines();
        if cur.at_eof() {
            break;
        }
        // Every iteration must consume at least one token, whatever branch is taken below.
        let before = cur.index();
        let keyword = cur.peek();
        let word = if keyword.kind == TokenKind::Ident {
            keyword.text.to_ascii_lowercase()
        } else {
            String::new()
        };

        if let Some(kind) = BlockKind::from_keyword(&word) {
            cur.advance();
            let label = optional_text(&mut cur);
            tracing::trace!(block = kind.keyword(), depth = stack.len() + 1, "open block");
            stack.push(Frame {
                block: Block {
                    kind,
                    label,
                    statements: Vec::new(),
                    branches: Vec::new(),
                },
                opened_at: keyword.start,
            });
        } else if matches!(word.as_str(), "else" | "and" | "option") {
            let accepted = stack
                .last()
                .and_then(|frame| frame.block.kind.branch_keyword())
                == Some(word.as_str());
            if !accepted {
                return Err(Error::unexpected(
                    "statement",
                    keyword.describe(),
                    keyword.start,
                ));
            }
            cur.advance();
            let label = optional_text(&mut cur);
            if let Some(frame) = stack.last_mut() {
                frame.block.branches.push(Branch {
                    label,
                    statements: Vec::new(),
                });
            }
        } else if word == "end" {
            cur.advance();
            let Some(frame) = stack.pop() else {
                return Err(Error::unexpected("statement", "`end`", keyword.start));
            };
            tracing::trace!(block = frame.block.kind.keyword(), "close block");
            target(&mut root, &mut stack).push(SequenceStatement::Block(frame.block));
        } else if word == "title" {
            cur.advance();
            let text = cur.expect(TokenKind::Text, "title text")?.text;
            diagram.title = Some(text.trim_start_matches(':').trim().to_string());
        } else {
            let out = target(&mut root, &mut stack);
            parse_statement(&mut cur, &word, out)?;
        }

        cur.ensure_progress(before, "sequence statement")?;
        cur.expect_line_end()?;
    }

    if let Some(frame) = stack.pop() {
        return Err(Error::UnterminatedBlock {
            block: frame.block.kind.keyword().to_string(),
            opened_at: frame.opened_at,
        });
    }

    diagram.statements = root;
    Ok(diagram)
}

fn optional_text(cur: &mut Cursor<'_>) -> Option<String> {
    cur.eat(TokenKind::Text).map(|t| t.text.to_string())
}

/// Statements that never open or close a block. `word` is the lowercased first token.
fn parse_statement(
    cur: &mut Cursor<'_>,
    word: &str,
    out: &mut Vec<SequenceStatement>,
) -> Result<()> {
    match word {
        "participant" | "actor" => {
            let kind = if word == "actor" {
                ParticipantKind::Actor
            } else {
                ParticipantKind::Participant
            };
            cur.advance();
            parse_participants(cur, kind, out)
        }
        "note" => {
            cur.advance();
            out.push(SequenceStatement::Note(parse_note(cur)?));
            Ok(())
        }
        "activate" | "deactivate" => {
            cur.advance();
            let actor = cur.expect_ident("participant")?.text.to_string();
            out.push(if word == "activate" {
                SequenceStatement::Activate { actor }
            } else {
                SequenceStatement::Deactivate { actor }
            });
            Ok(())
        }
        "autonumber" => {
            cur.advance();
            let start = parse_number(cur)?;
            let step = if start.is_some() {
                parse_number(cur)?
            } else {
                None
            };
            out.push(SequenceStatement::Autonumber { start, step });
            Ok(())
        }
        _ => {
            out.push(SequenceStatement::Message(parse_message(cur)?));
            Ok(())
        }
    }
}

fn parse_number(cur: &mut Cursor<'_>) -> Result<Option<u64>> {
    let Some(tok) = cur.eat(TokenKind::Number) else {
        return Ok(None);
    };
    tok.text
        .parse::<u64>()
        .map(Some)
        .map_err(|_| Error::unexpected("whole number", tok.describe(), tok.start))
}

/// `participant A`, `participant A as Alias`, `participant A, B & C`.
fn parse_participants(
    cur: &mut Cursor<'_>,
    kind: ParticipantKind,
    out: &mut Vec<SequenceStatement>,
) -> Result<()> {
    let first = cur.expect_ident("participant id")?.text.to_string();
    if cur.eat_keyword("as") {
        if cur.at_line_end() {
            return Err(cur.unexpected("alias"));
        }
        let alias = cur.take_line(|_| false).to_string();
        out.push(SequenceStatement::Participant(Participant {
            kind,
            id: first,
            alias: Some(alias),
        }));
        return Ok(());
    }

    let mut ids = vec![first];
    while cur.eat(TokenKind::Comma).is_some() || cur.eat(TokenKind::Amp).is_some() {
        ids.push(cur.expect_ident("participant id")?.text.to_string());
    }
    out.extend(ids.into_iter().map(|id| {
        SequenceStatement::Participant(Participant {
            kind,
            id,
            alias: None,
        })
    }));
    Ok(())
}

fn parse_text(cur: &mut Cursor<'_>) -> Content {
    match cur.eat(TokenKind::Text) {
        Some(tok) => Content::from_source(tok.text),
        None => Content::plain(""),
    }
}

/// `note (left of|right of|over) A[, B] : text`
fn parse_note(cur: &mut Cursor<'_>) -> Result<Note> {
    let placement = if cur.eat_keyword("left") {
        cur.expect_keyword("of")?;
        NotePlacement::LeftOf
    } else if cur.eat_keyword("right") {
        cur.expect_keyword("of")?;
        NotePlacement::RightOf
    } else if cur.eat_keyword("over") {
        NotePlacement::Over
    } else {
        return Err(cur.unexpected("`left of`, `right of` or `over`"));
    };

    let mut actors = vec![cur.expect_ident("participant")?.text.to_string()];
    if placement == NotePlacement::Over && cur.eat(TokenKind::Comma).is_some() {
        actors.push(cur.expect_ident("participant")?.text.to_string());
    }
    cur.expect(TokenKind::Colon, "`:`")?;
    let text = parse_text(cur);
    Ok(Note {
        placement,
        actors,
        text,
    })
}

/// `A ARROW [+|-]B [: text]`. A self message (`A->>A`) takes exactly this path.
fn parse_message(cur: &mut Cursor<'_>) -> Result<Message> {
    let from = cur.expect_ident("participant or statement")?.text.to_string();
    let arrow_tok = cur.expect(TokenKind::Arrow, "message arrow")?;
    let Some(arrow) = ArrowKind::from_operator(arrow_tok.text) else {
        return Err(Error::unexpected("message arrow", arrow_tok.describe(), arrow_tok.start));
    };
    let activation = if cur.eat(TokenKind::Plus).is_some() {
        Some(Activation::Activate)
    } else if cur.eat(TokenKind::Minus).is_some() {
        Some(Activation::Deactivate)
    } else {
        None
    };
    let to = cur.expect_ident("participant")?.text.to_string();
    let text = if cur.eat(TokenKind::Colon).is_some() {
        parse_text(cur)
    } else {
        Content::plain("")
    };
    Ok(Message {
        from,
        to,
        arrow,
        activation,
        text,
    })
}
