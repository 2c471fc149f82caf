use super::{Direction, EdgeStyle, FlowEdge, FlowNode, FlowStatement, Flowchart, NodeShape, Subgraph};
use crate::content::Content;
use crate::cursor::Cursor;
use crate::diagram::ParseContext;
use crate::lexer::{Position, Token, TokenKind};
use crate::{Dialect, Error, Result};

struct Frame {
    subgraph: Subgraph,
    opened_at: Position,
}

/// Statement list new statements go to: the innermost open subgraph, or the chart itself.
fn target<'a>(
    root: &'a mut Vec<FlowStatement>,
    stack: &'a mut [Frame],
) -> &'a mut Vec<FlowStatement> {
    match stack.last_mut() {
        Some(frame) => &mut frame.subgraph.statements,
        None => root,
    }
}

pub fn parse_flowchart(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<Flowchart> {
    let mut cur = Cursor::new(tokens, ctx.source, Dialect::Flowchart);
    cur.skip_newlines();
    if !(cur.eat_word("flowchart") || cur.eat_word("graph")) {
        return Err(cur.unexpected("`flowchart` or `graph`"));
    }
    let direction = if cur.at(TokenKind::Ident) {
        parse_direction(&mut cur)?
    } else {
        Direction::default()
    };
    cur.expect_line_end()?;

    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    loop {
        cur.skip_newlines();
        if cur.at_eof() {
            break;
        }
        let before = cur.index();

        if cur.at_word("subgraph") {
            let opened_at = cur.advance().start;
            let subgraph = parse_subgraph_header(&mut cur)?;
            tracing::trace!(id = %subgraph.id, depth = stack.len() + 1, "open subgraph");
            stack.push(Frame {
                subgraph,
                opened_at,
            });
        } else if cur.at_word("end") {
            let end = cur.advance();
            let Some(frame) = stack.pop() else {
                return Err(Error::unexpected("statement", "`end`", end.start));
            };
            tracing::trace!(id = %frame.subgraph.id, "close subgraph");
            target(&mut root, &mut stack).push(FlowStatement::Subgraph(frame.subgraph));
        } else if cur.at_word("direction") && !stack.is_empty() {
            cur.advance();
            let direction = parse_direction(&mut cur)?;
            if let Some(frame) = stack.last_mut() {
                frame.subgraph.direction = Some(direction);
            }
        } else {
            parse_statement(&mut cur, target(&mut root, &mut stack))?;
        }

        cur.ensure_progress(before, "flowchart statement")?;
        cur.expect_line_end()?;
    }

    if let Some(frame) = stack.pop() {
        return Err(Error::UnterminatedBlock {
            block: "subgraph".to_string(),
            opened_at: frame.opened_at,
        });
    }

    Ok(Flowchart {
        direction,
        statements: root,
    })
}

fn parse_direction(cur: &mut Cursor<'_>) -> Result<Direction> {
    let tok = cur.peek();
    match Direction::parse(tok.text).filter(|_| tok.kind == TokenKind::Ident) {
        Some(direction) => {
            cur.advance();
            Ok(direction)
        }
        None => Err(cur.unexpected("direction (TB, TD, BT, LR, RL)")),
    }
}

/// Label text inside delimiters: trimmed, unquoted when fully quoted, `None` when empty.
pub(super) fn label_content(text: &str) -> Option<Content> {
    let t = text.trim();
    let inner = t
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(t);
    (!inner.is_empty()).then(|| Content::from_source(inner))
}

fn parse_subgraph_header(cur: &mut Cursor<'_>) -> Result<Subgraph> {
    let id = cur.expect_ident("subgraph id")?.text.to_string();
    let title = if cur.at_delim(TokenKind::Open, "[") && cur.peek_nth(1).kind == TokenKind::Text {
        cur.advance();
        let text = cur.advance().text;
        cur.expect_delim(TokenKind::Close, "]")?;
        label_content(text)
    } else {
        None
    };
    Ok(Subgraph {
        id,
        title,
        direction: None,
        statements: Vec::new(),
    })
}

/// One node reference: an id, optionally followed by a shape with its label.
fn parse_node_ref(cur: &mut Cursor<'_>) -> Result<(String, Option<FlowNode>)> {
    let id = cur.expect_ident("node id")?.text.to_string();

    let open = cur.peek();
    let is_shape = open.kind == TokenKind::Open
        && open.text != "|"
        && cur.peek_nth(1).kind == TokenKind::Text
        && cur.peek_nth(2).kind == TokenKind::Close;
    if !is_shape {
        return Ok((id, None));
    }

    cur.advance();
    let text = cur.advance().text;
    let close = cur.advance();
    let Some(shape) = NodeShape::from_delimiters(open.text, close.text) else {
        return Err(Error::unexpected(
            "node shape delimiters",
            format!("`{}...{}`", open.text, close.text),
            open.start,
        ));
    };
    let node = FlowNode {
        id: id.clone(),
        shape,
        label: label_content(text),
    };
    Ok((id, Some(node)))
}

/// `node ('&' node)*`
fn parse_group(cur: &mut Cursor<'_>) -> Result<Vec<(String, Option<FlowNode>)>> {
    let mut group = vec![parse_node_ref(cur)?];
    while cur.eat(TokenKind::Amp).is_some() {
        group.push(parse_node_ref(cur)?);
    }
    Ok(group)
}

fn parse_edge_label(cur: &mut Cursor<'_>) -> Result<Option<Content>> {
    if !cur.at_delim(TokenKind::Open, "|") {
        return Ok(None);
    }
    cur.advance();
    let text = cur.expect(TokenKind::Text, "edge label")?.text;
    cur.expect_delim(TokenKind::Close, "|")?;
    Ok(label_content(text))
}

/// A node statement (`A`, `A[label] & B`) or an edge chain (`A & B --> C -->|x| D`). Shapes on
/// edge endpoints become node statements placed before the edges.
fn parse_statement(cur: &mut Cursor<'_>, out: &mut Vec<FlowStatement>) -> Result<()> {
    let group = parse_group(cur)?;
    if !cur.at(TokenKind::Arrow) {
        // Plain declaration: every listed node is declared, bare or shaped.
        for (id, node) in group {
            out.push(FlowStatement::Node(node.unwrap_or_else(|| FlowNode::bare(id))));
        }
        return Ok(());
    }

    let mut declared = Vec::new();
    let mut edges = Vec::new();
    let mut from = Vec::with_capacity(group.len());
    for (id, node) in group {
        from.push(id);
        declared.extend(node);
    }

    while cur.at(TokenKind::Arrow) {
        let arrow = cur.advance();
        let Some(style) = EdgeStyle::from_operator(arrow.text) else {
            return Err(Error::unexpected("edge", format!("`{}`", arrow.text), arrow.start));
        };
        let label = parse_edge_label(cur)?;

        let mut to = Vec::new();
        for (id, node) in parse_group(cur)? {
            to.push(id);
            declared.extend(node);
        }
        for a in &from {
            for b in &to {
                edges.push(FlowEdge {
                    from: a.clone(),
                    to: b.clone(),
                    style,
                    label: label.clone(),
                });
            }
        }
        from = to;
    }

    out.extend(declared.into_iter().map(FlowStatement::Node));
    out.extend(edges.into_iter().map(FlowStatement::Edge));
    Ok(())
}
