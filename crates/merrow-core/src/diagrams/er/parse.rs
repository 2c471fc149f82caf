use super::{Cardinality, Entity, EntityAttribute, ErDiagram, Identification, KeyKind, Relationship};
use crate::cursor::Cursor;
use crate::diagram::ParseContext;
use crate::lexer::{Position, Token, TokenKind};
use crate::{Dialect, Error, Result};

fn ensure_entity<'a>(entities: &'a mut Vec<Entity>, name: &str) -> &'a mut Entity {
    let idx = match entities.iter().position(|e| e.name == name) {
        Some(idx) => idx,
        None => {
            entities.push(Entity::new(name));
            entities.len() - 1
        }
    };
    &mut entities[idx]
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

pub fn parse_er(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<ErDiagram> {
    let mut cur = Cursor::new(tokens, ctx.source, Dialect::Er);
    cur.skip_newlines();
    cur.expect_delim(TokenKind::Ident, "erDiagram")?;
    cur.expect_line_end()?;

    let mut diagram = ErDiagram::default();
    loop {
        cur.skip_newlines();
        if cur.at_eof() {
            break;
        }
        let before = cur.index();
        parse_statement(&mut cur, &mut diagram)?;
        cur.ensure_progress(before, "entity or relationship")?;
        cur.expect_line_end()?;
    }
    Ok(diagram)
}

fn parse_statement(cur: &mut Cursor<'_>, diagram: &mut ErDiagram) -> Result<()> {
    let name = cur.expect_ident("entity name")?.text;

    if cur.at(TokenKind::Arrow) {
        return parse_relationship(cur, diagram, name);
    }

    let alias = if cur.at_delim(TokenKind::Open, "[") {
        cur.advance();
        let text = cur.eat(TokenKind::Text).map(|t| unquote(t.text)).unwrap_or_default();
        cur.expect_delim(TokenKind::Close, "]")?;
        Some(text.to_string()).filter(|t| !t.is_empty())
    } else {
        None
    };

    let entity = ensure_entity(&mut diagram.entities, name);
    if alias.is_some() {
        entity.alias = alias;
    }

    if cur.at_delim(TokenKind::Open, "{") {
        let opened_at = cur.advance().start;
        tracing::trace!(entity = %entity.name, "open entity body");
        return parse_body(cur, entity, opened_at);
    }
    if cur.at_line_end() {
        return Ok(());
    }

    let found = cur.peek();
    let rest = cur.take_line(|_| false);
    let text = rest.split_whitespace().next().unwrap_or(found.text);
    Err(Error::UnrecognizedCardinality {
        text: text.to_string(),
        position: found.start,
    })
}

fn parse_body(cur: &mut Cursor<'_>, entity: &mut Entity, opened_at: Position) -> Result<()> {
    loop {
        cur.skip_newlines();
        if cur.eat_delim(TokenKind::Close, "}") {
            return Ok(());
        }
        if cur.at_eof() {
            return Err(Error::UnterminatedBlock {
                block: entity.name.clone(),
                opened_at,
            });
        }
        let before = cur.index();
        let at = cur.position();
        let line = cur.take_line(|t| t.is(TokenKind::Close, "}"));
        entity.attributes.push(parse_attribute(line, at)?);
        cur.ensure_progress(before, "attribute")?;
    }
}

/// `type name [PK|FK|UK[, ...]] ["comment"]`. The type is taken verbatim up to the first
/// whitespace, so `varchar(255)` and `string[]` survive.
fn parse_attribute(line: &str, at: Position) -> Result<EntityAttribute> {
    let (head, comment) = match line.find('"') {
        Some(open) => {
            let quoted = &line[open..];
            (&line[..open], Some(unquote(quoted).to_string()))
        }
        None => (line, None),
    };

    let mut words = head.split_whitespace();
    let ty = words.next().unwrap_or_default();
    let Some(name) = words.next() else {
        return Err(Error::unexpected("attribute type and name", format!("`{line}`"), at));
    };

    let mut keys = Vec::new();
    let rest: Vec<&str> = words.collect();
    for key in rest.join(" ").split(',').map(str::trim).filter(|k| !k.is_empty()) {
        match KeyKind::parse(key) {
            Some(kind) => keys.push(kind),
            None => return Err(Error::unexpected("PK, FK or UK", format!("`{key}`"), at)),
        }
    }

    Ok(EntityAttribute {
        ty: ty.to_string(),
        name: name.to_string(),
        keys,
        comment,
    })
}

/// `From CARD To [: label]`, after the `From` name.
fn parse_relationship(cur: &mut Cursor<'_>, diagram: &mut ErDiagram, from: &str) -> Result<()> {
    let op = cur.advance();
    let unrecognized = || Error::UnrecognizedCardinality {
        text: op.text.to_string(),
        position: op.start,
    };
    let from_cardinality = op
        .text
        .get(..2)
        .and_then(Cardinality::from_left)
        .ok_or_else(unrecognized)?;
    let identification = op
        .text
        .get(2..4)
        .and_then(Identification::from_separator)
        .ok_or_else(unrecognized)?;
    let to_cardinality = op
        .text
        .get(4..)
        .and_then(Cardinality::from_right)
        .ok_or_else(unrecognized)?;

    let to = cur.expect_ident("entity name")?.text;
    let label = if cur.eat(TokenKind::Colon).is_some() {
        cur.eat(TokenKind::Text)
            .map(|t| unquote(t.text).to_string())
            .filter(|t| !t.is_empty())
    } else {
        None
    };

    ensure_entity(&mut diagram.entities, from);
    ensure_entity(&mut diagram.entities, to);
    diagram.relationships.push(Relationship {
        from: from.to_string(),
        to: to.to_string(),
        from_cardinality,
        to_cardinality,
        identification,
        label,
    });
    Ok(())
}
