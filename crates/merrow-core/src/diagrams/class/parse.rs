use super::{ClassDef, ClassDiagram, ClassRelation, RelationKind, parse_member};
use crate::cursor::Cursor;
use crate::diagram::ParseContext;
use crate::lexer::{Token, TokenKind};
use crate::{Dialect, Error, Result};

/// Returns the class named `name`, creating an empty one at the end of the list first if needed.
fn ensure_class<'a>(classes: &'a mut Vec<ClassDef>, name: &str) -> &'a mut ClassDef {
    let idx = match classes.iter().position(|c| c.name == name) {
        Some(idx) => idx,
        None => {
            classes.push(ClassDef::new(name));
            classes.len() - 1
        }
    };
    &mut classes[idx]
}

pub fn parse_class(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<ClassDiagram> {
    let mut cur = Cursor::new(tokens, ctx.source, Dialect::Class);
    cur.skip_newlines();
    let v2 = if cur.eat_word("classDiagram-v2") {
        true
    } else if cur.eat_word("classDiagram") {
        false
    } else {
        return Err(cur.unexpected("`classDiagram`"));
    };
    cur.expect_line_end()?;

    let mut diagram = ClassDiagram {
        v2,
        ..ClassDiagram::default()
    };

    loop {
        cur.skip_newlines();
        if cur.at_eof() {
            break;
        }
        let before = cur.index();

        if cur.at_word("class") {
            cur.advance();
            parse_class_decl(&mut cur, &mut diagram.classes)?;
        } else if let Some(annotation) = parse_annotation(&mut cur)? {
            let name = cur.expect_ident("class name")?.text;
            ensure_class(&mut diagram.classes, name).annotation = Some(annotation);
        } else if cur.peek_nth(1).kind == TokenKind::Colon {
            let name = cur.expect_ident("class name")?.text;
            cur.advance();
            let text = cur.eat(TokenKind::Text).map(|t| t.text).unwrap_or_default();
            let class = ensure_class(&mut diagram.classes, name);
            class.members.extend(parse_member(text));
        } else {
            parse_relation(&mut cur, &mut diagram)?;
        }

        cur.ensure_progress(before, "class statement")?;
        cur.expect_line_end()?;
    }

    Ok(diagram)
}

/// `<<text>>` at the cursor, consumed; `None` when the cursor is elsewhere.
fn parse_annotation(cur: &mut Cursor<'_>) -> Result<Option<String>> {
    if !cur.at_delim(TokenKind::Open, "<<") {
        return Ok(None);
    }
    cur.advance();
    let text = cur.expect(TokenKind::Text, "annotation")?.text.trim().to_string();
    cur.expect_delim(TokenKind::Close, ">>")?;
    Ok(Some(text))
}

fn parse_generic(cur: &mut Cursor<'_>) -> Result<Option<String>> {
    if !cur.at_delim(TokenKind::Open, "~") {
        return Ok(None);
    }
    cur.advance();
    let text = cur.expect(TokenKind::Text, "generic parameter")?.text.trim().to_string();
    cur.expect_delim(TokenKind::Close, "~")?;
    Ok(Some(text))
}

/// `class Name[~T~] [{ ... }]`, after the `class` keyword.
fn parse_class_decl(cur: &mut Cursor<'_>, classes: &mut Vec<ClassDef>) -> Result<()> {
    let name = cur.expect_ident("class name")?.text;
    let generic = parse_generic(cur)?;
    let class = ensure_class(classes, name);
    if generic.is_some() {
        class.generic = generic;
    }

    if !cur.at_delim(TokenKind::Open, "{") {
        return Ok(());
    }
    let opened_at = cur.advance().start;
    tracing::trace!(class = %class.name, "open class body");
    loop {
        cur.skip_newlines();
        if cur.eat_delim(TokenKind::Close, "}") {
            return Ok(());
        }
        if cur.at_eof() {
            return Err(Error::UnterminatedBlock {
                block: "class".to_string(),
                opened_at,
            });
        }
        let before = cur.index();
        if let Some(annotation) = parse_annotation(cur)? {
            class.annotation = Some(annotation);
        } else {
            let line = cur.take_line(|t| t.is(TokenKind::Close, "}"));
            class.members.extend(parse_member(line));
        }
        cur.ensure_progress(before, "class member")?;
    }
}

/// `From ["card"] OP ["card"] To [: label]`, or a bare class name.
fn parse_relation(cur: &mut Cursor<'_>, diagram: &mut ClassDiagram) -> Result<()> {
    let from = cur.expect_ident("class name or statement")?.text;
    if cur.at_line_end() {
        ensure_class(&mut diagram.classes, from);
        return Ok(());
    }

    let from_cardinality = cur.eat(TokenKind::Str).map(|t| t.text.to_string());
    let op = cur.expect(TokenKind::Arrow, "class relation")?;
    let Some((kind, direction)) = RelationKind::from_operator(op.text) else {
        return Err(Error::unexpected("class relation", op.describe(), op.start));
    };
    let to_cardinality = cur.eat(TokenKind::Str).map(|t| t.text.to_string());
    let to = cur.expect_ident("class name")?.text;
    let label = if cur.eat(TokenKind::Colon).is_some() {
        cur.eat(TokenKind::Text)
            .map(|t| t.text.trim().to_string())
            .filter(|t| !t.is_empty())
    } else {
        None
    };

    ensure_class(&mut diagram.classes, from);
    ensure_class(&mut diagram.classes, to);
    diagram.relations.push(ClassRelation {
        from: from.to_string(),
        to: to.to_string(),
        kind,
        direction,
        from_cardinality,
        to_cardinality,
        label,
    });
    Ok(())
}
