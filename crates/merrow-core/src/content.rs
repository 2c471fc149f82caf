//! Label text as written in a diagram: plain, HTML-bearing or backtick markdown.

use crate::entities::{decode_shorthand, encode_markup, encode_shorthand};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RichKind {
    Html,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichText {
    pub kind: RichKind,
    /// Source text, without the surrounding backticks for markdown.
    pub raw: String,
    /// Plain-text rendering, when one could be produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum Content {
    Plain(String),
    Rich(RichText),
}

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*(\s[^<>]*)?/?>").expect("valid regex"))
}

/// True when [`Content::from_source`] would classify `text` as rich.
fn reads_as_markup(text: &str) -> bool {
    let backticked = text.len() >= 2 && text.starts_with('`') && text.ends_with('`');
    backticked || html_tag_re().is_match(text)
}

fn html_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"))
}

impl Content {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    pub fn markdown(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let rendered = Some(render_markdown(&raw));
        Self::Rich(RichText {
            kind: RichKind::Markdown,
            raw,
            rendered,
        })
    }

    pub fn html(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let rendered = Some(render_html(&raw));
        Self::Rich(RichText {
            kind: RichKind::Html,
            raw,
            rendered,
        })
    }

    /// Classifies label text taken from the source, with surrounding quotes already removed.
    ///
    /// Text wrapped in backticks is markdown, text containing a tag is HTML, everything else is
    /// plain text with `#...;` shorthand decoded.
    pub fn from_source(text: &str) -> Self {
        if let Some(inner) = text
            .strip_prefix('`')
            .and_then(|rest| rest.strip_suffix('`'))
        {
            return Self::markdown(inner);
        }
        if html_tag_re().is_match(text) {
            return Self::html(text);
        }
        Self::Plain(decode_shorthand(text).into_owned())
    }

    /// Display text: the rendering for rich content, the text itself otherwise.
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Rich(rich) => rich.rendered.as_deref().unwrap_or(&rich.raw),
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self, Self::Rich(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Plain(text) => text.is_empty(),
            Self::Rich(rich) => rich.raw.is_empty(),
        }
    }

    /// Source spelling for generated output. `quoted` means the text will sit inside double
    /// quotes, so `"` must be protected.
    pub fn to_source(&self, quoted: bool) -> String {
        match self {
            Self::Plain(text) => {
                let encoded = encode_shorthand(text, quoted);
                if reads_as_markup(&encoded) {
                    encode_markup(&encoded).into_owned()
                } else {
                    encoded.into_owned()
                }
            }
            Self::Rich(RichText {
                kind: RichKind::Markdown,
                raw,
                ..
            }) => format!("`{raw}`"),
            Self::Rich(RichText {
                kind: RichKind::Html,
                raw,
                ..
            }) => raw.clone(),
        }
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

fn render_markdown(raw: &str) -> String {
    use pulldown_cmark::{Event, Parser};

    let mut out = String::with_capacity(raw.len());
    for event in Parser::new(raw) {
        match event {
            Event::Text(t) | Event::Code(t) => out.push_str(&t),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            _ => {}
        }
    }
    out
}

fn render_html(raw: &str) -> String {
    let with_breaks = html_break_re().replace_all(raw, "\n");
    let stripped = html_tag_re().replace_all(&with_breaks, "");
    htmlize::unescape(decode_shorthand(&stripped).as_ref()).into_owned()
}
