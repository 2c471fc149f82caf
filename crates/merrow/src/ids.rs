//! Identifier newtypes. Each one holds a string that the matching dialect reads back as a single
//! identifier token and that is not one of the dialect's reserved words.

use merrow_core::Dialect;
use merrow_core::reserved::is_reserved;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("identifier is empty")]
    Empty,
    #[error("`{id}` cannot contain `{ch}`")]
    InvalidChar { id: String, ch: char },
    #[error("`{id}` is a reserved word in {dialect} diagrams")]
    Reserved { id: String, dialect: Dialect },
}

/// Checks `id` for `dialect`: the first char must be a letter, digit or `_` (`start`), the rest
/// must pass `rest`.
fn check(
    id: &str,
    dialect: Dialect,
    start: impl Fn(char) -> bool,
    rest: impl Fn(char) -> bool,
) -> Result<(), IdError> {
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return Err(IdError::Empty);
    };
    if let Some(ch) = std::iter::once(first)
        .filter(|c| !start(*c))
        .chain(chars.filter(|c| !rest(*c)))
        .next()
    {
        return Err(IdError::InvalidChar {
            id: id.to_string(),
            ch,
        });
    }
    if is_reserved(dialect, id) {
        return Err(IdError::Reserved {
            id: id.to_string(),
            dialect,
        });
    }
    Ok(())
}

fn word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_type!(
    /// A flowchart node or subgraph id. Letters, digits and `_`, with single `-` or `.`
    /// separators between them (`node-1`, `api.v2`).
    NodeId
);

id_type!(
    /// A sequence participant id: letters, digits and `_`.
    ParticipantId
);

id_type!(
    /// A gantt task id: a letter or `_` followed by letters, digits, `_` or `-`.
    TaskId
);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        check(&id, Dialect::Flowchart, word_char, |c| {
            word_char(c) || matches!(c, '-' | '.')
        })?;
        // Doubled or trailing separators would lex as part of an edge operator.
        let bytes = id.as_bytes();
        let separator = |b: u8| matches!(b, b'-' | b'.');
        let bad = bytes.windows(2).find(|w| separator(w[0]) && separator(w[1]));
        if let Some(w) = bad {
            return Err(IdError::InvalidChar {
                ch: char::from(w[1]),
                id,
            });
        }
        if let Some(&last) = bytes.last().filter(|b| separator(**b)) {
            return Err(IdError::InvalidChar {
                ch: char::from(last),
                id,
            });
        }
        Ok(Self(id))
    }
}

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        check(&id, Dialect::Sequence, word_char, word_char)?;
        Ok(Self(id))
    }
}

impl TaskId {
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        check(
            &id,
            Dialect::Gantt,
            |c| c.is_alphabetic() || c == '_',
            |c| word_char(c) || c == '-',
        )?;
        Ok(Self(id))
    }
}
