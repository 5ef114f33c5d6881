//! Wire records for a REST posts collection.
//!
//! Kept in their own crate so any consumer of the collection can share the
//! exact JSON shapes without pulling in the client or the store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned identifier of a post.
///
/// The collection may hand out integers or strings; the variant mirrors the
/// JSON representation, and equality is strict across variants. Integers
/// beyond `i64::MAX` land in [`PostId::Unsigned`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Int(i64),
    Unsigned(u64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Int(value) => write!(f, "{value}"),
            PostId::Unsigned(value) => write!(f, "{value}"),
            PostId::Text(value) => f.write_str(value),
        }
    }
}

impl PostId {
    /// Interpret user-supplied text: integers become [`PostId::Int`],
    /// everything else is kept as text.
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            PostId::Int(value)
        } else if let Ok(value) = trimmed.parse::<u64>() {
            PostId::Unsigned(value)
        } else {
            PostId::Text(trimmed.to_string())
        }
    }
}

impl FromStr for PostId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_input(s))
    }
}

impl From<i64> for PostId {
    fn from(value: i64) -> Self {
        PostId::Int(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        PostId::Text(value.to_string())
    }
}

/// A post as held by the remote collection.
///
/// Fields the client does not model (for example `userId`) are retained in
/// `extra` and written back on full-record replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Post {
    pub fn new(id: impl Into<PostId>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            extra: Map::new(),
        }
    }
}

/// Payload for creating a post; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
