//! Author identity key

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Canonical author identity, used as the network node identifier.
///
/// Produced by name normalization; distinct spellings of one person are
/// expected to collapse onto the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorKey(String);

impl AuthorKey {
    /// Wrap an already-normalized name
    pub fn new(normalized: impl Into<String>) -> Self {
        Self(normalized.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AuthorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AuthorKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AuthorKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AuthorKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One occurrence of an author in an author field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorMention {
    /// Identity the name resolved to
    pub key: AuthorKey,
    /// Name as written, with brace and quote residue removed
    pub raw: String,
}
