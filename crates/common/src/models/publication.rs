//! Publication with resolved authors

use super::{AuthorKey, AuthorMention};
use serde::{Deserialize, Serialize};

/// A record whose author field has been resolved to identity keys.
///
/// Immutable once built; `author_keys` holds each author at most once, in
/// order of first appearance in the author field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub key: String,
    pub title: String,
    pub year: String,
    pub kind: String,
    pub author_keys: Vec<AuthorKey>,
}

impl PublicationRecord {
    /// Check whether an author appears on this publication
    pub fn has_author(&self, author: &AuthorKey) -> bool {
        self.author_keys.contains(author)
    }

    /// Number of unordered author pairs this publication contributes
    pub fn pair_count(&self) -> usize {
        let n = self.author_keys.len();
        n * n.saturating_sub(1) / 2
    }
}

/// A publication together with the author mentions it was resolved from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPublication {
    pub publication: PublicationRecord,
    pub mentions: Vec<AuthorMention>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_count() {
        let mut publication = PublicationRecord {
            key: "p1".into(),
            title: "T".into(),
            year: "2020".into(),
            kind: "article".into(),
            author_keys: vec![AuthorKey::from("A")],
        };
        assert_eq!(publication.pair_count(), 0);

        publication.author_keys.push(AuthorKey::from("B"));
        publication.author_keys.push(AuthorKey::from("C"));
        assert_eq!(publication.pair_count(), 3);
        assert!(publication.has_author(&AuthorKey::from("B")));
    }
}
