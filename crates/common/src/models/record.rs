//! Parsed bibliography entry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry recovered from bibliography text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Entry type, lowercased (`article`, `inproceedings`, ...)
    pub kind: String,

    /// Citation key as written in the entry header
    pub key: String,

    /// Extracted field values
    pub fields: RecordFields,
}

/// Field values of a record.
///
/// The fields the rest of the system depends on are named; everything else
/// goes into `extra`, keyed by lowercased field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    pub author: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl RecordFields {
    /// Store a value under a (case-insensitive) field name; later values win
    pub fn insert(&mut self, name: &str, value: String) {
        let name = name.to_lowercase();
        match name.as_str() {
            "author" => self.author = Some(value),
            "title" => self.title = Some(value),
            "year" => self.year = Some(value),
            _ => {
                self.extra.insert(name, value);
            }
        }
    }

    /// Look up any field by (case-insensitive) name
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        match name.as_str() {
            "author" => self.author.as_deref(),
            "title" => self.title.as_deref(),
            "year" => self.year.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Number of fields present
    pub fn len(&self) -> usize {
        [&self.author, &self.title, &self.year]
            .iter()
            .filter(|f| f.is_some())
            .count()
            + self.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_extra_fields() {
        let mut fields = RecordFields::default();
        fields.insert("AUTHOR", "A and B".to_string());
        fields.insert("Journal", "Nature".to_string());

        assert_eq!(fields.author.as_deref(), Some("A and B"));
        assert_eq!(fields.get("author"), Some("A and B"));
        assert_eq!(fields.get("journal"), Some("Nature"));
        assert_eq!(fields.get("title"), None);
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_last_value_wins() {
        let mut fields = RecordFields::default();
        fields.insert("year", "1999".to_string());
        fields.insert("year", "2001".to_string());
        assert_eq!(fields.year.as_deref(), Some("2001"));
        assert_eq!(fields.len(), 1);
    }
}
