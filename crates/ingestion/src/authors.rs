//! Author name normalization
//!
//! Maps free-text author names to canonical identity keys. Resolution is
//! string based only: "Smith, John", "John Smith" and "Dr. John Smith" all
//! become `John Smith`, while "J. Smith" stays a different author.

use bibnet_common::models::AuthorMention;
use bibnet_common::AuthorKey;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::trace;

/// Separator between names in an author list, case-insensitive
static AUTHOR_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\sand\s").expect("author separator pattern is valid"));

/// Honorifics and academic suffixes, compared with dots removed
const HONORIFICS: [&str; 6] = ["dr", "prof", "mr", "mrs", "ms", "phd"];

/// Split an author field into raw names, brace and quote residue removed
pub fn split_author_field(field: &str) -> Vec<String> {
    AUTHOR_SEPARATOR
        .split(field)
        .map(strip_residue)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Normalize one raw author name into its identity key.
///
/// Returns `None` when nothing is left after normalization.
pub fn normalize_author_name(raw: &str) -> Option<AuthorKey> {
    let lowered = collapse_whitespace(&strip_residue(raw).to_lowercase());
    let without_titles = strip_honorifics(&lowered);

    // Commas survive this step so "Last, First" can be reordered below
    let cleaned: String = without_titles
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == ',')
        .collect();

    let ordered = match cleaned.split_once(',') {
        Some((last, rest)) => {
            let first = rest.split(',').next().unwrap_or_default();
            format!("{} {}", first.trim(), last.trim())
        }
        None => cleaned,
    };

    let key = collapse_whitespace(&ordered)
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");

    if key.is_empty() {
        None
    } else {
        Some(AuthorKey::new(key))
    }
}

/// Resolve an author field into keyed mentions, in field order.
///
/// Names that normalize to nothing are dropped. Repeated names are kept;
/// set semantics belong to the network builder.
pub fn resolve_authors(field: &str, publication_key: &str) -> Vec<AuthorMention> {
    split_author_field(field)
        .into_iter()
        .filter_map(|raw| match normalize_author_name(&raw) {
            Some(key) => Some(AuthorMention { key, raw }),
            None => {
                trace!(publication = %publication_key, name = %raw, "Author name normalized to nothing");
                None
            }
        })
        .collect()
}

fn strip_residue(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '{' | '}' | '"'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Drop whitespace-separated words that are exactly an honorific.
///
/// A trailing comma on a dropped word is kept so "Last, First" splitting
/// still sees it.
fn strip_honorifics(text: &str) -> String {
    text.split_whitespace()
        .filter_map(|word| {
            let bare = word.trim_end_matches(',');
            let dotless: String = bare.chars().filter(|&c| c != '.').collect();
            if !HONORIFICS.contains(&dotless.as_str()) {
                Some(word)
            } else if bare.len() < word.len() {
                Some(",")
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
