//! Record parser
//!
//! Recovers entries from loosely formatted bibliography text. Parsing is a
//! fold over input lines: each line moves a [`ParseState`] forward and may
//! complete one record. An entry is complete on the first line where the
//! running brace balance drops to zero or below and the line ends with a
//! closing brace. Entries that never close are dropped at end of input.

use crate::fields::extract_fields;
use bibnet_common::config::ParserConfig;
use bibnet_common::Record;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Serialize;
use tracing::debug;

/// Entry header: `@kind{`
static ENTRY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(\w+)\s*\{").expect("entry header pattern is valid"));

/// Key used when the header carries none
const UNKNOWN_KEY: &str = "unknown";

/// Counters for one parse run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Lines read, including blank and comment lines
    pub lines: usize,
    /// Records emitted
    pub records: usize,
    /// Entries whose braces never closed
    pub dropped_entries: usize,
}

/// Parser state between two lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParseState {
    /// Between entries
    #[default]
    Idle,
    /// Accumulating the lines of an open entry
    InEntry {
        kind: String,
        key: String,
        balance: i64,
        lines: Vec<String>,
    },
}

impl ParseState {
    /// Feed one line, returning the completed record (if any) and the next state
    pub fn advance(self, line: &str, comment_marker: &str) -> (Option<Record>, ParseState) {
        let line = line.trim();
        if line.is_empty() || (!comment_marker.is_empty() && line.starts_with(comment_marker)) {
            return (None, self);
        }

        match self {
            ParseState::Idle => {
                let Some((kind, key)) = parse_header(line) else {
                    return (None, ParseState::Idle);
                };

                let balance = brace_balance(line);
                if balance <= 0 && line.ends_with('}') {
                    let record = Record {
                        kind,
                        key,
                        fields: extract_fields(line),
                    };
                    return (Some(record), ParseState::Idle);
                }

                let state = ParseState::InEntry {
                    kind,
                    key,
                    balance,
                    lines: vec![line.to_string()],
                };
                (None, state)
            }
            ParseState::InEntry {
                kind,
                key,
                balance,
                mut lines,
            } => {
                let balance = balance + brace_balance(line);
                lines.push(line.to_string());

                if balance <= 0 && line.ends_with('}') {
                    let text = lines.join("\n");
                    let record = Record {
                        kind,
                        key,
                        fields: extract_fields(&text),
                    };
                    return (Some(record), ParseState::Idle);
                }

                let state = ParseState::InEntry {
                    kind,
                    key,
                    balance,
                    lines,
                };
                (None, state)
            }
        }
    }

    /// Whether an entry is open
    pub fn is_inside_entry(&self) -> bool {
        matches!(self, ParseState::InEntry { .. })
    }
}

/// Entry kind (lowercased) and key from a header line
fn parse_header(line: &str) -> Option<(String, String)> {
    let captures = ENTRY_HEADER.captures(line)?;
    let kind = captures.get(1)?.as_str().to_lowercase();
    let rest = &line[captures.get(0)?.end()..];

    let key = rest
        .split(|c| c == ',' || c == '}')
        .next()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(UNKNOWN_KEY)
        .to_string();

    Some((kind, key))
}

/// Opening minus closing braces on a line
fn brace_balance(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Line-oriented record parser
#[derive(Debug, Clone)]
pub struct RecordParser {
    comment_marker: String,
}

impl RecordParser {
    /// Create a parser
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            comment_marker: config.comment_marker.clone(),
        }
    }

    /// Lazily parse a sequence of lines
    pub fn records<I, S>(&self, lines: I) -> Records<I::IntoIter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Records {
            lines: lines.into_iter(),
            state: ParseState::Idle,
            comment_marker: self.comment_marker.clone(),
            stats: ParseStats::default(),
            exhausted: false,
        }
    }

    /// Parse a whole text eagerly
    pub fn parse_str(&self, text: &str) -> (Vec<Record>, ParseStats) {
        let mut records = self.records(text.lines());
        let parsed: Vec<Record> = records.by_ref().collect();
        let stats = records.stats();

        debug!(
            lines = stats.lines,
            records = stats.records,
            dropped = stats.dropped_entries,
            "Text parsed"
        );

        (parsed, stats)
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

/// Iterator over the records of a line sequence
pub struct Records<I> {
    lines: I,
    state: ParseState,
    comment_marker: String,
    stats: ParseStats,
    exhausted: bool,
}

impl<I> Records<I> {
    /// Counters so far; final once the iterator has returned `None`
    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}

impl<I, S> Iterator for Records<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.exhausted {
            return None;
        }

        for line in self.lines.by_ref() {
            self.stats.lines += 1;

            let state = std::mem::take(&mut self.state);
            let (record, next) = state.advance(line.as_ref(), &self.comment_marker);
            self.state = next;

            if let Some(record) = record {
                self.stats.records += 1;
                return Some(record);
            }
        }

        self.exhausted = true;
        if let ParseState::InEntry { key, balance, .. } = std::mem::take(&mut self.state) {
            self.stats.dropped_entries += 1;
            debug!(key = %key, balance, "Dropping entry with unbalanced braces");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (Vec<Record>, ParseStats) {
        RecordParser::default().parse_str(text)
    }

    #[test]
    fn test_single_line_entry() {
        let (records, stats) = parse("@ARTICLE{smith2020, author = \"A and B\"}");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, "article");
        assert_eq!(records[0].key, "smith2020");
        assert_eq!(records[0].fields.author.as_deref(), Some("A and B"));
        assert_eq!(stats.records, 1);
        assert_eq!(stats.dropped_entries, 0);
    }

    #[test]
    fn test_multi_line_entries() {
        let text = r#"
% a comment line with @misc{ignored, author = {X}}
@Article{first,
  author = {Smith, John and Doe, Jane},
  title  = {On {Graphs}},
  year   = {2019}
}

@inproceedings{second,
  author = "Doe, Jane",
  year = 2021,
}
"#;
        let (records, stats) = parse(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "first");
        assert_eq!(records[0].fields.title.as_deref(), Some("On {Graphs}"));
        assert_eq!(records[0].fields.year.as_deref(), Some("2019"));
        assert_eq!(records[1].kind, "inproceedings");
        assert_eq!(records[1].fields.author.as_deref(), Some("Doe, Jane"));
        assert_eq!(records[1].fields.year.as_deref(), Some("2021"));
        assert_eq!(stats.dropped_entries, 0);
    }

    #[test]
    fn test_running_balance_closes_entry() {
        // The closing line also closes a value brace
        let text = "@misc{k,\n  title = {A\n  b}}\n@misc{j, author = {Z}}";
        let (records, _) = parse(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields.title.as_deref(), Some("A\nb"));
        assert_eq!(records[1].key, "j");
    }

    #[test]
    fn test_unclosed_entry_dropped() {
        let text = "@misc{ok, author = {A}}\n@article{broken,\n  author = {B and C},\n";
        let (records, stats) = parse(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "ok");
        assert_eq!(stats.dropped_entries, 1);
    }

    #[test]
    fn test_header_key_fallbacks() {
        assert_eq!(
            parse_header("@misc{ , title={x}}"),
            Some(("misc".to_string(), UNKNOWN_KEY.to_string()))
        );
        assert_eq!(
            parse_header("@Book {knuth84}"),
            Some(("book".to_string(), "knuth84".to_string()))
        );
        assert_eq!(parse_header("email me at a@b.org"), None);
    }

    #[test]
    fn test_fold_state_transitions() {
        let (record, state) = ParseState::Idle.advance("@misc{k,", "%");
        assert!(record.is_none());
        assert!(state.is_inside_entry());

        let (record, state) = state.advance("% comment inside", "%");
        assert!(record.is_none());
        assert!(state.is_inside_entry());

        let (record, state) = state.advance("author = {A}}", "%");
        assert_eq!(record.map(|r| r.key), Some("k".to_string()));
        assert_eq!(state, ParseState::Idle);
    }

    #[test]
    fn test_reparse_is_identical() {
        let text = "@misc{a, author = {X and Y}}\n@misc{b,\nauthor = {Y and Z}\n}";
        let parser = RecordParser::default();
        let first: Vec<Record> = parser.records(text.lines()).collect();
        let second: Vec<Record> = parser.records(text.lines()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_lazy_iteration_stats() {
        let text = "@misc{a, author = {X}}\n\n@misc{b, author = {Y}}";
        let parser = RecordParser::default();
        let mut records = parser.records(text.lines());

        assert_eq!(records.next().map(|r| r.key), Some("a".to_string()));
        assert_eq!(records.stats().records, 1);
        assert_eq!(records.next().map(|r| r.key), Some("b".to_string()));
        assert!(records.next().is_none());
        assert_eq!(records.stats().lines, 3);
    }
}
