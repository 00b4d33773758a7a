//! Field extraction
//!
//! Recovers `name = value` pairs from the text of one complete entry.
//! Values may be brace-delimited (nesting allowed), quote-delimited, or
//! unquoted. An unquoted value runs until the next `name =` token or the
//! end of the entry, so an unquoted value that itself contains `word =`
//! is split there. That loss is accepted; nothing is guessed.

use bibnet_common::RecordFields;
use tracing::trace;

/// Extract the fields of an entry from its full text (header line included)
pub fn extract_fields(entry_text: &str) -> RecordFields {
    let mut fields = RecordFields::default();

    let Some(body) = entry_body(entry_text) else {
        return fields;
    };

    let chars: Vec<char> = body.chars().collect();
    let len = chars.len();
    let mut pos = 0;

    while pos < len {
        // Separators between pairs
        while pos < len && (chars[pos].is_whitespace() || chars[pos] == ',') {
            pos += 1;
        }
        if pos >= len {
            break;
        }

        let name_start = pos;
        while pos < len && is_name_char(chars[pos]) {
            pos += 1;
        }
        if pos == name_start {
            // Stray character (concatenation operator, leftover quote, ...)
            pos += 1;
            continue;
        }
        let name: String = chars[name_start..pos].iter().collect();

        pos = skip_whitespace(&chars, pos);
        if pos >= len || chars[pos] != '=' {
            // A bare word, not a field assignment
            continue;
        }
        pos = skip_whitespace(&chars, pos + 1);

        let value_end = match chars.get(pos) {
            Some('{') => closing_brace(&chars, pos).map_or(len, |end| end + 1),
            Some('"') => closing_quote(&chars, pos).map_or(len, |end| end + 1),
            _ => next_assignment(&chars, pos).unwrap_or(len),
        };

        let raw: String = chars[pos..value_end].iter().collect();
        let value = clean_value(&raw);
        trace!(field = %name, value = %value, "Extracted field");
        fields.insert(&name, value);

        pos = value_end;
    }

    fields
}

/// Text after the header (`@kind{key,`), without the entry's closing brace
fn entry_body(entry_text: &str) -> Option<&str> {
    let at = entry_text.find('@').unwrap_or(0);
    let open = at + entry_text[at..].find('{')?;
    let comma = open + entry_text[open..].find(',')?;

    let body = entry_text[comma + 1..].trim_end();
    Some(body.strip_suffix('}').unwrap_or(body))
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn skip_whitespace(chars: &[char], mut pos: usize) -> usize {
    while pos < chars.len() && chars[pos].is_whitespace() {
        pos += 1;
    }
    pos
}

/// Index of the brace closing the one at `open`, honoring nesting
fn closing_brace(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in chars.iter().enumerate().skip(open) {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the quote closing the one at `open`; quotes inside braces do not count
fn closing_quote(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in chars.iter().enumerate().skip(open + 1) {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '"' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// First position at or after `from` where a `name =` token starts
fn next_assignment(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len()).find(|&start| is_assignment_at(chars, start))
}

fn is_assignment_at(chars: &[char], start: usize) -> bool {
    let name_start = skip_whitespace(chars, start);
    let mut pos = name_start;
    while pos < chars.len() && is_name_char(chars[pos]) {
        pos += 1;
    }
    if pos == name_start {
        return false;
    }
    let pos = skip_whitespace(chars, pos);
    pos < chars.len() && chars[pos] == '='
}

/// Unwrap one level of braces or quotes and drop a trailing separator
fn clean_value(raw: &str) -> String {
    let value = raw.trim();

    let unwrapped = if value.len() >= 2 && value.starts_with('{') && value.ends_with('}') {
        &value[1..value.len() - 1]
    } else if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    };

    let unwrapped = unwrapped.trim_end();
    unwrapped
        .strip_suffix(',')
        .unwrap_or(unwrapped)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braced_quoted_and_bare_values() {
        let text = "@article{smith2020,\n\
                    author = {Smith, John and Doe, Jane},\n\
                    title = \"Graphs\",\n\
                    year = 2020,\n\
                    }";
        let fields = extract_fields(text);
        assert_eq!(fields.author.as_deref(), Some("Smith, John and Doe, Jane"));
        assert_eq!(fields.title.as_deref(), Some("Graphs"));
        assert_eq!(fields.year.as_deref(), Some("2020"));
    }

    #[test]
    fn test_nested_braces_unwrap_one_level() {
        let text = "@article{k,\ntitle = {The {RNA} World},\nyear = {1986}\n}";
        let fields = extract_fields(text);
        assert_eq!(fields.title.as_deref(), Some("The {RNA} World"));
        assert_eq!(fields.year.as_deref(), Some("1986"));
    }

    #[test]
    fn test_single_line_entry() {
        let fields = extract_fields("@misc{key, author = \"A and B\"}");
        assert_eq!(fields.author.as_deref(), Some("A and B"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_field_names_case_folded() {
        let fields = extract_fields("@book{k,\nAUTHOR = {X},\nPublisher = {Y}\n}");
        assert_eq!(fields.author.as_deref(), Some("X"));
        assert_eq!(fields.get("publisher"), Some("Y"));
    }

    #[test]
    fn test_quote_inside_braces() {
        let fields = extract_fields("@misc{k, author = \"G{\\\"o}del, Kurt\"}");
        assert_eq!(fields.author.as_deref(), Some("G{\\\"o}del, Kurt"));
    }

    #[test]
    fn test_unquoted_value_with_assignment_is_split() {
        // Accepted lossy behavior: the bare value stops at the next `word =`
        let fields = extract_fields("@misc{k,\nnote = see x = y,\nyear = 2001\n}");
        assert_eq!(fields.get("note"), Some("see"));
        assert_eq!(fields.get("x"), Some("y"));
        assert_eq!(fields.year.as_deref(), Some("2001"));
    }

    #[test]
    fn test_header_without_fields() {
        assert!(extract_fields("@misc{lonely}").is_empty());
    }

    #[test]
    fn test_unterminated_value_takes_rest() {
        let fields = extract_fields("@misc{k,\ntitle = {Open\nyear = 2000\n}");
        assert_eq!(fields.title.as_deref(), Some("{Open\nyear = 2000"));
    }
}
