//! Input decoding
//!
//! Bibliographies are read as UTF-8. Files that are not valid UTF-8 are
//! re-read as ISO-8859-1, which can decode any byte sequence.

use serde::Serialize;
use tracing::{debug, warn};

/// Character set a file was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

/// Decoded file contents
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: SourceEncoding,
}

/// Decode raw file bytes, falling back to Latin-1 on invalid UTF-8
pub fn decode_bytes(bytes: Vec<u8>) -> DecodedText {
    match String::from_utf8(bytes) {
        Ok(text) => {
            debug!(len = text.len(), "Decoded input as UTF-8");
            DecodedText {
                text: strip_bom(text),
                encoding: SourceEncoding::Utf8,
            }
        }
        Err(e) => {
            warn!(
                valid_up_to = e.utf8_error().valid_up_to(),
                "Input is not valid UTF-8, falling back to Latin-1"
            );
            // Every Latin-1 byte is the code point with the same value
            let text: String = e.into_bytes().into_iter().map(char::from).collect();
            DecodedText {
                text,
                encoding: SourceEncoding::Latin1,
            }
        }
    }
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let decoded = decode_bytes("author = {M\u{fc}ller}".as_bytes().to_vec());
        assert_eq!(decoded.encoding, SourceEncoding::Utf8);
        assert_eq!(decoded.text, "author = {M\u{fc}ller}");
    }

    #[test]
    fn test_latin1_fallback() {
        // "Müller" encoded as ISO-8859-1
        let bytes = vec![b'M', 0xFC, b'l', b'l', b'e', b'r'];
        let decoded = decode_bytes(bytes);
        assert_eq!(decoded.encoding, SourceEncoding::Latin1);
        assert_eq!(decoded.text, "M\u{fc}ller");
    }

    #[test]
    fn test_bom_removed() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"@misc{k,}");
        let decoded = decode_bytes(bytes);
        assert_eq!(decoded.text, "@misc{k,}");
    }
}
