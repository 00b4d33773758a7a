//! BibNet Ingestion
//!
//! Turns bibliography files into resolved publications:
//! - Decoding with a Latin-1 fallback
//! - Tolerant, line-oriented record parsing
//! - Field extraction
//! - Author name normalization

pub mod authors;
pub mod decode;
pub mod errors;
pub mod fields;
pub mod parser;
pub mod processor;

pub use authors::{normalize_author_name, resolve_authors, split_author_field};
pub use decode::{decode_bytes, DecodedText, SourceEncoding};
pub use errors::IngestionError;
pub use fields::extract_fields;
pub use parser::{ParseState, ParseStats, RecordParser, Records};
pub use processor::{resolve_publication, resolve_publications, BibliographyLoader, ParsedFile};
