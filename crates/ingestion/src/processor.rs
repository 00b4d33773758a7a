//! Ingestion processor
//!
//! Core logic for turning bibliography files into resolved publications:
//! file loading, decoding, parsing, and author resolution.

use crate::authors::resolve_authors;
use crate::decode::{decode_bytes, SourceEncoding};
use crate::errors::IngestionError;
use crate::parser::{ParseStats, RecordParser};
use bibnet_common::config::ParserConfig;
use bibnet_common::metrics::{record_parse, record_skipped, StageTimer};
use bibnet_common::{
    AuthorKey, PublicationRecord, Record, ResolvedPublication, UNKNOWN_TITLE, UNKNOWN_YEAR,
};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Records recovered from one input file
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub encoding: SourceEncoding,
    pub records: Vec<Record>,
    pub stats: ParseStats,
}

/// Resolve a record's author field into a publication.
///
/// Returns `None` when the record has no author field or none of its
/// names survive normalization. Missing title and year get placeholders.
pub fn resolve_publication(record: &Record) -> Option<ResolvedPublication> {
    let field = record.fields.author.as_deref()?.trim();
    if field.is_empty() {
        return None;
    }

    let mentions = resolve_authors(field, &record.key);
    if mentions.is_empty() {
        return None;
    }

    let mut seen: HashSet<&AuthorKey> = HashSet::with_capacity(mentions.len());
    let author_keys: Vec<AuthorKey> = mentions
        .iter()
        .filter(|m| seen.insert(&m.key))
        .map(|m| m.key.clone())
        .collect();

    let publication = PublicationRecord {
        key: record.key.clone(),
        title: record
            .fields
            .title
            .clone()
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        year: record
            .fields
            .year
            .clone()
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
        kind: record.kind.clone(),
        author_keys,
    };

    Some(ResolvedPublication {
        publication,
        mentions,
    })
}

/// Resolve every record of every file, in file order then record order
pub fn resolve_publications(files: &[ParsedFile]) -> Vec<ResolvedPublication> {
    let mut resolved = Vec::new();
    let mut skipped = 0usize;

    for file in files {
        for record in &file.records {
            match resolve_publication(record) {
                Some(publication) => resolved.push(publication),
                None => {
                    skipped += 1;
                    record_skipped("no_authors");
                    debug!(key = %record.key, kind = %record.kind, "Record has no usable authors, skipping");
                }
            }
        }
    }

    info!(
        publications = resolved.len(),
        skipped,
        "Author fields resolved"
    );

    resolved
}

/// Loads and parses bibliography files
#[derive(Debug, Clone, Default)]
pub struct BibliographyLoader {
    parser: RecordParser,
}

impl BibliographyLoader {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            parser: RecordParser::new(config),
        }
    }

    /// Parse already-decoded text
    pub fn parse_text(&self, path: &Path, text: &str, encoding: SourceEncoding) -> ParsedFile {
        let timer = StageTimer::start();
        let (records, stats) = self.parser.parse_str(text);
        record_parse(timer.elapsed_secs(), stats.records, stats.dropped_entries);

        ParsedFile {
            path: path.to_path_buf(),
            encoding,
            records,
            stats,
        }
    }

    /// Read, decode, and parse one file
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn load_file(&self, path: &Path) -> Result<ParsedFile, IngestionError> {
        let display = path.display().to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| IngestionError::from_io(&display, e))?;
        let decoded = decode_bytes(bytes);

        // Parsing is CPU-bound; keep it off the async workers
        let loader = self.clone();
        let owned_path = path.to_path_buf();
        let parsed = tokio::task::spawn_blocking(move || {
            loader.parse_text(&owned_path, &decoded.text, decoded.encoding)
        })
        .await
        .map_err(|e| IngestionError::TaskFailed {
            path: display.clone(),
            message: e.to_string(),
        })?;

        info!(
            records = parsed.stats.records,
            dropped = parsed.stats.dropped_entries,
            encoding = ?parsed.encoding,
            "Parsed bibliography"
        );

        Ok(parsed)
    }

    /// Load several files concurrently; results keep the order of `paths`
    #[instrument(skip(self, paths), fields(files = paths.len()))]
    pub async fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<ParsedFile>, IngestionError> {
        let files = try_join_all(paths.iter().map(|path| self.load_file(path))).await?;

        let total: usize = files.iter().map(|f| f.stats.records).sum();
        info!(files = files.len(), records = total, "All bibliographies parsed");

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibnet_common::RecordFields;
    use std::io::Write;

    fn record(key: &str, author: Option<&str>) -> Record {
        let mut fields = RecordFields::default();
        if let Some(author) = author {
            fields.insert("author", author.to_string());
        }
        Record {
            kind: "article".to_string(),
            key: key.to_string(),
            fields,
        }
    }

    #[test]
    fn test_resolve_with_placeholders() {
        let resolved = resolve_publication(&record("p1", Some("Smith, John and Jane Doe"))).unwrap();
        let publication = &resolved.publication;
        assert_eq!(publication.title, UNKNOWN_TITLE);
        assert_eq!(publication.year, UNKNOWN_YEAR);
        assert_eq!(publication.kind, "article");
        assert_eq!(
            publication.author_keys,
            vec![AuthorKey::from("John Smith"), AuthorKey::from("Jane Doe")]
        );
    }

    #[test]
    fn test_resolve_deduplicates_keys() {
        let resolved =
            resolve_publication(&record("p1", Some("Smith, John and John Smith and Dr. Jane Doe")))
                .unwrap();
        assert_eq!(resolved.publication.author_keys.len(), 2);
        assert_eq!(resolved.mentions.len(), 3);
        assert_eq!(resolved.mentions[0].raw, "Smith, John");
    }

    #[test]
    fn test_records_without_authors_skipped() {
        assert!(resolve_publication(&record("p1", None)).is_none());
        assert!(resolve_publication(&record("p2", Some("   "))).is_none());
        assert!(resolve_publication(&record("p3", Some("Dr. and Prof."))).is_none());
    }

    #[tokio::test]
    async fn test_load_all_keeps_path_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.bib");
        let second = dir.path().join("b.bib");

        let mut file = std::fs::File::create(&first).unwrap();
        writeln!(file, "@article{{a1,\n  author = {{A and B}}\n}}").unwrap();
        let mut file = std::fs::File::create(&second).unwrap();
        // Latin-1 encoded "Müller"
        file.write_all(b"@misc{b1, author = {M\xfcller and C}}\n").unwrap();

        let loader = BibliographyLoader::default();
        let files = loader
            .load_all(&[second.clone(), first.clone()])
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, second);
        assert_eq!(files[0].encoding, SourceEncoding::Latin1);
        assert_eq!(files[0].records[0].fields.author.as_deref(), Some("M\u{fc}ller and C"));
        assert_eq!(files[1].records[0].key, "a1");

        let publications = resolve_publications(&files);
        assert_eq!(publications.len(), 2);
        assert_eq!(publications[0].publication.key, "b1");
    }

    #[test]
    fn test_missing_file() {
        let loader = BibliographyLoader::default();
        let err = tokio_test::block_on(loader.load_file(Path::new("/definitely/not/here.bib")))
            .unwrap_err();
        assert!(matches!(err, IngestionError::FileNotFound(_)));
    }
}
