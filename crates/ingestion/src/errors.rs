//! Ingestion error types
//!
//! Only file-level failures are errors. Malformed entries and unusable
//! author fields are dropped by the parser and resolver instead.

use bibnet_common::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error on {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse task failed for {path}: {message}")]
    TaskFailed { path: String, message: String },
}

impl IngestionError {
    /// Classify an I/O failure for a given path
    pub fn from_io(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestionError::FileNotFound(path.to_string())
        } else {
            IngestionError::IoError {
                path: path.to_string(),
                source,
            }
        }
    }
}

impl From<IngestionError> for AppError {
    fn from(e: IngestionError) -> Self {
        match e {
            IngestionError::FileNotFound(path) => AppError::InputNotFound { path },
            IngestionError::IoError { path, source } => AppError::Io { path, source },
            IngestionError::TaskFailed { path, message } => AppError::Internal {
                message: format!("{}: {}", path, message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = IngestionError::from_io(
            "missing.bib",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, IngestionError::FileNotFound(ref p) if p == "missing.bib"));

        let app: AppError = err.into();
        assert_eq!(app.exit_code(), 2);
    }
}
