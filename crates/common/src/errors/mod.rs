//! Error types for BibNet
//!
//! Provides the error taxonomy for everything outside the analysis core:
//! - Distinct error types for file, configuration, and export failures
//! - Process exit code mapping
//! - Error codes for machine-readable reporting
//!
//! Data-quality problems in the input (malformed entries, missing fields)
//! are never errors; the parser and builder degrade instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Input errors (1xxx)
    InputNotFound,
    InvalidArgument,

    // I/O errors (2xxx)
    IoError,

    // Output errors (3xxx)
    ExportError,
    SerializationError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Input (1xxx)
            ErrorCode::InputNotFound => 1001,
            ErrorCode::InvalidArgument => 1002,

            // I/O (2xxx)
            ErrorCode::IoError => 2001,

            // Output (3xxx)
            ErrorCode::ExportError => 3001,
            ErrorCode::SerializationError => 3002,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Invalid argument {argument}: {message}")]
    InvalidArgument { argument: String, message: String },

    // I/O errors
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Output errors
    #[error("Export to {path} failed: {message}")]
    Export { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InputNotFound { .. } => ErrorCode::InputNotFound,
            AppError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            AppError::Io { .. } => ErrorCode::IoError,
            AppError::Export { .. } => ErrorCode::ExportError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // Usage errors are reported before any input is processed
            AppError::InputNotFound { .. } |
            AppError::InvalidArgument { .. } |
            AppError::Configuration { .. } => 2,

            AppError::Io { .. } |
            AppError::Export { .. } |
            AppError::Serialization(_) |
            AppError::Internal { .. } |
            AppError::Other(_) => 1,
        }
    }

    /// Check if this error was caused by how the tool was invoked
    pub fn is_usage_error(&self) -> bool {
        self.exit_code() == 2
    }

    /// Attach a path to an I/O error
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string()
        }
    }
}

/// Structured error summary, logged by the command line front end
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub numeric_code: u16,
    pub message: String,
}

impl From<&AppError> for ErrorDetails {
    fn from(err: &AppError) -> Self {
        let code = err.code();
        Self {
            code,
            numeric_code: code.as_code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::InputNotFound { path: "refs.bib".into() };
        assert_eq!(err.code(), ErrorCode::InputNotFound);
        assert_eq!(err.code().as_code(), 1001);
        assert_eq!(err.exit_code(), 2);
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_io_error_is_not_usage_error() {
        let err = AppError::io(
            "refs.bib",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.code(), ErrorCode::IoError);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("refs.bib"));
    }

    #[test]
    fn test_error_details() {
        let err = AppError::Export {
            path: "out.csv".into(),
            message: "disk full".into(),
        };
        let details = ErrorDetails::from(&err);
        assert_eq!(details.code, ErrorCode::ExportError);
        assert_eq!(details.numeric_code, 3001);
        assert!(details.message.contains("disk full"));
    }
}
