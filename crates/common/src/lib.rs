//! BibNet Common Library
//!
//! Shared code for all BibNet crates including:
//! - Bibliographic record and author identity types
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, ErrorCode, Result};
pub use models::{
    AuthorKey, AuthorMention, PublicationRecord, Record, RecordFields, ResolvedPublication,
};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder used when a publication has no title field
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Placeholder used when a publication has no year field
pub const UNKNOWN_YEAR: &str = "Unknown";
