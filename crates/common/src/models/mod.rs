//! Domain models
//!
//! Types shared between the ingestion and network crates

mod author;
mod publication;
mod record;

pub use author::{AuthorKey, AuthorMention};
pub use publication::{PublicationRecord, ResolvedPublication};
pub use record::{Record, RecordFields};
