//! BibNet Network
//!
//! Co-authorship graph construction and analytics:
//! - Incremental builder over resolved publications
//! - Immutable network snapshots with filtering and induced subgraphs
//! - Degree, strength, density, betweenness, clustering, components, k-core
//! - Top-N rankings

pub mod analytics;
pub mod builder;
pub mod graph;

#[cfg(test)]
pub(crate) mod testing;

pub use analytics::{AnalyticsEngine, MetricsBundle, NetworkSummary, NodeMetrics};
pub use builder::{build_network, Admission, NetworkBuilder};
pub use graph::{AuthorNode, CoauthorEdge, CoauthorNetwork, PublicationIndex};
