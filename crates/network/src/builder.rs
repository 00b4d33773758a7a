//! Network builder
//!
//! Consumes resolved publications in input order and owns the publication
//! index and pair counters until [`NetworkBuilder::build`] hands out the
//! finished, read-only network.

use crate::graph::{Accumulator, CoauthorNetwork, PublicationIndex};
use bibnet_common::metrics::{record_network_size, record_publication, record_skipped};
use bibnet_common::{AuthorKey, PublicationRecord, ResolvedPublication};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of offering one publication to the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Added,
    /// No author keys
    NoAuthors,
    /// A publication with the same key was added earlier
    DuplicateKey,
}

/// Incremental co-authorship network builder
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    index: PublicationIndex,
    acc: Accumulator,
    duplicates: usize,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resolved publication, registering display names from its mentions
    pub fn add_resolved(&mut self, resolved: ResolvedPublication) -> Admission {
        let ResolvedPublication {
            publication,
            mentions,
        } = resolved;

        let admission = self.add_publication(publication);
        if admission == Admission::Added {
            for mention in &mentions {
                self.index.observe_display_name(&mention.key, &mention.raw);
            }
        }
        admission
    }

    /// Add a publication; the first publication with a given key wins
    pub fn add_publication(&mut self, publication: PublicationRecord) -> Admission {
        let authors: Vec<AuthorKey> = {
            let mut seen = HashSet::new();
            publication
                .author_keys
                .iter()
                .filter(|key| seen.insert(*key))
                .cloned()
                .collect()
        };

        if authors.is_empty() {
            debug!(key = %publication.key, "Publication has no authors, skipping");
            record_skipped("no_authors");
            return Admission::NoAuthors;
        }

        let key = publication.key.clone();
        let Some(idx) = self.index.insert(publication) else {
            warn!(key = %key, "Duplicate publication key, keeping the first occurrence");
            self.duplicates += 1;
            record_skipped("duplicate_key");
            return Admission::DuplicateKey;
        };

        let refs: Vec<&AuthorKey> = authors.iter().collect();
        self.acc.add(idx, &refs);
        record_publication(authors.len());

        Admission::Added
    }

    /// Add many resolved publications in order
    pub fn extend<I>(&mut self, publications: I)
    where
        I: IntoIterator<Item = ResolvedPublication>,
    {
        for publication in publications {
            self.add_resolved(publication);
        }
    }

    /// Publications accepted so far
    pub fn publication_count(&self) -> usize {
        self.index.len()
    }

    /// Finish building; the publication index becomes shared and read-only
    #[instrument(skip(self), fields(publications = self.index.len()))]
    pub fn build(self) -> CoauthorNetwork {
        let duplicates = self.duplicates;
        let network = self.acc.finish(Arc::new(self.index));

        record_network_size(network.node_count(), network.edge_count());
        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            duplicates,
            "Co-authorship network built"
        );

        network
    }
}

/// Build a network from resolved publications in one call
pub fn build_network<I>(publications: I) -> CoauthorNetwork
where
    I: IntoIterator<Item = ResolvedPublication>,
{
    let mut builder = NetworkBuilder::new();
    builder.extend(publications);
    builder.build()
}
