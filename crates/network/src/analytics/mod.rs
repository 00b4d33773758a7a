//! Analytics engine
//!
//! Computes every network metric in one pass over a read-only
//! [`CoauthorNetwork`] snapshot and returns them as an immutable
//! [`MetricsBundle`]. Filtering produces a new snapshot, which needs a new
//! bundle.

pub mod betweenness;
pub mod clustering;
pub mod components;
pub mod degree;
pub mod kcore;
pub mod ranking;

pub use betweenness::{betweenness, exact_betweenness, sampled_betweenness, Betweenness};
pub use clustering::{average_clustering, clustering_coefficients};
pub use components::{connected_components, Components};
pub use degree::{degree_centrality, degrees, density, strengths};
pub use kcore::{core_numbers, degeneracy, k_core, k_core_members};
pub use ranking::{top_authors, top_collaborations, RankedAuthor, RankedCollaboration};

use crate::graph::CoauthorNetwork;
use bibnet_common::config::AnalyticsConfig;
use bibnet_common::metrics::{record_analytics, StageTimer};
use bibnet_common::AuthorKey;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument};

/// Network-wide scalar metrics. An empty network reports zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub density: f64,
    pub avg_degree: f64,
    pub max_degree: usize,
    pub avg_strength: f64,
    pub max_strength: u64,
    pub avg_clustering: f64,
    pub num_components: usize,
    pub largest_component_size: usize,
    /// Largest first
    pub component_sizes: Vec<usize>,
    /// Largest core number
    pub degeneracy: usize,
    /// False when betweenness values are sampled estimates
    pub betweenness_exact: bool,
    pub betweenness_sources: usize,
}

/// Per-author metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMetrics {
    pub key: AuthorKey,
    pub display_name: String,
    pub publication_count: usize,
    pub degree: usize,
    pub strength: u64,
    pub degree_centrality: f64,
    pub betweenness: f64,
    pub clustering: f64,
    pub core_number: usize,
    /// Index into the summary's component sizes
    pub component: usize,
}

/// Immutable metrics snapshot for one network
#[derive(Debug, Clone, Serialize)]
pub struct MetricsBundle {
    pub summary: NetworkSummary,
    /// In network node order
    pub nodes: Vec<NodeMetrics>,
    pub top_degree: Vec<RankedAuthor>,
    pub top_strength: Vec<RankedAuthor>,
    pub top_betweenness: Vec<RankedAuthor>,
    pub top_collaborations: Vec<RankedCollaboration>,
    #[serde(skip)]
    node_index: HashMap<AuthorKey, usize>,
}

impl MetricsBundle {
    /// Metrics of one author
    pub fn node(&self, key: &str) -> Option<&NodeMetrics> {
        self.node_index.get(key).map(|&idx| &self.nodes[idx])
    }
}

/// Analytics engine
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Compute the full metrics bundle
    #[instrument(skip(self, network), fields(nodes = network.node_count(), edges = network.edge_count()))]
    pub fn compute(&self, network: &CoauthorNetwork) -> MetricsBundle {
        let timer = StageTimer::start();
        let n = network.node_count();

        let degree = degrees(network);
        let strength = strengths(network);
        let centrality = degree_centrality(&degree);
        let between = betweenness(network, &self.config);
        let clustering = clustering_coefficients(network);
        let components = connected_components(network);
        let cores = core_numbers(network);

        let (avg_degree, avg_strength) = if n == 0 {
            (0.0, 0.0)
        } else {
            (
                degree.iter().sum::<usize>() as f64 / n as f64,
                strength.iter().sum::<u64>() as f64 / n as f64,
            )
        };

        let summary = NetworkSummary {
            num_nodes: n,
            num_edges: network.edge_count(),
            density: density(n, network.edge_count()),
            avg_degree,
            max_degree: degree.iter().copied().max().unwrap_or(0),
            avg_strength,
            max_strength: strength.iter().copied().max().unwrap_or(0),
            avg_clustering: average_clustering(&clustering),
            num_components: components.count(),
            largest_component_size: components.largest_size(),
            component_sizes: components.sizes(),
            degeneracy: degeneracy(&cores),
            betweenness_exact: between.exact,
            betweenness_sources: between.sources,
        };

        let nodes: Vec<NodeMetrics> = network
            .nodes()
            .iter()
            .enumerate()
            .map(|(idx, node)| NodeMetrics {
                key: node.key.clone(),
                display_name: node.display_name.clone(),
                publication_count: node.publication_count,
                degree: degree[idx],
                strength: strength[idx],
                degree_centrality: centrality[idx],
                betweenness: between.scores[idx],
                clustering: clustering[idx],
                core_number: cores[idx],
                component: components.membership[idx],
            })
            .collect();

        let top_n = self.config.top_n;
        let as_f64 = |values: &[usize]| values.iter().map(|&v| v as f64).collect::<Vec<_>>();
        let strength_f64: Vec<f64> = strength.iter().map(|&v| v as f64).collect();

        let node_index = nodes
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.key.clone(), idx))
            .collect();

        let bundle = MetricsBundle {
            summary,
            top_degree: top_authors(network, &as_f64(&degree), top_n),
            top_strength: top_authors(network, &strength_f64, top_n),
            top_betweenness: top_authors(network, &between.scores, top_n),
            top_collaborations: top_collaborations(network, top_n),
            nodes,
            node_index,
        };

        let elapsed = timer.elapsed_secs();
        record_analytics(elapsed, between.exact);
        info!(
            density = bundle.summary.density,
            components = bundle.summary.num_components,
            betweenness_exact = between.exact,
            elapsed_secs = elapsed,
            "Network metrics computed"
        );

        bundle
    }
}
