//! Top-N rankings
//!
//! Sorting is stable: equal values keep node order (or canonical edge
//! order for collaborations).

use crate::graph::CoauthorNetwork;
use bibnet_common::AuthorKey;
use serde::Serialize;
use std::cmp::Ordering;

/// One author in a ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAuthor {
    pub key: AuthorKey,
    pub display_name: String,
    pub value: f64,
}

/// One collaboration in a ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCollaboration {
    pub source: AuthorKey,
    pub target: AuthorKey,
    pub weight: u32,
}

/// Highest `limit` authors by a per-node value
pub fn top_authors(network: &CoauthorNetwork, values: &[f64], limit: usize) -> Vec<RankedAuthor> {
    let mut order: Vec<usize> = (0..values.len().min(network.node_count())).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
    });
    order.truncate(limit);

    order
        .into_iter()
        .map(|idx| {
            let node = &network.nodes()[idx];
            RankedAuthor {
                key: node.key.clone(),
                display_name: node.display_name.clone(),
                value: values[idx],
            }
        })
        .collect()
}

/// Heaviest `limit` edges
pub fn top_collaborations(network: &CoauthorNetwork, limit: usize) -> Vec<RankedCollaboration> {
    let mut edges: Vec<_> = network.edges().iter().collect();
    edges.sort_by(|a, b| b.weight.cmp(&a.weight));

    edges
        .into_iter()
        .take(limit)
        .map(|edge| RankedCollaboration {
            source: edge.source.clone(),
            target: edge.target.clone(),
            weight: edge.weight,
        })
        .collect()
}
