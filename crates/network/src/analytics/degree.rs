//! Degree, strength, density and degree centrality

use crate::graph::CoauthorNetwork;

/// Incident edge count per node
pub fn degrees(network: &CoauthorNetwork) -> Vec<usize> {
    (0..network.node_count())
        .map(|idx| network.neighbors(idx).len())
        .collect()
}

/// Sum of incident edge weights per node
pub fn strengths(network: &CoauthorNetwork) -> Vec<u64> {
    (0..network.node_count())
        .map(|idx| {
            network
                .neighbors(idx)
                .iter()
                .map(|&(_, weight)| u64::from(weight))
                .sum()
        })
        .collect()
}

/// `2|E| / (|V|(|V|-1))`, zero below two nodes
pub fn density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        return 0.0;
    }
    2.0 * edges as f64 / (nodes as f64 * (nodes - 1) as f64)
}

/// Degree divided by `|V| - 1`; zero for single-node networks
pub fn degree_centrality(degrees: &[usize]) -> Vec<f64> {
    let n = degrees.len();
    if n < 2 {
        return vec![0.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    degrees.iter().map(|&d| d as f64 * scale).collect()
}
