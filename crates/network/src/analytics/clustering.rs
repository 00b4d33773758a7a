//! Local clustering coefficient

use crate::graph::CoauthorNetwork;

/// Closed triangles through each node over possible triangles.
/// Nodes with fewer than two neighbors score 0.
pub fn clustering_coefficients(network: &CoauthorNetwork) -> Vec<f64> {
    let n = network.node_count();
    let mut is_neighbor = vec![false; n];
    let mut scores = vec![0.0; n];

    for v in 0..n {
        let neighbors = network.neighbors(v);
        let k = neighbors.len();
        if k < 2 {
            continue;
        }

        for &(u, _) in neighbors {
            is_neighbor[u] = true;
        }

        // Each neighbor-neighbor edge counted once via u < w
        let mut links = 0usize;
        for &(u, _) in neighbors {
            links += network
                .neighbors(u)
                .iter()
                .filter(|&&(w, _)| w > u && is_neighbor[w])
                .count();
        }

        for &(u, _) in neighbors {
            is_neighbor[u] = false;
        }

        scores[v] = 2.0 * links as f64 / (k * (k - 1)) as f64;
    }

    scores
}

/// Mean over all nodes, 0 for an empty network
pub fn average_clustering(coefficients: &[f64]) -> f64 {
    if coefficients.is_empty() {
        return 0.0;
    }
    coefficients.iter().sum::<f64>() / coefficients.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::network_from;

    #[test]
    fn test_triangle_all_one() {
        let network = network_from(&[&["A", "B", "C"]]);
        assert_eq!(clustering_coefficients(&network), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_star_center_zero() {
        let network = network_from(&[&["Hub", "L1"], &["Hub", "L2"], &["Hub", "L3"]]);
        let cc = clustering_coefficients(&network);
        assert_eq!(cc[network.index_of("Hub").unwrap()], 0.0);
        assert_eq!(average_clustering(&cc), 0.0);
    }

    #[test]
    fn test_partial_clustering() {
        // Triangle A-B-C plus pendant D on A
        let network = network_from(&[&["A", "B", "C"], &["A", "D"]]);
        let cc = clustering_coefficients(&network);
        let a = network.index_of("A").unwrap();

        assert!((cc[a] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(cc[network.index_of("D").unwrap()], 0.0);
        let expected = (1.0 / 3.0 + 1.0 + 1.0 + 0.0) / 4.0;
        assert!((average_clustering(&cc) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        assert_eq!(average_clustering(&[]), 0.0);
    }
}
