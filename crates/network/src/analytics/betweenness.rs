//! Betweenness centrality
//!
//! Brandes' algorithm over the unweighted graph: one breadth-first search
//! per source counts shortest paths, then a backward pass accumulates each
//! node's dependency on that source.
//!
//! ```text
//! δ_s(v) = Σ_{w: v∈P_s(w)} (σ_sv/σ_sw) × (1 + δ_s(w))
//! ```
//!
//! Scores are normalized with `1/((n-1)(n-2))`, which for an undirected
//! graph equals the fraction of shortest paths between other node pairs
//! running through the node. Above the exact threshold only a seeded sample
//! of sources is run and the sum is scaled by `n/k`; those scores are
//! estimates.

use crate::graph::CoauthorNetwork;
use bibnet_common::config::AnalyticsConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use tracing::debug;

/// Betweenness scores with how they were obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Betweenness {
    /// Normalized score per node position
    pub scores: Vec<f64>,
    /// False when scores are sampled estimates
    pub exact: bool,
    /// Number of BFS sources the scores were accumulated from
    pub sources: usize,
}

/// Exact or sampled betweenness depending on network size
pub fn betweenness(network: &CoauthorNetwork, config: &AnalyticsConfig) -> Betweenness {
    let n = network.node_count();
    if n <= config.betweenness_exact_threshold {
        return Betweenness {
            scores: exact_betweenness(network),
            exact: true,
            sources: n,
        };
    }

    let k = config.betweenness_sample_size.clamp(1, n);
    debug!(
        nodes = n,
        threshold = config.betweenness_exact_threshold,
        sources = k,
        seed = config.sample_seed,
        "Network above exact threshold, sampling betweenness sources"
    );

    Betweenness {
        scores: sampled_betweenness(network, k, config.sample_seed),
        exact: k == n,
        sources: k,
    }
}

/// Exact normalized betweenness, all nodes as sources
pub fn exact_betweenness(network: &CoauthorNetwork) -> Vec<f64> {
    let n = network.node_count();
    let sources: Vec<usize> = (0..n).collect();
    let mut scores = accumulate(network, &sources);
    rescale(&mut scores, n, n);
    scores
}

/// Estimated normalized betweenness from `k` seeded random sources
pub fn sampled_betweenness(network: &CoauthorNetwork, k: usize, seed: u64) -> Vec<f64> {
    let n = network.node_count();
    let k = k.min(n);
    if k == 0 {
        return vec![0.0; n];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut sources = rand::seq::index::sample(&mut rng, n, k).into_vec();
    // Summation order fixed by node position
    sources.sort_unstable();

    let mut scores = accumulate(network, &sources);
    rescale(&mut scores, n, k);
    scores
}

fn rescale(scores: &mut [f64], n: usize, k: usize) {
    if n <= 2 {
        scores.iter_mut().for_each(|s| *s = 0.0);
        return;
    }
    let scale = (n as f64 / k as f64) / ((n - 1) as f64 * (n - 2) as f64);
    scores.iter_mut().for_each(|s| *s *= scale);
}

/// Raw dependency sums over the given sources
fn accumulate(network: &CoauthorNetwork, sources: &[usize]) -> Vec<f64> {
    let n = network.node_count();
    let mut betweenness = vec![0.0_f64; n];

    let mut sigma = vec![0.0_f64; n];
    let mut distance = vec![-1_i64; n];
    let mut delta = vec![0.0_f64; n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::with_capacity(n);

    for &s in sources {
        sigma.iter_mut().for_each(|v| *v = 0.0);
        distance.iter_mut().for_each(|v| *v = -1);
        delta.iter_mut().for_each(|v| *v = 0.0);
        predecessors.iter_mut().for_each(Vec::clear);
        order.clear();

        sigma[s] = 1.0;
        distance[s] = 0;
        queue.push_back(s);

        // Forward pass: shortest path counts
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &(w, _) in network.neighbors(v) {
                if distance[w] < 0 {
                    distance[w] = distance[v] + 1;
                    queue.push_back(w);
                }
                if distance[w] == distance[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Backward pass: farthest nodes first
        for &w in order.iter().rev() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }
    }

    betweenness
}
