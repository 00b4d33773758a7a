//! k-core decomposition
//!
//! Core numbers by the Batagelj-Zaversnik bucket peel, O(V + E). The
//! k-core is the subgraph induced by nodes with core number at least k.

use crate::graph::CoauthorNetwork;
use bibnet_common::AuthorKey;

/// Core number of every node
pub fn core_numbers(network: &CoauthorNetwork) -> Vec<usize> {
    let n = network.node_count();
    let mut degree: Vec<usize> = (0..n).map(|v| network.neighbors(v).len()).collect();
    let max_degree = degree.iter().copied().max().unwrap_or(0);

    // Bucket start offsets by degree
    let mut bin = vec![0usize; max_degree + 1];
    for &d in &degree {
        bin[d] += 1;
    }
    let mut start = 0;
    for slot in bin.iter_mut() {
        let count = *slot;
        *slot = start;
        start += count;
    }

    let mut position = vec![0usize; n];
    let mut vertices = vec![0usize; n];
    for v in 0..n {
        position[v] = bin[degree[v]];
        vertices[position[v]] = v;
        bin[degree[v]] += 1;
    }
    for d in (1..=max_degree).rev() {
        bin[d] = bin[d - 1];
    }
    if let Some(first) = bin.first_mut() {
        *first = 0;
    }

    for i in 0..n {
        let v = vertices[i];
        for &(u, _) in network.neighbors(v) {
            if degree[u] > degree[v] {
                // Move u to the front of its bucket, then shrink its degree
                let du = degree[u];
                let pu = position[u];
                let pw = bin[du];
                let w = vertices[pw];
                if u != w {
                    position[u] = pw;
                    vertices[pu] = w;
                    position[w] = pu;
                    vertices[pw] = u;
                }
                bin[du] += 1;
                degree[u] -= 1;
            }
        }
    }

    degree
}

/// Largest core number, 0 for an empty network
pub fn degeneracy(cores: &[usize]) -> usize {
    cores.iter().copied().max().unwrap_or(0)
}

/// Members of the k-core in node order; `None` means the main core
pub fn k_core_members(network: &CoauthorNetwork, k: Option<usize>) -> Vec<AuthorKey> {
    let cores = core_numbers(network);
    let k = k.unwrap_or_else(|| degeneracy(&cores));
    network
        .nodes()
        .iter()
        .zip(&cores)
        .filter(|&(_, &core)| core >= k)
        .map(|(node, _)| node.key.clone())
        .collect()
}

/// The k-core as a network snapshot
pub fn k_core(network: &CoauthorNetwork, k: Option<usize>) -> CoauthorNetwork {
    let members = k_core_members(network, k);
    network.subgraph(members.iter())
}
