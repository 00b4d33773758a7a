//! Connected components by breadth-first reachability

use crate::graph::CoauthorNetwork;
use std::collections::VecDeque;

/// Partition of the nodes into connected components
#[derive(Debug, Clone, Default)]
pub struct Components {
    /// Component id of each node, indexing into `groups`
    pub membership: Vec<usize>,
    /// Node positions per component, largest component first
    pub groups: Vec<Vec<usize>>,
}

impl Components {
    pub fn count(&self) -> usize {
        self.groups.len()
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    pub fn largest_size(&self) -> usize {
        self.groups.first().map(Vec::len).unwrap_or(0)
    }
}

/// Find connected components. Components are discovered in node order and
/// then sorted by size; equal sizes keep discovery order.
pub fn connected_components(network: &CoauthorNetwork) -> Components {
    let n = network.node_count();
    let mut visited = vec![false; n];
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }

        let mut group = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(node) = queue.pop_front() {
            group.push(node);
            for &(neighbor, _) in network.neighbors(node) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        groups.push(group);
    }

    groups.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut membership = vec![0; n];
    for (id, group) in groups.iter().enumerate() {
        for &node in group {
            membership[node] = id;
        }
    }

    Components { membership, groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::network_from;

    #[test]
    fn test_disconnected() {
        let network = network_from(&[&["A", "B"], &["C", "D", "E"], &["F"]]);
        let components = connected_components(&network);

        assert_eq!(components.count(), 3);
        assert_eq!(components.sizes(), vec![3, 2, 1]);
        assert_eq!(components.largest_size(), 3);

        let c = network.index_of("C").unwrap();
        let e = network.index_of("E").unwrap();
        assert_eq!(components.membership[c], components.membership[e]);
        assert_eq!(components.membership[c], 0);
    }

    #[test]
    fn test_single_component() {
        let network = network_from(&[&["A", "B"], &["B", "C"], &["C", "D"]]);
        let components = connected_components(&network);
        assert_eq!(components.sizes(), vec![4]);
    }

    #[test]
    fn test_largest_component_members() {
        let network = network_from(&[&["X", "Y"], &["A", "B", "C"]]);
        let keys: Vec<String> = network
            .largest_component()
            .into_iter()
            .map(|k| k.into_inner())
            .collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
    }
}
