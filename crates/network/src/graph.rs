//! Co-authorship graph representation
//!
//! A [`CoauthorNetwork`] is an immutable snapshot derived from a shared
//! [`PublicationIndex`]. Nodes keep first-seen order and edges keep
//! canonical (sorted key pair) order, so two snapshots derived from the
//! same publications are identical.

use crate::analytics::components::connected_components;
use bibnet_common::{AuthorKey, PublicationRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Author node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorNode {
    pub key: AuthorKey,
    pub display_name: String,
    pub publication_count: usize,
}

/// Undirected co-authorship edge, `source < target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoauthorEdge {
    pub source: AuthorKey,
    pub target: AuthorKey,
    /// Number of publications both authors appear on
    pub weight: u32,
}

/// Publications accepted by the builder, with the author display directory
#[derive(Debug, Clone, Default)]
pub struct PublicationIndex {
    publications: Vec<PublicationRecord>,
    by_key: HashMap<String, usize>,
    display_names: HashMap<AuthorKey, String>,
}

impl PublicationIndex {
    /// Insert a publication; returns its position, or `None` if the key is taken
    pub(crate) fn insert(&mut self, publication: PublicationRecord) -> Option<usize> {
        if self.by_key.contains_key(&publication.key) {
            return None;
        }
        let idx = self.publications.len();
        self.by_key.insert(publication.key.clone(), idx);
        self.publications.push(publication);
        Some(idx)
    }

    /// Remember a display form unless the author already has one
    pub(crate) fn observe_display_name(&mut self, key: &AuthorKey, raw: &str) {
        if !self.display_names.contains_key(key) {
            self.display_names.insert(key.clone(), raw.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.publications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PublicationRecord> {
        self.by_key.get(key).map(|&idx| &self.publications[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PublicationRecord> {
        self.publications.iter()
    }

    /// Display form of an author, falling back to the key itself
    pub fn display_name<'a>(&'a self, key: &'a AuthorKey) -> &'a str {
        self.display_names
            .get(key)
            .map(String::as_str)
            .unwrap_or_else(|| key.as_str())
    }
}

/// Incremental node and pair counting shared by building and re-derivation
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    nodes: Vec<AuthorKey>,
    node_index: HashMap<AuthorKey, usize>,
    publications: Vec<Vec<usize>>,
    pairs: BTreeMap<(AuthorKey, AuthorKey), u32>,
}

impl Accumulator {
    /// Count one publication; `authors` holds each key at most once
    pub(crate) fn add(&mut self, publication_idx: usize, authors: &[&AuthorKey]) {
        for &author in authors {
            let node = match self.node_index.get(author) {
                Some(&idx) => idx,
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(author.clone());
                    self.node_index.insert(author.clone(), idx);
                    self.publications.push(Vec::new());
                    idx
                }
            };
            self.publications[node].push(publication_idx);
        }

        for (i, &a) in authors.iter().enumerate() {
            for &b in &authors[i + 1..] {
                let pair = if a < b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                };
                *self.pairs.entry(pair).or_insert(0) += 1;
            }
        }
    }

    /// Materialize one edge per counted pair
    pub(crate) fn finish(self, index: Arc<PublicationIndex>) -> CoauthorNetwork {
        let Accumulator {
            nodes,
            node_index,
            publications,
            pairs,
        } = self;

        let nodes: Vec<AuthorNode> = nodes
            .into_iter()
            .zip(&publications)
            .map(|(key, pubs)| AuthorNode {
                display_name: index.display_name(&key).to_string(),
                publication_count: pubs.len(),
                key,
            })
            .collect();

        let mut adjacency: Vec<Vec<(usize, u32)>> = vec![Vec::new(); nodes.len()];
        let mut edges = Vec::with_capacity(pairs.len());

        for ((source, target), weight) in pairs {
            let (s, t) = (node_index[&source], node_index[&target]);
            adjacency[s].push((t, weight));
            adjacency[t].push((s, weight));
            edges.push(CoauthorEdge {
                source,
                target,
                weight,
            });
        }

        for neighbors in &mut adjacency {
            neighbors.sort_unstable_by_key(|&(idx, _)| idx);
        }

        CoauthorNetwork {
            index,
            nodes,
            node_index,
            node_publications: publications,
            edges,
            adjacency,
        }
    }
}

/// Immutable co-authorship network snapshot
#[derive(Debug, Clone)]
pub struct CoauthorNetwork {
    index: Arc<PublicationIndex>,
    nodes: Vec<AuthorNode>,
    node_index: HashMap<AuthorKey, usize>,
    node_publications: Vec<Vec<usize>>,
    edges: Vec<CoauthorEdge>,
    adjacency: Vec<Vec<(usize, u32)>>,
}

impl CoauthorNetwork {
    /// Derive a snapshot from the publication index, keeping only authors
    /// accepted by `keep`. Counts and weights among kept authors are the
    /// same as in the unrestricted network.
    pub(crate) fn derive<F>(index: Arc<PublicationIndex>, keep: F) -> Self
    where
        F: Fn(&AuthorKey) -> bool,
    {
        let mut acc = Accumulator::default();
        for (idx, publication) in index.publications.iter().enumerate() {
            let mut seen = HashSet::new();
            let authors: Vec<&AuthorKey> = publication
                .author_keys
                .iter()
                .filter(|key| keep(*key) && seen.insert(*key))
                .collect();
            if !authors.is_empty() {
                acc.add(idx, &authors);
            }
        }
        acc.finish(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in first-seen order
    pub fn nodes(&self) -> &[AuthorNode] {
        &self.nodes
    }

    /// Edges in canonical order
    pub fn edges(&self) -> &[CoauthorEdge] {
        &self.edges
    }

    pub fn node(&self, key: &str) -> Option<&AuthorNode> {
        self.node_index.get(key).map(|&idx| &self.nodes[idx])
    }

    /// Position of a node in [`Self::nodes`]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.node_index.get(key).copied()
    }

    /// Neighbors of the node at `idx` with edge weights, by node position
    pub fn neighbors(&self, idx: usize) -> &[(usize, u32)] {
        self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Weight of the edge between two authors, if they collaborated
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<u32> {
        let (a, b) = (self.index_of(a)?, self.index_of(b)?);
        let neighbors = self.neighbors(a);
        neighbors
            .binary_search_by_key(&b, |&(idx, _)| idx)
            .ok()
            .map(|pos| neighbors[pos].1)
    }

    /// Publications of one author, in input order
    pub fn publications_of(&self, key: &str) -> Vec<&PublicationRecord> {
        self.index_of(key)
            .map(|idx| {
                self.node_publications[idx]
                    .iter()
                    .map(|&p| &self.index.publications[p])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn publication(&self, key: &str) -> Option<&PublicationRecord> {
        self.index.get(key)
    }

    pub fn display_name<'a>(&'a self, key: &'a AuthorKey) -> &'a str {
        self.index.display_name(key)
    }

    /// Shared publication index this snapshot was derived from
    pub fn publication_index(&self) -> &Arc<PublicationIndex> {
        &self.index
    }

    /// Snapshot without the authors that have fewer than `threshold` publications
    pub fn filter_min_publications(&self, threshold: usize) -> CoauthorNetwork {
        let keep: HashSet<&AuthorKey> = self
            .nodes
            .iter()
            .filter(|node| node.publication_count >= threshold)
            .map(|node| &node.key)
            .collect();

        tracing::debug!(
            threshold,
            kept = keep.len(),
            removed = self.nodes.len() - keep.len(),
            "Filtering authors by publication count"
        );

        Self::derive(Arc::clone(&self.index), |key| keep.contains(key))
    }

    /// Subgraph induced by the given authors; unknown keys are ignored
    pub fn subgraph<'a, I>(&self, keys: I) -> CoauthorNetwork
    where
        I: IntoIterator<Item = &'a AuthorKey>,
    {
        let keep: HashSet<&AuthorKey> = keys
            .into_iter()
            .filter(|key| self.node_index.contains_key(*key))
            .collect();
        Self::derive(Arc::clone(&self.index), |key| keep.contains(key))
    }

    /// Connected component sizes, largest first
    pub fn component_sizes(&self) -> Vec<usize> {
        connected_components(self).sizes()
    }

    /// Members of the largest connected component, in node order
    pub fn largest_component(&self) -> Vec<AuthorKey> {
        let components = connected_components(self);
        let mut members: Vec<usize> = components
            .groups
            .first()
            .cloned()
            .unwrap_or_default();
        members.sort_unstable();
        members
            .into_iter()
            .map(|idx| self.nodes[idx].key.clone())
            .collect()
    }
}
