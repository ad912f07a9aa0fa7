//! Keyed graph model.
//!
//! This module provides [`IndexedGraph`], the graph callers build their input with.
//! It wraps a [`DirectedGraph`] and handles the mapping between domain keys (block
//! labels, integers, strings) and the dense `NodeId`s the algorithms work with.
//!
//! Construction normalizes the input:
//!
//! - Adding an existing key returns the existing `NodeId`
//! - Adding an existing `(source, target)` pair is a no-op
//! - Self-loops are kept; the analyses ignore them where it matters
//!
//! # Examples
//!
//! ```rust
//! use domibubble::utils::graph::IndexedGraph;
//!
//! let graph = IndexedGraph::from_parts(["a", "b", "c"], [("a", "b"), ("b", "c"), ("a", "b")])?;
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 2); // duplicate collapsed
//!
//! let order = graph.topological_sort().unwrap();
//! assert_eq!(order, vec!["a", "b", "c"]);
//! # Ok::<(), domibubble::Error>(())
//! ```

use std::{collections::HashMap, fmt, hash::Hash};

use crate::{
    utils::graph::{algorithms, DirectedGraph, GraphBase, NodeId, Predecessors, Successors},
    Error, Result,
};

/// A graph wrapper that maps domain keys onto `NodeId`s.
///
/// Keys receive `NodeId`s in first-insertion order, so the canonical node order used
/// for deterministic tie-breaking is the order in which keys were first seen.
///
/// # Type Parameters
///
/// * `K` - The domain key type for nodes
#[derive(Debug, Clone)]
pub struct IndexedGraph<K>
where
    K: Hash + Eq + Clone,
{
    /// The underlying multigraph; node payloads are the keys themselves
    graph: DirectedGraph<K>,
    /// Map from domain key to `NodeId`
    key_to_node: HashMap<K, NodeId>,
}

impl<K> Default for IndexedGraph<K>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> IndexedGraph<K>
where
    K: Hash + Eq + Clone,
{
    /// Creates a new empty indexed graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DirectedGraph::new(),
            key_to_node: HashMap::new(),
        }
    }

    /// Creates a new indexed graph with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            graph: DirectedGraph::with_capacity(node_capacity, edge_capacity),
            key_to_node: HashMap::with_capacity(node_capacity),
        }
    }

    /// Builds a graph from a node set and an edge sequence.
    ///
    /// Nodes are registered first, in iteration order. Edges must only reference
    /// declared nodes; duplicate edges collapse to their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGraph`] if an edge endpoint is not part of `nodes`.
    pub fn from_parts<I, E>(nodes: I, edges: E) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        E: IntoIterator<Item = (K, K)>,
        K: fmt::Debug,
    {
        let mut graph = Self::new();
        for key in nodes {
            graph.add_node(key);
        }

        for (from, to) in edges {
            let (Some(source), Some(target)) = (graph.get_node_id(&from), graph.get_node_id(&to))
            else {
                return Err(Error::InvalidGraph(format!(
                    "edge ({from:?}, {to:?}) references a node outside the node set"
                )));
            };
            graph.connect(source, target)?;
        }

        Ok(graph)
    }

    /// Adds a node with the given key, or returns the existing `NodeId` if already present.
    pub fn add_node(&mut self, key: K) -> NodeId {
        if let Some(&node_id) = self.key_to_node.get(&key) {
            return node_id;
        }

        let node_id = self.graph.add_node(key.clone());
        self.key_to_node.insert(key, node_id);
        node_id
    }

    /// Adds a directed edge between two nodes identified by their keys.
    ///
    /// Missing nodes are created automatically.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if a new edge was added
    /// * `Ok(false)` if the edge already existed
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying graph operation fails.
    pub fn add_edge(&mut self, from: K, to: K) -> Result<bool> {
        let source = self.add_node(from);
        let target = self.add_node(to);
        self.connect(source, target)
    }

    fn connect(&mut self, source: NodeId, target: NodeId) -> Result<bool> {
        if self.graph.has_edge(source, target) {
            return Ok(false);
        }
        self.graph.add_edge(source, target)?;
        Ok(true)
    }

    /// Creates a graph with the same nodes (and `NodeId`s) but a new edge list.
    ///
    /// Edges are taken verbatim, parallel edges included.
    pub(crate) fn with_edges<E>(&self, edges: E) -> Result<Self>
    where
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut graph = DirectedGraph::with_capacity(self.node_count(), self.edge_count());
        for (_, key) in self.graph.nodes() {
            graph.add_node(key.clone());
        }
        for (source, target) in edges {
            graph.add_edge(source, target)?;
        }

        Ok(Self {
            graph,
            key_to_node: self.key_to_node.clone(),
        })
    }

    /// Returns the `NodeId` for a given key, if it exists.
    #[must_use]
    pub fn get_node_id(&self, key: &K) -> Option<NodeId> {
        self.key_to_node.get(key).copied()
    }

    /// Returns the key for a given `NodeId`, if it exists.
    #[must_use]
    pub fn get_key(&self, node_id: NodeId) -> Option<&K> {
        self.graph.node(node_id)
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the graph contains no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Returns a reference to the underlying `DirectedGraph`.
    #[must_use]
    pub fn inner(&self) -> &DirectedGraph<K> {
        &self.graph
    }

    /// Returns an iterator over all keys in `NodeId` order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.graph.nodes().map(|(_, key)| key)
    }

    /// Returns an iterator over all edges as `NodeId` pairs, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.graph.edges()
    }

    /// Returns an iterator over all edges as key pairs, in insertion order.
    pub fn edge_keys(&self) -> impl Iterator<Item = (&K, &K)> + '_ {
        self.graph.edges().filter_map(|(source, target)| {
            Some((self.graph.node(source)?, self.graph.node(target)?))
        })
    }

    /// Returns the number of incoming edges of a node, counting parallel edges and self-loops.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.graph.in_degree(node)
    }

    /// Returns the number of outgoing edges of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.graph.out_degree(node)
    }

    /// Maps a slice of `NodeId`s back to domain keys.
    ///
    /// Nodes that don't have a corresponding key (such as a synthetic super-root)
    /// are skipped.
    #[must_use]
    pub fn map_nodes_to_keys(&self, nodes: &[NodeId]) -> Vec<K> {
        nodes
            .iter()
            .filter_map(|&node_id| self.graph.node(node_id).cloned())
            .collect()
    }
}

// Algorithm convenience methods
impl<K> IndexedGraph<K>
where
    K: Hash + Eq + Clone,
{
    /// Computes strongly connected components as vectors of domain keys.
    ///
    /// Components are returned in reverse topological order.
    #[must_use]
    pub fn strongly_connected_components(&self) -> Vec<Vec<K>> {
        algorithms::strongly_connected_components(self)
            .iter()
            .map(|scc| self.map_nodes_to_keys(scc))
            .collect()
    }

    /// Computes a topological ordering of the keys, ignoring self-loops.
    ///
    /// Returns `None` if the graph contains a cycle of two or more nodes.
    #[must_use]
    pub fn topological_sort(&self) -> Option<Vec<K>> {
        let order = algorithms::topological_sort(self)?;
        Some(self.map_nodes_to_keys(&order))
    }
}

impl<K> GraphBase for IndexedGraph<K>
where
    K: Hash + Eq + Clone,
{
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.graph.node_count()).map(NodeId::new)
    }
}

impl<K> Successors for IndexedGraph<K>
where
    K: Hash + Eq + Clone,
{
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.successors(node)
    }
}

impl<K> Predecessors for IndexedGraph<K>
where
    K: Hash + Eq + Clone,
{
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.predecessors(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_graph_idempotent_add() {
        let mut graph: IndexedGraph<&str> = IndexedGraph::new();

        let a1 = graph.add_node("A");
        let b = graph.add_node("B");
        let a2 = graph.add_node("A");

        assert_eq!(a1, a2);
        assert_eq!(a1, NodeId::new(0));
        assert_eq!(b, NodeId::new(1));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.get_key(b), Some(&"B"));
    }

    #[test]
    fn test_indexed_graph_add_edge_collapses_duplicates() {
        let mut graph: IndexedGraph<&str> = IndexedGraph::new();

        assert!(graph.add_edge("A", "B").unwrap());
        assert!(graph.add_edge("B", "C").unwrap());
        assert!(!graph.add_edge("A", "B").unwrap());

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_from_parts_rejects_dangling_edge() {
        let err = IndexedGraph::from_parts([1, 2], [(1, 2), (2, 3)]).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(msg) if msg.contains("(2, 3)")));
    }

    #[test]
    fn test_from_parts_keeps_self_loops() {
        let graph = IndexedGraph::from_parts([0, 1], [(0, 0), (0, 1)]).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.in_degree(NodeId::new(0)), 1);
        assert_eq!(graph.topological_sort(), Some(vec![0, 1]));
    }

    #[test]
    fn test_node_order_is_first_insertion_order() {
        let graph = IndexedGraph::from_parts(["z", "a", "m"], [("m", "z")]).unwrap();
        let keys: Vec<&str> = graph.keys().copied().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(graph.get_node_id(&"m"), Some(NodeId::new(2)));
        assert_eq!(graph.edge_keys().collect::<Vec<_>>(), vec![(&"m", &"z")]);
    }

    #[test]
    fn test_with_edges_preserves_node_ids() {
        let graph = IndexedGraph::from_parts(["a", "b"], [("a", "b")]).unwrap();
        let flipped = graph
            .with_edges([(NodeId::new(1), NodeId::new(0)), (NodeId::new(1), NodeId::new(0))])
            .unwrap();

        assert_eq!(flipped.get_node_id(&"a"), Some(NodeId::new(0)));
        assert_eq!(flipped.edge_count(), 2);
        assert_eq!(flipped.in_degree(NodeId::new(0)), 2);
    }

    #[test]
    fn test_indexed_graph_scc() {
        let mut graph: IndexedGraph<&str> = IndexedGraph::new();

        // Two SCCs: {A, B} and {C}
        graph.add_edge("A", "B").unwrap();
        graph.add_edge("B", "A").unwrap();
        graph.add_edge("B", "C").unwrap();

        let sccs = graph.strongly_connected_components();
        let mut sizes: Vec<usize> = sccs.iter().map(Vec::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 2]);
        assert!(graph.topological_sort().is_none());
    }

    #[test]
    fn test_map_nodes_to_keys_skips_unknown_ids() {
        let graph = IndexedGraph::from_parts([10, 20], Vec::<(i32, i32)>::new()).unwrap();
        let keys = graph.map_nodes_to_keys(&[NodeId::new(1), NodeId::new(2), NodeId::new(0)]);
        assert_eq!(keys, vec![20, 10]);
    }
}
