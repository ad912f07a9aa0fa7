//! Core directed graph implementation.
//!
//! This module provides [`DirectedGraph`], the `NodeId`-level storage underneath every
//! graph in this crate. Nodes carry a payload of type `N`; edges are unlabeled
//! `(source, target)` pairs. The graph is a multigraph: parallel edges and self-loops
//! are stored as given, normalization happens one level up in
//! [`IndexedGraph`](crate::utils::graph::IndexedGraph).

use crate::{
    utils::graph::{
        edge::EdgeId,
        node::NodeId,
        traits::{GraphBase, Predecessors, Successors},
    },
    Error, Result,
};

/// Endpoints of a stored edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeData {
    /// Source node of the edge
    source: NodeId,
    /// Target node of the edge
    target: NodeId,
}

/// A directed multigraph with typed node payloads.
///
/// # Memory Layout
///
/// - Nodes are stored in a vector indexed by `NodeId`
/// - Edges are stored in a vector indexed by `EdgeId`
/// - Adjacency lists (outgoing/incoming) store `EdgeId` references in insertion order
///
/// Because adjacency lists are filled in edge insertion order, [`successors`](Self::successors)
/// and [`predecessors`](Self::predecessors) are deterministic: two graphs built from the
/// same edge sequence iterate identically.
///
/// # Examples
///
/// ```rust
/// use domibubble::utils::graph::DirectedGraph;
///
/// let mut graph: DirectedGraph<&str> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let c = graph.add_node("C");
///
/// graph.add_edge(a, b)?;
/// graph.add_edge(a, c)?;
///
/// let successors: Vec<_> = graph.successors(a).collect();
/// assert_eq!(successors, vec![b, c]);
/// assert_eq!(graph.in_degree(b), 1);
/// # Ok::<(), domibubble::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N> {
    /// Node payload storage
    nodes: Vec<N>,
    /// Edge endpoint storage
    edges: Vec<EdgeData>,
    /// Outgoing edges per node (adjacency list for successors)
    outgoing: Vec<Vec<EdgeId>>,
    /// Incoming edges per node (adjacency list for predecessors)
    incoming: Vec<Vec<EdgeId>>,
}

impl<N> Default for DirectedGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> DirectedGraph<N> {
    /// Creates a new empty directed graph.
    #[must_use]
    pub fn new() -> Self {
        DirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates a new directed graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `node_capacity` - Expected number of nodes
    /// * `edge_capacity` - Expected number of edges
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        DirectedGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            outgoing: Vec::with_capacity(node_capacity),
            incoming: Vec::with_capacity(node_capacity),
        }
    }

    /// Adds a new node with the given payload and returns its identifier.
    ///
    /// Nodes are assigned sequential `NodeId`s starting from 0.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Returns the payload of the given node.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all node identifiers in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Returns an iterator over all nodes with their payloads.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, data)| (NodeId::new(i), data))
    }

    /// Adds a directed edge from `source` to `target`.
    ///
    /// The edge is appended to the edge list and to the adjacency lists of both
    /// endpoints. Parallel edges and self-loops are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGraph`] if either endpoint does not exist in the graph.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<EdgeId> {
        if !self.contains_node(source) {
            return Err(Error::InvalidGraph(format!(
                "source node {} does not exist in graph with {} nodes",
                source,
                self.nodes.len()
            )));
        }
        if !self.contains_node(target) {
            return Err(Error::InvalidGraph(format!(
                "target node {} does not exist in graph with {} nodes",
                target,
                self.nodes.len()
            )));
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(EdgeData { source, target });

        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);

        Ok(id)
    }

    /// Returns the source and target nodes of the given edge.
    #[must_use]
    pub fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(edge.index()).map(|e| (e.source, e.target))
    }

    /// Returns the number of edges in the graph, counting parallel edges separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over all edges as `(source, target)` pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edges.iter().map(|e| (e.source, e.target))
    }

    /// Returns `true` if at least one edge `source -> target` exists.
    #[must_use]
    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.contains_node(source) && self.successors(source).any(|s| s == target)
    }

    /// Returns an iterator over the successors of the given node, in edge insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].target)
    }

    /// Returns an iterator over the predecessors of the given node, in edge insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].source)
    }

    /// Returns the number of outgoing edges of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.outgoing[node.index()].len()
    }

    /// Returns the number of incoming edges of a node.
    ///
    /// Parallel edges and self-loops are counted.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a valid node in the graph.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.incoming[node.index()].len()
    }

    /// Returns the nodes without incoming edges, ignoring self-loops.
    ///
    /// A node whose only incoming edges are self-loops is still an entry: a self-loop
    /// never makes a node reachable from somewhere else.
    pub fn entry_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids()
            .filter(move |&node| self.predecessors(node).all(|pred| pred == node))
    }

    /// Returns the nodes without outgoing edges, ignoring self-loops.
    pub fn exit_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids()
            .filter(move |&node| self.successors(node).all(|succ| succ == node))
    }

    /// Checks if the given node ID is valid for this graph.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }
}

impl<N> GraphBase for DirectedGraph<N> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl<N> Successors for DirectedGraph<N> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.outgoing[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].target)
    }
}

impl<N> Predecessors for DirectedGraph<N> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.incoming[node.index()]
            .iter()
            .map(|&edge_id| self.edges[edge_id.index()].source)
    }
}
