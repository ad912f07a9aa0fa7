//! Trait definitions for graph abstractions.
//!
//! Algorithms in [`algorithms`](crate::utils::graph::algorithms) are written against
//! these traits rather than a concrete graph type. This lets the same Tarjan,
//! topological sort and dominator code run on [`DirectedGraph`], [`IndexedGraph`],
//! [`AcyclicGraph`] and on the private super-root view used by the dominator tree
//! builder.
//!
//! - [`GraphBase`] - node count and node enumeration
//! - [`Successors`] - outgoing adjacency
//! - [`Predecessors`] - incoming adjacency
//! - [`RootedGraph`] - graphs with a designated entry node
//!
//! Adjacency is returned as iterators. Implementations must yield neighbours in a
//! stable order (edge insertion order for the graphs in this crate); cycle breaking
//! and topological ordering depend on it for determinism.
//!
//! [`DirectedGraph`]: crate::utils::graph::DirectedGraph
//! [`IndexedGraph`]: crate::utils::graph::IndexedGraph
//! [`AcyclicGraph`]: crate::analysis::AcyclicGraph

use crate::utils::graph::NodeId;

/// Base trait providing core graph properties.
pub trait GraphBase {
    /// Returns the number of nodes in the graph.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all node identifiers in ascending `NodeId` order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support forward edge traversal.
///
/// For a directed edge `(u, v)`, node `v` is yielded by `successors(u)`. Parallel
/// edges yield the same successor more than once.
pub trait Successors: GraphBase {
    /// Returns an iterator over the successor nodes of the given node.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support backward edge traversal.
///
/// For a directed edge `(u, v)`, node `u` is yielded by `predecessors(v)`.
pub trait Predecessors: GraphBase {
    /// Returns an iterator over the predecessor nodes of the given node.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs with a designated entry (root) node.
///
/// The dominator computation requires one well-defined starting point. Graphs with
/// several natural entries are wrapped in a view that injects a synthetic super-root
/// and reports it as the entry.
pub trait RootedGraph: Successors + Predecessors {
    /// Returns the entry (root) node of the graph.
    fn entry(&self) -> NodeId;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Adjacency-matrix backed graph, independent of the crate's graph types
    struct MatrixGraph {
        matrix: Vec<Vec<bool>>,
        entry: NodeId,
    }

    impl MatrixGraph {
        fn new(node_count: usize, edges: &[(usize, usize)], entry: usize) -> Self {
            let mut matrix = vec![vec![false; node_count]; node_count];
            for &(from, to) in edges {
                matrix[from][to] = true;
            }
            MatrixGraph {
                matrix,
                entry: NodeId::new(entry),
            }
        }
    }

    impl GraphBase for MatrixGraph {
        fn node_count(&self) -> usize {
            self.matrix.len()
        }

        fn node_ids(&self) -> impl Iterator<Item = NodeId> {
            (0..self.matrix.len()).map(NodeId::new)
        }
    }

    impl Successors for MatrixGraph {
        fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.matrix[node.index()]
                .iter()
                .enumerate()
                .filter(|(_, &present)| present)
                .map(|(target, _)| NodeId::new(target))
        }
    }

    impl Predecessors for MatrixGraph {
        fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.matrix
                .iter()
                .enumerate()
                .filter(move |(_, row)| row[node.index()])
                .map(|(source, _)| NodeId::new(source))
        }
    }

    impl RootedGraph for MatrixGraph {
        fn entry(&self) -> NodeId {
            self.entry
        }
    }

    #[test]
    fn test_adjacency_is_symmetric_between_traits() {
        let graph = MatrixGraph::new(4, &[(0, 1), (0, 2), (1, 3), (2, 3)], 0);

        for node in graph.node_ids() {
            for succ in graph.successors(node) {
                assert!(graph.predecessors(succ).any(|p| p == node));
            }
        }

        let preds: Vec<NodeId> = graph.predecessors(NodeId::new(3)).collect();
        assert_eq!(preds, vec![NodeId::new(1), NodeId::new(2)]);
    }

    #[test]
    fn test_rooted_graph_entry() {
        let graph = MatrixGraph::new(3, &[(2, 0), (2, 1)], 2);
        assert_eq!(graph.entry(), NodeId::new(2));
        assert_eq!(graph.successors(graph.entry()).count(), 2);
    }
}
