//! Graph traversal and reachability.
//!
//! [`dfs`] walks every node reachable from a start node using an explicit stack, so
//! deep graphs cannot exhaust the call stack. [`reachable`] builds on it and returns
//! a per-node membership table, which is what the dominator tree builder uses to
//! separate reachable from unreachable nodes.

use crate::utils::graph::{NodeId, Successors};

/// Depth-first search iterator over graph nodes.
///
/// Each reachable node is yielded exactly once. Successors are explored in adjacency
/// order; a node is marked as seen when it is pushed, so parallel edges and
/// self-loops never schedule a node twice.
pub struct DfsIterator<'g, G: Successors> {
    graph: &'g G,
    stack: Vec<NodeId>,
    visited: Vec<bool>,
}

impl<'g, G: Successors> DfsIterator<'g, G> {
    fn new(graph: &'g G, start: NodeId) -> Self {
        let node_count = graph.node_count();
        let mut visited = vec![false; node_count];
        let mut stack = Vec::new();

        if let Some(seen) = visited.get_mut(start.index()) {
            *seen = true;
            stack.push(start);
        }

        DfsIterator {
            graph,
            stack,
            visited,
        }
    }

    /// Consumes the remaining traversal and returns the visited table.
    fn into_visited(mut self) -> Vec<bool> {
        while self.next().is_some() {}
        self.visited
    }
}

impl<G: Successors> Iterator for DfsIterator<'_, G> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Reverse push keeps the first successor on top of the stack
        let successors: Vec<NodeId> = self.graph.successors(node).collect();
        for &succ in successors.iter().rev() {
            if !self.visited[succ.index()] {
                self.visited[succ.index()] = true;
                self.stack.push(succ);
            }
        }

        Some(node)
    }
}

/// Returns a depth-first search iterator starting from the given node.
///
/// A start node outside the graph yields nothing.
///
/// # Examples
///
/// ```rust
/// use domibubble::utils::graph::{algorithms::dfs, DirectedGraph};
///
/// let mut graph: DirectedGraph<&str> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let c = graph.add_node("C");
/// graph.add_edge(a, b)?;
/// graph.add_edge(b, c)?;
///
/// let order: Vec<_> = dfs(&graph, a).collect();
/// assert_eq!(order, vec![a, b, c]);
/// # Ok::<(), domibubble::Error>(())
/// ```
pub fn dfs<G: Successors>(graph: &G, start: NodeId) -> DfsIterator<'_, G> {
    DfsIterator::new(graph, start)
}

/// Computes which nodes are reachable from `start`.
///
/// # Returns
///
/// A vector indexed by `NodeId` that is `true` for `start` and every node reachable
/// from it.
pub fn reachable<G: Successors>(graph: &G, start: NodeId) -> Vec<bool> {
    DfsIterator::new(graph, start).into_visited()
}
