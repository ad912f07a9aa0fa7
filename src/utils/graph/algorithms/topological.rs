//! Topological sorting for directed acyclic graphs (DAGs).
//!
//! Kahn's algorithm with a FIFO queue seeded in `NodeId` order. Self-loops are not
//! counted as incoming edges: a node that only points at itself is still
//! schedulable. The resulting order is the one the dominator builder ranks nodes by
//! and the bubble extractor compares children with.

use std::collections::VecDeque;

use crate::utils::graph::{GraphBase, NodeId, Predecessors, Successors};

/// Computes a topological ordering of all nodes.
///
/// # Returns
///
/// `Some(Vec<NodeId>)` with every node of the graph if it is acyclic apart from
/// self-loops, `None` if a cycle through two or more nodes exists.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V) for the in-degree counts and queue
///
/// # Algorithm
///
/// 1. Count incoming edges per node, skipping self-loops
/// 2. Enqueue every node with count 0, in ascending `NodeId` order
/// 3. Pop the front node, append it to the result and decrement its successors;
///    successors reaching 0 are enqueued in adjacency order
/// 4. If the result misses nodes, the remainder sits on a cycle
///
/// # Examples
///
/// ```rust
/// use domibubble::utils::graph::{algorithms::topological_sort, DirectedGraph};
///
/// let mut graph: DirectedGraph<&str> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let c = graph.add_node("C");
/// graph.add_edge(b, c)?;
/// graph.add_edge(a, b)?;
/// graph.add_edge(b, b)?;
///
/// assert_eq!(topological_sort(&graph), Some(vec![a, b, c]));
///
/// graph.add_edge(c, a)?;
/// assert!(topological_sort(&graph).is_none());
/// # Ok::<(), domibubble::Error>(())
/// ```
pub fn topological_sort<G>(graph: &G) -> Option<Vec<NodeId>>
where
    G: GraphBase + Successors + Predecessors,
{
    let node_count = graph.node_count();
    if node_count == 0 {
        return Some(Vec::new());
    }

    let mut in_degree: Vec<usize> = vec![0; node_count];
    for node in graph.node_ids() {
        in_degree[node.index()] = graph.predecessors(node).filter(|&p| p != node).count();
    }

    let mut queue: VecDeque<NodeId> = graph
        .node_ids()
        .filter(|node| in_degree[node.index()] == 0)
        .collect();

    let mut result = Vec::with_capacity(node_count);

    while let Some(node) = queue.pop_front() {
        result.push(node);

        for successor in graph.successors(node) {
            if successor == node {
                continue;
            }
            in_degree[successor.index()] -= 1;
            if in_degree[successor.index()] == 0 {
                queue.push_back(successor);
            }
        }
    }

    if result.len() == node_count {
        Some(result)
    } else {
        None
    }
}
