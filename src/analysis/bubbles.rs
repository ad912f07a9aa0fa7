//! Bubble extraction from a dominator tree.
//!
//! A bubble is opened by a merge point (a node with more than one incoming edge in
//! the acyclic graph) and closed by the direct dominator-tree child of that merge
//! point with the greatest topological rank. Nested and overlapping bubbles are all
//! reported.

use std::hash::Hash;

use serde::Serialize;

use crate::{
    analysis::AcyclicGraph,
    utils::graph::{algorithms::DominatorTree, NodeId},
};

/// A region bounded by a merge point and the farthest node it immediately dominates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Bubble {
    /// The merge point opening the bubble
    pub start: NodeId,
    /// The child of `start` in the dominator tree with the greatest topological rank
    pub end: NodeId,
}

impl Bubble {
    /// Returns the bubble as a `(start, end)` pair.
    #[must_use]
    pub fn as_pair(&self) -> (NodeId, NodeId) {
        (self.start, self.end)
    }
}

/// Finds all bubbles of `graph` using its dominator tree.
///
/// Candidates are visited in topological rank order, so the result is ordered by the
/// rank of `start`. Merge points without tree children are skipped. A synthetic
/// super-root is never a candidate.
///
/// # Examples
///
/// ```rust
/// use domibubble::{build_dominator_tree, break_cycles, find_bubbles, make_graph};
///
/// // Diamond with tail: 0 -> 1 -> 3, 0 -> 2 -> 3, 3 -> 4
/// let graph = make_graph(0..5, [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)])?;
/// let acyclic = break_cycles(&graph)?;
/// let tree = build_dominator_tree(&acyclic, None)?;
///
/// let bubbles = find_bubbles(&acyclic, &tree);
/// assert_eq!(bubbles.len(), 1);
/// assert_eq!(acyclic.get_key(bubbles[0].start), Some(&3));
/// assert_eq!(acyclic.get_key(bubbles[0].end), Some(&4));
/// # Ok::<(), domibubble::Error>(())
/// ```
pub fn find_bubbles<K>(graph: &AcyclicGraph<K>, tree: &DominatorTree) -> Vec<Bubble>
where
    K: Hash + Eq + Clone,
{
    let rank = |node: NodeId| graph.rank(node).unwrap_or(0);

    tree.nodes()
        .filter(|&node| graph.in_degree(node) > 1)
        .filter_map(|start| {
            let end = tree.children(start).iter().copied().max_by_key(|&c| rank(c))?;
            Some(Bubble { start, end })
        })
        .collect()
}
