//! Dominator tree construction over acyclic graphs.
//!
//! [`DominatorTreeBuilder`] resolves the root of the tree and delegates the actual
//! computation to [`compute_dominators`](algorithms::compute_dominators), ranking
//! nodes by the topological order cached in the [`AcyclicGraph`].
//!
//! # Root Resolution
//!
//! - An explicit entry key becomes the root
//! - Otherwise the in-degree-zero nodes (self-loops ignored) are the natural entries:
//!   a single one becomes the root, several are joined under a synthetic super-root
//!
//! The super-root is the `NodeId` one past the last node of the graph. It only exists
//! inside the tree; the graph itself is never modified.

use std::{fmt, hash::Hash, iter};

use log::{debug, warn};

use crate::{
    analysis::AcyclicGraph,
    utils::graph::{
        algorithms::{self, DominatorTree},
        GraphBase, NodeId, Predecessors, RootedGraph, Successors,
    },
    Error, Result,
};

/// Builds a [`DominatorTree`] from an [`AcyclicGraph`].
///
/// # Examples
///
/// ```rust
/// use domibubble::{analysis::{CycleBreaker, DominatorTreeBuilder}, make_graph};
///
/// // Two natural entries: 0 -> 2, 1 -> 2, 2 -> 3
/// let graph = make_graph([0, 1, 2, 3], [(0, 2), (1, 2), (2, 3)])?;
/// let acyclic = CycleBreaker::new().run(&graph)?;
/// let tree = DominatorTreeBuilder::new().build(&acyclic)?;
///
/// let two = acyclic.get_node_id(&2).unwrap();
/// assert_eq!(tree.immediate_dominator(two), tree.super_root());
/// assert_eq!(tree.entries().len(), 2);
/// # Ok::<(), domibubble::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DominatorTreeBuilder<K> {
    entry: Option<K>,
    allow_unreachable: bool,
}

impl<K> Default for DominatorTreeBuilder<K> {
    fn default() -> Self {
        Self {
            entry: None,
            allow_unreachable: false,
        }
    }
}

impl<K> DominatorTreeBuilder<K>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    /// Creates a builder that resolves the root automatically and rejects unreachable nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit root, or `None` to derive it from the natural entries.
    #[must_use]
    pub fn entry(mut self, entry: Option<K>) -> Self {
        self.entry = entry;
        self
    }

    /// Excludes nodes without a path from the root instead of failing.
    ///
    /// Excluded nodes are reported through [`DominatorTree::unreachable`].
    #[must_use]
    pub fn allow_unreachable(mut self, allow: bool) -> Self {
        self.allow_unreachable = allow;
        self
    }

    /// Computes the dominator tree of `graph`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyGraph`] if the graph has no nodes
    /// - [`Error::NodeNotFound`] if the explicit entry is not a node of the graph
    /// - [`Error::UnreachableNodes`] if some node has no path from the root and
    ///   unreachable nodes are not allowed
    pub fn build(&self, graph: &AcyclicGraph<K>) -> Result<DominatorTree> {
        if graph.node_count() == 0 {
            return Err(Error::EmptyGraph);
        }

        let tree = match &self.entry {
            Some(key) => {
                let root = graph
                    .get_node_id(key)
                    .ok_or_else(|| Error::NodeNotFound(format!("{key:?}")))?;
                algorithms::compute_dominators(graph, root, graph.topological_order())
            }
            None => {
                let entries: Vec<NodeId> = graph.entry_nodes().collect();
                match entries.len() {
                    0 => {
                        return Err(Error::InvalidGraph(
                            "acyclic graph has no entry node".to_string(),
                        ))
                    }
                    1 => {
                        algorithms::compute_dominators(graph, entries[0], graph.topological_order())
                    }
                    _ => {
                        let view = SuperRootView::new(graph, entries);
                        let order = view.order();
                        let mut tree = algorithms::compute_dominators_rooted(&view, &order);
                        tree.set_super_root(view.entry(), view.entries);
                        tree
                    }
                }
            }
        };

        let unreachable = tree.unreachable();
        if !unreachable.is_empty() {
            if !self.allow_unreachable {
                return Err(Error::UnreachableNodes {
                    nodes: unreachable.to_vec(),
                });
            }
            warn!(
                "{} node(s) unreachable from {}, excluded from the dominator tree",
                unreachable.len(),
                tree.root()
            );
        }

        debug!(
            "dominator tree rooted at {} with {} node(s){}",
            tree.root(),
            tree.len(),
            if tree.super_root().is_some() {
                " (synthetic super-root)"
            } else {
                ""
            }
        );
        Ok(tree)
    }
}

/// An [`AcyclicGraph`] extended by a synthetic super-root with an edge to every
/// natural entry.
struct SuperRootView<'g, K>
where
    K: Hash + Eq + Clone,
{
    graph: &'g AcyclicGraph<K>,
    /// Natural entries in ascending `NodeId` order
    entries: Vec<NodeId>,
    sentinel: NodeId,
}

impl<'g, K> SuperRootView<'g, K>
where
    K: Hash + Eq + Clone,
{
    fn new(graph: &'g AcyclicGraph<K>, entries: Vec<NodeId>) -> Self {
        Self {
            graph,
            entries,
            sentinel: NodeId::new(graph.node_count()),
        }
    }

    /// The graph's topological order with the super-root in front.
    fn order(&self) -> Vec<NodeId> {
        iter::once(self.sentinel)
            .chain(self.graph.topological_order().iter().copied())
            .collect()
    }

    fn is_entry(&self, node: NodeId) -> bool {
        self.entries.binary_search(&node).is_ok()
    }
}

impl<K> GraphBase for SuperRootView<'_, K>
where
    K: Hash + Eq + Clone,
{
    fn node_count(&self) -> usize {
        self.graph.node_count() + 1
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.node_count()).map(NodeId::new)
    }
}

impl<K> Successors for SuperRootView<'_, K>
where
    K: Hash + Eq + Clone,
{
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        let (virtual_edges, real_edges) = if node == self.sentinel {
            (Some(self.entries.iter().copied()), None)
        } else {
            (None, Some(self.graph.successors(node)))
        };
        virtual_edges
            .into_iter()
            .flatten()
            .chain(real_edges.into_iter().flatten())
    }
}

impl<K> Predecessors for SuperRootView<'_, K>
where
    K: Hash + Eq + Clone,
{
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        let real_edges = (node != self.sentinel).then(|| self.graph.predecessors(node));
        let virtual_edge = self.is_entry(node).then_some(self.sentinel);
        real_edges.into_iter().flatten().chain(virtual_edge)
    }
}

impl<K> RootedGraph for SuperRootView<'_, K>
where
    K: Hash + Eq + Clone,
{
    fn entry(&self) -> NodeId {
        self.sentinel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis::CycleBreaker, make_graph};

    fn acyclic<const N: usize, const E: usize>(
        nodes: [i32; N],
        edges: [(i32, i32); E],
    ) -> AcyclicGraph<i32> {
        let graph = make_graph(nodes, edges).unwrap();
        CycleBreaker::new().run(&graph).unwrap()
    }

    #[test]
    fn test_single_entry_is_root() {
        let graph = acyclic([0, 1, 2, 3, 4], [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]);
        let tree = DominatorTreeBuilder::new().build(&graph).unwrap();

        let id = |k: i32| graph.get_node_id(&k).unwrap();
        assert_eq!(tree.root(), id(0));
        assert_eq!(tree.super_root(), None);
        assert_eq!(tree.entries(), &[id(0)]);
        assert_eq!(
            tree.edges(),
            vec![(id(0), id(1)), (id(0), id(2)), (id(0), id(3)), (id(3), id(4))]
        );
    }

    #[test]
    fn test_multiple_entries_get_super_root() {
        let graph = acyclic([0, 1, 2, 3], [(0, 2), (1, 2), (2, 3)]);
        let tree = DominatorTreeBuilder::new().build(&graph).unwrap();

        let id = |k: i32| graph.get_node_id(&k).unwrap();
        let super_root = tree.super_root().unwrap();
        assert_eq!(super_root, NodeId::new(4));
        assert_eq!(tree.root(), super_root);
        assert_eq!(tree.entries(), &[id(0), id(1)]);
        assert_eq!(tree.immediate_dominator(id(0)), Some(super_root));
        assert_eq!(tree.immediate_dominator(id(2)), Some(super_root));
        assert_eq!(tree.immediate_dominator(id(3)), Some(id(2)));
        assert!(tree.unreachable().is_empty());

        // The sentinel is hidden from the stripped views
        assert_eq!(tree.len(), 4);
        assert!(tree.nodes().all(|n| n != super_root));
        assert_eq!(tree.edges(), vec![(id(2), id(3))]);
        assert_eq!(tree.edges_with_super_root().len(), 4);
    }

    #[test]
    fn test_merge_below_super_root_is_not_an_entry() {
        let graph = acyclic([0, 1, 2, 3, 4, 5], [(0, 3), (1, 3), (2, 4), (3, 4), (4, 5)]);
        let tree = DominatorTreeBuilder::new().build(&graph).unwrap();

        let id = |k: i32| graph.get_node_id(&k).unwrap();
        let super_root = tree.super_root().unwrap();
        assert_eq!(
            tree.children(super_root),
            &[id(0), id(1), id(2), id(3), id(4)]
        );
        assert_eq!(tree.entries(), &[id(0), id(1), id(2)]);
        assert_eq!(tree.immediate_dominator(id(5)), Some(id(4)));
    }

    #[test]
    fn test_self_loop_does_not_hide_entry() {
        let graph = acyclic([0, 1], [(0, 0), (0, 1)]);
        let tree = DominatorTreeBuilder::new().build(&graph).unwrap();

        assert_eq!(tree.super_root(), None);
        assert_eq!(tree.root(), graph.get_node_id(&0).unwrap());
    }

    #[test]
    fn test_explicit_entry_with_unreachable_nodes() {
        let graph = acyclic([0, 1, 2], [(0, 1)]);
        let err = DominatorTreeBuilder::new()
            .entry(Some(0))
            .build(&graph)
            .unwrap_err();

        assert_eq!(
            err,
            Error::UnreachableNodes {
                nodes: vec![graph.get_node_id(&2).unwrap()],
            }
        );
    }

    #[test]
    fn test_allow_unreachable_excludes_nodes() {
        let graph = acyclic([0, 1, 2], [(0, 1)]);
        let tree = DominatorTreeBuilder::new()
            .entry(Some(0))
            .allow_unreachable(true)
            .build(&graph)
            .unwrap();

        let two = graph.get_node_id(&2).unwrap();
        assert_eq!(tree.unreachable(), &[two]);
        assert!(!tree.contains(two));
        assert_eq!(tree.immediate_dominator(two), None);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_missing_entry() {
        let graph = acyclic([0, 1], [(0, 1)]);
        let err = DominatorTreeBuilder::new()
            .entry(Some(7))
            .build(&graph)
            .unwrap_err();
        assert_eq!(err, Error::NodeNotFound("7".to_string()));
    }

    #[test]
    fn test_empty_graph() {
        let graph = acyclic([], []);
        let err = DominatorTreeBuilder::new().build(&graph).unwrap_err();
        assert_eq!(err, Error::EmptyGraph);
    }

    #[test]
    fn test_tree_over_broken_cycle() {
        // 0 -> 1 -> 2 -> 1, 2 -> 3
        let graph = acyclic([0, 1, 2, 3], [(0, 1), (1, 2), (2, 1), (2, 3)]);
        let tree = DominatorTreeBuilder::new().build(&graph).unwrap();

        let id = |k: i32| graph.get_node_id(&k).unwrap();
        assert!(tree.unreachable().is_empty());
        assert_eq!(tree.immediate_dominator(id(2)), Some(id(1)));
        assert_eq!(tree.immediate_dominator(id(3)), Some(id(2)));
    }

    #[test]
    fn test_super_root_view_adjacency() {
        let graph = acyclic([0, 1, 2], [(0, 2), (1, 2)]);
        let view = SuperRootView::new(&graph, vec![NodeId::new(0), NodeId::new(1)]);

        assert_eq!(view.node_count(), 4);
        assert_eq!(
            view.successors(view.entry()).collect::<Vec<_>>(),
            vec![NodeId::new(0), NodeId::new(1)]
        );
        assert_eq!(
            view.predecessors(NodeId::new(0)).collect::<Vec<_>>(),
            vec![view.entry()]
        );
        assert_eq!(view.predecessors(view.entry()).count(), 0);
        assert_eq!(view.order()[0], view.entry());
    }
}
