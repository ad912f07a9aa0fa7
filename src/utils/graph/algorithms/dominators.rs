//! Dominator tree computation for acyclic graphs.
//!
//! A node `d` **dominates** a node `n` if every path from the root to `n` passes
//! through `d`. The **immediate dominator** of `n` is the unique strict dominator of
//! `n` that every other strict dominator of `n` also dominates. Making each node's
//! immediate dominator its parent yields the dominator tree.
//!
//! # Algorithm
//!
//! Nodes are ranked by a topological order and processed once in that order. The
//! immediate dominator of a node is the intersection of the already-computed
//! immediate dominators of its predecessors, where `intersect(a, b)` repeatedly
//! moves whichever argument has the larger rank to its own immediate dominator
//! until both meet.
//!
//! On an acyclic graph every predecessor of a node precedes it in topological order,
//! so a single pass reaches the fixed point the iterative Cooper-Harvey-Kennedy
//! formulation would converge to. The caller supplies the order; supplying an order
//! that is not topological for the graph produces an unspecified (but finite) tree.

use crate::utils::graph::{algorithms::reachable, NodeId, Predecessors, RootedGraph, Successors};

/// Result of dominator tree computation.
///
/// Stores the parent pointer of every node reachable from the root, the inverted
/// child lists and the rank order the tree was built in. Nodes that could not be
/// reached from the root are not part of the tree and are listed by
/// [`unreachable`](Self::unreachable).
///
/// A tree built over a graph with several natural entries has a synthetic super-root.
/// The super-root is a reserved `NodeId` outside the input graph; it is hidden from
/// [`nodes`](Self::nodes), [`edges`](Self::edges) and [`len`](Self::len).
///
/// # Examples
///
/// ```rust
/// use domibubble::{build_dominator_tree, break_cycles, make_graph};
///
/// // 0 -> 1 -> 3, 0 -> 2 -> 3
/// let graph = make_graph([0, 1, 2, 3], [(0, 1), (0, 2), (1, 3), (2, 3)])?;
/// let acyclic = break_cycles(&graph)?;
/// let tree = build_dominator_tree(&acyclic, None)?;
///
/// let id = |k| graph.get_node_id(&k).unwrap();
/// assert_eq!(tree.immediate_dominator(id(3)), Some(id(0)));
/// assert!(tree.dominates(id(0), id(3)));
/// assert!(!tree.dominates(id(1), id(3)));
/// # Ok::<(), domibubble::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominatorTree {
    /// The root of the tree (possibly the super-root)
    root: NodeId,
    /// Synthetic super-root, if one was injected
    super_root: Option<NodeId>,
    /// Immediate dominator per node; the root maps to itself, non-tree nodes to `None`
    idom: Vec<Option<NodeId>>,
    /// Direct children per node, in rank order
    children: Vec<Vec<NodeId>>,
    /// Tree nodes in rank order, root first
    order: Vec<NodeId>,
    /// Nodes without a path from the root, ascending
    unreachable: Vec<NodeId>,
    /// Natural entries joined under the super-root, ascending
    entries: Vec<NodeId>,
}

impl DominatorTree {
    /// Returns the root of the dominator tree.
    ///
    /// This is the synthetic super-root when one was injected.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the synthetic super-root, if the tree has one.
    #[inline]
    pub fn super_root(&self) -> Option<NodeId> {
        self.super_root
    }

    /// Returns `true` if `node` is the synthetic super-root of this tree.
    #[inline]
    pub fn is_super_root(&self, node: NodeId) -> bool {
        self.super_root == Some(node)
    }

    /// Returns the natural entries of the tree.
    ///
    /// With a super-root these are the in-degree-zero nodes of the graph it was
    /// attached to. Other children of the super-root are merge points reachable from
    /// several entries and are not listed. Without a super-root it is the root alone.
    pub fn entries(&self) -> &[NodeId] {
        match self.super_root {
            Some(_) => &self.entries,
            None => std::slice::from_ref(&self.root),
        }
    }

    /// Returns `true` if `node` is part of the tree (reachable from the root).
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        matches!(self.idom.get(node.index()), Some(Some(_)))
    }

    /// Returns the immediate dominator of a node.
    ///
    /// Returns `None` for the root and for nodes outside the tree. Natural entries
    /// below a synthetic super-root return the super-root.
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        if node == self.root {
            return None;
        }
        self.idom.get(node.index()).copied().flatten()
    }

    /// Checks if node `a` dominates node `b`.
    ///
    /// A node dominates itself. Nodes outside the tree dominate nothing and are
    /// dominated by nothing.
    ///
    /// # Complexity
    ///
    /// O(depth) where depth is the depth of `b` in the dominator tree.
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        self.dominators(b).any(|d| d == a)
    }

    /// Checks if node `a` strictly dominates node `b` (`a` dominates `b` and `a != b`).
    #[inline]
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Returns an iterator over all dominators of a node, from the node itself up to
    /// (and including) the root.
    ///
    /// Yields nothing for nodes outside the tree.
    pub fn dominators(&self, node: NodeId) -> DominatorIterator<'_> {
        DominatorIterator {
            tree: self,
            current: self.contains(node).then_some(node),
        }
    }

    /// Returns the depth of a node in the dominator tree, with the root at depth 0.
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        self.contains(node)
            .then(|| self.dominators(node).count().saturating_sub(1))
    }

    /// Returns the direct children of a node, ordered by topological rank.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.children
            .get(node.index())
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the tree nodes in topological rank order, excluding the super-root.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(move |&node| !self.is_super_root(node))
    }

    /// Returns the tree edges `(immediate dominator, node)` with the super-root stripped.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes()
            .filter_map(|node| {
                let parent = self.immediate_dominator(node)?;
                (!self.is_super_root(parent)).then_some((parent, node))
            })
            .collect()
    }

    /// Returns the tree edges `(immediate dominator, node)` including super-root edges.
    pub fn edges_with_super_root(&self) -> Vec<(NodeId, NodeId)> {
        self.order
            .iter()
            .filter_map(|&node| Some((self.immediate_dominator(node)?, node)))
            .collect()
    }

    /// Returns the nodes that have no path from the root, in ascending order.
    pub fn unreachable(&self) -> &[NodeId] {
        &self.unreachable
    }

    /// Returns the number of tree nodes, excluding the super-root.
    pub fn len(&self) -> usize {
        self.order.len() - usize::from(self.super_root.is_some())
    }

    /// Returns `true` if the tree has no nodes besides a possible super-root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Marks `node` as the synthetic super-root joining `entries`.
    pub(crate) fn set_super_root(&mut self, node: NodeId, entries: Vec<NodeId>) {
        self.super_root = Some(node);
        self.entries = entries;
        self.unreachable.retain(|&n| n != node);
    }
}

/// Iterator over dominators of a node, from the node up to the root.
pub struct DominatorIterator<'a> {
    tree: &'a DominatorTree,
    current: Option<NodeId>,
}

impl Iterator for DominatorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.immediate_dominator(current);
        Some(current)
    }
}

/// Computes the dominator tree of an acyclic graph rooted at `entry`.
///
/// # Arguments
///
/// * `graph` - The graph to analyze
/// * `entry` - The root of the dominator tree
/// * `order` - A topological order of the graph's nodes; it fixes the ranks used by
///   the intersection step and the order of [`DominatorTree::nodes`]
///
/// Self-loops and predecessors outside the tree are ignored. Nodes not reachable
/// from `entry` are reported via [`DominatorTree::unreachable`].
///
/// # Complexity
///
/// O(V + E * D) where D is the depth of the dominator tree.
pub fn compute_dominators<G>(graph: &G, entry: NodeId, order: &[NodeId]) -> DominatorTree
where
    G: Successors + Predecessors,
{
    let node_count = graph.node_count();
    let reach = reachable(graph, entry);

    let mut rank = vec![usize::MAX; node_count];
    for (position, &node) in order.iter().enumerate() {
        rank[node.index()] = position;
    }

    let mut idom: Vec<Option<NodeId>> = vec![None; node_count];
    let mut tree_order = Vec::with_capacity(node_count);

    if entry.index() < node_count {
        idom[entry.index()] = Some(entry);
        tree_order.push(entry);
    }

    for &node in order {
        if node == entry || !reach[node.index()] {
            continue;
        }

        let mut new_idom: Option<NodeId> = None;
        for pred in graph.predecessors(node) {
            if pred == node || !reach[pred.index()] || idom[pred.index()].is_none() {
                continue;
            }
            new_idom = Some(match new_idom {
                None => pred,
                Some(current) => intersect(&idom, &rank, entry, pred, current),
            });
        }

        if new_idom.is_some() {
            idom[node.index()] = new_idom;
            tree_order.push(node);
        }
    }

    let mut children = vec![Vec::new(); node_count];
    for &node in &tree_order {
        if let Some(parent) = idom[node.index()].filter(|&p| p != node) {
            children[parent.index()].push(node);
        }
    }

    let unreachable = graph
        .node_ids()
        .filter(|node| idom[node.index()].is_none())
        .collect();

    DominatorTree {
        root: entry,
        super_root: None,
        idom,
        children,
        order: tree_order,
        unreachable,
        entries: Vec::new(),
    }
}

/// Computes the dominator tree of an acyclic rooted graph, using its entry as root.
pub fn compute_dominators_rooted<G>(graph: &G, order: &[NodeId]) -> DominatorTree
where
    G: RootedGraph,
{
    compute_dominators(graph, graph.entry(), order)
}

/// Walks both fingers up their dominator chains, always advancing the one with the
/// larger rank, until they meet.
fn intersect(
    idom: &[Option<NodeId>],
    rank: &[usize],
    root: NodeId,
    mut a: NodeId,
    mut b: NodeId,
) -> NodeId {
    while a != b {
        if rank[a.index()] > rank[b.index()] {
            a = idom[a.index()].unwrap_or(root);
        } else {
            b = idom[b.index()].unwrap_or(root);
        }
    }
    a
}
