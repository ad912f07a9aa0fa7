//! Node identifier for directed graphs.
//!
//! [`NodeId`] is the dense, strongly-typed index every graph algorithm in this crate
//! works with. Keys supplied by callers are mapped onto `NodeId`s in first-insertion
//! order by [`IndexedGraph`](crate::utils::graph::IndexedGraph), which makes `NodeId`
//! order the canonical node order used for every deterministic tie-break.

use std::fmt;

use serde::Serialize;

/// A strongly-typed identifier for nodes within a directed graph.
///
/// `NodeId` wraps a `usize` index. Identifiers are assigned sequentially starting
/// from 0, so they can index per-node vectors directly.
///
/// The dominator tree builder reserves `NodeId::new(node_count)` as the synthetic
/// super-root; that value never names a node of the graph it was built from.
///
/// # Examples
///
/// ```rust
/// use domibubble::utils::graph::NodeId;
///
/// let node = NodeId::new(3);
/// assert_eq!(node.index(), 3);
/// assert_eq!(node.to_string(), "n3");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new `NodeId` from a raw index value.
    ///
    /// Normal usage obtains identifiers from a graph; this constructor exists for
    /// lookups by position and for tests.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw 0-based index of this node.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_roundtrip_index() {
        let node = NodeId::new(42);
        assert_eq!(node.index(), 42);
        assert_eq!(usize::from(node), 42);
        assert_eq!(NodeId::from(42usize), node);
    }

    #[test]
    fn test_node_id_canonical_order() {
        let mut nodes = vec![NodeId::new(3), NodeId::new(0), NodeId::new(2)];
        nodes.sort();
        assert_eq!(nodes, vec![NodeId::new(0), NodeId::new(2), NodeId::new(3)]);

        // Tie-breaks compare (source, target) pairs lexicographically
        assert!((NodeId::new(1), NodeId::new(5)) < (NodeId::new(2), NodeId::new(0)));
    }

    #[test]
    fn test_node_id_formatting() {
        let node = NodeId::new(7);
        assert_eq!(format!("{node:?}"), "NodeId(7)");
        assert_eq!(format!("{node}"), "n7");
    }
}
