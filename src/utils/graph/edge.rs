//! Edge identifier for directed graphs.
//!
//! Edges are unlabeled `(source, target)` pairs. [`EdgeId`] is their position in the
//! graph's edge list, which is also the order adjacency lists are populated in.

use std::fmt;

/// A strongly-typed identifier for edges within a directed graph.
///
/// Edge IDs are assigned sequentially starting from 0 by
/// [`DirectedGraph::add_edge`](crate::utils::graph::DirectedGraph::add_edge).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Creates a new `EdgeId` from a raw index value.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        EdgeId(index)
    }

    /// Returns the raw 0-based index of this edge.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}
