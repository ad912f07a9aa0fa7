use thiserror::Error;

use crate::utils::graph::NodeId;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure is a property of the input graph: the pipeline is a pure, deterministic
/// computation, so there is nothing to retry. Self-loops, duplicate edges and merge nodes
/// without dominator-tree children are normalized instead of being reported here.
///
/// # Error Categories
///
/// ## Construction Errors
/// - [`Error::InvalidGraph`] - Malformed input, such as an edge referencing a missing node
/// - [`Error::NodeNotFound`] - A requested node key is not part of the graph
/// - [`Error::EmptyGraph`] - No nodes available to root a dominator tree
///
/// ## Analysis Errors
/// - [`Error::CycleBreakingFailure`] - Acyclicity not reached within the pass limit
/// - [`Error::UnreachableNodes`] - Nodes without a path from the resolved root
///
/// ## Orchestration Errors
/// - [`Error::Observer`] - A post-processing observer rejected the pipeline results
///
/// # Examples
///
/// ```rust
/// use domibubble::{build_dominator_tree, break_cycles, make_graph, Error};
///
/// let graph = make_graph([0, 1, 2], [(0, 1)])?;
/// let acyclic = break_cycles(&graph)?;
///
/// match build_dominator_tree(&acyclic, Some(&0)) {
///     Err(Error::UnreachableNodes { nodes }) => {
///         assert_eq!(nodes.len(), 1);
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// # Ok::<(), domibubble::Error>(())
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input graph is malformed.
    ///
    /// Raised at construction time, for example when an edge endpoint does not
    /// reference a node of the declared node set.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// A node key requested by the caller does not exist in the graph.
    ///
    /// The associated string is the debug rendering of the missing key.
    #[error("node {0} does not exist in the graph")]
    NodeNotFound(String),

    /// The graph has no nodes, so no dominator tree root can be resolved.
    #[error("graph is empty")]
    EmptyGraph,

    /// Cycle breaking did not reach an acyclic graph within the allowed number of passes.
    ///
    /// Every pass reverses at least one back edge, so this indicates either a pass
    /// limit configured below the number of back edges or a defect in the algorithm.
    ///
    /// # Fields
    ///
    /// * `passes` - Number of passes that were executed
    /// * `remaining_cycles` - Nontrivial strongly connected components left after the last pass
    #[error("cycle breaking failed after {passes} passes ({remaining_cycles} cyclic components remain)")]
    CycleBreakingFailure {
        /// Number of executed passes
        passes: usize,
        /// Number of nontrivial strongly connected components still present
        remaining_cycles: usize,
    },

    /// One or more nodes have no path from the resolved dominator tree root.
    ///
    /// The offending nodes are listed in ascending [`NodeId`] order. Callers that want
    /// to drop them instead can enable
    /// [`DominatorTreeBuilder::allow_unreachable`](crate::analysis::DominatorTreeBuilder::allow_unreachable).
    #[error("{} node(s) unreachable from the root: {}", nodes.len(), format_nodes(nodes))]
    UnreachableNodes {
        /// The unreachable nodes
        nodes: Vec<NodeId>,
    },

    /// A pipeline observer failed while processing the finished results.
    #[error("observer failed: {0}")]
    Observer(String),
}

fn format_nodes(nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
