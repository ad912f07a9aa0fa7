//! Graph algorithms behind the cycle breaker, the dominator tree builder and the
//! bubble extractor.
//!
//! Every algorithm is generic over the traits in
//! [`traits`](crate::utils::graph::GraphBase) and iterative, so input depth is
//! bounded by heap memory rather than the call stack.
//!
//! # Available Algorithms
//!
//! ## Traversal
//!
//! - [`dfs`] - Depth-first search traversal
//! - [`reachable`] - Reachability table from a start node
//!
//! ## Strongly Connected Components
//!
//! - [`tarjan_scc`] - Tarjan's algorithm, reporting discovery indices and back edges
//! - [`strongly_connected_components`] - Components only
//!
//! ## Topological Ordering
//!
//! - [`topological_sort`] - Kahn's algorithm, ignoring self-loops
//!
//! ## Dominator Analysis
//!
//! - [`compute_dominators`] - Single-pass rank intersection over an acyclic graph
//! - [`DominatorTree`] - Result of dominator computation
//!
//! # Algorithm Selection
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | DFS | O(V + E) | Reachability |
//! | Tarjan | O(V + E) | Cycle detection, back edge selection |
//! | Topological Sort | O(V + E) | Node ranking |
//! | Dominators | O(V + E * D) | Dominator tree on a DAG |

mod dominators;
mod scc;
mod topological;
mod traversal;

pub use dominators::{
    compute_dominators, compute_dominators_rooted, DominatorIterator, DominatorTree,
};
pub use scc::{strongly_connected_components, tarjan_scc, SccDecomposition};
pub use topological::topological_sort;
pub use traversal::{dfs, reachable, DfsIterator};
