//! Directed graph infrastructure.
//!
//! # Architecture
//!
//! - **Core Types**: [`NodeId`], [`EdgeId`] and [`DirectedGraph`] provide the
//!   index-based multigraph every algorithm runs on
//! - **Keyed Graphs**: [`IndexedGraph`] maps caller-chosen keys to dense node ids
//! - **Algorithms**: Tarjan SCC, topological sorting, traversal and dominator
//!   computation in [`algorithms`]
//! - **Traits**: Abstraction traits enabling algorithms to work with different graph types
//!
//! # Design Principles
//!
//! ## Strongly-Typed Identifiers
//!
//! Node and edge identifiers use newtype wrappers to prevent accidental mixing of
//! indices. Node ids are assigned in insertion order and that order is the canonical
//! tie-break everywhere a choice between nodes has to be made.
//!
//! ## Immutable After Construction
//!
//! Graphs are built incrementally, then treated as read-only by the analyses. Each
//! analysis step produces a new value instead of mutating its input.
//!
//! # Usage Examples
//!
//! ```rust
//! use domibubble::utils::graph::{algorithms, DirectedGraph};
//!
//! // Diamond: A -> B, A -> C, B -> D, C -> D
//! let mut graph: DirectedGraph<&str> = DirectedGraph::new();
//! let a = graph.add_node("A");
//! let b = graph.add_node("B");
//! let c = graph.add_node("C");
//! let d = graph.add_node("D");
//! graph.add_edge(a, b)?;
//! graph.add_edge(a, c)?;
//! graph.add_edge(b, d)?;
//! graph.add_edge(c, d)?;
//!
//! let order = algorithms::topological_sort(&graph).unwrap();
//! let tree = algorithms::compute_dominators(&graph, a, &order);
//! assert!(tree.dominates(a, d));
//! assert!(!tree.dominates(b, d));
//! # Ok::<(), domibubble::Error>(())
//! ```

mod directed;
mod edge;
mod indexed;
mod node;
mod traits;

pub mod algorithms;

pub use directed::DirectedGraph;
pub use edge::EdgeId;
pub use indexed::IndexedGraph;
pub use node::NodeId;
pub use traits::{GraphBase, Predecessors, RootedGraph, Successors};
