//! The three analysis stages.
//!
//! Each stage builds on the generic graph infrastructure in [`crate::utils::graph`]
//! and produces a new owned value from borrowed inputs:
//!
//! - [`cycles`] - [`CycleBreaker`] turns an [`IndexedGraph`](crate::utils::graph::IndexedGraph)
//!   into an [`AcyclicGraph`] by reversing DFS back edges
//! - [`dominance`] - [`DominatorTreeBuilder`] resolves a root and computes the
//!   [`DominatorTree`](crate::utils::graph::algorithms::DominatorTree)
//! - [`bubbles`] - [`find_bubbles`] reads merge-point regions off the tree
//!
//! # Usage
//!
//! ```rust
//! use domibubble::{
//!     analysis::{find_bubbles, CycleBreaker, DominatorTreeBuilder},
//!     make_graph,
//! };
//!
//! // Diamond 0..=3 followed by the loop 4 <-> 5
//! let graph = make_graph(0..6, [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (4, 5), (5, 4)])?;
//! let acyclic = CycleBreaker::new().run(&graph)?;
//! assert_eq!(acyclic.reversed_edge_keys(), vec![(5, 4)]);
//!
//! let tree = DominatorTreeBuilder::new().entry(Some(0)).build(&acyclic)?;
//! let bubbles = find_bubbles(&acyclic, &tree);
//! assert_eq!(bubbles.len(), 1);
//! # Ok::<(), domibubble::Error>(())
//! ```

pub mod bubbles;
pub mod cycles;
pub mod dominance;

pub use bubbles::{find_bubbles, Bubble};
pub use cycles::{AcyclicGraph, CycleBreaker};
pub use dominance::DominatorTreeBuilder;
