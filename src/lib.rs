// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # domibubble
//!
//! Dominator trees and reconvergence bubbles for arbitrary directed graphs.
//!
//! `domibubble` takes a directed graph, typically a control-flow graph, and runs it
//! through three stages:
//!
//! 1. **Cycle breaking** - DFS back edges are reversed, one per cyclic strongly
//!    connected component and pass, until the graph is acyclic
//! 2. **Dominator tree** - immediate dominators are computed in a single pass over
//!    the topological order of the acyclic graph
//! 3. **Bubble extraction** - every merge point that dominates other nodes opens a
//!    bubble closed by its latest dominated child
//!
//! ## Features
//!
//! - **Deterministic** - identical inputs give identical reversals, orders, trees and bubbles
//! - **Iterative** - no recursion anywhere, deep graphs only cost heap memory
//! - **Multi-entry graphs** - several natural entries are joined under a synthetic super-root
//! - **Graphviz export** - DOT text for every stage through a pipeline observer
//!
//! ## Quick Start
//!
//! ```rust
//! use domibubble::{build_dominator_tree, break_cycles, find_bubbles, make_graph};
//!
//! // A loop 6 -> 7 -> 8 -> 9 -> 6 behind a diamond-shaped prefix
//! let graph = make_graph(
//!     0..=10,
//!     [
//!         (0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (2, 5),
//!         (5, 6), (6, 7), (7, 8), (8, 9), (9, 6), (9, 10),
//!     ],
//! )?;
//!
//! let acyclic = break_cycles(&graph)?;
//! assert_eq!(acyclic.reversed_edge_keys(), vec![(9, 6)]);
//!
//! let tree = build_dominator_tree(&acyclic, None)?;
//! let id = |k| acyclic.get_node_id(&k).unwrap();
//! assert_eq!(tree.immediate_dominator(id(5)), Some(id(2)));
//!
//! let bubbles: Vec<_> = find_bubbles(&acyclic, &tree)
//!     .iter()
//!     .map(|b| (acyclic.get_key(b.start).copied(), acyclic.get_key(b.end).copied()))
//!     .collect();
//! assert_eq!(bubbles, vec![(Some(5), Some(6)), (Some(9), Some(10))]);
//! # Ok::<(), domibubble::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`utils::graph`] - `NodeId`-indexed multigraph, keyed graph model and the
//!   generic algorithms (Tarjan SCC, topological sort, DFS, dominators)
//! - [`analysis`] - the cycle breaker, the dominator tree builder and the bubble extractor
//! - [`pipeline`] - configuration, the end-to-end driver and post-processing observers
//! - [`utils::dot`] - Graphviz text serialization
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`], with [`Error`] describing what was
//! wrong with the input. Nothing is retried: every stage is a pure function of its
//! inputs.

mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use domibubble::prelude::*;
///
/// let graph = make_graph(["a", "b"], [("a", "b")])?;
/// let report = Pipeline::new(PipelineConfig::default()).run(&graph)?;
/// assert!(report.bubbles().is_empty());
/// # Ok::<(), domibubble::Error>(())
/// ```
pub mod prelude;

/// Cycle breaking, dominator tree construction and bubble extraction.
///
/// # Key Types
///
/// - [`analysis::CycleBreaker`] / [`analysis::AcyclicGraph`] - back edge reversal
/// - [`analysis::DominatorTreeBuilder`] - root resolution and dominator computation
/// - [`analysis::Bubble`] / [`analysis::find_bubbles`] - merge-point regions
pub mod analysis;

/// End-to-end driver with configuration and post-processing observers.
pub mod pipeline;

/// Graph model, graph algorithms and DOT helpers.
pub mod utils;

/// `domibubble` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `domibubble` Error type
///
/// The main error type for all operations in this crate. See the variants for the
/// individual failure categories.
pub use error::Error;

pub use analysis::{AcyclicGraph, Bubble};
pub use utils::graph::{algorithms::DominatorTree, IndexedGraph, NodeId};

use std::{fmt, hash::Hash};

use analysis::{CycleBreaker, DominatorTreeBuilder};

/// Builds a keyed graph from a node set and an edge sequence.
///
/// Node keys are assigned `NodeId`s in first-insertion order. Duplicate nodes and
/// duplicate edges collapse; self-loops are kept.
///
/// # Errors
///
/// Returns [`Error::InvalidGraph`] if an edge references a node outside `nodes`.
///
/// # Examples
///
/// ```rust
/// use domibubble::{make_graph, Error};
///
/// let graph = make_graph(["a", "b"], [("a", "b"), ("a", "b"), ("b", "b")])?;
/// assert_eq!(graph.edge_count(), 2);
///
/// assert!(matches!(
///     make_graph(["a"], [("a", "z")]),
///     Err(Error::InvalidGraph(_))
/// ));
/// # Ok::<(), domibubble::Error>(())
/// ```
pub fn make_graph<K, I, E>(nodes: I, edges: E) -> Result<IndexedGraph<K>>
where
    K: Hash + Eq + Clone + fmt::Debug,
    I: IntoIterator<Item = K>,
    E: IntoIterator<Item = (K, K)>,
{
    IndexedGraph::from_parts(nodes, edges)
}

/// Produces an acyclic version of `graph` with the default pass limit.
///
/// See [`CycleBreaker`] for the reversal policy.
///
/// # Errors
///
/// Returns [`Error::CycleBreakingFailure`] if the pass limit is exceeded.
pub fn break_cycles<K>(graph: &IndexedGraph<K>) -> Result<AcyclicGraph<K>>
where
    K: Hash + Eq + Clone,
{
    CycleBreaker::new().run(graph)
}

/// Computes the dominator tree of an acyclic graph.
///
/// With `entry` set, that node is the root. Otherwise the natural entries are used,
/// joined under a synthetic super-root when there is more than one.
///
/// # Errors
///
/// - [`Error::EmptyGraph`] if the graph has no nodes
/// - [`Error::NodeNotFound`] if `entry` is not part of the graph
/// - [`Error::UnreachableNodes`] if a node has no path from the root
pub fn build_dominator_tree<K>(graph: &AcyclicGraph<K>, entry: Option<&K>) -> Result<DominatorTree>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    DominatorTreeBuilder::new()
        .entry(entry.cloned())
        .build(graph)
}

/// Finds all bubbles of an acyclic graph given its dominator tree.
pub fn find_bubbles<K>(graph: &AcyclicGraph<K>, tree: &DominatorTree) -> Vec<Bubble>
where
    K: Hash + Eq + Clone,
{
    analysis::find_bubbles(graph, tree)
}
