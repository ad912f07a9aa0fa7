//! # domibubble Prelude
//!
//! Convenient re-exports for the most commonly used types and functions. Import this
//! module to get quick access to the graph model, the three analysis stages and the
//! pipeline.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all domibubble operations
pub use crate::Error;

/// The result type used throughout domibubble
pub use crate::Result;

// ================================================================================================
// Entry Points
// ================================================================================================

/// Free functions for the individual stages
pub use crate::{break_cycles, build_dominator_tree, find_bubbles, make_graph};

// ================================================================================================
// Graph Model
// ================================================================================================

/// Node identifiers and graph types
pub use crate::utils::graph::{DirectedGraph, IndexedGraph, NodeId};

/// Graph abstraction traits
pub use crate::utils::graph::{GraphBase, Predecessors, RootedGraph, Successors};

// ================================================================================================
// Analysis
// ================================================================================================

/// Stage types
pub use crate::analysis::{AcyclicGraph, Bubble, CycleBreaker, DominatorTreeBuilder};

/// Dominator tree result
pub use crate::utils::graph::algorithms::DominatorTree;

// ================================================================================================
// Pipeline
// ================================================================================================

/// Driver, configuration and observers
pub use crate::pipeline::{
    DotObserver, Pipeline, PipelineConfig, PipelineObserver, PipelineReport,
};
