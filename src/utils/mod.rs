//! Shared infrastructure: the graph model and DOT rendering helpers.

pub mod dot;
pub mod graph;
