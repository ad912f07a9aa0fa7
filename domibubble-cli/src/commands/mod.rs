pub mod acyclic;
pub mod analyze;
pub mod common;
pub mod domtree;
pub mod dot;
