//! Output renderers for the dependency graph.

pub mod dot;
