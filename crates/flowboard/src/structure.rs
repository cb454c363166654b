//! Graph structures for an open diagram.
//!
//! - [`DiagramGraph`]: the canonical node/edge collection and its editing operations
//! - [`Hierarchy`]: a parent→children index derived from the nodes' parent links

mod graph;
mod hierarchy;

pub use graph::{DiagramGraph, Deletion};
pub use hierarchy::Hierarchy;
