//! The persisted diagram model.
//!
//! Diagram content is stored as a JSON document `{ "nodes": [...], "edges": [...] }`
//! in the shape the editor front end reads and writes. The types here mirror
//! that shape field by field; fields Flowboard does not interpret are kept in
//! `extra` maps so that loading and saving a diagram never drops data.
//!
//! - [`Node`] / [`NodeData`] - a placed shape and its payload
//! - [`Edge`] / [`EdgeStyle`] / [`EdgeData`] - a connection and its styling
//! - [`ConnectionKind`] - the semantic label that selects an edge's visuals
//! - [`DiagramContent`] - the `{nodes, edges}` document
//! - [`DiagramRecord`] / [`DiagramType`] - a stored diagram and its grammar
//! - [`LockInfo`] - the advisory lock held on a diagram

mod connection;
mod diagram;
mod edge;
mod node;

pub use connection::ConnectionKind;
pub use diagram::{DiagramContent, DiagramRecord, DiagramType, LockInfo, UnknownDiagramType};
pub use edge::{Edge, EdgeData, EdgeStyle, LabelBackground};
pub use node::{HandleSide, Handles, Node, NodeData, UnknownHandleSide};
