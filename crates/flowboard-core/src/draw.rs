//! Visual definitions for diagram edges.
//!
//! Rendering happens outside Flowboard; this module only describes how an
//! edge should look so the engine can stamp that description onto edges it
//! creates or loads. The main type is [`EdgeVisual`], an immutable descriptor
//! built from a [`StrokeDefinition`], optional start/end [`Marker`]s, an
//! optional [`EdgePath`], an optional [`EdgeLabel`] and an animation flag.

mod edge_visual;
mod marker;
mod stroke;

pub use edge_visual::{EdgeLabel, EdgePath, EdgeVisual};
pub use marker::{Marker, MarkerShape};
pub use stroke::{StrokeDefinition, StrokeStyle};
