//! Flowboard Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Flowboard diagram
//! engine and its front ends. It includes:
//!
//! - **Identifiers**: String-interned node and edge identifiers ([`identifier::Id`])
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Geometry**: Points, sizes and bounds ([`geometry`] module)
//! - **Shapes**: The closed set of node shape kinds ([`shape::ShapeKind`])
//! - **Draw**: Edge stroke, marker and visual descriptors ([`draw`] module)
//! - **Model**: The persisted node/edge/diagram representation ([`model`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod model;
pub mod shape;
