//! Error types for Flowboard operations.
//!
//! Graph mutations never fail: malformed input is ignored and structurally
//! invalid gestures are no-ops. [`FlowboardError`] covers what lies outside
//! the graph: reading content, talking to the diagram and lock services, and
//! loading configuration.

use std::io;

use thiserror::Error;

/// The main error type for Flowboard operations.
#[derive(Debug, Error)]
pub enum FlowboardError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A diagram or lock service request failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The diagram is locked by a different user.
    #[error("Diagram {diagram_id} is already locked by {holder}")]
    LockConflict { diagram_id: u64, holder: String },

    #[error("Diagram {0} not found")]
    NotFound(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A gesture or request was refused; the message is the one shown to the user.
    #[error("{0}")]
    Rejected(String),
}

impl FlowboardError {
    /// Create a new `Transport` error from any displayable cause.
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport(cause.to_string())
    }
}
