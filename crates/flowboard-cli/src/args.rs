//! Command-line argument definitions for the Flowboard CLI.
//!
//! The global [`Args`] select the diagram store, the acting user, the
//! configuration file and the log level. Each [`Command`] applies one editor
//! gesture or request to one stored diagram.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use flowboard::{
    model::{ConnectionKind, DiagramType, HandleSide},
    shape::ShapeKind,
};

/// Command-line arguments for the Flowboard diagram editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding diagram records and locks
    #[arg(short, long, default_value = "diagrams")]
    pub store: PathBuf,

    /// Identity of the editing user
    #[arg(short, long, default_value = "local")]
    pub user: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// One operation on the store.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create an empty diagram
    Create {
        name: String,
        /// Diagram notation (bpmn, erd, dfd)
        #[arg(short = 't', long = "type", default_value = "bpmn")]
        diagram_type: DiagramType,
    },

    /// Print a diagram's nodes and edges
    Show { diagram: u64 },

    /// Drop a new node onto the canvas
    #[command(allow_negative_numbers = true)]
    Add {
        diagram: u64,
        /// Shape of the new node
        #[arg(long, default_value = "task")]
        shape: ShapeKind,
        #[arg(long)]
        label: Option<String>,
        /// Raw palette drag payload; overrides --shape and --label
        #[arg(long)]
        payload: Option<String>,
        x: f32,
        y: f32,
    },

    /// Drag a node to a new absolute position
    #[command(allow_negative_numbers = true)]
    Move { diagram: u64, node: String, x: f32, y: f32 },

    /// Connect two nodes
    Connect {
        diagram: u64,
        source: String,
        target: String,
        /// Connection kind; defaults to the configured one
        #[arg(short, long)]
        kind: Option<ConnectionKind>,
        #[arg(long)]
        source_handle: Option<HandleSide>,
        #[arg(long)]
        target_handle: Option<HandleSide>,
    },

    /// Change a node's label
    Rename { diagram: u64, node: String, label: String },

    /// Delete nodes (with their contents) and edges
    Delete {
        diagram: u64,
        #[arg(long = "node")]
        nodes: Vec<String>,
        #[arg(long = "edge")]
        edges: Vec<String>,
    },

    /// Remove a single edge
    RemoveEdge { diagram: u64, edge: String },

    /// Lock a diagram for editing
    Lock { diagram: u64 },

    /// Release the lock on a diagram
    Unlock { diagram: u64 },

    /// Export a diagram
    Export {
        diagram: u64,
        #[arg(short, long, default_value = "png")]
        format: String,
    },
}

impl Command {
    /// Returns the diagram the command targets, if any.
    pub fn diagram(&self) -> Option<u64> {
        match self {
            Self::Create { .. } => None,
            Self::Show { diagram }
            | Self::Add { diagram, .. }
            | Self::Move { diagram, .. }
            | Self::Connect { diagram, .. }
            | Self::Rename { diagram, .. }
            | Self::Delete { diagram, .. }
            | Self::RemoveEdge { diagram, .. }
            | Self::Lock { diagram }
            | Self::Unlock { diagram }
            | Self::Export { diagram, .. } => Some(*diagram),
        }
    }
}
