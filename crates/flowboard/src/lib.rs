//! Flowboard - the graph engine behind a BPMN, ERD and DFD diagram editor.
//!
//! The engine keeps the nodes and edges of one diagram, decides where dropped
//! and dragged nodes are nested, enforces each notation's connection grammar,
//! styles edges by connection kind, and schedules saves to a diagram service.
//! Rendering and transport belong to the embedding front end.
//!
//! Gestures enter through an [`EditorSession`]:
//!
//! ```rust
//! use std::time::Instant;
//!
//! use flowboard::{
//!     EditorSession, config::AppConfig, geometry::Point, grammar::Connection,
//!     model::{DiagramRecord, DiagramType}, persist::User,
//! };
//!
//! let record = DiagramRecord::new(1, "Orders", DiagramType::Bpmn);
//! let mut session = EditorSession::open(record, None, User::new("u1", "Ada"), &AppConfig::default());
//!
//! let now = Instant::now();
//! let payload = r#"{"id":"task","name":"Task","nodeConfig":{"shape":"task"}}"#;
//! let a = session.drop_payload(payload, Point::new(0.0, 0.0), now).unwrap();
//! let b = session.drop_payload(payload, Point::new(300.0, 0.0), now).unwrap();
//! session.connect(Connection::new(a, b), now);
//!
//! assert_eq!(session.status().edges, 1);
//! ```

pub mod config;
pub mod containment;
pub mod grammar;
pub mod payload;
pub mod persist;
pub mod structure;
pub mod style;

mod error;
mod session;

pub use flowboard_core::{color, draw, geometry, identifier, model, shape};

pub use error::FlowboardError;
pub use session::{CONNECTION_REMOVED, EditorSession, SessionStatus};
pub use structure::DiagramGraph;
