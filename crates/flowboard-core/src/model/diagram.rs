//! Stored diagrams, their grammar and their locks.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::model::{Edge, Node};

/// The notation a diagram is drawn in; selects the connection grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    #[default]
    Bpmn,
    Erd,
    Dfd,
}

impl DiagramType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bpmn => "bpmn",
            Self::Erd => "erd",
            Self::Dfd => "dfd",
        }
    }

    /// Returns the human-readable title shown above the canvas.
    pub fn title(self) -> &'static str {
        match self {
            Self::Bpmn => "Business Process Model and Notation",
            Self::Erd => "Entity Relationship Diagram",
            Self::Dfd => "Data Flow Diagram",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown diagram type `{0}` (expected bpmn, erd or dfd)")]
pub struct UnknownDiagramType(pub String);

impl FromStr for DiagramType {
    type Err = UnknownDiagramType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bpmn" => Ok(Self::Bpmn),
            "erd" => Ok(Self::Erd),
            "dfd" => Ok(Self::Dfd),
            _ => Err(UnknownDiagramType(s.to_string())),
        }
    }
}

/// The `{nodes, edges}` document persisted as a diagram's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramContent {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl DiagramContent {
    /// Parses stored content. Empty or blank text is an empty diagram.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// A diagram as held by the diagram service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramRecord {
    pub id: u64,
    pub name: String,
    pub diagram_type: DiagramType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    /// Serialized [`DiagramContent`]; absent for a diagram never saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl DiagramRecord {
    pub fn new(id: u64, name: impl Into<String>, diagram_type: DiagramType) -> Self {
        Self {
            id,
            name: name.into(),
            diagram_type,
            project_id: None,
            content: None,
        }
    }

    /// Parses the stored content, treating a missing document as empty.
    pub fn parse_content(&self) -> Result<DiagramContent, serde_json::Error> {
        DiagramContent::from_json(self.content.as_deref().unwrap_or_default())
    }
}

/// An advisory edit lock on a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    pub diagram_id: u64,
    /// Identity of the editing user holding the lock.
    pub user_id: String,
    /// Display name of that user.
    pub username: String,
    /// Opaque timestamp recorded by the lock service.
    #[serde(default)]
    pub locked_at: String,
}

impl LockInfo {
    /// Returns true if the lock is held by someone other than `user_id`.
    pub fn is_held_by_other(&self, user_id: &str) -> bool {
        self.user_id != user_id
    }
}
