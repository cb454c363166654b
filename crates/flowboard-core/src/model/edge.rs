//! Connections between nodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{draw::Marker, identifier::Id, model::{ConnectionKind, HandleSide}};

/// Inline SVG style of an edge line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dasharray: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Styling of the badge behind an edge label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelBackground {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Application data carried by an edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_type: Option<ConnectionKind>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A connection from one node to another.
///
/// Visual fields are public: the style resolver stamps them and the front end
/// may have written anything into them. Identity (`id`, `source`, `target`)
/// is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    id: Id,
    source: Id,
    target: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<HandleSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<HandleSide>,
    /// Path routing name (`straight`, `smoothstep`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    #[serde(default)]
    pub style: EdgeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_start: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_bg_padding: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_bg_border_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_bg_style: Option<LabelBackground>,
    #[serde(default)]
    pub data: EdgeData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    /// Creates an unstyled edge of the given kind.
    pub fn new(id: Id, source: Id, target: Id, kind: ConnectionKind) -> Self {
        Self {
            id,
            source,
            target,
            source_handle: None,
            target_handle: None,
            path: None,
            label: None,
            animated: None,
            style: EdgeStyle::default(),
            marker_start: None,
            marker_end: None,
            label_bg_padding: None,
            label_bg_border_radius: None,
            label_bg_style: None,
            data: EdgeData {
                flow_type: Some(kind),
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    pub fn with_handles(mut self, source: Option<HandleSide>, target: Option<HandleSide>) -> Self {
        self.source_handle = source;
        self.target_handle = target;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    /// The connection kind recorded on the edge, if any.
    pub fn kind(&self) -> Option<&ConnectionKind> {
        self.data.flow_type.as_ref()
    }

    /// Returns true if either endpoint is `node`.
    pub fn touches(&self, node: Id) -> bool {
        self.source == node || self.target == node
    }

    /// Returns true if the front end marked this edge as selected.
    pub fn is_selected(&self) -> bool {
        matches!(self.extra.get("selected"), Some(Value::Bool(true)))
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.extra.insert("selected".to_string(), Value::Bool(selected));
    }
}
