//! Palette drag payloads and the node templates built from them.
//!
//! The palette hands the canvas a JSON payload on drop:
//!
//! ```json
//! { "id": "task", "name": "Task",
//!   "nodeConfig": { "shape": "task", "label": "Task", "width": 180, "background": "#3b82f6" } }
//! ```
//!
//! [`DragPayload::parse`] turns that into a [`NodeTemplate`]. A payload that
//! is not valid JSON or has the wrong structure yields `None` and the drop is
//! ignored.

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use flowboard_core::{geometry::Size, model::NodeData, shape::ShapeKind};

/// Label used when neither the template nor the palette entry names the node.
pub const FALLBACK_LABEL: &str = "Element";

/// The raw drag-transfer object written by the palette.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    node_config: Map<String, Value>,
}

impl DragPayload {
    /// Parses a drop payload into a template, or `None` if it is malformed.
    pub fn parse(raw: &str) -> Option<NodeTemplate> {
        match serde_json::from_str::<DragPayload>(raw) {
            Ok(payload) => payload.into_template(),
            Err(err) => {
                warn!(err:%; "Failed to parse dropped element");
                None
            }
        }
    }

    fn into_template(self) -> Option<NodeTemplate> {
        let node_type = match self.node_config.get("type") {
            Some(Value::String(name)) => Some(name.clone()),
            _ => None,
        };
        let data: NodeData = match serde_json::from_value(Value::Object(self.node_config)) {
            Ok(data) => data,
            Err(err) => {
                warn!(err:%; "Dropped element has an invalid node configuration");
                return None;
            }
        };

        Some(NodeTemplate {
            prefix: self.id.filter(|id| !id.is_empty()).unwrap_or_else(|| "node".to_string()),
            name: self.name,
            node_type,
            data,
        })
    }
}

/// Everything needed to create a node except its position.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTemplate {
    prefix: String,
    name: Option<String>,
    node_type: Option<String>,
    data: NodeData,
}

impl NodeTemplate {
    /// Creates a template for a plain shape; `prefix` seeds generated node ids.
    pub fn new(prefix: impl Into<String>, shape: ShapeKind) -> Self {
        Self {
            prefix: prefix.into(),
            name: None,
            node_type: None,
            data: NodeData::new(shape),
        }
    }

    /// Sets the palette entry name, used as a label fallback.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = Some(label.into());
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.data.width = Some(size.width());
        self.data.height = Some(size.height());
        self
    }

    /// Returns the prefix for generated node ids.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Renderer type; defaults to the shape renderer.
    pub fn node_type(&self) -> Option<&str> {
        self.node_type.as_deref()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Returns the label: the template's own, else the palette name, else
    /// [`FALLBACK_LABEL`].
    pub fn label(&self) -> &str {
        [self.data.label.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|label| !label.is_empty())
            .unwrap_or(FALLBACK_LABEL)
    }

    /// Returns the declared size, filling missing dimensions from the shape default.
    pub fn size(&self) -> Size {
        self.data.size()
    }

    /// Returns the node payload for a node created from this template.
    pub fn to_node_data(&self) -> NodeData {
        let mut data = self.data.clone();
        let size = self.size();
        data.label = Some(self.label().to_string());
        data.width = Some(size.width());
        data.height = Some(size.height());
        data.is_container = data.is_container || data.shape.is_container();
        data.parent_container_id = None;
        data
    }
}
