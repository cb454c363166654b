//! Placed shapes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    shape::ShapeKind,
};

/// The `extent` value that clamps a node inside its parent.
pub const PARENT_EXTENT: &str = "parent";

/// A side of a shape that connection handles may sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleSide {
    pub const ALL: [HandleSide; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for HandleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing a handle side that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown handle side `{0}`, expected top, right, bottom or left")]
pub struct UnknownHandleSide(pub String);

impl FromStr for HandleSide {
    type Err = UnknownHandleSide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|side| side.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownHandleSide(s.to_string()))
    }
}

/// Which sides accept incoming and emit outgoing connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handles {
    #[serde(default)]
    pub incoming: Vec<HandleSide>,
    #[serde(default)]
    pub outgoing: Vec<HandleSide>,
}

impl Handles {
    /// Handles on every side in both directions.
    pub fn all_sides() -> Self {
        Self {
            incoming: HandleSide::ALL.to_vec(),
            outgoing: HandleSide::ALL.to_vec(),
        }
    }
}

/// The payload of a node: what it is and how it is styled.
///
/// Colors are kept as the strings the front end wrote so that values such as
/// `transparent` survive a load/save cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub shape: ShapeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handles: Option<Handles>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_container: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_container_id: Option<Id>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeData {
    /// Creates a payload for the given shape with no styling.
    pub fn new(shape: ShapeKind) -> Self {
        Self {
            is_container: shape.is_container(),
            shape,
            ..Self::default()
        }
    }

    /// Returns the declared size, filling missing dimensions from the shape default.
    ///
    /// Circles and diamonds are drawn in a square as wide as their larger
    /// dimension.
    pub fn size(&self) -> Size {
        let fallback = self.shape.default_size();
        let size = Size::new(
            self.width.unwrap_or(fallback.width()),
            self.height.unwrap_or(fallback.height()),
        );
        match self.shape {
            ShapeKind::Circle | ShapeKind::Diamond => {
                let side = size.width().max(size.height());
                Size::new(side, side)
            }
            _ => size,
        }
    }
}

/// A shape placed on the canvas.
///
/// `position` is relative to the parent container when `parent_node` is set,
/// and absolute otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: Id,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    node_type: Option<String>,
    position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_node: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extent: Option<String>,
    #[serde(default)]
    data: NodeData,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Node {
    /// The renderer type assigned to nodes created by Flowboard.
    pub const RENDERER: &'static str = "shape";

    /// Creates an unparented node rendered by the shape renderer.
    pub fn new(id: Id, position: Point, data: NodeData) -> Self {
        Self {
            id,
            node_type: Some(Self::RENDERER.to_string()),
            position,
            parent_node: None,
            extent: None,
            data,
            extra: Map::new(),
        }
    }

    /// Replaces the renderer type.
    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn node_type(&self) -> Option<&str> {
        self.node_type.as_deref()
    }

    /// Position relative to the parent, or absolute when unparented.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent_node
    }

    pub fn extent(&self) -> Option<&str> {
        self.extent.as_deref()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        &mut self.data
    }

    /// Fields not interpreted by Flowboard (`selected`, `dragging`, ...).
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }

    pub fn shape(&self) -> &ShapeKind {
        &self.data.shape
    }

    pub fn label(&self) -> Option<&str> {
        self.data.label.as_deref()
    }

    /// Returns the size the node occupies on the canvas.
    ///
    /// The dimensions the front end measured and stored on the node take
    /// precedence over the ones declared in `data`.
    pub fn size(&self) -> Size {
        let declared = self.data.size();
        Size::new(
            self.measured("width").unwrap_or(declared.width()),
            self.measured("height").unwrap_or(declared.height()),
        )
    }

    fn measured(&self, key: &str) -> Option<f32> {
        let value = self.extra.get(key)?.as_f64()? as f32;
        (value.is_finite() && value > 0.0).then_some(value)
    }

    /// Returns true if this node may hold other nodes.
    pub fn is_container(&self) -> bool {
        self.data.is_container || self.data.shape.is_container()
    }

    /// Returns true if the front end marked this node as selected.
    pub fn is_selected(&self) -> bool {
        matches!(self.extra.get("selected"), Some(Value::Bool(true)))
    }

    /// Returns the bounds of this node given its absolute top-left corner.
    pub fn bounds_at(&self, absolute: Point) -> Bounds {
        Bounds::new_from_top_left(absolute, self.size())
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        // Stale once the node moves; the front end recomputes it.
        self.extra.remove("positionAbsolute");
    }

    /// Attaches the node to a container at the given local position.
    pub fn attach(&mut self, parent: Id, local: Point) {
        self.parent_node = Some(parent);
        self.extent = Some(PARENT_EXTENT.to_string());
        self.data.parent_container_id = Some(parent);
        self.set_position(local);
    }

    /// Detaches the node from any container, placing it at an absolute position.
    pub fn detach(&mut self, absolute: Point) {
        self.parent_node = None;
        self.extent = None;
        self.data.parent_container_id = None;
        self.set_position(absolute);
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.data.label = Some(label.into());
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.extra.insert("selected".to_string(), Value::Bool(selected));
    }

    /// Sets the container flag from the shape kind.
    pub fn mark_container(&mut self) {
        if self.data.shape.is_container() {
            self.data.is_container = true;
        }
    }
}
