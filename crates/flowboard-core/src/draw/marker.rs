//! Edge end markers (arrow heads).
//!
//! A [`Marker`] is stored on an edge as `{"type": "arrowclosed", "color": "#111827"}`.
//! Content written by other tools may use the bare string form
//! (`"markerEnd": "arrow"`), which is accepted on load.
//!
//! The color is kept as the string that was stored, like node colors, so
//! values such as `var(--edge)` survive a load/save cycle. Keys Flowboard does
//! not interpret (`width`, `strokeWidth`, ...) are kept as well.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::color::Color;

/// The shape drawn at an edge end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerShape {
    /// Open arrow head.
    Arrow,
    /// Filled arrow head.
    ArrowClosed,
    Diamond,
    Circle,
    Custom(String),
}

impl MarkerShape {
    /// Returns the wire name of this marker shape.
    pub fn name(&self) -> &str {
        match self {
            Self::Arrow => "arrow",
            Self::ArrowClosed => "arrowclosed",
            Self::Diamond => "diamond",
            Self::Circle => "circle",
            Self::Custom(name) => name,
        }
    }
}

impl FromStr for MarkerShape {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "arrow" => Self::Arrow,
            "arrowclosed" => Self::ArrowClosed,
            "diamond" => Self::Diamond,
            "circle" => Self::Circle,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for MarkerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for MarkerShape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for MarkerShape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let Ok(shape) = raw.parse::<MarkerShape>();
        Ok(shape)
    }
}

/// A marker at one end of an edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    #[serde(rename = "type")]
    shape: MarkerShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Marker {
    /// Creates a marker of the given shape, colored like its edge.
    pub fn new(shape: MarkerShape, color: Color) -> Self {
        Self {
            shape,
            color: Some(color.to_hex_string()),
            extra: Map::new(),
        }
    }

    /// Returns the marker shape.
    pub fn shape(&self) -> &MarkerShape {
        &self.shape
    }

    /// Returns the marker color as stored, if one was recorded.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Fields not interpreted by Flowboard.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Takes shape and color from `other`, keeping this marker's extra fields.
    pub fn restyle(&mut self, other: &Marker) {
        self.shape = other.shape.clone();
        self.color = other.color.clone();
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MarkerRepr {
    Bare(MarkerShape),
    Full {
        #[serde(rename = "type")]
        shape: MarkerShape,
        #[serde(default)]
        color: Option<Value>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl<'de> Deserialize<'de> for Marker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match MarkerRepr::deserialize(deserializer)? {
            MarkerRepr::Bare(shape) => Self {
                shape,
                color: None,
                extra: Map::new(),
            },
            MarkerRepr::Full {
                shape,
                color,
                mut extra,
            } => {
                // A non-string color is not ours to interpret; keep it verbatim.
                let color = match color {
                    Some(Value::String(color)) => Some(color),
                    Some(Value::Null) | None => None,
                    Some(other) => {
                        extra.insert("color".to_string(), other);
                        None
                    }
                };
                Self {
                    shape,
                    color,
                    extra,
                }
            }
        })
    }
}
