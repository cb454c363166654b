//! Node shape kinds.
//!
//! Every node carries a [`ShapeKind`]. The set of kinds is closed: behavior
//! that varies by shape (default size, container-ness, how it renders) is
//! selected with a single exhaustive match. Shape names that are not part of
//! the set are kept as [`ShapeKind::Custom`] so diagram content round-trips,
//! and behave like rectangles.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geometry::Size;

/// The shape of a diagram node.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    #[default]
    Rectangle,
    /// BPMN task; a rounded rectangle.
    Task,
    Circle,
    Diamond,
    Parallelogram,
    Cylinder,
    /// ERD entity with a header band.
    Entity,
    /// Sub-lane container.
    Lane,
    /// Top-level container.
    Pool,
    DataObject,
    Annotation,
    /// A shape name outside the known set.
    Custom(String),
}

impl ShapeKind {
    /// Returns the wire name of this shape.
    pub fn name(&self) -> &str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Task => "task",
            Self::Circle => "circle",
            Self::Diamond => "diamond",
            Self::Parallelogram => "parallelogram",
            Self::Cylinder => "cylinder",
            Self::Entity => "entity",
            Self::Lane => "lane",
            Self::Pool => "pool",
            Self::DataObject => "data-object",
            Self::Annotation => "annotation",
            Self::Custom(name) => name,
        }
    }

    /// Returns the size used when a node of this shape does not specify one.
    pub fn default_size(&self) -> Size {
        match self {
            Self::Rectangle | Self::Task | Self::Custom(_) => Size::new(160.0, 80.0),
            Self::Circle => Size::new(120.0, 120.0),
            Self::Diamond => Size::new(130.0, 130.0),
            Self::Parallelogram => Size::new(200.0, 60.0),
            Self::Cylinder => Size::new(180.0, 110.0),
            Self::Entity => Size::new(220.0, 120.0),
            Self::Lane => Size::new(600.0, 200.0),
            Self::Pool => Size::new(800.0, 300.0),
            Self::DataObject => Size::new(80.0, 100.0),
            Self::Annotation => Size::new(160.0, 60.0),
        }
    }

    /// Returns true for the shapes that own child nodes by default.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Lane | Self::Pool)
    }
}

impl FromStr for ShapeKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "rectangle" => Self::Rectangle,
            "task" => Self::Task,
            "circle" => Self::Circle,
            "diamond" => Self::Diamond,
            "parallelogram" => Self::Parallelogram,
            "cylinder" => Self::Cylinder,
            "entity" => Self::Entity,
            "lane" => Self::Lane,
            "pool" => Self::Pool,
            "data-object" => Self::DataObject,
            "annotation" => Self::Annotation,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl From<&str> for ShapeKind {
    fn from(name: &str) -> Self {
        let Ok(kind) = name.parse::<ShapeKind>();
        kind
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ShapeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ShapeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_round_trip() {
        let kinds = [
            ShapeKind::Rectangle,
            ShapeKind::Task,
            ShapeKind::Circle,
            ShapeKind::Diamond,
            ShapeKind::Parallelogram,
            ShapeKind::Cylinder,
            ShapeKind::Entity,
            ShapeKind::Lane,
            ShapeKind::Pool,
            ShapeKind::DataObject,
            ShapeKind::Annotation,
        ];
        for kind in kinds {
            assert_eq!(ShapeKind::from(kind.name()), kind);
        }
    }

    #[test]
    fn test_unknown_name_is_custom() {
        let kind = ShapeKind::from("hexagon");
        assert_eq!(kind, ShapeKind::Custom("hexagon".to_string()));
        assert_eq!(kind.to_string(), "hexagon");
        assert_eq!(kind.default_size(), ShapeKind::Rectangle.default_size());
        assert!(!kind.is_container());
    }

    #[test]
    fn test_containers() {
        assert!(ShapeKind::Pool.is_container());
        assert!(ShapeKind::Lane.is_container());
        assert!(!ShapeKind::Entity.is_container());
        assert!(!ShapeKind::Rectangle.is_container());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ShapeKind::DataObject).unwrap();
        assert_eq!(json, "\"data-object\"");
        let back: ShapeKind = serde_json::from_str("\"pool\"").unwrap();
        assert_eq!(back, ShapeKind::Pool);
    }
}
