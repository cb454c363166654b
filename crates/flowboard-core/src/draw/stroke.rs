//! Stroke and line-style definitions for edges.
//!
//! # Overview
//!
//! - [`StrokeDefinition`]: color, width and dash style of an edge line
//! - [`StrokeStyle`]: named dash patterns plus a custom escape hatch
//!
//! Dash patterns use the space-separated dasharray notation of the editor
//! front end (`"6 4"` is a 6 unit dash followed by a 4 unit gap).
//!
//! ```
//! use flowboard_core::draw::{StrokeDefinition, StrokeStyle};
//! use flowboard_core::color::Color;
//!
//! let stroke = StrokeDefinition::solid(Color::new("#111827").unwrap(), 2.0);
//! assert_eq!(stroke.style().dash_array(), None);
//!
//! let dashed = StrokeDefinition::new(Color::new("#2563eb").unwrap(), 2.0)
//!     .with_style(StrokeStyle::Dashed);
//! assert_eq!(dashed.style().dash_array().as_deref(), Some("6 4"));
//! ```

use std::{convert::Infallible, str::FromStr};

use crate::color::Color;

/// The dash pattern of a stroke.
///
/// | Variant | dasharray |
/// |---|---|
/// | `Solid` | none |
/// | `Dashed` | `6 4` |
/// | `LongDashed` | `8 4` |
/// | `ShortDashed` | `4 4` |
/// | `Dotted` | `3 3` |
/// | `Custom(pattern)` | the pattern itself |
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    LongDashed,
    ShortDashed,
    Dotted,
    Custom(String),
}

impl FromStr for StrokeStyle {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "solid" => Self::Solid,
            "dashed" => Self::Dashed,
            "long-dashed" => Self::LongDashed,
            "short-dashed" => Self::ShortDashed,
            "dotted" => Self::Dotted,
            // Any other value is treated as a raw dasharray pattern
            _ => Self::Custom(s.to_string()),
        })
    }
}

impl StrokeStyle {
    /// Returns the dasharray for this style, or None for solid lines
    pub fn dash_array(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("6 4".to_string()),
            Self::LongDashed => Some("8 4".to_string()),
            Self::ShortDashed => Some("4 4".to_string()),
            Self::Dotted => Some("3 3".to_string()),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

/// A stroke definition for an edge line.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Creates a solid stroke; equivalent to [`StrokeDefinition::new`].
    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    /// Returns the stroke with its dash style replaced.
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_solid() {
        let stroke = StrokeDefinition::solid(Color::new("#111827").unwrap(), 2.0);
        assert_eq!(stroke.width(), 2.0);
        assert_eq!(stroke.color().to_hex_string(), "#111827");
        assert_eq!(*stroke.style(), StrokeStyle::Solid);
    }

    #[test]
    fn test_stroke_with_style() {
        let color = Color::new("#9333ea").unwrap();
        let stroke = StrokeDefinition::new(color, 1.5).with_style(StrokeStyle::Dotted);
        assert_eq!(stroke.width(), 1.5);
        assert_eq!(stroke.color(), color);
        assert_eq!(*stroke.style(), StrokeStyle::Dotted);
    }

    #[test]
    fn test_stroke_style_dash_array() {
        assert_eq!(StrokeStyle::Solid.dash_array(), None);
        assert_eq!(StrokeStyle::Dashed.dash_array(), Some("6 4".to_string()));
        assert_eq!(StrokeStyle::LongDashed.dash_array(), Some("8 4".to_string()));
        assert_eq!(StrokeStyle::ShortDashed.dash_array(), Some("4 4".to_string()));
        assert_eq!(StrokeStyle::Dotted.dash_array(), Some("3 3".to_string()));
        assert_eq!(
            StrokeStyle::Custom("10 5 2 5".to_string()).dash_array(),
            Some("10 5 2 5".to_string())
        );
    }

    #[test]
    fn test_stroke_style_from_str() {
        assert_eq!(StrokeStyle::from_str("solid").unwrap(), StrokeStyle::Solid);
        assert_eq!(StrokeStyle::from_str("dashed").unwrap(), StrokeStyle::Dashed);
        assert_eq!(StrokeStyle::from_str("dotted").unwrap(), StrokeStyle::Dotted);
        assert_eq!(
            StrokeStyle::from_str("2 2").unwrap(),
            StrokeStyle::Custom("2 2".to_string())
        );
    }
}
