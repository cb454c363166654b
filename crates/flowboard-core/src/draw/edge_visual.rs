//! The immutable visual descriptor of a connection kind.

use std::fmt;

use crate::{
    color::Color,
    draw::{Marker, StrokeDefinition},
};

/// How the front end routes an edge between its endpoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EdgePath {
    /// Bezier curve; the front end's default.
    #[default]
    Default,
    Straight,
    Step,
    SmoothStep,
}

impl EdgePath {
    /// Returns the wire name stored in an edge's `type` field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Straight => "straight",
            Self::Step => "step",
            Self::SmoothStep => "smoothstep",
        }
    }
}

impl fmt::Display for EdgePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A default label attached to an edge together with its badge styling.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    text: String,
    padding: [f32; 2],
    border_radius: f32,
    fill: Color,
    text_color: Color,
}

impl EdgeLabel {
    /// Creates a label with the standard badge geometry (8×4 padding, radius 4).
    pub fn new(text: impl Into<String>, fill: Color, text_color: Color) -> Self {
        Self {
            text: text.into(),
            padding: [8.0, 4.0],
            border_radius: 4.0,
            fill,
            text_color,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Horizontal and vertical badge padding.
    pub fn padding(&self) -> [f32; 2] {
        self.padding
    }

    pub fn border_radius(&self) -> f32 {
        self.border_radius
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }
}

/// Everything the engine stamps onto an edge of a given connection kind.
///
/// # Examples
///
/// ```
/// use flowboard_core::color::Color;
/// use flowboard_core::draw::{EdgeVisual, Marker, MarkerShape, StrokeDefinition, StrokeStyle};
///
/// let blue = Color::new("#2563eb").unwrap();
/// let visual = EdgeVisual::new(StrokeDefinition::new(blue, 2.0).with_style(StrokeStyle::Dashed))
///     .with_marker_start(Marker::new(MarkerShape::Diamond, blue))
///     .with_marker_end(Marker::new(MarkerShape::ArrowClosed, blue));
///
/// assert!(visual.marker_start().is_some());
/// assert!(!visual.animated());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeVisual {
    stroke: StrokeDefinition,
    marker_start: Option<Marker>,
    marker_end: Option<Marker>,
    path: Option<EdgePath>,
    label: Option<EdgeLabel>,
    animated: bool,
}

impl EdgeVisual {
    /// Creates a descriptor with only a stroke: no markers, no label, not animated.
    pub fn new(stroke: StrokeDefinition) -> Self {
        Self {
            stroke,
            marker_start: None,
            marker_end: None,
            path: None,
            label: None,
            animated: false,
        }
    }

    pub fn with_marker_start(mut self, marker: Marker) -> Self {
        self.marker_start = Some(marker);
        self
    }

    pub fn with_marker_end(mut self, marker: Marker) -> Self {
        self.marker_end = Some(marker);
        self
    }

    pub fn with_path(mut self, path: EdgePath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_label(mut self, label: EdgeLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn marker_start(&self) -> Option<&Marker> {
        self.marker_start.as_ref()
    }

    pub fn marker_end(&self) -> Option<&Marker> {
        self.marker_end.as_ref()
    }

    /// Path routing; `None` leaves whatever the edge already has.
    pub fn path(&self) -> Option<EdgePath> {
        self.path
    }

    pub fn label(&self) -> Option<&EdgeLabel> {
        self.label.as_ref()
    }

    pub fn animated(&self) -> bool {
        self.animated
    }
}
