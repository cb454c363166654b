//! Connection-kind visual styling.
//!
//! [`StyleResolver`] maps each [`ConnectionKind`] to an immutable
//! [`EdgeVisual`] and stamps those visuals onto edges. Every edge entering the
//! graph store passes through [`StyleResolver::decorate`], so a stored edge
//! always looks like its kind.
//!
//! | kind | stroke | dash | start | end | label | animated | path |
//! |---|---|---|---|---|---|---|---|
//! | `sequence-flow` | #111827 / 2 | | | arrowclosed | | | |
//! | `default-flow` | #1f2937 / 2 | | | arrowclosed | `default` | | |
//! | `conditional-flow` | #2563eb / 2 | `6 4` | diamond | arrowclosed | `condition` | | |
//! | `message-flow` | #0ea5e9 / 2 | `8 4` | circle | arrowclosed | | yes | |
//! | `association` | #6b7280 / 1.5 | `4 4` | | | | | straight |
//! | `data-association` | #047857 / 1.5 | `4 4` | | arrowclosed | | | straight |
//! | `compensation-flow` | #9333ea / 2 | `3 3` | | arrow | | | |
//! | `erd` | #111827 / 2 | | | | | | straight |

use std::sync::LazyLock;

use indexmap::IndexMap;
use log::trace;

use flowboard_core::{
    color::Color,
    draw::{EdgeLabel, EdgePath, EdgeVisual, Marker, MarkerShape, StrokeDefinition, StrokeStyle},
    model::{ConnectionKind, Edge, LabelBackground},
};

fn palette(hex: &str) -> Color {
    Color::new(hex).expect("built-in palette colors are valid")
}

fn descriptor(kind: &ConnectionKind) -> EdgeVisual {
    match kind {
        ConnectionKind::Sequence | ConnectionKind::Other(_) => {
            let ink = palette("#111827");
            EdgeVisual::new(StrokeDefinition::solid(ink, 2.0))
                .with_marker_end(Marker::new(MarkerShape::ArrowClosed, ink))
        }
        ConnectionKind::Default => {
            let ink = palette("#1f2937");
            EdgeVisual::new(StrokeDefinition::solid(ink, 2.0))
                .with_marker_end(Marker::new(MarkerShape::ArrowClosed, ink))
                .with_label(EdgeLabel::new("default", palette("#f8fafc"), ink))
        }
        ConnectionKind::Conditional => {
            let ink = palette("#2563eb");
            EdgeVisual::new(StrokeDefinition::new(ink, 2.0).with_style(StrokeStyle::Dashed))
                .with_marker_start(Marker::new(MarkerShape::Diamond, ink))
                .with_marker_end(Marker::new(MarkerShape::ArrowClosed, ink))
                .with_label(EdgeLabel::new(
                    "condition",
                    palette("#1d4ed8"),
                    palette("#ffffff"),
                ))
        }
        ConnectionKind::Message => {
            let ink = palette("#0ea5e9");
            EdgeVisual::new(StrokeDefinition::new(ink, 2.0).with_style(StrokeStyle::LongDashed))
                .with_marker_start(Marker::new(MarkerShape::Circle, ink))
                .with_marker_end(Marker::new(MarkerShape::ArrowClosed, ink))
                .with_animated(true)
        }
        ConnectionKind::Association => {
            EdgeVisual::new(
                StrokeDefinition::new(palette("#6b7280"), 1.5).with_style(StrokeStyle::ShortDashed),
            )
            .with_path(EdgePath::Straight)
        }
        ConnectionKind::DataAssociation => {
            let ink = palette("#047857");
            EdgeVisual::new(StrokeDefinition::new(ink, 1.5).with_style(StrokeStyle::ShortDashed))
                .with_marker_end(Marker::new(MarkerShape::ArrowClosed, ink))
                .with_path(EdgePath::Straight)
        }
        ConnectionKind::Compensation => {
            let ink = palette("#9333ea");
            EdgeVisual::new(StrokeDefinition::new(ink, 2.0).with_style(StrokeStyle::Dotted))
                .with_marker_end(Marker::new(MarkerShape::Arrow, ink))
        }
        ConnectionKind::Structural => {
            EdgeVisual::new(StrokeDefinition::solid(palette("#111827"), 2.0))
                .with_path(EdgePath::Straight)
        }
    }
}

static VISUALS: LazyLock<IndexMap<ConnectionKind, EdgeVisual>> = LazyLock::new(|| {
    ConnectionKind::KNOWN
        .into_iter()
        .map(|kind| {
            let visual = descriptor(&kind);
            (kind, visual)
        })
        .collect()
});

static PRIMARY_VISUAL: LazyLock<EdgeVisual> =
    LazyLock::new(|| descriptor(&ConnectionKind::PRIMARY));

fn apply_marker(slot: &mut Option<Marker>, marker: &Marker) {
    match slot {
        Some(existing) => existing.restyle(marker),
        None => *slot = Some(marker.clone()),
    }
}

/// Resolves connection kinds to their visual descriptors.
///
/// # Examples
///
/// ```
/// use flowboard::style::StyleResolver;
/// use flowboard_core::model::{ConnectionKind, Edge};
/// use flowboard_core::identifier::Id;
///
/// let styles = StyleResolver::new();
/// let mut edge = Edge::new(Id::new("e"), Id::new("a"), Id::new("b"), ConnectionKind::Conditional);
/// styles.decorate(&mut edge);
///
/// assert_eq!(edge.label.as_deref(), Some("condition"));
/// assert_eq!(edge.style.stroke_dasharray.as_deref(), Some("6 4"));
/// ```
#[derive(Debug, Clone)]
pub struct StyleResolver {
    visuals: &'static IndexMap<ConnectionKind, EdgeVisual>,
    primary: &'static EdgeVisual,
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleResolver {
    /// Creates a resolver holding the built-in descriptor table.
    pub fn new() -> Self {
        Self {
            visuals: &VISUALS,
            primary: &PRIMARY_VISUAL,
        }
    }

    /// Returns the descriptor for `kind`; unknown kinds get the primary descriptor.
    pub fn style_for(&self, kind: &ConnectionKind) -> &EdgeVisual {
        self.visuals.get(kind).unwrap_or(self.primary)
    }

    /// Stamps the visuals of the edge's kind onto the edge.
    ///
    /// An edge without a kind becomes [`ConnectionKind::PRIMARY`]. Stroke,
    /// dash and animation always follow the descriptor; markers and path are
    /// overwritten only when the descriptor defines them. The default label
    /// is applied only to an edge that has no label yet, so user-entered
    /// labels are never replaced. Applying `decorate` twice changes nothing.
    pub fn decorate(&self, edge: &mut Edge) {
        let kind = edge
            .data
            .flow_type
            .get_or_insert(ConnectionKind::PRIMARY)
            .clone();
        let visual = self.style_for(&kind);
        trace!(edge_id:% = edge.id(), kind:% = kind; "Decorating edge");

        let stroke = visual.stroke();
        edge.style.stroke = Some(stroke.color().to_hex_string());
        edge.style.stroke_width = Some(stroke.width());
        edge.style.stroke_dasharray = stroke.style().dash_array();

        if let Some(marker) = visual.marker_start() {
            apply_marker(&mut edge.marker_start, marker);
        }
        if let Some(marker) = visual.marker_end() {
            apply_marker(&mut edge.marker_end, marker);
        }
        if let Some(path) = visual.path() {
            edge.path = Some(path.name().to_string());
        }
        edge.animated = Some(visual.animated());

        let unlabeled = edge.label.as_deref().is_none_or(str::is_empty);
        if let (true, Some(label)) = (unlabeled, visual.label()) {
            edge.label = Some(label.text().to_string());
            edge.label_bg_padding = Some(label.padding());
            edge.label_bg_border_radius = Some(label.border_radius());
            let background = edge.label_bg_style.get_or_insert_with(LabelBackground::default);
            background.fill = Some(label.fill().to_hex_string());
            background.color = Some(label.text_color().to_hex_string());
        }
    }
}
