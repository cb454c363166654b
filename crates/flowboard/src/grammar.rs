//! Connection grammar per diagram type.
//!
//! Before an edge is created the store asks [`on_connect_attempt`] whether
//! the connection is legal in the diagram's notation. The answer is a
//! [`ConnectOutcome`]: reject it, accept it as one edge, report it as an
//! existing edge, or expand it into a small plan of new nodes and edges.
//!
//! # ERD
//!
//! Shapes play roles: `entity` is an entity, `diamond` a relationship and
//! `circle` an attribute.
//!
//! | source \ target | entity | relationship | attribute |
//! |---|---|---|---|
//! | entity | synthesize relationship | direct | direct |
//! | relationship | direct | direct | direct |
//! | attribute | direct | direct | reject |
//!
//! Every ERD edge uses the structural kind; the user's selected kind is ignored.
//!
//! # BPMN and DFD
//!
//! Any connection is accepted with the selected kind.

use std::fmt;

use log::debug;

use flowboard_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    model::{ConnectionKind, DiagramType, Edge, HandleSide, Handles, NodeData},
    shape::ShapeKind,
};

/// One end of a proposed connection, as seen by the grammar.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    id: Id,
    shape: &'a ShapeKind,
    bounds: Bounds,
}

impl<'a> Endpoint<'a> {
    /// Creates an endpoint from a node's id, shape and absolute bounds.
    pub fn new(id: Id, shape: &'a ShapeKind, bounds: Bounds) -> Self {
        Self { id, shape, bounds }
    }
}

/// A connection gesture: two node ids and the handles it was drawn between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    source: Id,
    target: Id,
    source_handle: Option<HandleSide>,
    target_handle: Option<HandleSide>,
}

impl Connection {
    pub fn new(source: Id, target: Id) -> Self {
        Self {
            source,
            target,
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_handles(mut self, source: Option<HandleSide>, target: Option<HandleSide>) -> Self {
        self.source_handle = source;
        self.target_handle = target;
        self
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn source_handle(&self) -> Option<HandleSide> {
        self.source_handle
    }

    pub fn target_handle(&self) -> Option<HandleSide> {
        self.target_handle
    }
}

/// Why a connection was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The source or target node does not exist.
    MissingEndpoint(Id),
    /// The notation does not allow these two shapes to connect.
    NotAllowed {
        diagram_type: DiagramType,
        source: ShapeKind,
        target: ShapeKind,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndpoint(id) => write!(f, "node `{id}` does not exist"),
            Self::NotAllowed {
                diagram_type,
                source,
                target,
            } => write!(f, "{diagram_type} does not allow connecting {source} to {target}"),
        }
    }
}

/// An edge end inside a synthesis plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedEndpoint {
    /// A node already in the graph.
    Existing(Id),
    /// The node at this index of the plan's node list.
    Planned(usize),
}

/// A node the store must create, placed at an absolute top-left position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedNode {
    pub id_prefix: &'static str,
    pub position: Point,
    pub data: NodeData,
}

/// An edge the store must create.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedEdge {
    pub source: PlannedEndpoint,
    pub target: PlannedEndpoint,
    pub source_handle: Option<HandleSide>,
    pub target_handle: Option<HandleSide>,
    pub kind: ConnectionKind,
}

/// The grammar's verdict on a connection attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectOutcome {
    Reject(RejectReason),
    /// The same connection already exists; nothing to do.
    Duplicate,
    /// Create one edge of `kind` between the endpoints.
    AcceptDirect { kind: ConnectionKind },
    /// Create the planned nodes, then the planned edges.
    AcceptSynthesized {
        nodes: Vec<PlannedNode>,
        edges: Vec<PlannedEdge>,
    },
}

impl ConnectOutcome {
    /// Returns true if the outcome adds anything to the graph.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::AcceptDirect { .. } | Self::AcceptSynthesized { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErdRole {
    Entity,
    Relationship,
    Attribute,
}

impl ErdRole {
    fn of(shape: &ShapeKind) -> Option<Self> {
        match shape {
            ShapeKind::Entity => Some(Self::Entity),
            ShapeKind::Diamond => Some(Self::Relationship),
            ShapeKind::Circle => Some(Self::Attribute),
            _ => None,
        }
    }
}

const RELATIONSHIP_SIZE: f32 = 130.0;

fn relationship_template() -> NodeData {
    let mut data = NodeData::new(ShapeKind::Diamond);
    data.label = Some("Relationship".to_string());
    data.width = Some(RELATIONSHIP_SIZE);
    data.height = Some(RELATIONSHIP_SIZE);
    data.background = Some("#e9d5ff".to_string());
    data.border_color = Some("#9333ea".to_string());
    data.text_color = Some("#581c87".to_string());
    data.border_width = Some(3.0);
    data.handles = Some(Handles::all_sides());
    data
}

/// Decides what a connection attempt does to a diagram.
///
/// `source` and `target` are `None` when the corresponding node does not
/// exist. The result depends only on the arguments.
pub fn on_connect_attempt<'e>(
    diagram_type: DiagramType,
    connection: &Connection,
    source: Option<Endpoint<'_>>,
    target: Option<Endpoint<'_>>,
    existing: impl IntoIterator<Item = &'e Edge>,
    selected_kind: &ConnectionKind,
) -> ConnectOutcome {
    let Some(source) = source else {
        return ConnectOutcome::Reject(RejectReason::MissingEndpoint(connection.source));
    };
    let Some(target) = target else {
        return ConnectOutcome::Reject(RejectReason::MissingEndpoint(connection.target));
    };

    let outcome = match diagram_type {
        DiagramType::Erd => erd_outcome(connection, source, target, existing),
        DiagramType::Bpmn | DiagramType::Dfd => {
            flow_outcome(connection, existing, selected_kind.clone())
        }
    };
    debug!(
        diagram_type:% = diagram_type,
        source:% = source.id,
        target:% = target.id,
        accepted = outcome.is_accepted();
        "Evaluated connection attempt"
    );
    outcome
}

fn erd_outcome<'e>(
    connection: &Connection,
    source: Endpoint<'_>,
    target: Endpoint<'_>,
    existing: impl IntoIterator<Item = &'e Edge>,
) -> ConnectOutcome {
    use ErdRole::*;

    let roles = (ErdRole::of(source.shape), ErdRole::of(target.shape));
    match roles {
        (Some(Entity), Some(Entity)) => synthesize_relationship(connection, source, target),
        (Some(Attribute), Some(Entity))
        | (Some(Entity), Some(Attribute))
        | (Some(Relationship), Some(Entity))
        | (Some(Entity), Some(Relationship))
        | (Some(Relationship), Some(Attribute))
        | (Some(Attribute), Some(Relationship))
        | (Some(Relationship), Some(Relationship)) => {
            let duplicate = existing.into_iter().any(|edge| {
                edge.source() == source.id
                    && edge.target() == target.id
                    && edge.kind() == Some(&ConnectionKind::Structural)
            });
            if duplicate {
                ConnectOutcome::Duplicate
            } else {
                ConnectOutcome::AcceptDirect {
                    kind: ConnectionKind::Structural,
                }
            }
        }
        _ => ConnectOutcome::Reject(RejectReason::NotAllowed {
            diagram_type: DiagramType::Erd,
            source: source.shape.clone(),
            target: target.shape.clone(),
        }),
    }
}

fn synthesize_relationship(
    connection: &Connection,
    source: Endpoint<'_>,
    target: Endpoint<'_>,
) -> ConnectOutcome {
    let half = RELATIONSHIP_SIZE / 2.0;
    let center = source.bounds.center().midpoint(target.bounds.center());
    let relationship = PlannedNode {
        id_prefix: "relationship",
        position: center.sub_point(Point::new(half, half)),
        data: relationship_template(),
    };

    let edges = vec![
        PlannedEdge {
            source: PlannedEndpoint::Existing(source.id),
            target: PlannedEndpoint::Planned(0),
            source_handle: connection.source_handle,
            target_handle: None,
            kind: ConnectionKind::Structural,
        },
        PlannedEdge {
            source: PlannedEndpoint::Planned(0),
            target: PlannedEndpoint::Existing(target.id),
            source_handle: None,
            target_handle: connection.target_handle,
            kind: ConnectionKind::Structural,
        },
    ];

    ConnectOutcome::AcceptSynthesized {
        nodes: vec![relationship],
        edges,
    }
}

fn flow_outcome<'e>(
    connection: &Connection,
    existing: impl IntoIterator<Item = &'e Edge>,
    kind: ConnectionKind,
) -> ConnectOutcome {
    let duplicate = existing.into_iter().any(|edge| {
        edge.source() == connection.source
            && edge.target() == connection.target
            && edge.source_handle == connection.source_handle
            && edge.target_handle == connection.target_handle
    });
    if duplicate {
        ConnectOutcome::Duplicate
    } else {
        ConnectOutcome::AcceptDirect { kind }
    }
}
