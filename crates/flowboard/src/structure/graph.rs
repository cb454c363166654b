//! The canonical node and edge collection of an open diagram.

use std::{
    collections::HashSet,
    time::{SystemTime, UNIX_EPOCH},
};

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};

use flowboard_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    model::{ConnectionKind, DiagramContent, DiagramType, Edge, Node},
};

use super::Hierarchy;
use crate::{
    FlowboardError,
    config::AppConfig,
    containment::{Candidate, ContainmentResolver},
    grammar::{self, ConnectOutcome, Connection, Endpoint, PlannedEndpoint, PlannedNode},
    payload::NodeTemplate,
    style::StyleResolver,
};

/// What [`DiagramGraph::delete_selection`] removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deletion {
    pub nodes: Vec<Id>,
    pub edges: Vec<Id>,
}

impl Deletion {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// The nodes and edges of one diagram, kept in insertion order.
///
/// Every operation is atomic and none of them fail: a gesture that makes no
/// sense for the current graph (unknown id, empty label, rejected
/// connection) leaves the graph untouched and reports that through its
/// return value.
///
/// Edges are decorated by the [`StyleResolver`] whenever they enter the
/// graph, and node parents always refer to existing nodes without forming a
/// cycle.
///
/// # Examples
///
/// ```
/// use flowboard::grammar::Connection;
/// use flowboard::payload::NodeTemplate;
/// use flowboard::structure::DiagramGraph;
/// use flowboard_core::{geometry::Point, model::{ConnectionKind, DiagramType}, shape::ShapeKind};
///
/// let mut graph = DiagramGraph::new(DiagramType::Bpmn);
/// let start = graph.add_node(&NodeTemplate::new("task", ShapeKind::Task), Point::new(0.0, 0.0)).unwrap();
/// let end = graph.add_node(&NodeTemplate::new("task", ShapeKind::Task), Point::new(300.0, 0.0)).unwrap();
///
/// let outcome = graph.connect(&Connection::new(start, end), &ConnectionKind::Message);
/// assert!(outcome.is_accepted());
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramGraph {
    diagram_type: DiagramType,
    nodes: IndexMap<Id, Node>,
    edges: IndexMap<Id, Edge>,
    styles: StyleResolver,
    containment: ContainmentResolver,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

impl DiagramGraph {
    /// Creates an empty graph with the built-in styles and containment rules.
    pub fn new(diagram_type: DiagramType) -> Self {
        Self::with_config(diagram_type, &AppConfig::default())
    }

    /// Creates an empty graph whose containment follows `config`.
    pub fn with_config(diagram_type: DiagramType, config: &AppConfig) -> Self {
        let containment = config.containment();
        Self {
            diagram_type,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            styles: StyleResolver::new(),
            containment: ContainmentResolver::new(containment.rules(), containment.padding()),
        }
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    /// Replaces the graph with stored content.
    ///
    /// Content that does not parse yields an empty graph. See
    /// [`DiagramGraph::load_content`] for the normalization applied.
    pub fn load(&mut self, text: &str) {
        match DiagramContent::from_json(text) {
            Ok(content) => self.load_content(content),
            Err(err) => {
                warn!(err:%; "Diagram content is malformed, starting from an empty diagram");
                self.load_content(DiagramContent::default());
            }
        }
    }

    /// Replaces the graph with `content`, normalizing it on the way in.
    ///
    /// - container shapes are flagged as containers;
    /// - parent links to missing nodes are cleared;
    /// - parent cycles are broken by detaching the first node found on each;
    /// - edges with a missing endpoint are dropped;
    /// - every edge is decorated for its kind.
    ///
    /// Repeated node or edge ids keep their first occurrence.
    pub fn load_content(&mut self, content: DiagramContent) {
        self.nodes.clear();
        self.edges.clear();

        for mut node in content.nodes {
            if self.nodes.contains_key(&node.id()) {
                warn!(node_id:% = node.id(); "Dropping node with repeated id");
                continue;
            }
            node.mark_container();
            self.nodes.insert(node.id(), node);
        }

        self.clear_dangling_parents();
        self.break_parent_cycles();

        for mut edge in content.edges {
            if !self.nodes.contains_key(&edge.source()) || !self.nodes.contains_key(&edge.target()) {
                warn!(edge_id:% = edge.id(); "Dropping edge with a missing endpoint");
                continue;
            }
            if self.edges.contains_key(&edge.id()) {
                warn!(edge_id:% = edge.id(); "Dropping edge with repeated id");
                continue;
            }
            self.styles.decorate(&mut edge);
            self.edges.insert(edge.id(), edge);
        }

        info!(
            nodes = self.nodes.len(),
            edges = self.edges.len();
            "Diagram loaded"
        );
    }

    fn clear_dangling_parents(&mut self) {
        let ids: HashSet<Id> = self.nodes.keys().copied().collect();
        for node in self.nodes.values_mut() {
            let Some(parent) = node.parent() else {
                continue;
            };
            if parent == node.id() || !ids.contains(&parent) {
                warn!(node_id:% = node.id(), parent:% = parent; "Clearing dangling parent link");
                let position = node.position();
                node.detach(position);
            }
        }
    }

    fn break_parent_cycles(&mut self) {
        let ids: Vec<Id> = self.nodes.keys().copied().collect();
        for id in ids {
            let mut seen = HashSet::from([id]);
            let mut cursor = self.nodes.get(&id).and_then(Node::parent);
            while let Some(parent) = cursor {
                if parent == id {
                    if let Some(node) = self.nodes.get_mut(&id) {
                        warn!(node_id:% = id; "Breaking containment cycle");
                        let position = node.position();
                        node.detach(position);
                    }
                    break;
                }
                if !seen.insert(parent) {
                    break;
                }
                cursor = self.nodes.get(&parent).and_then(Node::parent);
            }
        }
    }

    fn unique_node_id(&self, prefix: &str) -> Id {
        let base = format!("{prefix}-{}", now_millis());
        let mut candidate = base.clone();
        let mut counter = 1;
        while self.nodes.contains_key(&Id::new(&candidate)) {
            candidate = format!("{base}-{counter}");
            counter += 1;
        }
        Id::new(&candidate)
    }

    fn unique_edge_id(&self, kind: &ConnectionKind) -> Id {
        let prefix = match kind {
            ConnectionKind::Structural => "erd-edge",
            _ => "edge",
        };
        loop {
            let id = Id::fresh(prefix);
            if !self.edges.contains_key(&id) {
                return id;
            }
        }
    }

    /// Containers that may receive a node, skipping `excluded`.
    fn candidates(&self, excluded: &IndexSet<Id>) -> Vec<Candidate> {
        self.nodes
            .values()
            .filter(|node| node.is_container() && !excluded.contains(&node.id()))
            .filter_map(|node| {
                let bounds = self.absolute_bounds(node.id())?;
                Some(Candidate::new(node.id(), node.shape().clone(), bounds))
            })
            .collect()
    }

    /// Creates a node from `template` with its top-left corner at `drop`
    /// (absolute), inside the best accepting container.
    ///
    /// Returns the id of the new node, or `None` when `drop` is not a finite
    /// point.
    pub fn add_node(&mut self, template: &NodeTemplate, drop: Point) -> Option<Id> {
        if !drop.is_finite() {
            warn!(x = drop.x(), y = drop.y(); "Ignoring drop at a non-finite position");
            return None;
        }
        let data = template.to_node_data();
        let bounds = Bounds::new_from_top_left(drop, data.size());
        let placement =
            self.containment
                .place(bounds, &data.shape, &self.candidates(&IndexSet::new()));

        let id = self.unique_node_id(template.prefix());
        let mut node = Node::new(id, drop, data);
        if let Some(node_type) = template.node_type() {
            node = node.with_node_type(node_type);
        }
        if let Some(parent) = placement.parent() {
            node.attach(parent, placement.position());
        }

        info!(node_id:% = id, shape:% = node.shape(), parent:? = placement.parent(); "Node added");
        self.nodes.insert(id, node);
        Some(id)
    }

    fn add_planned_node(&mut self, planned: &PlannedNode) -> Id {
        let id = self.unique_node_id(planned.id_prefix);
        let node = Node::new(id, planned.position, planned.data.clone());
        debug!(node_id:% = id; "Synthesized node added");
        self.nodes.insert(id, node);
        id
    }

    /// Moves a node so its top-left corner sits at `absolute`, re-resolving
    /// its container.
    ///
    /// The node and its descendants are never candidates, so containment
    /// stays acyclic. Children of a moved container keep their local
    /// positions and so travel with it. Returns false for an unknown id or a
    /// non-finite target.
    pub fn move_node(&mut self, id: Id, absolute: Point) -> bool {
        if !absolute.is_finite() {
            warn!(node_id:% = id, x = absolute.x(), y = absolute.y(); "Ignoring move to a non-finite position");
            return false;
        }
        let Some(node) = self.nodes.get(&id) else {
            debug!(node_id:% = id; "Ignoring move of unknown node");
            return false;
        };
        let bounds = node.bounds_at(absolute);
        let shape = node.shape().clone();

        let mut excluded = self.hierarchy().descendants_of(id);
        excluded.insert(id);
        let placement = self
            .containment
            .place(bounds, &shape, &self.candidates(&excluded));

        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        match placement.parent() {
            Some(parent) => node.attach(parent, placement.position()),
            None => node.detach(placement.position()),
        }
        debug!(node_id:% = id, parent:? = placement.parent(); "Node moved");
        true
    }

    fn endpoint(&self, id: Id) -> Option<Endpoint<'_>> {
        let node = self.nodes.get(&id)?;
        let bounds = self.absolute_bounds(id)?;
        Some(Endpoint::new(id, node.shape(), bounds))
    }

    fn insert_edge(&mut self, mut edge: Edge) -> Id {
        self.styles.decorate(&mut edge);
        let id = edge.id();
        self.edges.insert(id, edge);
        id
    }

    /// Attempts a connection, applying whatever the diagram's grammar decides.
    ///
    /// `selected_kind` is the kind chosen in the editor; grammars that
    /// dictate their own kind ignore it. Rejected and duplicate connections
    /// leave the graph unchanged.
    pub fn connect(
        &mut self,
        connection: &Connection,
        selected_kind: &ConnectionKind,
    ) -> ConnectOutcome {
        let outcome = grammar::on_connect_attempt(
            self.diagram_type,
            connection,
            self.endpoint(connection.source()),
            self.endpoint(connection.target()),
            self.edges.values(),
            selected_kind,
        );

        match &outcome {
            ConnectOutcome::Reject(reason) => {
                debug!(reason:%; "Connection rejected");
            }
            ConnectOutcome::Duplicate => {
                debug!(
                    source:% = connection.source(),
                    target:% = connection.target();
                    "Connection already exists"
                );
            }
            ConnectOutcome::AcceptDirect { kind } => {
                let edge = Edge::new(
                    self.unique_edge_id(kind),
                    connection.source(),
                    connection.target(),
                    kind.clone(),
                )
                .with_handles(connection.source_handle(), connection.target_handle());
                let id = self.insert_edge(edge);
                info!(edge_id:% = id, kind:% = kind; "Edge added");
            }
            ConnectOutcome::AcceptSynthesized { nodes, edges } => {
                let planned_ids: Vec<Id> =
                    nodes.iter().map(|node| self.add_planned_node(node)).collect();
                let resolve = |endpoint: PlannedEndpoint| match endpoint {
                    PlannedEndpoint::Existing(id) => Some(id),
                    PlannedEndpoint::Planned(index) => planned_ids.get(index).copied(),
                };
                for planned in edges {
                    let (Some(source), Some(target)) = (resolve(planned.source), resolve(planned.target))
                    else {
                        warn!("Skipping planned edge with an unresolved endpoint");
                        continue;
                    };
                    let edge = Edge::new(
                        self.unique_edge_id(&planned.kind),
                        source,
                        target,
                        planned.kind.clone(),
                    )
                    .with_handles(planned.source_handle, planned.target_handle);
                    self.insert_edge(edge);
                }
                info!(
                    nodes = planned_ids.len(),
                    edges = edges.len();
                    "Connection synthesized"
                );
            }
        }

        outcome
    }

    /// Sets a node's label to the trimmed `label`.
    ///
    /// Returns false, changing nothing, when the node is unknown, the trimmed
    /// label is empty, or it equals the current label.
    pub fn rename_node(&mut self, id: Id, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if node.label() == Some(label) {
            return false;
        }
        node.set_label(label);
        debug!(node_id:% = id, label; "Node renamed");
        true
    }

    /// Deletes the selected nodes with everything they contain, every edge
    /// touching a deleted node, and the selected edges.
    ///
    /// With no (existing) node selected only the selected edges go.
    pub fn delete_selection(&mut self, nodes: &[Id], edges: &[Id]) -> Deletion {
        let selected_edges: HashSet<Id> = edges.iter().copied().collect();
        let roots: Vec<Id> = nodes
            .iter()
            .copied()
            .filter(|id| self.nodes.contains_key(id))
            .collect();

        let closure = if roots.is_empty() {
            IndexSet::new()
        } else {
            self.hierarchy().closure(roots)
        };

        let mut deletion = Deletion::default();
        self.edges.retain(|id, edge| {
            let doomed = selected_edges.contains(id)
                || closure.contains(&edge.source())
                || closure.contains(&edge.target());
            if doomed {
                deletion.edges.push(*id);
            }
            !doomed
        });
        self.nodes.retain(|id, _| !closure.contains(id));
        deletion.nodes = closure.into_iter().collect();

        if !deletion.is_empty() {
            info!(
                nodes = deletion.nodes.len(),
                edges = deletion.edges.len();
                "Selection deleted"
            );
        }
        deletion
    }

    /// Removes a single edge. Returns false if it does not exist.
    pub fn remove_edge(&mut self, id: Id) -> bool {
        let removed = self.edges.shift_remove(&id).is_some();
        if removed {
            debug!(edge_id:% = id; "Edge removed");
        }
        removed
    }

    /// Returns the graph as a storable document.
    pub fn to_content(&self) -> DiagramContent {
        DiagramContent {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
        }
    }

    /// Serializes the graph to the stored JSON form.
    pub fn serialize(&self) -> Result<String, FlowboardError> {
        Ok(self.to_content().to_json()?)
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: Id) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Builds the parent→children index of the current nodes.
    pub fn hierarchy(&self) -> Hierarchy {
        Hierarchy::build(self.nodes.values())
    }

    /// Returns the direct children of `id`.
    pub fn children_of(&self, id: Id) -> Vec<Id> {
        self.hierarchy().children_of(id).to_vec()
    }

    /// Returns every node transitively contained in `id`.
    pub fn descendants_of(&self, id: Id) -> Vec<Id> {
        self.hierarchy().descendants_of(id).into_iter().collect()
    }

    /// Returns the absolute top-left position of a node.
    pub fn absolute_position(&self, id: Id) -> Option<Point> {
        let mut node = self.nodes.get(&id)?;
        let mut position = node.position();
        // Parent chains are acyclic after load; the bound only guards misuse.
        for _ in 0..self.nodes.len() {
            let Some(parent) = node.parent().and_then(|parent| self.nodes.get(&parent)) else {
                return Some(position);
            };
            position = position.add_point(parent.position());
            node = parent;
        }
        Some(position)
    }

    /// Returns the absolute bounds of a node.
    pub fn absolute_bounds(&self, id: Id) -> Option<Bounds> {
        let node = self.nodes.get(&id)?;
        Some(node.bounds_at(self.absolute_position(id)?))
    }
}
