//! End-to-end editing scenarios through the public API.

use std::time::{Duration, Instant};

use float_cmp::approx_eq;

use flowboard::{
    DiagramGraph, EditorSession,
    config::AppConfig,
    draw::MarkerShape,
    geometry::Point,
    grammar::{ConnectOutcome, Connection, RejectReason},
    identifier::Id,
    model::{ConnectionKind, DiagramRecord, DiagramType},
    payload::NodeTemplate,
    persist::{MemoryBackend, Notice, SAVE_FAILED, SAVE_SUCCEEDED, User},
    shape::ShapeKind,
};

const TWO_RECTANGLES: &str = r#"{
    "nodes": [
        {"id": "A", "type": "shape", "position": {"x": 0, "y": 0}, "data": {"shape": "rectangle", "label": "A"}},
        {"id": "B", "type": "shape", "position": {"x": 400, "y": 0}, "data": {"shape": "rectangle", "label": "B"}}
    ],
    "edges": []
}"#;

#[test]
fn test_conditional_connection_carries_its_visual() {
    let mut graph = DiagramGraph::new(DiagramType::Bpmn);
    graph.load(TWO_RECTANGLES);
    let (a, b) = (Id::new("A"), Id::new("B"));

    let outcome = graph.connect(&Connection::new(a, b), &ConnectionKind::Conditional);
    assert_eq!(
        outcome,
        ConnectOutcome::AcceptDirect {
            kind: ConnectionKind::Conditional
        }
    );

    assert_eq!(graph.edge_count(), 1);
    let edge = graph.edges().next().unwrap();
    assert_eq!((edge.source(), edge.target()), (a, b));
    assert_eq!(edge.kind(), Some(&ConnectionKind::Conditional));
    assert_eq!(edge.style.stroke_dasharray.as_deref(), Some("6 4"));
    assert_eq!(
        edge.marker_start.as_ref().map(|marker| marker.shape()),
        Some(&MarkerShape::Diamond)
    );
    assert_eq!(edge.label.as_deref(), Some("condition"));
}

#[test]
fn test_drop_inside_container_becomes_child() {
    let mut graph = DiagramGraph::new(DiagramType::Bpmn);
    let pool = graph.add_node(&NodeTemplate::new("pool", ShapeKind::Pool), Point::new(100.0, 50.0)).unwrap();

    let drop = Point::new(220.0, 140.0);
    let task = graph.add_node(&NodeTemplate::new("task", ShapeKind::Task), drop).unwrap();

    let node = graph.node(task).unwrap();
    assert_eq!(node.parent(), Some(pool));
    assert!(approx_eq!(f32, node.position().x(), 120.0));
    assert!(approx_eq!(f32, node.position().y(), 90.0));

    let absolute = graph.absolute_position(task).unwrap();
    assert!(approx_eq!(f32, absolute.x(), drop.x()));
    assert!(approx_eq!(f32, absolute.y(), drop.y()));
}

#[test]
fn test_drop_outside_container_stays_top_level() {
    let mut graph = DiagramGraph::new(DiagramType::Bpmn);
    graph.add_node(&NodeTemplate::new("pool", ShapeKind::Pool), Point::new(0.0, 0.0));

    let task = graph.add_node(&NodeTemplate::new("task", ShapeKind::Task), Point::new(2000.0, 0.0)).unwrap();
    assert_eq!(graph.node(task).unwrap().parent(), None);
}

#[test]
fn test_entities_connect_through_relationship() {
    let mut graph = DiagramGraph::new(DiagramType::Erd);
    let entity = NodeTemplate::new("entity", ShapeKind::Entity);
    let first = graph.add_node(&entity.clone().with_label("Entity1"), Point::new(0.0, 0.0)).unwrap();
    let second = graph.add_node(&entity.with_label("Entity2"), Point::new(600.0, 0.0)).unwrap();

    graph.connect(&Connection::new(first, second), &ConnectionKind::PRIMARY);

    assert_eq!(graph.node_count(), 3);
    let relationship = graph
        .nodes()
        .find(|node| node.id() != first && node.id() != second)
        .unwrap();
    assert_eq!(relationship.shape(), &ShapeKind::Diamond);
    assert_eq!(relationship.label(), Some("Relationship"));

    let endpoints: Vec<(Id, Id)> = graph
        .edges()
        .map(|edge| (edge.source(), edge.target()))
        .collect();
    assert_eq!(
        endpoints,
        vec![(first, relationship.id()), (relationship.id(), second)]
    );
}

#[test]
fn test_attributes_cannot_connect() {
    let mut graph = DiagramGraph::new(DiagramType::Erd);
    let attribute = NodeTemplate::new("attr", ShapeKind::Circle);
    let a = graph.add_node(&attribute, Point::new(0.0, 0.0)).unwrap();
    let b = graph.add_node(&attribute, Point::new(300.0, 0.0)).unwrap();

    let outcome = graph.connect(&Connection::new(a, b), &ConnectionKind::PRIMARY);
    assert!(matches!(
        outcome,
        ConnectOutcome::Reject(RejectReason::NotAllowed { .. })
    ));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_deleting_container_removes_contents() {
    let mut graph = DiagramGraph::new(DiagramType::Bpmn);
    let pool = graph.add_node(&NodeTemplate::new("pool", ShapeKind::Pool), Point::new(0.0, 0.0)).unwrap();
    let task = NodeTemplate::new("task", ShapeKind::Task);
    let first = graph.add_node(&task, Point::new(40.0, 40.0)).unwrap();
    let second = graph.add_node(&task, Point::new(400.0, 40.0)).unwrap();
    let outside = graph.add_node(&task, Point::new(1200.0, 40.0)).unwrap();
    graph.connect(&Connection::new(first, second), &ConnectionKind::PRIMARY);
    graph.connect(&Connection::new(second, outside), &ConnectionKind::PRIMARY);
    assert_eq!(graph.children_of(pool), vec![first, second]);

    let deletion = graph.delete_selection(&[pool], &[]);

    assert_eq!(deletion.nodes.len(), 3);
    assert_eq!(deletion.edges.len(), 2);
    assert_eq!(graph.node_count(), 1);
    assert!(graph.node(outside).is_some());
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_session_autosaves_after_quiet_period() {
    let start = Instant::now();
    let mut backend = MemoryBackend::new();
    backend.insert(DiagramRecord::new(3, "Flows", DiagramType::Dfd));
    let mut locks = MemoryBackend::new();
    let mut notices = Vec::new();

    let mut session = EditorSession::load(
        3,
        &mut backend,
        &mut locks,
        User::new("u1", "Ada"),
        &AppConfig::default(),
    )
    .unwrap();
    let payload = r#"{"id":"process","name":"Process","nodeConfig":{"shape":"circle"}}"#;
    session.drop_payload(payload, Point::new(0.0, 0.0), start);
    session.drop_payload(payload, Point::new(300.0, 0.0), start + Duration::from_millis(1500));

    assert!(!session.tick(start + Duration::from_millis(3000), &mut backend, &mut notices));
    assert!(session.tick(start + Duration::from_millis(3500), &mut backend, &mut notices));
    assert_eq!(backend.update_count(), 1);
    assert_eq!(notices, vec![Notice::success(SAVE_SUCCEEDED)]);

    let stored = backend.record(3).unwrap().parse_content().unwrap();
    assert_eq!(stored.nodes.len(), 2);
    assert_eq!(stored.nodes[0].label(), Some("Process"));
    session.close();
}

#[test]
fn test_failed_save_keeps_edits() {
    let now = Instant::now();
    let mut backend = MemoryBackend::new();
    backend.insert(DiagramRecord::new(4, "Flows", DiagramType::Bpmn));
    backend.fail_requests(true);
    let mut notices = Vec::new();

    let record = DiagramRecord::new(4, "Flows", DiagramType::Bpmn);
    let mut session = EditorSession::open(record, None, User::new("u1", "Ada"), &AppConfig::default());
    session.drop_template(&NodeTemplate::new("task", ShapeKind::Task), Point::new(0.0, 0.0), now);

    assert!(!session.save_now(&mut backend, &mut notices));
    assert_eq!(notices, vec![Notice::error(SAVE_FAILED)]);
    assert_eq!(session.graph().node_count(), 1);
    assert!(session.status().dirty);
}
