//! The editing context for one open diagram.
//!
//! An [`EditorSession`] is created when a diagram is opened and dropped when
//! it is closed. It owns the graph, the lock state and the save schedule, and
//! it is the only way gestures reach the graph: every mutating gesture is
//! ignored while another user holds the diagram's lock, and every effective
//! mutation restarts the autosave delay.
//!
//! Time is passed in by the caller. Nothing here sleeps or spawns.

use std::{fmt, time::Instant};

use log::{debug, info, warn};

use flowboard_core::{
    geometry::Point,
    identifier::Id,
    model::{ConnectionKind, DiagramRecord, DiagramType, LockInfo},
};

use crate::{
    FlowboardError,
    config::AppConfig,
    grammar::{ConnectOutcome, Connection},
    payload::{DragPayload, NodeTemplate},
    persist::{
        DiagramService, LockService, LockState, Notice, Notifier, PersistenceCoordinator, User,
    },
    structure::{Deletion, DiagramGraph},
};

pub const CONNECTION_REMOVED: &str = "Connection removed";

/// A snapshot of what the editor's status bar shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub title: &'static str,
    pub nodes: usize,
    pub edges: usize,
    pub saving: bool,
    pub pending: bool,
    pub dirty: bool,
    /// Username of the other user holding the lock, if any.
    pub locked_by: Option<String>,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} nodes, {} edges", self.title, self.nodes, self.edges)?;
        if self.saving {
            write!(f, ", saving")?;
        } else if self.dirty {
            write!(f, ", unsaved changes")?;
        }
        if let Some(holder) = &self.locked_by {
            write!(f, ", locked by {holder}")?;
        }
        Ok(())
    }
}

/// One open diagram and everything needed to edit it.
#[derive(Debug)]
pub struct EditorSession {
    diagram_id: u64,
    name: String,
    graph: DiagramGraph,
    user: User,
    lock: LockState,
    persistence: PersistenceCoordinator,
    connection_kind: ConnectionKind,
}

impl EditorSession {
    /// Opens a fetched diagram record.
    ///
    /// `lock` is the lock held on the diagram when it was opened, if any.
    /// Content that cannot be parsed opens as an empty diagram.
    pub fn open(record: DiagramRecord, lock: Option<LockInfo>, user: User, config: &AppConfig) -> Self {
        let mut graph = DiagramGraph::with_config(record.diagram_type, config);
        graph.load(record.content.as_deref().unwrap_or_default());

        let lock = LockState::new(lock);
        if lock.is_locked_by_other(&user) {
            info!(diagram_id = record.id; "Diagram is locked by another user, opening read-only");
        }
        info!(
            diagram_id = record.id,
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Diagram opened"
        );

        Self {
            diagram_id: record.id,
            name: record.name,
            graph,
            user,
            lock,
            persistence: PersistenceCoordinator::new(config.editor().autosave_delay()),
            connection_kind: config.editor().default_connection(),
        }
    }

    /// Fetches a diagram and its lock from the services and opens it.
    ///
    /// A failed lock lookup is logged and the diagram opens unlocked.
    pub fn load(
        diagram_id: u64,
        diagrams: &mut dyn DiagramService,
        locks: &mut dyn LockService,
        user: User,
        config: &AppConfig,
    ) -> Result<Self, FlowboardError> {
        let record = diagrams.fetch(diagram_id)?;
        let lock = locks.current(diagram_id).unwrap_or_else(|err| {
            warn!(diagram_id, err:%; "Failed to fetch lock status");
            None
        });
        Ok(Self::open(record, lock, user, config))
    }

    pub fn diagram_id(&self) -> u64 {
        self.diagram_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.graph.diagram_type()
    }

    pub fn title(&self) -> &'static str {
        self.diagram_type().title()
    }

    pub fn graph(&self) -> &DiagramGraph {
        &self.graph
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn lock(&self) -> Option<&LockInfo> {
        self.lock.lock()
    }

    /// Returns true if another user holds the lock; the session is then
    /// read-only.
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked_by_other(&self.user)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            title: self.title(),
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            saving: self.persistence.is_saving(),
            pending: self.persistence.is_pending(),
            dirty: self.persistence.is_dirty(),
            locked_by: self
                .lock
                .lock()
                .filter(|_| self.is_locked())
                .map(|lock| lock.username.clone()),
        }
    }

    fn editable(&self, gesture: &str) -> bool {
        let locked = self.is_locked();
        if locked {
            debug!(diagram_id = self.diagram_id, gesture; "Ignoring gesture on locked diagram");
        }
        !locked
    }

    /// Handles a palette drop at `at` (absolute).
    ///
    /// Returns the new node's id, or `None` when the payload is malformed or
    /// the diagram is locked.
    pub fn drop_payload(&mut self, raw: &str, at: Point, now: Instant) -> Option<Id> {
        if !self.editable("drop") {
            return None;
        }
        let template = DragPayload::parse(raw)?;
        self.drop_template(&template, at, now)
    }

    /// Adds a node built from `template` with its top-left corner at `at`.
    pub fn drop_template(&mut self, template: &NodeTemplate, at: Point, now: Instant) -> Option<Id> {
        if !self.editable("drop") {
            return None;
        }
        let id = self.graph.add_node(template, at)?;
        self.persistence.note_mutation(now);
        Some(id)
    }

    /// Finishes dragging a node to `at` (absolute top-left).
    pub fn drag_stop(&mut self, id: Id, at: Point, now: Instant) -> bool {
        if !self.editable("drag") {
            return false;
        }
        let moved = self.graph.move_node(id, at);
        if moved {
            self.persistence.note_mutation(now);
        }
        moved
    }

    /// The connection kind new edges get where the notation lets the user
    /// choose.
    pub fn connection_kind(&self) -> &ConnectionKind {
        &self.connection_kind
    }

    pub fn set_connection_kind(&mut self, kind: ConnectionKind) {
        debug!(kind:%; "Connection kind selected");
        self.connection_kind = kind;
    }

    /// Attempts a connection. Returns `None` when the diagram is locked.
    pub fn connect(&mut self, connection: Connection, now: Instant) -> Option<ConnectOutcome> {
        if !self.editable("connect") {
            return None;
        }
        let outcome = self.graph.connect(&connection, &self.connection_kind);
        if outcome.is_accepted() {
            self.persistence.note_mutation(now);
        }
        Some(outcome)
    }

    /// Commits an inline label edit.
    pub fn rename(&mut self, id: Id, label: &str, now: Instant) -> bool {
        if !self.editable("rename") {
            return false;
        }
        let renamed = self.graph.rename_node(id, label);
        if renamed {
            self.persistence.note_mutation(now);
        }
        renamed
    }

    /// Deletes the selected nodes, their contents and the selected edges.
    pub fn delete_selection(&mut self, nodes: &[Id], edges: &[Id], now: Instant) -> Deletion {
        if !self.editable("delete") {
            return Deletion::default();
        }
        let deletion = self.graph.delete_selection(nodes, edges);
        if !deletion.is_empty() {
            self.persistence.note_mutation(now);
        }
        deletion
    }

    /// Removes one edge from its context menu.
    pub fn remove_edge(&mut self, id: Id, notifier: &mut dyn Notifier, now: Instant) -> bool {
        if !self.editable("remove-edge") {
            return false;
        }
        let removed = self.graph.remove_edge(id);
        if removed {
            self.persistence.note_mutation(now);
            notifier.notify(Notice::success(CONNECTION_REMOVED));
        }
        removed
    }

    /// Saves right away. Does nothing while locked or while a save is in
    /// flight; a pending autosave is cancelled.
    pub fn save_now(&mut self, service: &mut dyn DiagramService, notifier: &mut dyn Notifier) -> bool {
        if !self.editable("save") || self.persistence.is_saving() {
            return false;
        }
        self.persistence
            .save(self.diagram_id, &self.graph, service, notifier)
    }

    /// Runs the autosave if it is due at `now`. Returns true if a save was
    /// attempted.
    pub fn tick(
        &mut self,
        now: Instant,
        service: &mut dyn DiagramService,
        notifier: &mut dyn Notifier,
    ) -> bool {
        if self.is_locked() {
            self.persistence.cancel();
            return false;
        }
        if !self.persistence.poll(now) {
            return false;
        }
        debug!(diagram_id = self.diagram_id; "Autosave due");
        self.persistence
            .save(self.diagram_id, &self.graph, service, notifier);
        true
    }

    /// Exports the diagram. Only a notice is produced; image export is not
    /// available.
    pub fn export(&self, format: &str, notifier: &mut dyn Notifier) {
        let format = format.to_uppercase();
        info!(diagram_id = self.diagram_id, format; "Export requested");
        notifier.notify(Notice::info(format!("Export to {format} feature coming soon!")));
    }

    /// Reloads the lock state from the lock service.
    pub fn refresh_lock(&mut self, service: &mut dyn LockService) -> Result<(), FlowboardError> {
        self.lock.refresh(self.diagram_id, service)
    }

    pub fn acquire_lock(&mut self, service: &mut dyn LockService, notifier: &mut dyn Notifier) -> bool {
        self.lock.acquire(self.diagram_id, &self.user, service, notifier)
    }

    pub fn release_lock(&mut self, service: &mut dyn LockService, notifier: &mut dyn Notifier) -> bool {
        self.lock.release(self.diagram_id, &self.user, service, notifier)
    }

    /// Closes the diagram. A pending autosave is dropped, not flushed.
    pub fn close(mut self) {
        if self.persistence.is_pending() {
            debug!(diagram_id = self.diagram_id; "Discarding pending autosave");
        }
        self.persistence.cancel();
        info!(diagram_id = self.diagram_id; "Diagram closed");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use flowboard_core::{model::DiagramContent, shape::ShapeKind};

    use super::*;
    use crate::persist::{MemoryBackend, NoticeLevel, SAVE_SUCCEEDED};

    const TASK_PAYLOAD: &str =
        r#"{"id":"task","name":"Task","nodeConfig":{"shape":"task","label":"Review"}}"#;

    fn alice() -> User {
        User::new("alice", "Alice")
    }

    fn foreign_lock() -> LockInfo {
        LockInfo {
            diagram_id: 1,
            user_id: "bob".to_string(),
            username: "Bob".to_string(),
            locked_at: String::new(),
        }
    }

    fn session(lock: Option<LockInfo>) -> EditorSession {
        let record = DiagramRecord::new(1, "Orders", DiagramType::Bpmn);
        EditorSession::open(record, lock, alice(), &AppConfig::default())
    }

    #[test]
    fn test_open_parses_content() {
        let mut record = DiagramRecord::new(1, "Orders", DiagramType::Erd);
        record.content = Some(r#"{"nodes":[{"id":"e1","position":{"x":0,"y":0},"data":{"shape":"entity"}}],"edges":[]}"#.to_string());
        let session = EditorSession::open(record, None, alice(), &AppConfig::default());

        assert_eq!(session.graph().node_count(), 1);
        assert_eq!(session.title(), "Entity Relationship Diagram");
        assert!(!session.is_locked());
    }

    #[test]
    fn test_open_with_malformed_content_is_empty() {
        let mut record = DiagramRecord::new(1, "Orders", DiagramType::Bpmn);
        record.content = Some("{not json".to_string());
        let session = EditorSession::open(record, None, alice(), &AppConfig::default());
        assert_eq!(session.graph().node_count(), 0);
    }

    #[test]
    fn test_drop_schedules_autosave() {
        let start = Instant::now();
        let mut session = session(None);
        let mut backend = MemoryBackend::new();
        backend.insert(DiagramRecord::new(1, "Orders", DiagramType::Bpmn));
        let mut notices = Vec::new();

        let id = session
            .drop_payload(TASK_PAYLOAD, Point::new(10.0, 10.0), start)
            .unwrap();
        assert_eq!(session.graph().node(id).unwrap().label(), Some("Review"));
        assert!(session.status().pending);

        assert!(!session.tick(start + Duration::from_millis(1999), &mut backend, &mut notices));
        assert!(session.tick(start + Duration::from_millis(2000), &mut backend, &mut notices));
        assert_eq!(notices, vec![Notice::success(SAVE_SUCCEEDED)]);

        let saved = DiagramContent::from_json(backend.record(1).unwrap().content.as_deref().unwrap())
            .unwrap();
        assert_eq!(saved.nodes.len(), 1);
    }

    #[test]
    fn test_malformed_drop_is_ignored() {
        let mut session = session(None);
        assert_eq!(session.drop_payload("{oops", Point::new(0.0, 0.0), Instant::now()), None);
        assert_eq!(session.graph().node_count(), 0);
        assert!(!session.status().pending);
    }

    #[test]
    fn test_locked_session_ignores_gestures() {
        let now = Instant::now();
        let mut session = session(Some(foreign_lock()));
        let mut backend = MemoryBackend::new();
        backend.insert(DiagramRecord::new(1, "Orders", DiagramType::Bpmn));
        let mut notices = Vec::new();

        assert!(session.is_locked());
        assert_eq!(session.drop_payload(TASK_PAYLOAD, Point::new(0.0, 0.0), now), None);
        assert_eq!(
            session.drop_template(&NodeTemplate::new("task", ShapeKind::Task), Point::new(0.0, 0.0), now),
            None
        );
        assert!(!session.save_now(&mut backend, &mut notices));
        assert_eq!(session.graph().node_count(), 0);
        assert_eq!(backend.update_count(), 0);
        assert_eq!(session.status().locked_by.as_deref(), Some("Bob"));
        assert!(notices.is_empty());
    }

    #[test]
    fn test_own_lock_allows_editing() {
        let mut own = foreign_lock();
        own.user_id = "alice".to_string();
        let mut session = session(Some(own));
        let id = session.drop_template(
            &NodeTemplate::new("task", ShapeKind::Task),
            Point::new(0.0, 0.0),
            Instant::now(),
        );
        assert!(id.is_some());
        assert_eq!(session.status().locked_by, None);
    }

    #[test]
    fn test_connect_uses_selected_kind() {
        let now = Instant::now();
        let mut session = session(None);
        let template = NodeTemplate::new("task", ShapeKind::Task);
        let a = session.drop_template(&template, Point::new(0.0, 0.0), now).unwrap();
        let b = session.drop_template(&template, Point::new(300.0, 0.0), now).unwrap();

        session.set_connection_kind(ConnectionKind::Message);
        let outcome = session.connect(Connection::new(a, b), now).unwrap();
        assert_eq!(outcome, ConnectOutcome::AcceptDirect { kind: ConnectionKind::Message });
        let edge = session.graph().edges().next().unwrap();
        assert_eq!(edge.kind(), Some(&ConnectionKind::Message));
    }

    #[test]
    fn test_remove_edge_notifies() {
        let now = Instant::now();
        let mut session = session(None);
        let template = NodeTemplate::new("task", ShapeKind::Task);
        let a = session.drop_template(&template, Point::new(0.0, 0.0), now).unwrap();
        let b = session.drop_template(&template, Point::new(300.0, 0.0), now).unwrap();
        session.connect(Connection::new(a, b), now);
        let edge = session.graph().edges().next().unwrap().id();

        let mut notices = Vec::new();
        assert!(session.remove_edge(edge, &mut notices, now));
        assert!(!session.remove_edge(edge, &mut notices, now));
        assert_eq!(notices, vec![Notice::success(CONNECTION_REMOVED)]);
    }

    #[test]
    fn test_manual_save_cancels_autosave() {
        let start = Instant::now();
        let mut session = session(None);
        let mut backend = MemoryBackend::new();
        backend.insert(DiagramRecord::new(1, "Orders", DiagramType::Bpmn));
        let mut notices = Vec::new();

        session.drop_template(&NodeTemplate::new("task", ShapeKind::Task), Point::new(0.0, 0.0), start);
        assert!(session.save_now(&mut backend, &mut notices));
        assert!(!session.tick(start + Duration::from_secs(5), &mut backend, &mut notices));
        assert_eq!(backend.update_count(), 1);
    }

    #[test]
    fn test_export_is_notification_only() {
        let session = session(None);
        let mut notices = Vec::new();
        session.export("png", &mut notices);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level(), NoticeLevel::Info);
        assert_eq!(notices[0].message(), "Export to PNG feature coming soon!");
    }

    #[test]
    fn test_load_and_lock_round_trip() {
        let mut backend = MemoryBackend::new();
        backend.insert(DiagramRecord::new(7, "Schema", DiagramType::Erd));
        let mut locks = MemoryBackend::new();
        let mut notices = Vec::new();

        let mut session =
            EditorSession::load(7, &mut backend, &mut locks, alice(), &AppConfig::default()).unwrap();
        assert!(session.acquire_lock(&mut locks, &mut notices));
        assert!(!session.is_locked());
        assert!(session.release_lock(&mut locks, &mut notices));
        assert_eq!(session.lock(), None);

        let missing = EditorSession::load(8, &mut backend, &mut locks, alice(), &AppConfig::default());
        assert!(matches!(missing, Err(FlowboardError::NotFound(8))));
    }
}
