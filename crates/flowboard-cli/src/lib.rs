//! CLI logic for the Flowboard diagram editor.
//!
//! Every command opens the target diagram from a [`DirectoryStore`] in an
//! [`EditorSession`], applies one gesture and, when the graph changed, saves
//! immediately instead of waiting for the autosave delay.

pub mod error_adapter;

mod args;
mod config;
mod notify;
mod store;

pub use args::{Args, Command};
pub use notify::LogNotifier;
pub use store::DirectoryStore;

use std::time::Instant;

use log::{info, warn};

use flowboard::{
    EditorSession, FlowboardError,
    config::AppConfig,
    geometry::Point,
    grammar::{ConnectOutcome, Connection},
    identifier::Id,
    payload::NodeTemplate,
    persist::{DiagramService, LockService, User},
};

/// Run the Flowboard CLI application
///
/// # Errors
///
/// Returns `FlowboardError` for:
/// - store I/O and JSON errors
/// - configuration loading errors
/// - unknown diagrams
/// - gestures on a diagram locked by another user
/// - failed saves and lock requests
pub fn run(args: &Args) -> Result<(), FlowboardError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let mut store = DirectoryStore::open(&args.store)?;
    let user = User::new(args.user.clone(), args.user.clone());

    if let Command::Create { name, diagram_type } = &args.command {
        let record = store.create(name, *diagram_type)?;
        println!("{}", record.id);
        return Ok(());
    }
    let Some(diagram_id) = args.command.diagram() else {
        return Ok(());
    };

    info!(diagram_id, user = user.id(); "Opening diagram");
    let mut session = open_session(&mut store, diagram_id, user, &app_config)?;
    let mut notifier = LogNotifier::new();
    let now = Instant::now();

    let changed = match &args.command {
        Command::Create { .. } => false,
        Command::Show { .. } => {
            print_diagram(&session);
            false
        }
        Command::Lock { .. } => {
            let locked = session.acquire_lock(&mut store, &mut notifier);
            return outcome(locked, &notifier);
        }
        Command::Unlock { .. } => {
            let unlocked = session.release_lock(&mut store, &mut notifier);
            return outcome(unlocked, &notifier);
        }
        Command::Export { format, .. } => {
            session.export(format, &mut notifier);
            false
        }
        gesture => {
            ensure_editable(&session)?;
            apply_gesture(&mut session, gesture, &mut notifier, now)
        }
    };

    if changed {
        let saved = session.save_now(&mut store, &mut notifier);
        outcome(saved, &notifier)?;
    }
    session.close();
    Ok(())
}

fn open_session(
    store: &mut DirectoryStore,
    diagram_id: u64,
    user: User,
    config: &AppConfig,
) -> Result<EditorSession, FlowboardError> {
    let record = store.fetch(diagram_id)?;
    let lock = store.current(diagram_id)?;
    Ok(EditorSession::open(record, lock, user, config))
}

fn ensure_editable(session: &EditorSession) -> Result<(), FlowboardError> {
    match session.lock() {
        Some(lock) if session.is_locked() => Err(FlowboardError::LockConflict {
            diagram_id: session.diagram_id(),
            holder: lock.username.clone(),
        }),
        _ => Ok(()),
    }
}

fn outcome(succeeded: bool, notifier: &LogNotifier) -> Result<(), FlowboardError> {
    if succeeded {
        return Ok(());
    }
    let message = notifier
        .last_error()
        .map_or_else(|| "Request failed".to_string(), |notice| notice.message().to_string());
    Err(FlowboardError::Rejected(message))
}

/// Applies one editing gesture. Returns true if the graph changed.
fn apply_gesture(
    session: &mut EditorSession,
    command: &Command,
    notifier: &mut LogNotifier,
    now: Instant,
) -> bool {
    match command {
        Command::Add {
            shape,
            label,
            payload,
            x,
            y,
            ..
        } => {
            let at = Point::new(*x, *y);
            let added = match payload {
                Some(raw) => session.drop_payload(raw, at, now),
                None => {
                    let mut template = NodeTemplate::new(shape.name(), shape.clone());
                    if let Some(label) = label {
                        template = template.with_label(label.clone());
                    }
                    session.drop_template(&template, at, now)
                }
            };
            match added {
                Some(id) => {
                    println!("{id}");
                    true
                }
                None => {
                    warn!("Dropped element was not added");
                    false
                }
            }
        }
        Command::Move { node, x, y, .. } => {
            report(session.drag_stop(Id::new(node), Point::new(*x, *y), now), "move", node)
        }
        Command::Connect {
            source,
            target,
            kind,
            source_handle,
            target_handle,
            ..
        } => {
            if let Some(kind) = kind {
                session.set_connection_kind(kind.clone());
            }
            let connection = Connection::new(Id::new(source), Id::new(target))
                .with_handles(*source_handle, *target_handle);
            match session.connect(connection, now) {
                Some(ConnectOutcome::Reject(reason)) => {
                    warn!(reason:%; "Connection rejected");
                    false
                }
                Some(ConnectOutcome::Duplicate) => {
                    warn!(source, target; "Connection already exists");
                    false
                }
                Some(_) => true,
                None => false,
            }
        }
        Command::Rename { node, label, .. } => {
            report(session.rename(Id::new(node), label, now), "rename", node)
        }
        Command::Delete { nodes, edges, .. } => {
            let nodes: Vec<Id> = nodes.iter().map(|id| Id::new(id)).collect();
            let edges: Vec<Id> = edges.iter().map(|id| Id::new(id)).collect();
            let deletion = session.delete_selection(&nodes, &edges, now);
            info!(nodes = deletion.nodes.len(), edges = deletion.edges.len(); "Deleted");
            !deletion.is_empty()
        }
        Command::RemoveEdge { edge, .. } => report(
            session.remove_edge(Id::new(edge), notifier, now),
            "remove-edge",
            edge,
        ),
        Command::Create { .. }
        | Command::Show { .. }
        | Command::Lock { .. }
        | Command::Unlock { .. }
        | Command::Export { .. } => false,
    }
}

fn report(changed: bool, gesture: &str, target: &str) -> bool {
    if !changed {
        warn!(gesture, target; "Nothing changed");
    }
    changed
}

fn print_diagram(session: &EditorSession) {
    let graph = session.graph();
    println!("{} ({})", session.name(), session.status());
    for node in graph.nodes() {
        let position = node.position();
        let parent = node
            .parent()
            .map(|parent| format!(" in {parent}"))
            .unwrap_or_default();
        println!(
            "node {} {} {:?} at ({}, {}){parent}",
            node.id(),
            node.shape(),
            node.label().unwrap_or_default(),
            position.x(),
            position.y(),
        );
    }
    for edge in graph.edges() {
        let kind = edge
            .kind()
            .map(|kind| kind.to_string())
            .unwrap_or_default();
        println!("edge {} {} -> {} {kind}", edge.id(), edge.source(), edge.target());
    }
}
