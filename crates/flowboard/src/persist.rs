//! Persistence of an open diagram.
//!
//! - [`DebounceTimer`]: restartable one-shot timer driven by caller-supplied time
//! - [`PersistenceCoordinator`]: autosave scheduling and the in-flight save guard
//! - [`LockState`]: the edit lock as seen by one session
//! - [`DiagramService`], [`LockService`], [`Notifier`]: the outside world
//! - [`MemoryBackend`]: in-process implementation of both services

mod coordinator;
mod debounce;
mod lock;
mod memory;
mod service;

pub use coordinator::{PersistenceCoordinator, SAVE_FAILED, SAVE_SUCCEEDED};
pub use debounce::DebounceTimer;
pub use lock::{
    LOCK_ACQUIRED, LOCK_CONFLICT, LOCK_FAILED, LockState, UNLOCK_FAILED, UNLOCK_SUCCEEDED,
};
pub use memory::MemoryBackend;
pub use service::{DiagramService, LockService, Notice, NoticeLevel, Notifier, User};
