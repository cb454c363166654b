//! The edit lock as seen by one session.

use log::{info, warn};

use flowboard_core::model::LockInfo;

use super::service::{LockService, Notice, Notifier, User};
use crate::FlowboardError;

pub const LOCK_ACQUIRED: &str = "Diagram locked successfully!";
pub const LOCK_CONFLICT: &str = "Diagram is already locked by another user";
pub const LOCK_FAILED: &str = "Failed to lock diagram";
pub const UNLOCK_SUCCEEDED: &str = "Diagram unlocked successfully!";
pub const UNLOCK_FAILED: &str = "Failed to unlock diagram";

/// The last known lock on a diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockState {
    lock: Option<LockInfo>,
}

impl LockState {
    pub fn new(lock: Option<LockInfo>) -> Self {
        Self { lock }
    }

    pub fn lock(&self) -> Option<&LockInfo> {
        self.lock.as_ref()
    }

    /// Returns true if someone other than `user` holds the lock; edits are
    /// then suppressed.
    pub fn is_locked_by_other(&self, user: &User) -> bool {
        self.lock
            .as_ref()
            .is_some_and(|lock| lock.is_held_by_other(user.id()))
    }

    /// Refreshes the state from the lock service. On failure the previous
    /// state is kept.
    pub fn refresh(
        &mut self,
        diagram_id: u64,
        service: &mut dyn LockService,
    ) -> Result<(), FlowboardError> {
        self.lock = service.current(diagram_id)?;
        Ok(())
    }

    /// Asks the lock service to lock the diagram for `user`.
    ///
    /// Returns true on success. A conflict or any other failure is reported
    /// to the notifier and leaves the state unchanged.
    pub fn acquire(
        &mut self,
        diagram_id: u64,
        user: &User,
        service: &mut dyn LockService,
        notifier: &mut dyn Notifier,
    ) -> bool {
        match service.acquire(diagram_id, user) {
            Ok(lock) => {
                info!(diagram_id, user = user.id(); "Diagram locked");
                self.lock = Some(lock);
                notifier.notify(Notice::success(LOCK_ACQUIRED));
                true
            }
            Err(FlowboardError::LockConflict { holder, .. }) => {
                warn!(diagram_id, holder; "Diagram is locked by another user");
                notifier.notify(Notice::error(LOCK_CONFLICT));
                false
            }
            Err(err) => {
                warn!(diagram_id, err:%; "Failed to lock diagram");
                notifier.notify(Notice::error(LOCK_FAILED));
                false
            }
        }
    }

    /// Asks the lock service to release `user`'s lock.
    ///
    /// Returns true on success. Failure is reported to the notifier and
    /// leaves the state unchanged.
    pub fn release(
        &mut self,
        diagram_id: u64,
        user: &User,
        service: &mut dyn LockService,
        notifier: &mut dyn Notifier,
    ) -> bool {
        match service.release(diagram_id, user) {
            Ok(()) => {
                info!(diagram_id, user = user.id(); "Diagram unlocked");
                self.lock = None;
                notifier.notify(Notice::success(UNLOCK_SUCCEEDED));
                true
            }
            Err(err) => {
                warn!(diagram_id, err:%; "Failed to unlock diagram");
                notifier.notify(Notice::error(UNLOCK_FAILED));
                false
            }
        }
    }
}
