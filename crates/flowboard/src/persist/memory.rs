//! In-process diagram and lock services.
//!
//! [`MemoryBackend`] keeps records and locks in memory. It backs tests and
//! embedders that do not persist anywhere; it can also be told to fail every
//! request, to exercise error paths.

use std::collections::HashMap;

use flowboard_core::model::{DiagramRecord, LockInfo};

use super::service::{DiagramService, LockService, User};
use crate::FlowboardError;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: HashMap<u64, DiagramRecord>,
    locks: HashMap<u64, LockInfo>,
    updates: usize,
    failing: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record, replacing any record with the same id.
    pub fn insert(&mut self, record: DiagramRecord) {
        self.records.insert(record.id, record);
    }

    pub fn record(&self, diagram_id: u64) -> Option<&DiagramRecord> {
        self.records.get(&diagram_id)
    }

    /// Number of successful content updates so far.
    pub fn update_count(&self) -> usize {
        self.updates
    }

    /// Makes every subsequent request fail with a transport error.
    pub fn fail_requests(&mut self, failing: bool) {
        self.failing = failing;
    }

    fn check(&self) -> Result<(), FlowboardError> {
        if self.failing {
            Err(FlowboardError::transport("service unavailable"))
        } else {
            Ok(())
        }
    }
}

impl DiagramService for MemoryBackend {
    fn fetch(&mut self, diagram_id: u64) -> Result<DiagramRecord, FlowboardError> {
        self.check()?;
        self.records
            .get(&diagram_id)
            .cloned()
            .ok_or(FlowboardError::NotFound(diagram_id))
    }

    fn update(&mut self, diagram_id: u64, content: &str) -> Result<(), FlowboardError> {
        self.check()?;
        let record = self
            .records
            .get_mut(&diagram_id)
            .ok_or(FlowboardError::NotFound(diagram_id))?;
        record.content = Some(content.to_string());
        self.updates += 1;
        Ok(())
    }
}

impl LockService for MemoryBackend {
    fn current(&mut self, diagram_id: u64) -> Result<Option<LockInfo>, FlowboardError> {
        self.check()?;
        Ok(self.locks.get(&diagram_id).cloned())
    }

    fn acquire(&mut self, diagram_id: u64, user: &User) -> Result<LockInfo, FlowboardError> {
        self.check()?;
        let held_by_other = self
            .locks
            .get(&diagram_id)
            .filter(|existing| existing.is_held_by_other(user.id()));
        if let Some(existing) = held_by_other {
            return Err(FlowboardError::LockConflict {
                diagram_id,
                holder: existing.username.clone(),
            });
        }
        let lock = LockInfo {
            diagram_id,
            user_id: user.id().to_string(),
            username: user.username().to_string(),
            locked_at: String::new(),
        };
        self.locks.insert(diagram_id, lock.clone());
        Ok(lock)
    }

    fn release(&mut self, diagram_id: u64, user: &User) -> Result<(), FlowboardError> {
        self.check()?;
        if self
            .locks
            .get(&diagram_id)
            .is_some_and(|lock| !lock.is_held_by_other(user.id()))
        {
            self.locks.remove(&diagram_id);
        }
        Ok(())
    }
}
