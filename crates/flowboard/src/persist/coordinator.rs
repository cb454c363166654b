//! Save scheduling for an open diagram.

use std::time::{Duration, Instant};

use log::{debug, error, info};

use super::{
    debounce::DebounceTimer,
    service::{DiagramService, Notice, Notifier},
};
use crate::{FlowboardError, structure::DiagramGraph};

pub const SAVE_SUCCEEDED: &str = "Diagram saved successfully!";
pub const SAVE_FAILED: &str = "Failed to save diagram";

/// Decides when the graph is written back to the diagram service.
///
/// Every mutation restarts a debounce timer; once it has been quiet for the
/// configured delay, [`PersistenceCoordinator::poll`] reports that a save is
/// due. At most one save is in flight at a time. A failed save is reported
/// and the in-memory graph is kept as it is; the next mutation schedules a
/// fresh attempt.
#[derive(Debug, Clone)]
pub struct PersistenceCoordinator {
    timer: DebounceTimer,
    saving: bool,
    dirty: bool,
}

impl PersistenceCoordinator {
    pub fn new(delay: Duration) -> Self {
        Self {
            timer: DebounceTimer::new(delay),
            saving: false,
            dirty: false,
        }
    }

    /// Records a graph change made at `now` and restarts the autosave delay.
    pub fn note_mutation(&mut self, now: Instant) {
        self.dirty = true;
        self.timer.schedule(now);
    }

    /// Returns true when an autosave should start at `now`.
    ///
    /// The timer is consumed, so each quiet period yields one save. While a
    /// save is in flight the timer is left armed and polled again later.
    pub fn poll(&mut self, now: Instant) -> bool {
        !self.saving && self.timer.take_due(now)
    }

    /// Marks a save as started and returns the content to send.
    pub fn begin_save(&mut self, graph: &DiagramGraph) -> Result<String, FlowboardError> {
        let payload = graph.serialize()?;
        self.saving = true;
        Ok(payload)
    }

    /// Completes the in-flight save and tells the user how it went.
    pub fn finish_save(&mut self, result: Result<(), FlowboardError>, notifier: &mut dyn Notifier) {
        self.saving = false;
        match result {
            Ok(()) => {
                self.dirty = false;
                info!("Diagram saved");
                notifier.notify(Notice::success(SAVE_SUCCEEDED));
            }
            Err(err) => {
                error!(err:%; "Failed to save diagram");
                notifier.notify(Notice::error(SAVE_FAILED));
            }
        }
    }

    /// Saves the graph now, unless a save is already in flight.
    ///
    /// Any pending autosave is cancelled, since this save already carries the
    /// latest state. Returns true if the save succeeded.
    pub fn save(
        &mut self,
        diagram_id: u64,
        graph: &DiagramGraph,
        service: &mut dyn DiagramService,
        notifier: &mut dyn Notifier,
    ) -> bool {
        if self.saving {
            debug!(diagram_id; "Save already in flight");
            return false;
        }
        self.timer.cancel();

        let result = self
            .begin_save(graph)
            .and_then(|payload| {
                debug!(diagram_id, bytes = payload.len(); "Saving diagram");
                service.update(diagram_id, &payload)
            });
        let succeeded = result.is_ok();
        if self.saving {
            self.finish_save(result, notifier);
        } else if let Err(err) = result {
            error!(diagram_id, err:%; "Failed to serialize diagram");
            notifier.notify(Notice::error(SAVE_FAILED));
        }
        succeeded
    }

    /// Drops any pending autosave without saving.
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Returns true if an autosave is scheduled.
    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Returns true if the graph changed since the last successful save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use flowboard_core::model::{DiagramContent, DiagramRecord, DiagramType};

    use super::*;
    use crate::persist::memory::MemoryBackend;

    const DELAY: Duration = Duration::from_millis(2000);

    fn backend() -> MemoryBackend {
        let mut backend = MemoryBackend::new();
        backend.insert(DiagramRecord::new(1, "Orders", DiagramType::Bpmn));
        backend
    }

    #[test]
    fn test_poll_fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut coordinator = PersistenceCoordinator::new(DELAY);
        assert!(!coordinator.poll(start + DELAY));

        coordinator.note_mutation(start);
        coordinator.note_mutation(start + Duration::from_millis(500));
        assert!(!coordinator.poll(start + Duration::from_millis(2000)));
        assert!(coordinator.poll(start + Duration::from_millis(2500)));
        assert!(!coordinator.poll(start + Duration::from_millis(9000)));
    }

    #[test]
    fn test_poll_waits_for_in_flight_save() {
        let start = Instant::now();
        let graph = DiagramGraph::new(DiagramType::Bpmn);
        let mut coordinator = PersistenceCoordinator::new(DELAY);

        coordinator.note_mutation(start);
        coordinator.begin_save(&graph).unwrap();
        assert!(coordinator.is_saving());
        assert!(!coordinator.poll(start + DELAY));

        let mut notices = Vec::new();
        coordinator.finish_save(Ok(()), &mut notices);
        assert!(coordinator.poll(start + DELAY));
    }

    #[test]
    fn test_save_writes_content_and_notifies() {
        let mut backend = backend();
        let mut notices = Vec::new();
        let graph = DiagramGraph::new(DiagramType::Bpmn);
        let mut coordinator = PersistenceCoordinator::new(DELAY);
        coordinator.note_mutation(Instant::now());

        assert!(coordinator.save(1, &graph, &mut backend, &mut notices));
        assert!(!coordinator.is_saving());
        assert!(!coordinator.is_dirty());
        assert!(!coordinator.is_pending());
        assert_eq!(notices, vec![Notice::success(SAVE_SUCCEEDED)]);

        let stored = backend.record(1).unwrap().parse_content().unwrap();
        assert_eq!(stored, DiagramContent::default());
    }

    #[test]
    fn test_failed_save_keeps_state_dirty() {
        let mut backend = backend();
        backend.fail_requests(true);
        let mut notices = Vec::new();
        let graph = DiagramGraph::new(DiagramType::Bpmn);
        let mut coordinator = PersistenceCoordinator::new(DELAY);
        coordinator.note_mutation(Instant::now());

        assert!(!coordinator.save(1, &graph, &mut backend, &mut notices));
        assert!(!coordinator.is_saving());
        assert!(coordinator.is_dirty());
        assert_eq!(notices, vec![Notice::error(SAVE_FAILED)]);
    }
}
