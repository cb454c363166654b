//! A restartable one-shot timer.

use std::time::{Duration, Instant};

/// Fires once after a quiet period following the most recent `schedule`.
///
/// Time is supplied by the caller, so the timer never reads the clock.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms the timer to fire `delay` after `now`, replacing any earlier deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Disarms the timer.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true if the timer is armed and its deadline has passed.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Returns true exactly once per armed deadline, disarming the timer.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(2000);

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut timer = DebounceTimer::new(DELAY);
        assert!(!timer.is_pending());

        timer.schedule(start);
        assert!(timer.is_pending());
        assert!(!timer.is_due(start + Duration::from_millis(1999)));
        assert!(timer.is_due(start + DELAY));
    }

    #[test]
    fn test_schedule_restarts_the_delay() {
        let start = Instant::now();
        let mut timer = DebounceTimer::new(DELAY);

        timer.schedule(start);
        timer.schedule(start + Duration::from_millis(1500));
        assert!(!timer.take_due(start + Duration::from_millis(2500)));
        assert!(timer.take_due(start + Duration::from_millis(3500)));
    }

    #[test]
    fn test_take_due_fires_once() {
        let start = Instant::now();
        let mut timer = DebounceTimer::new(DELAY);
        timer.schedule(start);

        let later = start + Duration::from_secs(10);
        assert!(timer.take_due(later));
        assert!(!timer.take_due(later));
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timer = DebounceTimer::new(DELAY);
        timer.schedule(start);
        timer.cancel();
        assert!(!timer.take_due(start + Duration::from_secs(10)));
    }
}
