use std::time::{Duration, Instant};

/// Deadline-based debounce timer.
///
/// Scheduling while a deadline is pending replaces it (cancel-and-reschedule),
/// so the timer only fires after `quiet` has elapsed since the last trigger.
/// The caller supplies the clock; nothing here sleeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// (Re)starts the timer. Returns `true` if a pending deadline was replaced.
    pub fn schedule(&mut self, now: Instant) -> bool {
        self.deadline.replace(now + self.quiet).is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fires at most once per schedule: returns `true` and clears the deadline
    /// when `now` has reached it.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
