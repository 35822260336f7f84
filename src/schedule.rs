//! Cancellable one-shot deadline.
//!
//! The task does not sleep on its own. The owner asks for the deadline,
//! waits with its own timer and then collects the expiry with
//! [`ScheduledTask::take_expired`].

use embassy_time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduledTask {
    deadline: Option<Instant>,
}

impl ScheduledTask {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the task to fire `delay` after `now`.
    ///
    /// A previously armed deadline is cancelled first.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.cancel();
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarm the task and return true if the deadline has passed
    pub fn take_expired(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
