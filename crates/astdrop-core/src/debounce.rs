#![forbid(unsafe_code)]

//! A cancellable one-shot deadline driven by host time.
//!
//! The timer never reads a clock. Hosts pass their monotonic `now` into
//! [`schedule`](DebounceTimer::schedule) and [`poll`](DebounceTimer::poll);
//! hosts with real timers call [`fire`](DebounceTimer::fire) from the timer
//! callback instead of polling.

use core::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceTimer {
    deadline: Option<Duration>,
}

impl DebounceTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer to expire `delay` after `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now.saturating_add(delay));
    }

    /// Disarm. Returns whether a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Expire the pending deadline regardless of time. Returns whether one was pending.
    pub fn fire(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Expire the deadline if it has been reached at `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn poll_fires_once_at_deadline() {
        let mut timer = DebounceTimer::new();
        timer.schedule(ms(100), ms(50));
        assert_eq!(timer.deadline(), Some(ms(150)));
        assert!(!timer.poll(ms(149)));
        assert!(timer.poll(ms(150)));
        assert!(!timer.poll(ms(500)));
        assert!(!timer.is_pending());
    }

    #[test]
    fn reschedule_replaces_deadline() {
        let mut timer = DebounceTimer::new();
        timer.schedule(ms(0), ms(50));
        timer.schedule(ms(40), ms(50));
        assert!(!timer.poll(ms(60)));
        assert!(timer.poll(ms(90)));
    }

    #[test]
    fn cancel_and_fire_report_pending() {
        let mut timer = DebounceTimer::new();
        assert!(!timer.cancel());
        assert!(!timer.fire());
        timer.schedule(ms(0), ms(50));
        assert!(timer.cancel());
        assert!(!timer.poll(ms(1000)));
        timer.schedule(ms(0), ms(50));
        assert!(timer.fire());
        assert!(!timer.is_pending());
    }

    #[test]
    fn deadline_saturates() {
        let mut timer = DebounceTimer::new();
        timer.schedule(Duration::MAX, ms(1));
        assert_eq!(timer.deadline(), Some(Duration::MAX));
    }
}
