#![forbid(unsafe_code)]

use core::time::Duration;

/// Host time for the fake widget: the instant handed to the drag handlers
/// and to the release poll.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// A clock at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Jump to `now`. Tests use this to place events at absolute times.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Move forward by `dt`, saturating at `Duration::MAX`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn advance_saturates() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(5));
        clock.set(Duration::MAX);
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::MAX);
    }
}
