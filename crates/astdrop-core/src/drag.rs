#![forbid(unsafe_code)]

//! Drag indicator state with a debounced release.
//!
//! Moving the pointer across nested children fires `dragleave` on one element
//! immediately followed by `dragenter` on the next. Releasing the indicator
//! only after a quiet period, cancelled by any `dragenter`/`dragover`, keeps
//! it from flickering.
//!
//! # Invariants
//!
//! 1. `dragenter` always leaves the state dragging with no release pending.
//! 2. A release armed by `dragleave` is discarded by a later `dragenter` or
//!    `dragover`, so an overlapping pair never reports "not dragging".
//! 3. `drop` ends dragging immediately.

use core::time::Duration;

use crate::debounce::DebounceTimer;
use crate::logging::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    dragging: bool,
    release: DebounceTimer,
    delay: Duration,
}

impl DragState {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            dragging: false,
            release: DebounceTimer::new(),
            delay,
        }
    }

    /// `dragenter`. Returns whether the state changed.
    pub fn enter(&mut self) -> bool {
        self.release.cancel();
        self.set(true)
    }

    /// `dragover`.
    pub fn over(&mut self) {
        self.release.cancel();
    }

    /// `dragleave`: arm (or re-arm) the release.
    pub fn leave(&mut self, now: Duration) {
        self.release.schedule(now, self.delay);
        trace!(deadline = ?self.release.deadline(), "drag release armed");
    }

    /// `drop`. Returns whether the state changed.
    pub fn drop_received(&mut self) -> bool {
        self.release.cancel();
        self.set(false)
    }

    /// Apply a release that is due at `now`. Returns whether the state changed.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.release.poll(now) {
            self.set(false)
        } else {
            false
        }
    }

    /// Apply a pending release now (real timer expired). Returns whether the state changed.
    pub fn release(&mut self) -> bool {
        if self.release.fire() {
            self.set(false)
        } else {
            false
        }
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[must_use]
    pub const fn release_pending(&self) -> bool {
        self.release.is_pending()
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    fn set(&mut self, dragging: bool) -> bool {
        if self.dragging == dragging {
            return false;
        }
        self.dragging = dragging;
        trace!(dragging, "drag state changed");
        true
    }
}
