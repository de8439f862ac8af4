//! Monotonic time sources for debounce windows and query deadlines.
//!
//! - [`MonotonicClock`] wraps `std::time::Instant` (milliseconds since
//!   construction).
//! - [`ManualClock`] is set by hand, for tests and replaying captured
//!   traffic at a controlled pace.

use std::cell::Cell;
use std::time::Instant;

pub trait Clock {
    /// Milliseconds on a monotonic base. Only differences are meaningful.
    fn now_ms(&self) -> u64;
}

pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        debug_assert!(now_ms >= self.now_ms.get(), "clock must not run backwards");
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}
