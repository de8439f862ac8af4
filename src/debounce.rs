//! Trailing-edge call coalescer.
//!
//! Every [`Debouncer::call`] cancels the pending value and restarts the
//! window; [`Debouncer::poll`] hands back the last value once a full window
//! has passed with no further calls. There is no max-wait backstop: an
//! unbroken stream of calls postpones the fire indefinitely.
//!
//! Time is injected by the caller (milliseconds on any monotonic base),
//! the same way the button driver runs its debounce off `tick(now_ms)`.

/// Pending value and the instant it becomes due.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending<T> {
    value: T,
    due_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window_ms: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms: u64::from(window_ms),
            pending: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Schedule `value`, replacing anything not yet fired.
    pub fn call(&mut self, value: T, now_ms: u64) {
        self.pending = Some(Pending {
            value,
            due_ms: now_ms.saturating_add(self.window_ms),
        });
    }

    /// Take the pending value if its window has elapsed at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| now_ms >= p.due_ms) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due, if any.
    pub fn due_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.due_ms)
    }
}
