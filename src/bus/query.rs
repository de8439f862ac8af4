//! Single-waiter poll-and-wait primitive.
//!
//! A device writes a request frame, then parks one waiter until the
//! matching reply (or edge) shows up on the bus. Exactly one query may be
//! in flight per slot; a second `begin` fails fast with
//! [`QueryError::AlreadyPending`] instead of sharing the first reply.
//!
//! ```text
//!  begin(deadline) ──▶ PendingQuery ──wait().await──▶ Result<T, QueryError>
//!                          ▲                ▲
//!        resolve(value) ───┘                └─── expire(now_ms) on bus tick
//! ```
//!
//! The pending flag belongs to the [`PendingQuery`] guard: it is cleared
//! when the waiter completes or is dropped, never by the resolver. That
//! way a value signalled before the waiter is next polled cannot be
//! clobbered by a new `begin`.

use std::cell::Cell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;

use crate::error::QueryError;

pub struct QuerySlot<T> {
    signal: Signal<NoopRawMutex, Result<T, QueryError>>,
    pending: Cell<bool>,
    deadline_ms: Cell<Option<u64>>,
}

impl<T> Default for QuerySlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QuerySlot<T> {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
            pending: Cell::new(false),
            deadline_ms: Cell::new(None),
        }
    }

    /// Claim the slot. `deadline_ms` is on the bus clock; `None` waits forever.
    pub fn begin(&self, deadline_ms: Option<u64>) -> Result<PendingQuery<'_, T>, QueryError> {
        if self.pending.get() {
            return Err(QueryError::AlreadyPending);
        }
        self.signal.reset();
        self.pending.set(true);
        self.deadline_ms.set(deadline_ms);
        Ok(PendingQuery { slot: self })
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Hand `value` to the waiter. Only the first value after `begin`
    /// counts; with no waiter the value is dropped, not buffered.
    pub fn resolve(&self, value: T) -> bool {
        self.complete(Ok(value))
    }

    /// Fail the waiter with [`QueryError::TimedOut`] if its deadline has passed.
    pub fn expire(&self, now_ms: u64) -> bool {
        match self.deadline_ms.get() {
            Some(deadline) if now_ms >= deadline => self.complete(Err(QueryError::TimedOut)),
            _ => false,
        }
    }

    fn complete(&self, result: Result<T, QueryError>) -> bool {
        if !self.pending.get() || self.signal.signaled() {
            return false;
        }
        self.deadline_ms.set(None);
        self.signal.signal(result);
        true
    }
}

/// Claim on a [`QuerySlot`]. Dropping it releases the slot.
pub struct PendingQuery<'a, T> {
    slot: &'a QuerySlot<T>,
}

impl<T> PendingQuery<'_, T> {
    /// Suspend until the slot is resolved or expired.
    pub async fn wait(self) -> Result<T, QueryError> {
        self.slot.signal.wait().await
    }
}

impl<T> Drop for PendingQuery<'_, T> {
    fn drop(&mut self) {
        self.slot.pending.set(false);
        self.slot.deadline_ms.set(None);
    }
}
