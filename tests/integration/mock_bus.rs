//! Mock bus fixture for integration tests.
//!
//! Wires a [`Bus`] to a [`MemoryTransport`] and a [`ManualClock`] so tests
//! can inject frames, read back what devices wrote, and step time.

use std::cell::RefCell;
use std::rc::Rc;

use xtalk::{Bus, ManualClock, MemoryTransport, Transport, TransportError};

// ── Bus fixture ───────────────────────────────────────────────

pub struct MockBus {
    pub bus: Rc<Bus>,
    pub clock: Rc<ManualClock>,
    pub transport: MemoryTransport,
}

#[allow(dead_code)]
impl MockBus {
    pub fn new() -> Self {
        let clock = Rc::new(ManualClock::new(0));
        let transport = MemoryTransport::new();
        let bus = Bus::with_clock(transport.clone(), clock.clone());
        Self {
            bus,
            clock,
            transport,
        }
    }

    /// Feed frames in order, as the transport would.
    pub fn feed(&self, frames: &[&str]) {
        for frame in frames {
            self.bus.dispatch(frame);
        }
    }

    /// Advance the clock by `ms` and tick the bus once.
    pub fn advance(&self, ms: u64) {
        self.clock.advance(ms);
        self.bus.tick();
    }

    pub fn sent(&self) -> Vec<String> {
        self.transport.sent()
    }
}

// ── Failing transport ─────────────────────────────────────────

/// Port that refuses every write, as if the serial device went away.
pub struct FailingTransport;

impl Transport for FailingTransport {
    fn send_frame(&mut self, _frame: &str) -> Result<(), TransportError> {
        Err(TransportError::Closed)
    }
}

// ── Event recorder ────────────────────────────────────────────

/// Shared log of every event a sink received.
pub struct Recorded<E>(Rc<RefCell<Vec<E>>>);

#[allow(dead_code)]
impl<E: Clone + 'static> Recorded<E> {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Vec::new())))
    }

    /// A sink closure that appends to this log.
    pub fn sink(&self) -> impl FnMut(&E) + 'static {
        let log = self.0.clone();
        move |e: &E| log.borrow_mut().push(e.clone())
    }

    pub fn events(&self) -> Vec<E> {
        self.0.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}
