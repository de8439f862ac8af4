//! Bus channel: one transport shared by every device on the wire.
//!
//! ```text
//!                        ┌──────────────┐
//!   transport ─ frame ──▶│  Bus         │── &Command ──▶ Button      (addr 1, idx 0)
//!                        │  decode once │── &Command ──▶ Button      (addr 1, idx 1)
//!   transport ◀─ frame ──│  fan-out     │── &Command ──▶ RfidAntenna (addr 7)
//!                        │  tick()      │── now_ms ───▶ (debounce timers, query deadlines)
//!                        └──────────────┘
//! ```
//!
//! Single-threaded and cooperative: `dispatch` runs every listener to
//! completion before returning. Listeners are held weakly, so devices
//! own themselves and the bus never keeps one alive. Address filtering
//! happens in each device; the bus does no routing.

pub mod clock;
pub mod query;
pub mod transport;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, trace, warn};

use crate::error::{DecodeError, DeviceError, TransportError};
use crate::protocol::{Command, codec};

use clock::{Clock, MonotonicClock};
use transport::Transport;

/// Handle returned by [`Bus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Something that consumes decoded commands from a [`Bus`].
pub trait FrameListener {
    /// Handle one decoded command. Errors are logged by the bus and
    /// never stop delivery to other listeners.
    fn on_command(&self, command: &Command) -> Result<(), DeviceError>;

    /// Periodic tick carrying the bus clock reading.
    fn on_tick(&self, _now_ms: u64) {}
}

pub struct Bus {
    transport: RefCell<Box<dyn Transport>>,
    clock: Rc<dyn Clock>,
    listeners: RefCell<Vec<(ListenerId, Weak<dyn FrameListener>)>>,
    next_id: Cell<u32>,
}

impl Bus {
    /// Bus over `transport`, timed by a [`MonotonicClock`].
    pub fn new(transport: impl Transport + 'static) -> Rc<Self> {
        Self::with_clock(transport, Rc::new(MonotonicClock::new()))
    }

    pub fn with_clock(transport: impl Transport + 'static, clock: Rc<dyn Clock>) -> Rc<Self> {
        Rc::new(Self {
            transport: RefCell::new(Box::new(transport)),
            clock,
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        })
    }

    // ── Subscription ──────────────────────────────────────────

    pub fn subscribe(&self, listener: Weak<dyn FrameListener>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0.wrapping_add(1));
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }

    /// Number of live listeners (dead ones are pruned first).
    pub fn listener_count(&self) -> usize {
        self.live_listeners().len()
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Decode one frame and fan it out to every listener.
    ///
    /// Empty and unrecognised frames are protocol noise: dropped here,
    /// never surfaced to devices or the caller.
    pub fn dispatch(&self, frame: &str) {
        match codec::decode(frame) {
            Ok(command) => self.deliver(&command),
            Err(DecodeError::Empty | DecodeError::Unrecognized) => {
                trace!("BUS | dropped frame {:?}", frame);
            }
        }
    }

    /// Fan out an already-decoded command.
    pub fn deliver(&self, command: &Command) {
        for listener in self.live_listeners() {
            if let Err(e) = listener.on_command(command) {
                warn!("BUS | {} while handling {}", e, command);
            }
        }
    }

    /// Advance timers: every listener sees the current clock reading.
    pub fn tick(&self) {
        let now_ms = self.now_ms();
        for listener in self.live_listeners() {
            listener.on_tick(now_ms);
        }
    }

    // ── Outbound ──────────────────────────────────────────────

    pub fn send(&self, frame: &str) -> Result<(), TransportError> {
        debug!("BUS | -> {}", frame);
        self.transport.borrow_mut().send_frame(frame)
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Upgrade every listener, pruning the dropped ones. The returned
    /// snapshot lets listeners subscribe or unsubscribe during delivery.
    fn live_listeners(&self) -> Vec<Rc<dyn FrameListener>> {
        let mut listeners = self.listeners.borrow_mut();
        let mut live = Vec::with_capacity(listeners.len());
        listeners.retain(|(_, weak)| match weak.upgrade() {
            Some(listener) => {
                live.push(listener);
                true
            }
            None => false,
        });
        live
    }
}
