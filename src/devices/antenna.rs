//! RFID antenna reader with four tag slots.
//!
//! A pick or place is reported in two frames that must arrive back to
//! back:
//!
//! ```text
//!   XR[PU002]     announce (no address): slot 2, tentative pick
//!   X007A[1]      confirmation from antenna 7: "1" picked, "0" placed
//! ```
//!
//! The announce is held until the next confirmation for this address and
//! consumed by it. The confirmation value decides the event; a mismatch
//! with the announced action is only logged. Raw events are emitted on
//! every confirmation; suppressing repeats is the job of
//! [`DebouncedAntenna`](super::DebouncedAntenna).
//!
//! The long-format reply `X007B[ d004 d002 d000 d000]` answers
//! [`RfidAntenna::get_placed_tags`].

use core::fmt;
use std::cell::Cell;
use std::rc::{Rc, Weak};

use log::{debug, info};

use crate::bus::query::QuerySlot;
use crate::bus::{Bus, FrameListener, ListenerId};
use crate::error::{DeviceError, Error, QueryError};
use crate::events::{DomainEvent, Emitter, EventSink};
use crate::protocol::codec::{self, TAG_SLOTS};
use crate::protocol::{AntennaAction, AntennaCommand, Command, Format};

use super::check_address;

/// Slot numbers currently occupied, in reader order.
pub type PlacedTags = heapless::Vec<u16, TAG_SLOTS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagState {
    Picked,
    Placed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AntennaEvent {
    Picked(u16),
    Placed(u16),
}

impl AntennaEvent {
    pub fn new(slot: u16, state: TagState) -> Self {
        match state {
            TagState::Picked => Self::Picked(slot),
            TagState::Placed => Self::Placed(slot),
        }
    }

    pub fn slot(&self) -> u16 {
        match *self {
            Self::Picked(slot) | Self::Placed(slot) => slot,
        }
    }

    pub fn state(&self) -> TagState {
        match self {
            Self::Picked(_) => TagState::Picked,
            Self::Placed(_) => TagState::Placed,
        }
    }
}

impl DomainEvent for AntennaEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Picked(_) => "picked",
            Self::Placed(_) => "placed",
        }
    }
}

impl fmt::Display for AntennaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Picked(slot) => write!(f, "tag {slot} picked up"),
            Self::Placed(slot) => write!(f, "tag {slot} placed"),
        }
    }
}

pub struct RfidAntenna {
    bus: Weak<Bus>,
    listener: Cell<Option<ListenerId>>,
    address: u16,
    /// Announce waiting for its confirmation.
    announced: Cell<Option<AntennaCommand>>,
    last_tag_slot: Cell<Option<u16>>,
    events: Emitter<AntennaEvent>,
    snapshot: QuerySlot<PlacedTags>,
}

impl RfidAntenna {
    pub fn attach(bus: &Rc<Bus>, address: u16) -> Result<Rc<Self>, Error> {
        check_address(address)?;
        let antenna = Rc::new(Self {
            bus: Rc::downgrade(bus),
            listener: Cell::new(None),
            address,
            announced: Cell::new(None),
            last_tag_slot: Cell::new(None),
            events: Emitter::new(),
            snapshot: QuerySlot::new(),
        });
        let weak = Rc::downgrade(&antenna) as Weak<dyn FrameListener>;
        antenna.listener.set(Some(bus.subscribe(weak)));
        Ok(antenna)
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    /// Slot of the most recent announce seen on the bus, confirmed or not.
    pub fn last_tag_slot(&self) -> Option<u16> {
        self.last_tag_slot.get()
    }

    /// Whether an announce is still waiting for its confirmation.
    pub fn has_pending_announce(&self) -> bool {
        self.announced.get().is_some()
    }

    pub fn on_event(&self, sink: impl EventSink<AntennaEvent> + 'static) {
        self.events.subscribe(sink);
    }

    pub fn detach(&self) {
        if let (Some(id), Some(bus)) = (self.listener.take(), self.bus.upgrade()) {
            bus.unsubscribe(id);
        }
    }

    /// Request a snapshot and wait for the reply. Never times out.
    pub async fn get_placed_tags(&self) -> Result<PlacedTags, QueryError> {
        self.query_placed_tags(None).await
    }

    /// [`get_placed_tags`](Self::get_placed_tags) bounded by `timeout_ms`
    /// on the bus clock.
    pub async fn get_placed_tags_within(&self, timeout_ms: u32) -> Result<PlacedTags, QueryError> {
        self.query_placed_tags(Some(timeout_ms)).await
    }

    pub(crate) async fn query_placed_tags(
        &self,
        timeout_ms: Option<u32>,
    ) -> Result<PlacedTags, QueryError> {
        let pending = {
            let bus = self.bus.upgrade().ok_or(QueryError::BusClosed)?;
            let deadline = timeout_ms.map(|t| bus.now_ms().saturating_add(u64::from(t)));
            let pending = self.snapshot.begin(deadline)?;
            bus.send(&codec::snapshot_request_frame(self.address))?;
            pending
        };
        pending.wait().await
    }

    fn announce(&self, cmd: AntennaCommand) {
        if let Some(prev) = self.announced.replace(Some(cmd)) {
            debug!(
                "RFID | X{:03} announce slot {} superseded by slot {}",
                self.address, prev.tag_slot, cmd.tag_slot
            );
        }
        self.last_tag_slot.set(Some(cmd.tag_slot));
        debug!("RFID | X{:03} announce {:?} slot {}", self.address, cmd.action, cmd.tag_slot);
    }

    fn confirm(&self, state: TagState) -> Result<(), DeviceError> {
        let Some(cmd) = self.announced.take() else {
            return Err(DeviceError::OrphanConfirmation {
                address: self.address,
            });
        };

        let expected = match cmd.action {
            AntennaAction::PickUp => TagState::Picked,
            AntennaAction::PickDown => TagState::Placed,
        };
        if expected != state {
            debug!(
                "RFID | X{:03} slot {} announced {:?} but confirmed {:?}",
                self.address, cmd.tag_slot, cmd.action, state
            );
        }

        let event = AntennaEvent::new(cmd.tag_slot, state);
        info!("RFID | X{:03} {}", self.address, event);
        self.events.emit(&event);
        Ok(())
    }

    fn snapshot_reply(&self, payload: &str) {
        match codec::parse_tag_snapshot(payload) {
            Some(slots) => {
                self.snapshot.resolve(codec::placed_tags(&slots));
            }
            None => debug!("RFID | X{:03} ignoring long payload {:?}", self.address, payload),
        }
    }
}

impl FrameListener for RfidAntenna {
    fn on_command(&self, command: &Command) -> Result<(), DeviceError> {
        if let Command::Antenna(cmd) = command {
            self.announce(*cmd);
            return Ok(());
        }
        if let Some(payload) = command.xtalk_payload(self.address, Format::Short) {
            return match payload {
                "1" => self.confirm(TagState::Picked),
                "0" => self.confirm(TagState::Placed),
                _ => Ok(()),
            };
        }
        if let Some(payload) = command.xtalk_payload(self.address, Format::Long) {
            self.snapshot_reply(payload);
        }
        Ok(())
    }

    fn on_tick(&self, now_ms: u64) {
        self.snapshot.expire(now_ms);
    }
}
