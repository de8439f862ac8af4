//! Debounced view of an [`RfidAntenna`].
//!
//! A tag being lifted and set down produces a burst of raw pick/place
//! events. Every raw event restarts one shared debounce window (the key is
//! global, not per slot), so only the last event of an unbroken burst is
//! considered. When the window elapses on [`Bus::tick`], that event is
//! compared with the stored slot state and emitted only if it changes it.
//!
//! ```text
//!   RfidAntenna ──raw event──▶ Debouncer<(slot, state)> ──tick──▶ AntennaState
//!                                                                     │ changed?
//!                                                                     ▼
//!                                                               AntennaEvent
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{info, warn};

use crate::bus::{Bus, FrameListener, ListenerId};
use crate::config::BusConfig;
use crate::debounce::Debouncer;
use crate::error::{DeviceError, Error, QueryError};
use crate::events::{Emitter, EventSink};
use crate::protocol::Command;
use crate::protocol::codec::TAG_SLOTS;

use super::antenna::{AntennaEvent, PlacedTags, RfidAntenna, TagState};

/// Last confirmed state of each tag slot, `None` until first reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AntennaState {
    slots: [Option<TagState>; TAG_SLOTS],
}

impl AntennaState {
    /// State of `slot` (1..=4). Out-of-range slots read as unknown.
    pub fn get(&self, slot: u16) -> Option<TagState> {
        Self::index(slot).and_then(|i| self.slots[i])
    }

    /// `(slot, state)` for slots 1..=4 in order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, Option<TagState>)> + '_ {
        (1u16..).zip(self.slots.iter().copied())
    }

    /// Slots whose last confirmed state is `Placed`.
    pub fn placed(&self) -> PlacedTags {
        self.iter()
            .filter(|(_, state)| *state == Some(TagState::Placed))
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Store `state`; returns whether the slot changed. Out-of-range
    /// slots are rejected with `None`.
    fn update(&mut self, slot: u16, state: TagState) -> Option<bool> {
        let entry = &mut self.slots[Self::index(slot)?];
        let changed = *entry != Some(state);
        *entry = Some(state);
        Some(changed)
    }

    fn index(slot: u16) -> Option<usize> {
        let i = usize::from(slot).checked_sub(1)?;
        (i < TAG_SLOTS).then_some(i)
    }
}

pub struct DebouncedAntenna {
    antenna: Rc<RfidAntenna>,
    bus: Weak<Bus>,
    listener: Cell<Option<ListenerId>>,
    debouncer: RefCell<Debouncer<(u16, TagState)>>,
    state: Cell<AntennaState>,
    query_timeout_ms: Option<u32>,
    events: Emitter<AntennaEvent>,
}

impl DebouncedAntenna {
    /// Wrap a new antenna at `address`, coalescing over `window_ms`.
    pub fn attach(bus: &Rc<Bus>, address: u16, window_ms: u32) -> Result<Rc<Self>, Error> {
        let config = BusConfig {
            debounce_window_ms: window_ms,
            ..BusConfig::default()
        };
        Self::from_config(bus, address, &config)
    }

    /// Like [`attach`](Self::attach), taking the window from `config`.
    /// `query_timeout_ms` bounds [`get_placed_tags`](Self::get_placed_tags).
    pub fn from_config(bus: &Rc<Bus>, address: u16, config: &BusConfig) -> Result<Rc<Self>, Error> {
        config.validate()?;
        let antenna = RfidAntenna::attach(bus, address)?;

        let debounced = Rc::new(Self {
            antenna,
            bus: Rc::downgrade(bus),
            listener: Cell::new(None),
            debouncer: RefCell::new(Debouncer::new(config.debounce_window_ms)),
            state: Cell::new(AntennaState::default()),
            query_timeout_ms: config.query_timeout_ms,
            events: Emitter::new(),
        });

        let weak = Rc::downgrade(&debounced);
        debounced.antenna.on_event(move |event: &AntennaEvent| {
            if let Some(this) = weak.upgrade() {
                this.schedule(*event);
            }
        });

        let weak = Rc::downgrade(&debounced) as Weak<dyn FrameListener>;
        debounced.listener.set(Some(bus.subscribe(weak)));
        Ok(debounced)
    }

    pub fn address(&self) -> u16 {
        self.antenna.address()
    }

    /// The wrapped antenna, for its raw (undebounced) events.
    pub fn antenna(&self) -> &Rc<RfidAntenna> {
        &self.antenna
    }

    pub fn antenna_state(&self) -> AntennaState {
        self.state.get()
    }

    pub fn on_event(&self, sink: impl EventSink<AntennaEvent> + 'static) {
        self.events.subscribe(sink);
    }

    /// Detach from the bus and drop any burst still waiting.
    pub fn detach(&self) {
        self.antenna.detach();
        self.debouncer.borrow_mut().cancel();
        if let (Some(id), Some(bus)) = (self.listener.take(), self.bus.upgrade()) {
            bus.unsubscribe(id);
        }
    }

    /// Forwarded to [`RfidAntenna`] without debouncing, bounded by the
    /// configured query timeout if one is set.
    pub async fn get_placed_tags(&self) -> Result<PlacedTags, QueryError> {
        self.antenna.query_placed_tags(self.query_timeout_ms).await
    }

    pub async fn get_placed_tags_within(&self, timeout_ms: u32) -> Result<PlacedTags, QueryError> {
        self.antenna.get_placed_tags_within(timeout_ms).await
    }

    fn schedule(&self, event: AntennaEvent) {
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        self.debouncer
            .borrow_mut()
            .call((event.slot(), event.state()), bus.now_ms());
    }

    fn settle(&self, slot: u16, tag: TagState) {
        let mut state = self.state.get();
        match state.update(slot, tag) {
            None => warn!("RFID | X{:03} discarding slot {} outside 1..=4", self.address(), slot),
            Some(false) => {}
            Some(true) => {
                self.state.set(state);
                let event = AntennaEvent::new(slot, tag);
                info!("RFID | X{:03} settled: {}", self.address(), event);
                self.events.emit(&event);
            }
        }
    }
}

impl FrameListener for DebouncedAntenna {
    fn on_command(&self, _command: &Command) -> Result<(), DeviceError> {
        Ok(())
    }

    fn on_tick(&self, now_ms: u64) {
        let due = self.debouncer.borrow_mut().poll(now_ms);
        if let Some((slot, tag)) = due {
            self.settle(slot, tag);
        }
    }
}
