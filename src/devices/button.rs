//! Multiplexed momentary button on a 4-button XTalk board.
//!
//! Four buttons share one bus address; each short-status value carries
//! all four (see [`is_bit_set`](crate::protocol::bitmask::is_bit_set)).
//! Each `Button` watches one bit index and emits only on edges:
//!
//! | State      | Bit set in new value | Bit clear in new value |
//! |-----------|-----------------------|------------------------|
//! | `Released` | → `Pressed`, emit     | stay                   |
//! | `Pressed`  | stay                  | → `Released`, emit     |
//!
//! Non-numeric payloads are ignored.

use core::fmt;
use std::cell::Cell;
use std::rc::{Rc, Weak};

use log::info;

use crate::bus::query::QuerySlot;
use crate::bus::{Bus, FrameListener, ListenerId};
use crate::error::{DeviceError, Error, QueryError};
use crate::events::{DomainEvent, Emitter, EventSink};
use crate::protocol::bitmask::{MAX_BUTTON_INDEX, is_bit_set};
use crate::protocol::{Command, Format, codec};

use super::check_address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Released,
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEvent {
    Pressed,
    Released,
}

impl DomainEvent for ButtonEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Pressed => "pressed",
            Self::Released => "released",
        }
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => write!(f, "button pressed"),
            Self::Released => write!(f, "button released"),
        }
    }
}

pub struct Button {
    bus: Weak<Bus>,
    listener: Cell<Option<ListenerId>>,
    address: u16,
    index: u8,
    state: Cell<ButtonState>,
    events: Emitter<ButtonEvent>,
    /// Waiter for the next edge, used by `is_pressed`.
    next_edge: QuerySlot<ButtonState>,
}

impl Button {
    /// Attach button `index` (0..=3) of the board at `address`.
    pub fn attach(bus: &Rc<Bus>, address: u16, index: u8) -> Result<Rc<Self>, Error> {
        check_address(address)?;
        if index > MAX_BUTTON_INDEX {
            return Err(Error::Config("button index must be 0..=3"));
        }

        let button = Rc::new(Self {
            bus: Rc::downgrade(bus),
            listener: Cell::new(None),
            address,
            index,
            state: Cell::new(ButtonState::Released),
            events: Emitter::new(),
            next_edge: QuerySlot::new(),
        });
        let weak = Rc::downgrade(&button) as Weak<dyn FrameListener>;
        button.listener.set(Some(bus.subscribe(weak)));
        Ok(button)
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn state(&self) -> ButtonState {
        self.state.get()
    }

    pub fn on_event(&self, sink: impl EventSink<ButtonEvent> + 'static) {
        self.events.subscribe(sink);
    }

    /// Stop listening to the bus. Pending queries stay parked.
    pub fn detach(&self) {
        if let (Some(id), Some(bus)) = (self.listener.take(), self.bus.upgrade()) {
            bus.unsubscribe(id);
        }
    }

    /// Poll the board and wait for the next press/release edge.
    ///
    /// Resolves on a *change*, not on the reply itself: if the reply
    /// repeats the current state, this keeps waiting. The button starts
    /// out `Released`, so on a fresh button a `0` reply is not an edge and
    /// the query stays pending until the button is actually pressed. Use
    /// [`is_pressed_within`](Self::is_pressed_within) to bound the wait.
    /// Never times out.
    pub async fn is_pressed(&self) -> Result<bool, QueryError> {
        self.query(None).await
    }

    /// [`is_pressed`](Self::is_pressed) bounded by `timeout_ms` on the bus
    /// clock. The deadline is checked on [`Bus::tick`].
    pub async fn is_pressed_within(&self, timeout_ms: u32) -> Result<bool, QueryError> {
        self.query(Some(timeout_ms)).await
    }

    async fn query(&self, timeout_ms: Option<u32>) -> Result<bool, QueryError> {
        let pending = {
            let bus = self.bus.upgrade().ok_or(QueryError::BusClosed)?;
            let deadline = timeout_ms.map(|t| bus.now_ms().saturating_add(u64::from(t)));
            let pending = self.next_edge.begin(deadline)?;
            bus.send(&codec::poll_frame(self.address))?;
            pending
        };
        let edge = pending.wait().await?;
        Ok(edge == ButtonState::Pressed)
    }

    fn transition(&self, to: ButtonState) {
        self.state.set(to);
        info!("BTN | X{:03}#{} -> {:?}", self.address, self.index, to);
        let event = match to {
            ButtonState::Pressed => ButtonEvent::Pressed,
            ButtonState::Released => ButtonEvent::Released,
        };
        self.next_edge.resolve(to);
        self.events.emit(&event);
    }
}

impl FrameListener for Button {
    fn on_command(&self, command: &Command) -> Result<(), DeviceError> {
        let Some(payload) = command.xtalk_payload(self.address, Format::Short) else {
            return Ok(());
        };
        // Empty (`X001A[]`, a poll echo) and non-numeric payloads carry no state.
        let Ok(value) = payload.parse::<u32>() else {
            return Ok(());
        };

        let pressed = is_bit_set(value, self.index);
        match (pressed, self.state.get()) {
            (true, ButtonState::Released) => self.transition(ButtonState::Pressed),
            (false, ButtonState::Pressed) => self.transition(ButtonState::Released),
            _ => {}
        }
        Ok(())
    }

    fn on_tick(&self, now_ms: u64) {
        self.next_edge.expire(now_ms);
    }
}
