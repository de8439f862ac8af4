//! Stateless enumerated sensors.
//!
//! Every matching status message is translated and emitted; nothing is
//! remembered between messages, so there is no edge suppression.
//!
//! | Sensor           | Format | Prefix | Payload → event                                   |
//! |------------------|--------|--------|---------------------------------------------------|
//! | `AlarmSensor`    | short  |        | `0` phonePlaced, `3` phonePicked, `4` alarmPlaced, `7` alarmPicked |
//! | `LightSensor`    | short  |        | `3` Open, `0` Off                                 |
//! | `PresenceSensor` | long   | `Dz=`  | `AB` close, numeric distanced, `XX` vanished       |
//! | `RotaryButton`   | long   | `Dr=`  | anything → change                                 |
//! | `AirButton`      | long   | `Bs=`  | `FAR` far, `NEAR` near, `IDLE` idle                |
//!
//! Payloads that map to nothing are ignored.

use core::fmt;
use core::marker::PhantomData;
use std::cell::Cell;
use std::rc::{Rc, Weak};

use log::debug;

use crate::bus::{Bus, FrameListener, ListenerId};
use crate::error::{DeviceError, Error};
use crate::events::{DomainEvent, Emitter, EventSink};
use crate::protocol::Command;
use crate::protocol::Format;
use crate::protocol::command::Payload;

use super::check_address;

/// Payload-to-event table of one sensor type.
pub trait Translator: 'static {
    type Event: DomainEvent + Clone + 'static;

    /// Log tag.
    const KIND: &'static str;
    const FORMAT: Format;
    /// Token stripped from the front of the payload before translation.
    const PREFIX: Option<&'static str> = None;

    fn translate(value: &str) -> Option<Self::Event>;
}

pub struct Sensor<T: Translator> {
    bus: Weak<Bus>,
    listener: Cell<Option<ListenerId>>,
    address: u16,
    events: Emitter<T::Event>,
    _table: PhantomData<T>,
}

impl<T: Translator> Sensor<T> {
    pub fn attach(bus: &Rc<Bus>, address: u16) -> Result<Rc<Self>, Error> {
        check_address(address)?;
        let sensor = Rc::new(Self {
            bus: Rc::downgrade(bus),
            listener: Cell::new(None),
            address,
            events: Emitter::new(),
            _table: PhantomData,
        });
        let weak = Rc::downgrade(&sensor) as Weak<dyn FrameListener>;
        sensor.listener.set(Some(bus.subscribe(weak)));
        Ok(sensor)
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn on_event(&self, sink: impl EventSink<T::Event> + 'static) {
        self.events.subscribe(sink);
    }

    pub fn detach(&self) {
        if let (Some(id), Some(bus)) = (self.listener.take(), self.bus.upgrade()) {
            bus.unsubscribe(id);
        }
    }
}

impl<T: Translator> FrameListener for Sensor<T> {
    fn on_command(&self, command: &Command) -> Result<(), DeviceError> {
        let Some(payload) = command.xtalk_payload(self.address, T::FORMAT) else {
            return Ok(());
        };
        let value = T::PREFIX
            .and_then(|prefix| payload.strip_prefix(prefix))
            .unwrap_or(payload);

        match T::translate(value) {
            Some(event) => {
                debug!("{} | X{:03} {}", T::KIND, self.address, event.name());
                self.events.emit(&event);
            }
            None => debug!("{} | X{:03} unmapped value {:?}", T::KIND, self.address, value),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Alarm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmEvent {
    PhonePlaced,
    PhonePicked,
    AlarmPlaced,
    AlarmPicked,
}

impl DomainEvent for AlarmEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::PhonePlaced => "phonePlaced",
            Self::PhonePicked => "phonePicked",
            Self::AlarmPlaced => "alarmPlaced",
            Self::AlarmPicked => "alarmPicked",
        }
    }
}

impl fmt::Display for AlarmEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PhonePlaced => "phone placed",
            Self::PhonePicked => "phone picked up",
            Self::AlarmPlaced => "alarm placed without phone",
            Self::AlarmPicked => "alarm picked up without phone",
        })
    }
}

pub struct AlarmTable;

impl Translator for AlarmTable {
    type Event = AlarmEvent;
    const KIND: &'static str = "ALARM";
    const FORMAT: Format = Format::Short;

    fn translate(value: &str) -> Option<AlarmEvent> {
        match value {
            "0" => Some(AlarmEvent::PhonePlaced),
            "3" => Some(AlarmEvent::PhonePicked),
            "4" => Some(AlarmEvent::AlarmPlaced),
            "7" => Some(AlarmEvent::AlarmPicked),
            _ => None,
        }
    }
}

pub type AlarmSensor = Sensor<AlarmTable>;

// ---------------------------------------------------------------------------
// Light
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightEvent {
    Open,
    Off,
}

impl DomainEvent for LightEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Off => "Off",
        }
    }
}

impl fmt::Display for LightEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "light open",
            Self::Off => "light off",
        })
    }
}

pub struct LightTable;

impl Translator for LightTable {
    type Event = LightEvent;
    const KIND: &'static str = "LIGHT";
    const FORMAT: Format = Format::Short;

    fn translate(value: &str) -> Option<LightEvent> {
        match value {
            "3" => Some(LightEvent::Open),
            "0" => Some(LightEvent::Off),
            _ => None,
        }
    }
}

pub type LightSensor = Sensor<LightTable>;

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PresenceEvent {
    Close,
    /// Distance reading, kept as sent (`007` stays `007`).
    Distanced(Payload),
    Vanished,
}

impl PresenceEvent {
    /// The distance reading as a number, if this is `Distanced`. An
    /// empty reading counts as zero.
    pub fn distance(&self) -> Option<f64> {
        match self {
            Self::Distanced(raw) => parse_reading(raw),
            _ => None,
        }
    }
}

/// Decimal reading with optional sign, fraction and surrounding blanks.
fn parse_reading(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|d| d.is_finite())
}

impl DomainEvent for PresenceEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Distanced(_) => "distanced",
            Self::Vanished => "vanished",
        }
    }
}

impl fmt::Display for PresenceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Close => write!(f, "very close"),
            Self::Distanced(d) => write!(f, "this close: {d}"),
            Self::Vanished => write!(f, "vanished"),
        }
    }
}

pub struct PresenceTable;

impl Translator for PresenceTable {
    type Event = PresenceEvent;
    const KIND: &'static str = "PRESENCE";
    const FORMAT: Format = Format::Long;
    const PREFIX: Option<&'static str> = Some("Dz=");

    fn translate(value: &str) -> Option<PresenceEvent> {
        match value {
            "AB" => Some(PresenceEvent::Close),
            "XX" => Some(PresenceEvent::Vanished),
            _ => {
                parse_reading(value)?;
                let mut raw = Payload::new();
                raw.push_str(value).ok()?;
                Some(PresenceEvent::Distanced(raw))
            }
        }
    }
}

pub type PresenceSensor = Sensor<PresenceTable>;

// ---------------------------------------------------------------------------
// Rotary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RotaryEvent {
    Change(Payload),
}

impl DomainEvent for RotaryEvent {
    fn name(&self) -> &'static str {
        "change"
    }
}

impl fmt::Display for RotaryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Change(v) => write!(f, "new value {v}"),
        }
    }
}

pub struct RotaryTable;

impl Translator for RotaryTable {
    type Event = RotaryEvent;
    const KIND: &'static str = "ROTARY";
    const FORMAT: Format = Format::Long;
    const PREFIX: Option<&'static str> = Some("Dr=");

    fn translate(value: &str) -> Option<RotaryEvent> {
        let mut v = Payload::new();
        // A suffix of a decoded payload always fits.
        v.push_str(value).ok()?;
        Some(RotaryEvent::Change(v))
    }
}

pub type RotaryButton = Sensor<RotaryTable>;

// ---------------------------------------------------------------------------
// Air (contactless) button
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirEvent {
    Far,
    Near,
    Idle,
}

impl DomainEvent for AirEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Far => "far",
            Self::Near => "near",
            Self::Idle => "idle",
        }
    }
}

impl fmt::Display for AirEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Far => "a hand is far away",
            Self::Near => "a hand is near",
            Self::Idle => "no hand",
        })
    }
}

pub struct AirTable;

impl Translator for AirTable {
    type Event = AirEvent;
    const KIND: &'static str = "AIR";
    const FORMAT: Format = Format::Long;
    const PREFIX: Option<&'static str> = Some("Bs=");

    fn translate(value: &str) -> Option<AirEvent> {
        match value {
            "FAR" => Some(AirEvent::Far),
            "NEAR" => Some(AirEvent::Near),
            "IDLE" => Some(AirEvent::Idle),
            _ => None,
        }
    }
}

pub type AirButton = Sensor<AirTable>;
