//! XTalk bus library.
//!
//! Decodes the XTalk text protocol spoken by an addressable serial bus of
//! access-control peripherals and tracks per-device state from the frame
//! stream. Buttons, sensors and RFID antennas attach to a shared [`Bus`],
//! filter frames by address, and raise typed events.
//!
//! ```no_run
//! use xtalk::{Bus, Button, LogEventSink, MemoryTransport};
//!
//! let bus = Bus::new(MemoryTransport::new());
//! let button = Button::attach(&bus, 1, 0)?;
//! button.on_event(LogEventSink::new(1));
//! bus.dispatch("X001A[1]");
//! # Ok::<(), xtalk::Error>(())
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod bus;
pub mod config;
pub mod debounce;
pub mod devices;
pub mod error;
pub mod events;
pub mod protocol;

pub use adapters::LogEventSink;
pub use bus::clock::{Clock, ManualClock, MonotonicClock};
pub use bus::transport::{MemoryTransport, NullTransport, Transport, WriteTransport};
pub use bus::{Bus, FrameListener, ListenerId};
pub use config::BusConfig;
pub use devices::{
    AirButton, AlarmSensor, AntennaEvent, AntennaState, Button, ButtonEvent, ButtonState,
    DebouncedAntenna, LightSensor, PresenceSensor, RfidAntenna, RotaryButton, TagState,
};
pub use error::{DecodeError, DeviceError, Error, QueryError, Result, TransportError};
pub use events::{DomainEvent, EventSink};
pub use protocol::{Command, decode};
