//! Device state machines.
//!
//! Every device binds to one bus address, subscribes itself to the
//! [`Bus`](crate::bus::Bus) and filters the decoded stream on its own.
//! Devices hold the bus weakly and never close it.

pub mod antenna;
pub mod button;
pub mod debounced;
pub mod sensors;

pub use antenna::{AntennaEvent, RfidAntenna, TagState};
pub use button::{Button, ButtonEvent, ButtonState};
pub use debounced::{AntennaState, DebouncedAntenna};
pub use sensors::{
    AirButton, AirEvent, AlarmEvent, AlarmSensor, LightEvent, LightSensor, PresenceEvent,
    PresenceSensor, RotaryButton, RotaryEvent, Sensor, Translator,
};

use crate::error::Error;
use crate::protocol::codec::MAX_ADDRESS;

fn check_address(address: u16) -> Result<(), Error> {
    if address > MAX_ADDRESS {
        return Err(Error::Config("bus address must be 0..=999"));
    }
    Ok(())
}
