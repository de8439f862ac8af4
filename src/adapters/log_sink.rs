//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every device event to the `log`
//! facade, tagged with the bus address of the device that raised it.
//! Whatever logger the host installs decides where the lines end up.

use log::info;

use crate::events::{DomainEvent, EventSink};

/// Adapter that logs every [`DomainEvent`] it receives.
#[derive(Debug, Clone, Copy)]
pub struct LogEventSink {
    address: u16,
}

impl LogEventSink {
    pub fn new(address: u16) -> Self {
        Self { address }
    }

    pub fn address(&self) -> u16 {
        self.address
    }
}

impl<E: DomainEvent> EventSink<E> for LogEventSink {
    fn emit(&mut self, event: &E) {
        info!("EVENT | X{:03} | {} | {}", self.address, event.name(), event);
    }
}
