//! Outbound domain events.
//!
//! Each device owns an [`Emitter`] for its own typed event enum. Sinks
//! are registered per device and every emission reaches all of them in
//! registration order.
//!
//! ```text
//! ┌────────┐  ButtonEvent   ┌─────────┐ ──▶ closure
//! │ Button │───────────────▶│ Emitter │ ──▶ LogEventSink
//! └────────┘                └─────────┘ ──▶ ...
//! ```

use core::fmt;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Common surface of every device event enum.
///
/// `name()` is the stable event name (`"pressed"`, `"phonePlaced"`, ...);
/// `Display` is the fixed human-readable text.
pub trait DomainEvent: fmt::Debug + fmt::Display {
    fn name(&self) -> &'static str;
}

/// Receiver of device events.
pub trait EventSink<E> {
    fn emit(&mut self, event: &E);
}

impl<E, F: FnMut(&E)> EventSink<E> for F {
    fn emit(&mut self, event: &E) {
        self(event);
    }
}

pub struct Emitter<E> {
    sinks: RefCell<Vec<Box<dyn EventSink<E>>>>,
    /// Events raised by a sink while another event is being delivered.
    queued: RefCell<VecDeque<E>>,
    emitting: Cell<bool>,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            sinks: RefCell::new(Vec::new()),
            queued: RefCell::new(VecDeque::new()),
            emitting: Cell::new(false),
        }
    }

    pub fn subscribe(&self, sink: impl EventSink<E> + 'static) {
        self.sinks.borrow_mut().push(Box::new(sink));
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.borrow().len()
    }

    fn deliver(&self, event: &E) {
        let mut active = self.sinks.take();
        for sink in &mut active {
            sink.emit(event);
        }
        let mut sinks = self.sinks.borrow_mut();
        let added = core::mem::replace(&mut *sinks, active);
        sinks.extend(added);
    }
}

impl<E: Clone> Emitter<E> {
    /// Deliver `event` to every sink.
    ///
    /// Sinks may register further sinks from inside the callback; those
    /// start receiving from the next emission. An event emitted from
    /// inside a sink is queued and reaches every sink once the current
    /// event has been fully delivered, so each sink sees events in order.
    pub fn emit(&self, event: &E) {
        if self.emitting.replace(true) {
            self.queued.borrow_mut().push_back(event.clone());
            return;
        }

        self.deliver(event);
        loop {
            let next = self.queued.borrow_mut().pop_front();
            match next {
                Some(nested) => self.deliver(&nested),
                None => break,
            }
        }
        self.emitting.set(false);
    }
}
