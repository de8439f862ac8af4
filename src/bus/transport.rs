//! Transport abstraction: the outbound half of the bus channel.
//!
//! Concrete implementations live outside this crate (UART, USB CDC, a
//! virtual port). The library only needs to hand it whole text frames;
//! byte framing is the transport's business.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use crate::error::TransportError;

/// Frame-oriented outbound channel.
pub trait Transport {
    /// Write one complete frame, e.g. `X001A[]`.
    fn send_frame(&mut self, frame: &str) -> Result<(), TransportError>;
}

/// A null transport that discards all writes.
/// Useful when a bus is only ever listened to.
pub struct NullTransport;

impl Transport for NullTransport {
    fn send_frame(&mut self, _frame: &str) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Records every frame written to it.
///
/// Clones share the same log, so a test can keep one handle and give
/// the other to the [`Bus`](super::Bus).
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    sent: Rc<RefCell<Vec<String>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames sent so far, oldest first.
    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    /// Drain the frame log.
    pub fn take(&self) -> Vec<String> {
        self.sent.take()
    }

    pub fn last(&self) -> Option<String> {
        self.sent.borrow().last().cloned()
    }
}

impl Transport for MemoryTransport {
    fn send_frame(&mut self, frame: &str) -> Result<(), TransportError> {
        self.sent.borrow_mut().push(frame.to_owned());
        Ok(())
    }
}

/// Adapter over any [`io::Write`] port (serial device handle, pipe, socket).
///
/// Frames are self-delimiting (`...]`), so the raw text is written as-is
/// and flushed.
pub struct WriteTransport<W: io::Write> {
    port: W,
}

impl<W: io::Write> WriteTransport<W> {
    pub fn new(port: W) -> Self {
        Self { port }
    }

    pub fn into_inner(self) -> W {
        self.port
    }
}

impl<W: io::Write> Transport for WriteTransport<W> {
    fn send_frame(&mut self, frame: &str) -> Result<(), TransportError> {
        self.port.write_all(frame.as_bytes()).map_err(io_error("write"))?;
        self.port.flush().map_err(io_error("flush"))
    }
}

fn io_error(op: &'static str) -> impl Fn(io::Error) -> TransportError {
    move |e| match e.kind() {
        io::ErrorKind::BrokenPipe | io::ErrorKind::NotConnected => TransportError::Closed,
        _ => TransportError::Io(op),
    }
}
