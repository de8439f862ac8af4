//! Unified error types for the XTalk bus library.
//!
//! A single `Error` enum that every subsystem converts into, so callers
//! that juggle decoding, queries, and transports can use one `?` path.
//! All variants are `Copy`: they are passed through listener callbacks
//! and query signals without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A frame did not decode into a command.
    Decode(DecodeError),
    /// A poll-and-wait query failed.
    Query(QueryError),
    /// The outbound transport refused a frame.
    Transport(TransportError),
    /// A device rejected a command it received.
    Device(DeviceError),
    /// A constructor or config value is out of range.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Query(e) => write!(f, "query: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Device(e) => write!(f, "device: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// The decoder's closed error set. Both kinds are per-frame protocol noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Zero-length frame.
    Empty,
    /// No grammar rule matched.
    Unrecognized,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "message is empty"),
            Self::Unrecognized => write!(f, "unknown command"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// Another query on the same device has not resolved yet.
    AlreadyPending,
    /// The caller-supplied timeout elapsed on the bus clock.
    TimedOut,
    /// The request frame could not be written.
    Transport(TransportError),
    /// The bus this device was attached to has been dropped.
    BusClosed,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyPending => write!(f, "query already pending"),
            Self::TimedOut => write!(f, "query timed out"),
            Self::Transport(e) => write!(f, "request not sent: {e}"),
            Self::BusClosed => write!(f, "bus closed"),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<QueryError> for Error {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

impl From<TransportError> for QueryError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The underlying port is closed.
    Closed,
    /// Write failed; the tag names the failing operation.
    Io(&'static str),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "transport closed"),
            Self::Io(op) => write!(f, "I/O error during {op}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Device errors
// ---------------------------------------------------------------------------

/// Errors a device reports back to the bus while handling a command.
/// The bus logs them and keeps dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// A pick/place confirmation arrived with no antenna announce before it.
    OrphanConfirmation { address: u16 },
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanConfirmation { address } => {
                write!(f, "confirmation on X{address:03} without a preceding announce")
            }
        }
    }
}

impl std::error::Error for DeviceError {}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Library-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
