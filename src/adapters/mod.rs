//! Adapters: concrete implementations of the crate's port traits.
//!
//! | Adapter    | Implements     | Connects to        |
//! |------------|----------------|--------------------|
//! | `log_sink` | EventSink      | `log` facade       |
//!
//! Frame transports live in [`crate::bus::transport`].

pub mod log_sink;

pub use log_sink::LogEventSink;
