//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! through the public API, over an in-memory transport and a manual
//! clock. No serial port is required.

mod antenna_tests;
mod debounced_tests;
mod mock_bus;
mod query_tests;
mod sensor_tests;
