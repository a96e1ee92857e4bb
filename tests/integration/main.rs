//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that drives the controller through the
//! public API, one inbound batch per tick, against in-memory transports.

mod harness;
mod initialisation_tests;
mod operating_tests;
mod transport_tests;
