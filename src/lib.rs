//! Steam boiler controller library.
//!
//! A cyclic mode controller for a simulated steam boiler.  Each tick the
//! controller consumes one batch of plant messages, classifies the sensor
//! snapshot, runs the handler for its current mode and returns one batch
//! of actuator commands and notices.  All control logic is pure; I/O lives
//! behind the [`app::ports::Transport`] trait.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod safety;
pub mod wire;

pub use error::{Error, Result};
