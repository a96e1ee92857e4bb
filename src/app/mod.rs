//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the controller service, the message vocabulary it
//! speaks, and the [`ports::Transport`] trait through which it exchanges one
//! batch of messages per tick with the physical units.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod telemetry;
