//! Actuator models.

pub mod pump;
