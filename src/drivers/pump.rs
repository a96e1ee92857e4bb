//! Feed pump model.
//!
//! A dumb actuator record: what the plant last reported and what the
//! controller last commanded.  All decisions about when to run a pump live
//! in [`control::regulation`](crate::control::regulation).
//!
//! ## Safety contract
//!
//! A broken pump is never commanded on.  [`Pump::switch_on`] refuses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pump {
    /// Pump running, as last reported by the plant or commanded by us.
    is_on: bool,
    /// The pump's flow controller reports water flowing.
    controller_reports_on: bool,
    /// Throughput (litres/sec).
    capacity: f64,
    broken: bool,
}

impl Pump {
    pub fn new(capacity: f64) -> Self {
        Self {
            is_on: false,
            controller_reports_on: false,
            capacity,
            broken: false,
        }
    }

    /// Command the pump on.  Returns `false` (and stays off) if broken.
    pub fn switch_on(&mut self) -> bool {
        if self.broken {
            return false;
        }
        self.is_on = true;
        true
    }

    pub fn switch_off(&mut self) {
        self.is_on = false;
    }

    /// Record the plant's PUMP_STATE report.
    pub fn report_state(&mut self, on: bool) {
        self.is_on = on;
    }

    /// Record the plant's PUMP_CONTROL_STATE report.
    pub fn report_controller_state(&mut self, on: bool) {
        self.controller_reports_on = on;
    }

    pub fn set_broken(&mut self, broken: bool) {
        self.broken = broken;
        if broken {
            self.is_on = false;
        }
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// On and usable; this is what counts towards the active pump total.
    pub fn is_running(&self) -> bool {
        self.is_on && !self.broken
    }

    pub fn controller_reports_on(&self) -> bool {
        self.controller_reports_on
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }
}
