//! Point-in-time status for display and logging.

use std::fmt;

use serde::Serialize;

use crate::fsm::Mode;

/// A snapshot of the controller suitable for a status line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub mode: Mode,
    pub tick: u64,
    /// Plant time covered by the ticks so far.
    pub elapsed_secs: f64,
    pub water_level: f64,
    pub steam_rate: f64,
    pub pumps_on: usize,
    pub pump_count: usize,
    pub valve_open: bool,
    pub fault_flags: u8,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | tick={} t={:.0}s | level={:.1} steam={:.1} | pumps={}/{} | valve={} | faults=0b{:03b}",
            self.mode,
            self.tick,
            self.elapsed_secs,
            self.water_level,
            self.steam_rate,
            self.pumps_on,
            self.pump_count,
            if self.valve_open { "OPEN" } else { "CLOSED" },
            self.fault_flags,
        )
    }
}
