//! Controller state threaded through every mode handler.
//!
//! `ControllerState` is the single struct handlers read from and write to:
//! the latest sensor snapshot, the pump array, latched plant flags, the
//! immutable limits and the fault bitmask computed by the safety supervisor.
//! `TickOutput` collects what a handler emits during one tick.

use log::debug;
use serde::{Deserialize, Serialize};

use super::Mode;
use crate::app::commands::OutboundMessage;
use crate::config::BoilerConfig;
use crate::drivers::pump::Pump;
use crate::error::ProtocolError;
use crate::safety::SafetyFault;

// ---------------------------------------------------------------------------
// Sensor snapshot (written by message ingestion)
// ---------------------------------------------------------------------------

/// Last reported sensor readings.  Both read `0.0` until the first
/// LEVEL/STEAM message arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Water level (litres).
    pub water_level: f64,
    /// Steam output (litres/sec).
    pub steam_rate: f64,
}

// ---------------------------------------------------------------------------
// Limits (copied from configuration, never mutated)
// ---------------------------------------------------------------------------

/// `M1 < N1 < N2 < M2 <= tank_capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterLimits {
    pub m1: f64,
    pub m2: f64,
    pub n1: f64,
    pub n2: f64,
    pub tank_capacity: f64,
}

impl WaterLimits {
    pub fn from_config(config: &BoilerConfig) -> Self {
        Self {
            m1: config.min_limit_level,
            m2: config.max_limit_level,
            n1: config.min_normal_level,
            n2: config.max_normal_level,
            tank_capacity: config.capacity,
        }
    }

    /// Midpoint of the normal band.
    pub fn band_midpoint(&self) -> f64 {
        self.n1 + 0.5 * (self.n2 - self.n1)
    }

    /// Strictly inside (N1, N2).
    pub fn in_normal_band(&self, level: f64) -> bool {
        self.n1 < level && level < self.n2
    }
}

// ---------------------------------------------------------------------------
// ControllerState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub mode: Mode,

    // -- Plant snapshot --
    pub readings: SensorSnapshot,
    /// Fixed length, one per configured pump.
    pub pumps: Vec<Pump>,
    /// Latched once PHYSICAL_UNITS_READY arrives.
    pub physical_units_ready: bool,
    /// Latched once STEAM_BOILER_WAITING arrives.
    pub boiler_waiting: bool,
    /// Latched while the controller holds the evacuation valve open.
    pub valve_open: bool,

    // -- Configuration --
    pub limits: WaterLimits,
    /// Reserved for estimating the level while the level sensor is
    /// distrusted.
    pub evacuation_rate: f64,
    /// Plant rating; no decision reads it.
    pub max_steam_rate: f64,
    /// Wall-clock length of one tick.
    pub tick_period_secs: f64,

    // -- Safety --
    /// Bitmask of [`SafetyFault`]s for the current tick, written by the
    /// safety supervisor before the mode handler runs.
    pub fault_flags: u8,
}

impl ControllerState {
    pub fn new(config: &BoilerConfig) -> Self {
        let pumps = (0..config.pump_count)
            .map(|i| Pump::new(config.pump_capacity(i)))
            .collect();
        Self {
            mode: Mode::Initialisation,
            readings: SensorSnapshot::default(),
            pumps,
            physical_units_ready: false,
            boiler_waiting: false,
            valve_open: false,
            limits: WaterLimits::from_config(config),
            evacuation_rate: config.evacuation_rate,
            max_steam_rate: config.max_steam_rate,
            tick_period_secs: config.tick_period_secs,
            fault_flags: 0,
        }
    }

    pub fn pump_count(&self) -> usize {
        self.pumps.len()
    }

    /// Bounds-checked access for indices that came off the wire.
    pub fn pump_mut(&mut self, index: usize) -> Result<&mut Pump, ProtocolError> {
        let pump_count = self.pumps.len();
        self.pumps
            .get_mut(index)
            .ok_or(ProtocolError::PumpIndexOutOfRange { index, pump_count })
    }

    /// Number of pumps that are on and not broken.
    pub fn opened_pumps(&self) -> usize {
        self.pumps.iter().filter(|p| p.is_running()).count()
    }

    /// Returns `true` if **any** safety fault is active.
    pub fn has_faults(&self) -> bool {
        self.fault_flags != 0
    }

    pub fn has_fault(&self, fault: SafetyFault) -> bool {
        self.fault_flags & fault.mask() != 0
    }
}

// ---------------------------------------------------------------------------
// TickOutput
// ---------------------------------------------------------------------------

/// Messages emitted and the mode requested during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    messages: Vec<OutboundMessage>,
    requested: Option<Mode>,
}

impl TickOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, message: OutboundMessage) {
        self.messages.push(message);
    }

    /// Request a transition to `mode` and announce it with a MODE message.
    ///
    /// Every distinct request is announced, in order.  Only a request that
    /// outranks the one already accepted this tick replaces it; the return
    /// value says whether this one is now the winner.  Repeating the current
    /// winner emits nothing.
    pub fn request_mode(&mut self, mode: Mode) -> bool {
        if self.requested == Some(mode) {
            return false;
        }
        self.messages.push(OutboundMessage::Mode(mode));
        if let Some(current) = self.requested {
            if current.precedence() >= mode.precedence() {
                debug!("mode request {mode} superseded by {current}");
                return false;
            }
        }
        self.requested = Some(mode);
        true
    }

    /// Close the tick: if a superseded request was announced after the
    /// winner, announce the winner again so the batch ends on the mode
    /// that is committed.
    pub fn settle(&mut self) {
        let Some(winner) = self.requested else {
            return;
        };
        let last_announced = self.messages.iter().rev().find_map(|m| match m {
            OutboundMessage::Mode(mode) => Some(*mode),
            _ => None,
        });
        if last_announced != Some(winner) {
            self.messages.push(OutboundMessage::Mode(winner));
        }
    }

    /// Winning mode request so far, if any.
    pub fn requested_mode(&self) -> Option<Mode> {
        self.requested
    }

    pub fn messages(&self) -> &[OutboundMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<OutboundMessage> {
        self.messages
    }
}
