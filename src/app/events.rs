//! Inbound plant messages.
//!
//! The transport hands the controller one ordered batch of these per tick.
//! Order matters: several messages of one kind may arrive in the same batch
//! and the last one wins.

use serde::{Deserialize, Serialize};

use crate::fsm::Mode;

/// Messages the physical units send to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InboundMessage {
    // ── Handled ───────────────────────────────────────────────
    /// Operator/plant mode override.
    Mode(Mode),
    /// The boiler is waiting for the program to report ready.
    SteamBoilerWaiting,
    /// Physical units are ready; leave initialisation.
    PhysicalUnitsReady,
    /// Pump `pump` is running (`on`) or stopped.
    PumpState { pump: usize, on: bool },
    /// Pump `pump`'s flow controller sees water flowing.
    PumpControlState { pump: usize, on: bool },
    /// Water level reading (litres).
    Level(f64),
    /// Steam output reading (litres/sec).
    Steam(f64),

    // ── Acknowledged by the plant, ignored by this controller ──
    PumpRepaired(usize),
    PumpControlRepaired(usize),
    LevelRepaired,
    SteamRepaired,
    PumpFailureAcknowledgement(usize),
    PumpControlFailureAcknowledgement(usize),
    LevelFailureAcknowledgement,
    SteamFailureAcknowledgement,
    Stop,
}

impl InboundMessage {
    /// Pump index carried by this message, if it addresses a pump slot
    /// the controller will write to.
    pub fn pump_index(&self) -> Option<usize> {
        match self {
            Self::PumpState { pump, .. } | Self::PumpControlState { pump, .. } => Some(*pump),
            _ => None,
        }
    }
}
