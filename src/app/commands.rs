//! Outbound actuator commands and notices.
//!
//! Emitted in order during a tick; observers rely on that order (a failure
//! notice always precedes the mode change it causes).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fsm::Mode;

/// Messages the controller sends to the physical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutboundMessage {
    /// Current (or newly requested) operating mode.
    Mode(Mode),
    OpenPump(usize),
    ClosePump(usize),
    /// Toggle the evacuation valve.
    Valve,
    LevelFailureDetected,
    SteamFailureDetected,
    /// Water level is inside the normal band; the plant may proceed.
    ProgramReady,
}

impl OutboundMessage {
    /// True for messages that move an actuator (pumps or valve).
    pub fn is_actuator_command(&self) -> bool {
        matches!(self, Self::OpenPump(_) | Self::ClosePump(_) | Self::Valve)
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mode(m) => write!(f, "MODE({m})"),
            Self::OpenPump(n) => write!(f, "OPEN_PUMP({n})"),
            Self::ClosePump(n) => write!(f, "CLOSE_PUMP({n})"),
            Self::Valve => write!(f, "VALVE"),
            Self::LevelFailureDetected => write!(f, "LEVEL_FAILURE_DETECTED"),
            Self::SteamFailureDetected => write!(f, "STEAM_FAILURE_DETECTED"),
            Self::ProgramReady => write!(f, "PROGRAM_READY"),
        }
    }
}
