//! Concrete mode handlers and table builder.
//!
//! ```text
//!  INITIALISATION ──[units ready]──▶ NORMAL ◀──▶ DEGRADED
//!                                      │   [steam     │
//!                                      │    sensor]   │
//!                            [level sensor]    [level sensor]
//!                                      ▼              ▼
//!                                    RESCUE ◀─────────┘
//!
//!  Any mode ──[level outside M1..M2 / unusable sensors]──▶ EMERGENCY_STOP
//! ```
//!
//! NORMAL and DEGRADED share one operating cycle, parameterised by which
//! sensor checks the mode still cares about.

use log::{debug, error, info, warn};

use super::context::{ControllerState, TickOutput};
use super::{Mode, ModeDescriptor};
use crate::app::commands::OutboundMessage;
use crate::control::regulation;
use crate::safety::SafetyFault;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at construction.
pub fn build_mode_table() -> [ModeDescriptor; Mode::COUNT] {
    [
        ModeDescriptor {
            mode: Mode::Initialisation,
            name: "Initialisation",
            on_update: initialisation_update,
        },
        ModeDescriptor {
            mode: Mode::Normal,
            name: "Normal",
            on_update: normal_update,
        },
        ModeDescriptor {
            mode: Mode::Degraded,
            name: "Degraded",
            on_update: degraded_update,
        },
        ModeDescriptor {
            mode: Mode::Rescue,
            name: "Rescue",
            on_update: rescue_update,
        },
        ModeDescriptor {
            mode: Mode::EmergencyStop,
            name: "EmergencyStop",
            on_update: emergency_stop_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  INITIALISATION
// ═══════════════════════════════════════════════════════════════════════════

fn initialisation_update(st: &mut ControllerState, out: &mut TickOutput) {
    if st.has_fault(SafetyFault::LevelSensor) {
        error!(
            "INITIALISATION: level reading {:.1} unusable, stopping",
            st.readings.water_level
        );
        out.request_mode(Mode::EmergencyStop);
        return;
    }

    if st.physical_units_ready {
        if st.valve_open {
            out.send(OutboundMessage::Valve);
            st.valve_open = false;
        }
        info!("INITIALISATION: physical units ready");
        out.request_mode(Mode::Normal);
        return;
    }

    if st.boiler_waiting {
        // The boiler must not produce steam before the program is ready.
        if st.readings.steam_rate != 0.0 {
            error!(
                "INITIALISATION: steam {:.1} while waiting, stopping",
                st.readings.steam_rate
            );
            out.request_mode(Mode::EmergencyStop);
            return;
        }

        if st.limits.in_normal_band(st.readings.water_level) {
            out.send(OutboundMessage::ProgramReady);
        } else {
            regulation::adjust_initial_level(st, out);
        }
    }

    out.request_mode(Mode::Initialisation);
}

// ═══════════════════════════════════════════════════════════════════════════
//  NORMAL / DEGRADED: shared operating cycle
// ═══════════════════════════════════════════════════════════════════════════

/// Which sensor checks an operating mode runs before regulating.
#[derive(Debug, Clone, Copy)]
struct SensorChecks {
    /// Level sensor failure → RESCUE.
    level: bool,
    /// Steam sensor failure → DEGRADED.
    steam: bool,
    /// Both sensors failed at once → EMERGENCY_STOP.
    both: bool,
}

const NORMAL_CHECKS: SensorChecks = SensorChecks {
    level: true,
    steam: true,
    both: true,
};

// The steam sensor is already distrusted.
const DEGRADED_CHECKS: SensorChecks = SensorChecks {
    level: true,
    steam: false,
    both: false,
};

fn normal_update(st: &mut ControllerState, out: &mut TickOutput) {
    operating_cycle(st, out, NORMAL_CHECKS);
}

fn degraded_update(st: &mut ControllerState, out: &mut TickOutput) {
    operating_cycle(st, out, DEGRADED_CHECKS);
}

fn operating_cycle(st: &mut ControllerState, out: &mut TickOutput, checks: SensorChecks) {
    // Physical limits first: a real over/under-fill outranks sensor trouble.
    water_level_check(st, out);

    let level_failed = st.has_fault(SafetyFault::LevelSensor);
    let steam_failed = st.has_fault(SafetyFault::SteamSensor);

    if checks.level && level_failed {
        warn!("{:?}: water level sensor failure", st.mode);
        out.send(OutboundMessage::LevelFailureDetected);
        out.request_mode(Mode::Rescue);
    }
    if checks.steam && steam_failed {
        warn!("{:?}: steam sensor failure", st.mode);
        out.send(OutboundMessage::SteamFailureDetected);
        out.request_mode(Mode::Degraded);
    }
    if checks.both && level_failed && steam_failed {
        error!("{:?}: both sensors failed", st.mode);
        out.request_mode(Mode::EmergencyStop);
    }

    match out.requested_mode() {
        Some(Mode::Rescue | Mode::EmergencyStop) => {
            debug!("{:?}: level reading distrusted, regulation skipped", st.mode);
        }
        _ => regulation::maintain_water_level(st, out),
    }
}

/// Level outside [M1, M2] → EMERGENCY_STOP.
fn water_level_check(st: &ControllerState, out: &mut TickOutput) {
    if st.has_fault(SafetyFault::LevelOutOfLimits) {
        error!(
            "{:?}: water level {:.1} outside [{:.1}, {:.1}]",
            st.mode, st.readings.water_level, st.limits.m1, st.limits.m2
        );
        out.request_mode(Mode::EmergencyStop);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  RESCUE: level sensor distrusted, no regulation
// ═══════════════════════════════════════════════════════════════════════════

fn rescue_update(st: &mut ControllerState, out: &mut TickOutput) {
    water_level_check(st, out);

    if st.has_fault(SafetyFault::SteamSensor) {
        error!("RESCUE: steam sensor failed as well, stopping");
        out.request_mode(Mode::EmergencyStop);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  EMERGENCY_STOP: terminal
// ═══════════════════════════════════════════════════════════════════════════

fn emergency_stop_update(_st: &mut ControllerState, out: &mut TickOutput) {
    out.request_mode(Mode::EmergencyStop);
}
