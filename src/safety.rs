//! Safety supervisor.
//!
//! The supervisor runs **every tick before the mode handler** and turns the
//! latest readings into a fault bitmask stored in
//! `ControllerState.fault_flags`.  Mode handlers decide what each fault
//! means in their mode; the supervisor only classifies.
//!
//! ## Classification
//!
//! | Fault              | Condition                                      |
//! |--------------------|------------------------------------------------|
//! | `LevelSensor`      | level `< 0` or `>= capacity`                   |
//! | `SteamSensor`      | steam `< 0` or `>= capacity`                   |
//! | `LevelOutOfLimits` | level `< M1` or `> M2`                         |
//!
//! The checks are independent: a reading below zero or at capacity raises
//! both `LevelSensor` and `LevelOutOfLimits`, and the mode handler lets the
//! limit fault win.  Only a NaN level is a sensor fault alone.
//!
//! Faults are recomputed from scratch every tick.  The latched copy kept
//! here exists only to log each fault once when it appears and once when
//! it clears.

use std::fmt;

use log::{error, info};

use crate::fsm::context::{SensorSnapshot, WaterLimits};

/// Conditions detected by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SafetyFault {
    /// Water level sensor reports an impossible value.
    LevelSensor = 0b0000_0001,
    /// Steam sensor reports an impossible value.
    SteamSensor = 0b0000_0010,
    /// Water level is outside the absolute safety limits [M1, M2].
    LevelOutOfLimits = 0b0000_0100,
}

impl SafetyFault {
    pub const ALL: [SafetyFault; 3] = [
        SafetyFault::LevelSensor,
        SafetyFault::SteamSensor,
        SafetyFault::LevelOutOfLimits,
    ];

    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SafetyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LevelSensor => write!(f, "water level sensor failure"),
            Self::SteamSensor => write!(f, "steam sensor failure"),
            Self::LevelOutOfLimits => write!(f, "water level outside safety limits"),
        }
    }
}

/// Level reading the sensor cannot produce.
pub fn level_sensor_failed(level: f64, limits: &WaterLimits) -> bool {
    !(0.0..limits.tank_capacity).contains(&level)
}

/// Steam reading the sensor cannot produce.
pub fn steam_sensor_failed(steam: f64, limits: &WaterLimits) -> bool {
    !(0.0..limits.tank_capacity).contains(&steam)
}

/// Level outside [M1, M2], whether or not the sensor is trusted.
pub fn outside_physical_limits(level: f64, limits: &WaterLimits) -> bool {
    level < limits.m1 || level > limits.m2
}

/// Pure classification of one snapshot.
pub fn classify(snap: &SensorSnapshot, limits: &WaterLimits) -> u8 {
    let mut faults = 0;
    if level_sensor_failed(snap.water_level, limits) {
        faults |= SafetyFault::LevelSensor.mask();
    }
    if steam_sensor_failed(snap.steam_rate, limits) {
        faults |= SafetyFault::SteamSensor.mask();
    }
    if outside_physical_limits(snap.water_level, limits) {
        faults |= SafetyFault::LevelOutOfLimits.mask();
    }
    faults
}

/// Safety supervisor.
#[derive(Debug, Clone)]
pub struct SafetySupervisor {
    limits: WaterLimits,
    /// Faults seen on the previous evaluation.
    faults: u8,
}

impl SafetySupervisor {
    pub fn new(limits: WaterLimits) -> Self {
        Self { limits, faults: 0 }
    }

    /// Classify the latest snapshot.  Returns the fault bitmask.
    pub fn evaluate(&mut self, snap: &SensorSnapshot) -> u8 {
        let next = classify(snap, &self.limits);
        for fault in SafetyFault::ALL {
            let was = self.faults & fault.mask() != 0;
            let is = next & fault.mask() != 0;
            if is && !was {
                error!(
                    "SAFETY FAULT SET: {fault} (level={:.1}, steam={:.1})",
                    snap.water_level, snap.steam_rate
                );
            } else if was && !is {
                info!("SAFETY FAULT CLEARED: {fault}");
            }
        }
        self.faults = next;
        next
    }

    /// Fault bitmask from the latest evaluation.
    pub fn faults(&self) -> u8 {
        self.faults
    }

    pub fn has_fault(&self, fault: SafetyFault) -> bool {
        self.faults & fault.mask() != 0
    }
}
