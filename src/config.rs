//! Boiler characteristics.
//!
//! Read once when the controller is constructed and never consulted again;
//! the controller copies the values it needs.  Values are loaded from JSON
//! by the `boiler-ctl` binary, any missing field falling back to the
//! reference boiler below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Physical characteristics of the plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoilerConfig {
    // --- Tank ---
    /// Total tank capacity (litres).
    pub capacity: f64,
    /// M1: absolute minimum safe water level.
    pub min_limit_level: f64,
    /// M2: absolute maximum safe water level.
    pub max_limit_level: f64,
    /// N1: lower edge of the normal operating band.
    pub min_normal_level: f64,
    /// N2: upper edge of the normal operating band.
    pub max_normal_level: f64,

    // --- Pumps ---
    /// Number of feed pumps.
    pub pump_count: usize,
    /// Throughput of each pump (litres/sec).
    pub pump_capacity: f64,

    // --- Steam ---
    /// Valve evacuation rate (litres/sec).
    pub evacuation_rate: f64,
    /// Maximal steam production rate (litres/sec).
    pub max_steam_rate: f64,

    // --- Timing ---
    /// Control cycle period (seconds).
    pub tick_period_secs: f64,
}

impl Default for BoilerConfig {
    fn default() -> Self {
        Self {
            // Tank
            capacity: 1000.0,
            min_limit_level: 50.0,
            max_limit_level: 950.0,
            min_normal_level: 400.0,
            max_normal_level: 600.0,

            // Pumps
            pump_count: 4,
            pump_capacity: 10.0,

            // Steam
            evacuation_rate: 10.0,
            max_steam_rate: 10.0,

            // Timing
            tick_period_secs: 5.0,
        }
    }
}

impl BoilerConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Capacity of pump `index`.  All pumps share one rating.
    pub fn pump_capacity(&self, _index: usize) -> f64 {
        self.pump_capacity
    }

    /// Reject configurations the controller cannot run safely.
    /// Values are never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numbers = [
            self.capacity,
            self.min_limit_level,
            self.max_limit_level,
            self.min_normal_level,
            self.max_normal_level,
            self.pump_capacity,
            self.evacuation_rate,
            self.max_steam_rate,
            self.tick_period_secs,
        ];
        if numbers.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid("all numeric fields must be finite"));
        }
        if self.pump_count == 0 {
            return Err(ConfigError::Invalid("pump_count must be at least 1"));
        }
        if self.pump_capacity < 0.0 {
            return Err(ConfigError::Invalid("pump_capacity must be non-negative"));
        }
        if self.capacity <= 0.0 {
            return Err(ConfigError::Invalid("capacity must be positive"));
        }
        if self.evacuation_rate < 0.0 || self.max_steam_rate < 0.0 {
            return Err(ConfigError::Invalid("rates must be non-negative"));
        }
        if self.tick_period_secs <= 0.0 {
            return Err(ConfigError::Invalid("tick_period_secs must be positive"));
        }
        if self.min_limit_level < 0.0 {
            return Err(ConfigError::Invalid("min_limit_level must be non-negative"));
        }
        if !(self.min_limit_level < self.min_normal_level
            && self.min_normal_level < self.max_normal_level
            && self.max_normal_level < self.max_limit_level)
        {
            return Err(ConfigError::Invalid(
                "levels must satisfy min_limit < min_normal < max_normal < max_limit",
            ));
        }
        if self.max_limit_level > self.capacity {
            return Err(ConfigError::Invalid("max_limit_level exceeds capacity"));
        }
        Ok(())
    }
}
