//! Engine configuration.
//!
//! Serialisable form of the pulse parameters, loaded at boot (from a JSON
//! document embedded in the firmware or received from a host tool) and
//! validated into [`Parameters`] before the engine ever sees it.

use core::num::NonZeroU16;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine::params::{
    DEFAULT_CYCLE_COUNT, DEFAULT_CYCLE_LENGTH_EXTENSION_US, DEFAULT_MAX_DUTY_VALUE,
};
use crate::engine::{Parameters, Skew};
use crate::error::ConfigError;

/// Default task watchdog window on ESP32 (ms). A single `run` that blocks
/// longer than this starves the idle task on the runner's core.
pub const WATCHDOG_TIMEOUT_MS: u32 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sweeps per `run` (0 disables pulsing).
    pub cycle_count: u16,
    /// Wait after every sweep step, in microseconds.
    pub cycle_length_extension_us: u16,
    /// Full-scale duty value. Must be non-zero.
    pub max_duty_value: u16,
    /// Resting level between runs.
    pub skew: Skew,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycle_count: DEFAULT_CYCLE_COUNT,
            cycle_length_extension_us: DEFAULT_CYCLE_LENGTH_EXTENSION_US,
            max_duty_value: DEFAULT_MAX_DUTY_VALUE.get(),
            skew: Skew::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| {
            warn!("config: parse failed: {}", e);
            ConfigError::Malformed
        })
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|_| ConfigError::Malformed)
    }

    /// Check ranges and convert into engine parameters.
    ///
    /// Rejects `max_duty_value == 0`. Accepts, but warns about, settings
    /// where one `run` would block longer than [`WATCHDOG_TIMEOUT_MS`].
    pub fn validate(&self) -> Result<Parameters, ConfigError> {
        let max_duty_value =
            NonZeroU16::new(self.max_duty_value).ok_or(ConfigError::ZeroMaxDutyValue)?;

        let params = Parameters {
            cycle_count: self.cycle_count,
            cycle_length_extension_us: self.cycle_length_extension_us,
            max_duty_value,
            skew: self.skew,
        };

        let run_us = params.run_duration_us();
        if run_us > u64::from(WATCHDOG_TIMEOUT_MS) * 1_000 {
            warn!(
                "config: one run blocks ~{}ms (> {}ms watchdog window)",
                run_us / 1_000,
                WATCHDOG_TIMEOUT_MS
            );
        }

        Ok(params)
    }
}

impl From<Parameters> for EngineConfig {
    fn from(p: Parameters) -> Self {
        Self {
            cycle_count: p.cycle_count,
            cycle_length_extension_us: p.cycle_length_extension_us,
            max_duty_value: p.max_duty_value.get(),
            skew: p.skew,
        }
    }
}
