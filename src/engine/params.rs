//! Runtime-tunable pulse parameters.

use core::num::NonZeroU16;

use serde::{Deserialize, Serialize};

/// GPIO number of a digital output line.
pub type Pin = u8;

/// Requested ON-fraction of a pulse period, in `0..=max_duty_value`.
///
/// 16 bits wide so that any representable `max_duty_value` fits.
pub type Duty = u16;

/// Default number of sweeps per `run`.
pub const DEFAULT_CYCLE_COUNT: u16 = 4;
/// Default wait after every sweep step, in microseconds.
pub const DEFAULT_CYCLE_LENGTH_EXTENSION_US: u16 = 8;
/// Default full-scale duty value (8-bit resolution).
pub const DEFAULT_MAX_DUTY_VALUE: NonZeroU16 = match NonZeroU16::new(255) {
    Some(v) => v,
    None => unreachable!(),
};

/// Level a pin rests at between two `run` calls.
///
/// `High` sweeps the step counter downwards so the last step drives every
/// active pin HIGH. `Low` sweeps upwards so the last step drives every pin
/// below full scale LOW. `Low` is the default: it is slightly less accurate
/// in the middle of the range but degrades more gracefully at the extremes
/// when the gap between runs is variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skew {
    High,
    #[default]
    Low,
}

impl From<bool> for Skew {
    /// `true` selects HIGH skew.
    fn from(skew_high: bool) -> Self {
        if skew_high { Self::High } else { Self::Low }
    }
}

/// Snapshot of every pulse parameter, copied out of the engine at the start
/// of each `run` so it cannot change mid-period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    /// Sweeps per `run`. Zero disables pulsing but not queue commits.
    pub cycle_count: u16,
    /// Microseconds waited after each step's writes.
    pub cycle_length_extension_us: u16,
    /// Number of steps in one sweep; a duty of this value is fully on.
    pub max_duty_value: NonZeroU16,
    pub skew: Skew,
}

impl Parameters {
    pub const DEFAULT: Self = Self {
        cycle_count: DEFAULT_CYCLE_COUNT,
        cycle_length_extension_us: DEFAULT_CYCLE_LENGTH_EXTENSION_US,
        max_duty_value: DEFAULT_MAX_DUTY_VALUE,
        skew: Skew::Low,
    };

    /// Time one `run` spends in timed waits, excluding per-write overhead.
    pub fn run_duration_us(&self) -> u64 {
        u64::from(self.cycle_count)
            * u64::from(self.max_duty_value.get())
            * u64::from(self.cycle_length_extension_us)
    }

    /// Number of steps in one sweep.
    pub fn steps_per_sweep(&self) -> u16 {
        self.max_duty_value.get()
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}
