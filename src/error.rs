//! Unified error types for the analog output emulator.
//!
//! The pulse engine itself never fails: its setters are total over their
//! typed domains. Errors only arise at the edges, when a configuration is
//! loaded or when physical pins are bound to an adapter. All variants are
//! `Copy` so they can be logged and passed around without allocation.

use core::fmt;

use crate::engine::Pin;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Engine configuration is invalid or could not be parsed.
    Config(ConfigError),
    /// A pin could not be bound or configured as an output.
    Pin(PinError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Pin(e) => write!(f, "pin: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_duty_value` of zero would produce an empty sweep.
    ZeroMaxDutyValue,
    /// The serialised config could not be parsed.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMaxDutyValue => write!(f, "max_duty_value must be non-zero"),
            Self::Malformed => write!(f, "malformed config document"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Pin errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// The adapter's fixed-capacity pin table is full.
    BankFull,
    /// The pin is already bound to an output.
    Duplicate(Pin),
    /// The platform rejected the GPIO configuration (raw return code).
    ConfigFailed(i32),
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BankFull => write!(f, "pin bank full"),
            Self::Duplicate(pin) => write!(f, "GPIO{} already bound", pin),
            Self::ConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Self::Pin(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
