//! Software PWM engine emulating analog output on digital-only pins.
//!
//! Producers queue per-pin duty values on a shared [`PwmEngine`]; a
//! dedicated runner context commits them and toggles the pins with busy
//! waits. Hardware is reached only through the [`PinPort`] trait.
//!
//! ESP-IDF-specific code needs both the `espidf` target and the `espidf`
//! feature (`#[cfg(all(target_os = "espidf", feature = "espidf"))]`);
//! every other build, including an espidf target without the feature,
//! uses the simulated drivers.
//!
//! [`PwmEngine`]: engine::PwmEngine
//! [`PinPort`]: app::ports::PinPort

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod pins;

pub use engine::{PwmEngine, PwmRunner, Skew};
pub use error::{Error, Result};
