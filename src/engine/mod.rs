//! Software PWM engine.
//!
//! Emulates analog output on digital-only pins by toggling them with a
//! duty ratio proportional to a requested value.
//!
//! ```text
//! ┌────────────┐  set_voltage / set_*   ┌───────────────────────────┐
//! │ Producer   │───────────────────────▶│ PwmEngine (one Mutex)     │
//! │ (any task) │                        │  pending · queued · params│
//! └────────────┘                        └─────────────┬─────────────┘
//!                                                     │ commit (short lock)
//!                                       ┌─────────────▼─────────────┐
//!                                       │ PwmRunner                 │
//!                                       │  active pins · PinPort    │
//!                                       │  pulse phase (no lock)    │
//!                                       └───────────────────────────┘
//! ```
//!
//! Producers only ever touch the pending queue and the parameter fields,
//! and only under the lock. The runner holds the lock just long enough to
//! move the queue out and copy the parameters, then releases it before any
//! GPIO write or timed wait.

pub mod params;
pub mod runner;
pub mod sweep;

use core::num::NonZeroU16;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, trace};

pub use params::{Duty, Parameters, Pin, Skew};
pub use runner::{PwmRunner, RunReport};
pub use sweep::{ActivePins, Steps};

use crate::config::EngineConfig;
use crate::error::ConfigError;

/// Updates requested since the last commit, last writer per pin wins.
pub type PendingQueue = BTreeMap<Pin, Duty>;

/// Everything producers may mutate. Guarded by the engine's single lock.
#[derive(Debug)]
struct Shared {
    pending: PendingQueue,
    /// Mirrors `!pending.is_empty()` so the runner can skip the drain.
    queued: bool,
    params: Parameters,
}

/// What the runner takes out of the engine at the start of a `run`.
#[derive(Debug)]
pub(crate) struct Commit {
    pub batch: Option<PendingQueue>,
    pub params: Parameters,
}

/// Producer-facing half of the PWM engine.
///
/// `const`-constructible so it can live in a `static` for the lifetime of
/// the firmware:
///
/// ```
/// use analog_emu::engine::PwmEngine;
///
/// static ENGINE: PwmEngine = PwmEngine::new();
/// ENGINE.set_voltage(23, 127);
/// assert!(ENGINE.has_pending());
/// ```
#[derive(Debug)]
pub struct PwmEngine {
    shared: Mutex<Shared>,
}

impl PwmEngine {
    /// Engine with [`Parameters::DEFAULT`].
    pub const fn new() -> Self {
        Self::with_parameters(Parameters::DEFAULT)
    }

    pub const fn with_parameters(params: Parameters) -> Self {
        Self {
            shared: Mutex::new(Shared {
                pending: BTreeMap::new(),
                queued: false,
                params,
            }),
        }
    }

    /// Build an engine from a validated config document.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_parameters(config.validate()?))
    }

    // The guarded data is plain maps and scalars, each updated by a single
    // assignment, so a panic on another context cannot leave it torn.
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Producer surface ──────────────────────────────────────

    /// Queue `value` for `pin`, applied at the start of the next `run`.
    ///
    /// `0` turns the pin off and removes it from pulsing. Values at or above
    /// the max duty value are fully on. The pin must already be configured
    /// as an output.
    pub fn set_voltage(&self, pin: Pin, value: Duty) {
        {
            let mut shared = self.lock();
            shared.pending.insert(pin, value);
            shared.queued = true;
        }
        trace!("pwm: queued GPIO{} = {}", pin, value);
    }

    /// Sweeps per `run`. Zero stops pulsing; queued updates still commit.
    ///
    /// Large values combined with a large cycle length extension make each
    /// `run` long enough to trip a task watchdog.
    pub fn set_cycle_count(&self, cycle_count: u16) {
        self.lock().params.cycle_count = cycle_count;
        debug!("pwm: cycle_count = {}", cycle_count);
    }

    /// Microseconds waited after every sweep step. Longer steps tolerate
    /// more scheduling jitter but lengthen the pulse period (flicker).
    pub fn set_cycle_length_extension(&self, us: u16) {
        self.lock().params.cycle_length_extension_us = us;
        debug!("pwm: cycle_length_extension = {}us", us);
    }

    /// Full-scale duty value, i.e. the number of steps in one sweep.
    pub fn set_max_duty_value(&self, max_duty_value: NonZeroU16) {
        self.lock().params.max_duty_value = max_duty_value;
        debug!("pwm: max_duty_value = {}", max_duty_value);
    }

    /// Level pins rest at between runs.
    pub fn set_skew(&self, skew: Skew) {
        self.lock().params.skew = skew;
        debug!("pwm: skew = {:?}", skew);
    }

    /// Replace every parameter from `config` in one critical section.
    pub fn apply_config(&self, config: &EngineConfig) -> Result<(), ConfigError> {
        let params = config.validate()?;
        self.lock().params = params;
        debug!("pwm: applied {:?}", params);
        Ok(())
    }

    /// Current parameters (what the next `run` will snapshot).
    pub fn parameters(&self) -> Parameters {
        self.lock().params
    }

    /// Whether any update is waiting for the next commit.
    pub fn has_pending(&self) -> bool {
        self.lock().queued
    }

    // ── Runner surface ────────────────────────────────────────

    /// Move the pending queue out and snapshot the parameters, atomically.
    pub(crate) fn take_commit(&self) -> Commit {
        let mut shared = self.lock();
        let batch = if shared.queued {
            shared.queued = false;
            Some(core::mem::take(&mut shared.pending))
        } else {
            None
        };
        Commit {
            batch,
            params: shared.params,
        }
    }
}

impl Default for PwmEngine {
    fn default() -> Self {
        Self::new()
    }
}
