//! Runner-facing half of the engine: commit, then pulse.

use embedded_hal::digital::PinState;
use log::debug;

use super::params::Parameters;
use super::sweep::{self, ActivePins};
use super::{PendingQueue, PwmEngine};
use crate::app::ports::PinPort;

/// Outcome of one [`PwmRunner::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Queued updates applied in this run's commit phase.
    pub committed: usize,
    /// Sweep steps executed in the pulse phase.
    pub steps: u32,
    /// Parameters this run used.
    pub params: Parameters,
}

/// Owns the committed pin map and the hardware port, and drives the pulse
/// loop for a shared [`PwmEngine`].
///
/// Meant to live on a dedicated execution context (on ESP32, pinned to the
/// APP core); `run` dominates that context for
/// `cycle_count × max_duty_value × cycle_length_extension` microseconds.
pub struct PwmRunner<'e, P: PinPort> {
    engine: &'e PwmEngine,
    port: P,
    active: ActivePins,
}

impl<'e, P: PinPort> PwmRunner<'e, P> {
    pub fn new(engine: &'e PwmEngine, port: P) -> Self {
        Self {
            engine,
            port,
            active: ActivePins::new(),
        }
    }

    /// One synchronous unit of work: commit queued updates, then run
    /// `cycle_count` sweeps with the parameters captured at commit.
    ///
    /// Updates queued while the pulse phase is running wait for the next
    /// call. There is no way to interrupt a run once it has started.
    pub fn run(&mut self) -> RunReport {
        let commit = self.engine.take_commit();
        let committed = match commit.batch {
            Some(batch) => self.apply(batch),
            None => 0,
        };

        let steps = sweep::pulse(&self.active, &commit.params, &mut self.port);

        RunReport {
            committed,
            steps,
            params: commit.params,
        }
    }

    /// Call [`run`](Self::run) forever.
    ///
    /// Never yields to a cooperative scheduler sharing this context; on
    /// ESP32 do not run this on the core that hosts the idle task the
    /// watchdog monitors.
    pub fn run_loop(&mut self) -> ! {
        self.run_loop_with(|| {})
    }

    /// Call [`run`](Self::run) forever, invoking `between` after every run
    /// (e.g. to feed a task watchdog).
    pub fn run_loop_with(&mut self, mut between: impl FnMut()) -> ! {
        debug!("pwm: runner loop started");
        loop {
            self.run();
            between();
        }
    }

    /// Committed pin → duty map as of the last run.
    pub fn active_pins(&self) -> &ActivePins {
        &self.active
    }

    pub fn engine(&self) -> &'e PwmEngine {
        self.engine
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    // Called with the engine lock already released.
    fn apply(&mut self, batch: PendingQueue) -> usize {
        let count = batch.len();
        for (pin, value) in batch {
            if value == 0 {
                self.active.remove(&pin);
                self.port.digital_write(pin, PinState::Low);
            } else {
                self.active.insert(pin, value);
            }
        }
        debug!(
            "pwm: committed {} update(s), {} pin(s) active",
            count,
            self.active.len()
        );
        count
    }
}
