//! Pulse generation.
//!
//! One sweep compares each pin's fixed duty against a step counter that
//! walks `max_duty_value` positions. A pin is HIGH on exactly the steps
//! where `duty > step`, so it spends `duty` of `max_duty_value` steps HIGH
//! without any per-pin phase state.
//!
//! ```text
//!   Skew::High   step: M-1 ─────────────▶ 0     (last step HIGH)
//!   Skew::Low    step: 0   ─────────────▶ M-1   (last step LOW unless full-on)
//! ```

use core::iter::FusedIterator;
use core::num::NonZeroU16;
use std::collections::BTreeMap;

use embedded_hal::digital::PinState;

use super::params::{Duty, Parameters, Pin, Skew};
use crate::app::ports::PinPort;

/// Committed pin → duty map, iterated in pin order.
pub type ActivePins = BTreeMap<Pin, Duty>;

/// Level a pin with `duty` is driven to at `step`.
#[inline]
pub fn level_at(duty: Duty, step: u16) -> PinState {
    PinState::from(duty > step)
}

/// Step counter order for one sweep.
#[derive(Debug, Clone)]
pub struct Steps {
    // Remaining half-open range [lo, hi).
    lo: u16,
    hi: u16,
    skew: Skew,
}

impl Steps {
    pub fn new(max_duty_value: NonZeroU16, skew: Skew) -> Self {
        Self {
            lo: 0,
            hi: max_duty_value.get(),
            skew,
        }
    }
}

impl Iterator for Steps {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.lo >= self.hi {
            return None;
        }
        match self.skew {
            Skew::High => {
                self.hi -= 1;
                Some(self.hi)
            }
            Skew::Low => {
                let step = self.lo;
                self.lo += 1;
                Some(step)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.hi - self.lo);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Steps {}
impl FusedIterator for Steps {}

/// Run `params.cycle_count` sweeps over `active`, writing every active pin
/// on every step and waiting `cycle_length_extension_us` after each step.
///
/// Returns the number of steps executed. Pins absent from `active` are
/// never written. No lock may be held by the caller.
pub fn pulse<P: PinPort + ?Sized>(active: &ActivePins, params: &Parameters, port: &mut P) -> u32 {
    let wait_us = u32::from(params.cycle_length_extension_us);
    let mut steps_run = 0u32;

    for _ in 0..params.cycle_count {
        for step in Steps::new(params.max_duty_value, params.skew) {
            for (&pin, &duty) in active {
                port.digital_write(pin, level_at(duty, step));
            }
            port.delay_us(wait_us);
            steps_run += 1;
        }
    }

    steps_run
}
