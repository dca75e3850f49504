//! `embedded-hal` 1.0 adapter.
//!
//! Binds a fixed set of [`OutputPin`]s to GPIO numbers and exposes them,
//! together with a [`DelayNs`] provider, as a [`PinPort`]. Works with any
//! HAL (esp-idf-hal `PinDriver`, esp-hal, embassy, rp-hal …) whose output
//! pins share one concrete type, e.g. a degraded/`AnyOutputPin` driver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use heapless::Vec;
use log::info;

use crate::app::ports::PinPort;
use crate::engine::Pin;
use crate::error::PinError;

/// Up to `N` output pins plus a delay source.
pub struct HalPort<O, D, const N: usize> {
    pins: Vec<(Pin, O), N>,
    delay: D,
    faults: u32,
}

impl<O: OutputPin, D: DelayNs, const N: usize> HalPort<O, D, N> {
    pub fn new(delay: D) -> Self {
        Self {
            pins: Vec::new(),
            delay,
            faults: 0,
        }
    }

    /// Bind `output` to `pin`, driving it LOW first so it starts off.
    pub fn bind(&mut self, pin: Pin, mut output: O) -> Result<(), PinError> {
        if self.pins.iter().any(|(p, _)| *p == pin) {
            return Err(PinError::Duplicate(pin));
        }
        if output.set_low().is_err() {
            self.faults = self.faults.saturating_add(1);
        }
        self.pins
            .push((pin, output))
            .map_err(|_| PinError::BankFull)?;
        info!("hal: GPIO{} bound ({}/{})", pin, self.pins.len(), N);
        Ok(())
    }

    /// Writes that failed or targeted an unbound pin.
    ///
    /// Failures are counted rather than logged because they happen inside
    /// the timing-critical loop.
    pub fn write_faults(&self) -> u32 {
        self.faults
    }

    pub fn bound_pins(&self) -> impl Iterator<Item = Pin> + '_ {
        self.pins.iter().map(|(p, _)| *p)
    }

    /// Release the bound outputs and the delay source.
    pub fn release(self) -> (Vec<(Pin, O), N>, D) {
        (self.pins, self.delay)
    }
}

impl<O: OutputPin, D: DelayNs, const N: usize> PinPort for HalPort<O, D, N> {
    fn digital_write(&mut self, pin: Pin, level: PinState) {
        let ok = self
            .pins
            .iter_mut()
            .find(|(p, _)| *p == pin)
            .is_some_and(|(_, out)| out.set_state(level).is_ok());
        if !ok {
            self.faults = self.faults.saturating_add(1);
        }
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
