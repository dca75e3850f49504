//! Raw ESP-IDF GPIO adapter.
//!
//! Implements [`PinPort`] with `gpio_set_level` and `esp_rom_delay_us`,
//! the cheapest write/wait pair the IDF offers (no driver object per pin).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: configures pins as push-pull outputs and writes registers.
//! On host/simulation: records the last level of every pin in memory and
//! busy-waits on `std::time::Instant`.

use embedded_hal::digital::PinState;

use crate::app::ports::PinPort;
use crate::engine::Pin;
use crate::error::PinError;

#[cfg(all(target_os = "espidf", feature = "espidf"))]
use esp_idf_svc::sys::*;

#[cfg(not(all(target_os = "espidf", feature = "espidf")))]
use std::collections::BTreeMap;

/// `ESP_ERR_INVALID_ARG`, reported for GPIO numbers outside the 64-bit mask.
pub const INVALID_ARG: i32 = 0x102;

/// `gpio_config_t::pin_bit_mask` for a single pin.
fn pin_mask(pin: Pin) -> Result<u64, PinError> {
    1u64.checked_shl(u32::from(pin))
        .ok_or(PinError::ConfigFailed(INVALID_ARG))
}

/// Direct-register GPIO port.
pub struct EspGpioPort {
    #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
    levels: BTreeMap<Pin, PinState>,
}

impl Default for EspGpioPort {
    fn default() -> Self {
        Self::new()
    }
}

impl EspGpioPort {
    /// `true` unless built for ESP-IDF with the `espidf` feature enabled.
    pub const SIMULATED: bool = !cfg!(all(target_os = "espidf", feature = "espidf"));

    pub fn new() -> Self {
        Self {
            #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
            levels: BTreeMap::new(),
        }
    }

    /// Configure `pins` as outputs and drive them LOW.
    #[cfg(all(target_os = "espidf", feature = "espidf"))]
    pub fn configure_outputs(&mut self, pins: &[Pin]) -> Result<(), PinError> {
        for &pin in pins {
            let cfg = gpio_config_t {
                pin_bit_mask: pin_mask(pin)?,
                mode: gpio_mode_t_GPIO_MODE_OUTPUT,
                pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
                pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
                intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
            };
            // SAFETY: gpio_config only reads the passed struct; called from
            // the setup path before the runner starts writing these pins.
            let ret = unsafe { gpio_config(&cfg) };
            if ret != ESP_OK as i32 {
                return Err(PinError::ConfigFailed(ret));
            }
            // SAFETY: pin was configured as an output just above.
            unsafe { gpio_set_level(i32::from(pin), 0) };
        }
        log::info!("gpio: {} output(s) configured", pins.len());
        Ok(())
    }

    /// Simulation: mark `pins` as outputs at LOW.
    #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
    pub fn configure_outputs(&mut self, pins: &[Pin]) -> Result<(), PinError> {
        for &pin in pins {
            pin_mask(pin)?;
            self.levels.insert(pin, PinState::Low);
        }
        log::info!("gpio(sim): {} output(s) configured", pins.len());
        Ok(())
    }

    /// Simulation: last level written to `pin`.
    #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
    pub fn level(&self, pin: Pin) -> Option<PinState> {
        self.levels.get(&pin).copied()
    }
}

#[cfg(all(target_os = "espidf", feature = "espidf"))]
impl PinPort for EspGpioPort {
    fn digital_write(&mut self, pin: Pin, level: PinState) {
        // SAFETY: gpio_set_level is a single register write on a pin the
        // caller configured as an output; the runner is its only writer.
        unsafe {
            gpio_set_level(i32::from(pin), u32::from(level == PinState::High));
        }
    }

    fn delay_us(&mut self, us: u32) {
        // SAFETY: ROM busy-wait, no shared state.
        unsafe { esp_rom_delay_us(us) };
    }
}

#[cfg(not(all(target_os = "espidf", feature = "espidf")))]
impl PinPort for EspGpioPort {
    fn digital_write(&mut self, pin: Pin, level: PinState) {
        self.levels.insert(pin, level);
    }

    fn delay_us(&mut self, us: u32) {
        let start = std::time::Instant::now();
        let wait = std::time::Duration::from_micros(u64::from(us));
        while start.elapsed() < wait {
            core::hint::spin_loop();
        }
    }
}
