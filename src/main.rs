//! Analog output emulator — ESP32 demo firmware.
//!
//! ```text
//!   core 0 (PRO)                         core 1 (APP)
//! ┌────────────────┐   set_voltage    ┌──────────────────────────┐
//! │ producer task  │─────────────────▶│ static ENGINE            │
//! │ ramps GPIO23   │                  │   ▲ commit   │ pulse     │
//! └────────────────┘                  │ PwmRunner ───┘ EspGpio   │
//!                                     │   feeds TWDT between runs│
//!                                     └──────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::info;

use analog_emu::adapters::EspGpioPort;
use analog_emu::config::{EngineConfig, WATCHDOG_TIMEOUT_MS};
use analog_emu::drivers::task_pin::TaskSpec;
use analog_emu::drivers::watchdog::Watchdog;
use analog_emu::pins;
use analog_emu::{Error, PwmEngine, PwmRunner};

static ENGINE: PwmEngine = PwmEngine::new();

/// Boot-time engine configuration.
const BOOT_CONFIG: &str =
    r#"{"cycle_count":4,"cycle_length_extension_us":8,"max_duty_value":255,"skew":"low"}"#;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("analog-emu v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Engine config ──────────────────────────────────────
    let config = EngineConfig::from_json(BOOT_CONFIG).map_err(Error::from)?;
    ENGINE.apply_config(&config).map_err(Error::from)?;

    // ── 3. Outputs + initial voltages ─────────────────────────
    let mut gpio = EspGpioPort::new();
    gpio.configure_outputs(&pins::PWM_OUTPUTS)
        .map_err(Error::from)?;

    ENGINE.set_voltage(pins::TEST1_GPIO, 127);
    ENGINE.set_voltage(pins::TEST2_GPIO, 200);

    // ── 4. Runner on APP core, producer on PRO core ───────────
    TaskSpec::PWM_RUNNER.spawn::<(), _>(move || {
        let mut wdt = Watchdog::subscribe(WATCHDOG_TIMEOUT_MS);
        let mut runner = PwmRunner::new(&ENGINE, gpio);
        runner.run_loop_with(|| wdt.feed());
    })?;
    thread::sleep(Duration::from_millis(50));

    TaskSpec::PRODUCER.spawn(producer)?;
    thread::sleep(Duration::from_millis(50));

    info!("boot complete");

    loop {
        thread::sleep(Duration::from_secs(10));
    }
}

fn producer() {
    info!("producer started");
    loop {
        for duty in (0..128).step_by(16) {
            ENGINE.set_voltage(pins::TEST1_GPIO, duty);
            thread::sleep(Duration::from_secs(2));
        }
    }
}
