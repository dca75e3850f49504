//! Core-pinned thread spawning.
//!
//! The pulse runner is timing sensitive, so on dual-core ESP32 parts it
//! belongs on its own core, away from the WiFi/BLE stacks on core 0.
//!
//! ESP-IDF implements `std::thread` on pthreads, which are thin wrappers
//! around FreeRTOS tasks. `esp_pthread_set_cfg()` stores thread-local
//! configuration that applies to the *next* `pthread_create()` from the
//! calling thread, so the config→spawn pair in [`TaskSpec::spawn`] must not
//! interleave with other thread creation on the same thread.
//!
//! On non-ESP targets, core and priority are ignored.

use std::io;
use std::thread::JoinHandle;

/// CPU core identifiers for the ESP32 Xtensa dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU) — protocol stacks. Do not run the pulse loop here:
    /// it starves the idle task and trips the watchdog.
    Pro = 0,
    /// Core 1 (APP_CPU) — where the pulse runner should live.
    App = 1,
}

/// Placement and sizing for a spawned task.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    /// Null-terminated task name, e.g. `"pwm\0"`.
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    /// Default placement for the pulse runner.
    pub const PWM_RUNNER: Self = Self {
        name: "pwm\0",
        core: Core::App,
        priority: 1,
        stack_kb: 10,
    };

    /// Default placement for application work that produces voltages.
    pub const PRODUCER: Self = Self {
        name: "main\0",
        core: Core::Pro,
        priority: 1,
        stack_kb: 10,
    };

    fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }

    /// Spawn `f` as a thread on `self.core` with `self.priority`.
    #[cfg(all(target_os = "espidf", feature = "espidf"))]
    pub fn spawn<T, F>(&self, f: F) -> io::Result<JoinHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        // SAFETY: esp_create_default_pthread_config returns a plain struct;
        // `name` is 'static and null-terminated so the pointer outlives the
        // pthread_create call that consumes it.
        let ret = unsafe {
            let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
            cfg.pin_to_core = self.core as i32;
            cfg.prio = i32::from(self.priority);
            cfg.stack_size = (self.stack_kb * 1024) as _;
            cfg.thread_name = self.name.as_ptr().cast();
            esp_idf_sys::esp_pthread_set_cfg(&cfg)
        };
        if ret != esp_idf_sys::ESP_OK as i32 {
            return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
        }

        log::info!(
            "task: spawning '{}' on {:?} (pri={}, stack={}KB)",
            self.display_name(),
            self.core,
            self.priority,
            self.stack_kb
        );

        std::thread::Builder::new()
            .name(self.display_name().into())
            .spawn(f)
    }

    /// Simulation fallback — ignores core affinity and priority.
    #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
    pub fn spawn<T, F>(&self, f: F) -> io::Result<JoinHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        log::info!(
            "task(sim): spawning '{}' (no core pinning, stack={}KB)",
            self.display_name(),
            self.stack_kb
        );

        std::thread::Builder::new()
            .name(self.display_name().into())
            .stack_size(self.stack_kb * 1024)
            .spawn(f)
    }
}
