//! Task Watchdog Timer (TWDT) subscription for the pulse runner.
//!
//! A runner loop never blocks, so the idle task on its core never runs.
//! Subscribing the runner task itself and feeding between runs keeps the
//! TWDT satisfied as long as a single run stays under the timeout
//! (see [`crate::config::WATCHDOG_TIMEOUT_MS`]).

#[cfg(all(target_os = "espidf", feature = "espidf"))]
use esp_idf_svc::sys::*;

pub struct Watchdog {
    #[cfg(all(target_os = "espidf", feature = "espidf"))]
    subscribed: bool,
    feeds: u64,
}

impl Watchdog {
    /// Subscribe the calling task to the TWDT with `timeout_ms`.
    ///
    /// Must be called from the task that will feed it.
    pub fn subscribe(timeout_ms: u32) -> Self {
        #[cfg(all(target_os = "espidf", feature = "espidf"))]
        {
            // SAFETY: TWDT API calls from the subscribing task; `cfg` lives
            // for the duration of the call.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!("watchdog: reconfigure returned {} (already configured?)", ret);
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    log::info!("watchdog: runner subscribed ({}ms, panic on trigger)", timeout_ms);
                } else {
                    log::warn!("watchdog: subscribe failed ({})", ret);
                }

                Self {
                    subscribed,
                    feeds: 0,
                }
            }
        }

        #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
        {
            log::info!("watchdog(sim): no-op ({}ms)", timeout_ms);
            Self { feeds: 0 }
        }
    }

    /// Reset the TWDT countdown for the calling task.
    pub fn feed(&mut self) {
        #[cfg(all(target_os = "espidf", feature = "espidf"))]
        {
            if self.subscribed {
                // SAFETY: resets the countdown of the calling, subscribed task.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
        self.feeds = self.feeds.wrapping_add(1);
    }

    pub fn feed_count(&self) -> u64 {
        self.feeds
    }
}
