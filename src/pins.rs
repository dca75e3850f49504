//! GPIO assignments for the demo board.
//!
//! Any push-pull capable GPIO works; these two are free on most ESP32
//! DevKitC boards and have LEDs on the reference test jig.

use crate::engine::Pin;

/// Ramped output (0 → 112 in steps of 16).
pub const TEST1_GPIO: Pin = 23;
/// Fixed output at duty 200.
pub const TEST2_GPIO: Pin = 22;

/// Every pin the demo drives, for one-shot output configuration.
pub const PWM_OUTPUTS: [Pin; 2] = [TEST1_GPIO, TEST2_GPIO];
