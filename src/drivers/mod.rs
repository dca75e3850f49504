//! Platform helpers for hosting the pulse runner.

pub mod task_pin;
pub mod watchdog;
