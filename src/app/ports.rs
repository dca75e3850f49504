//! Port traits — the boundary between the pulse engine and the hardware.
//!
//! ```text
//!   PwmRunner ──▶ PinPort ──▶ Adapter (embedded-hal / ESP-IDF / mock)
//! ```
//!
//! The engine never touches GPIO registers directly. Adapters in
//! [`crate::adapters`] implement [`PinPort`] for real hardware; tests
//! implement it with a recorder.

use embedded_hal::digital::PinState;

use crate::engine::Pin;

// ───────────────────────────────────────────────────────────────
// Pin port (driven adapter: engine → hardware)
// ───────────────────────────────────────────────────────────────

/// Digital write and busy-wait primitives consumed by the pulse loop.
///
/// Both methods sit on the timing-critical path, so implementations must
/// take bounded time and must not block on locks shared with producers.
pub trait PinPort {
    /// Drive `pin` to `level`. The pin must already be configured as an
    /// output; the engine cannot detect when it is not.
    fn digital_write(&mut self, pin: Pin, level: PinState);

    /// Busy-wait for `us` microseconds on the calling context.
    fn delay_us(&mut self, us: u32);
}

impl<P: PinPort + ?Sized> PinPort for &mut P {
    fn digital_write(&mut self, pin: Pin, level: PinState) {
        (**self).digital_write(pin, level);
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us);
    }
}
