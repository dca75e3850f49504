//! Adapters — concrete [`PinPort`](crate::app::ports::PinPort)
//! implementations.
//!
//! | Adapter       | Backing                               |
//! |---------------|---------------------------------------|
//! | `EspGpioPort` | raw ESP-IDF `gpio_set_level` (or sim) |
//! | `HalPort`     | any `embedded-hal` 1.0 `OutputPin`    |

pub mod gpio;
pub mod hal;

pub use gpio::EspGpioPort;
pub use hal::HalPort;
