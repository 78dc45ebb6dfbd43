//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod eeprom;
pub mod gpio;
pub mod platform;
pub mod spi;
pub mod timer;
pub mod watchdog;

// Re-export trait interfaces
pub use eeprom::EepromInterface;
pub use gpio::{GpioInterface, GpioMode};
pub use platform::Platform;
pub use spi::{SpiConfig, SpiInterface, SpiMode};
pub use timer::TimerInterface;
pub use watchdog::WatchdogInterface;
