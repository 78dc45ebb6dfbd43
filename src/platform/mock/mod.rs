//! Mock platform implementation for testing
//!
//! Mock implementations of the platform traits for unit testing without
//! hardware. Available during test builds and behind the `mock` feature.
//!
//! All peripheral state lives behind shared handles (`Rc<RefCell<_>>`), so a
//! test can clone the [`MockPlatform`] before handing it to the subsystem and
//! keep poking pin levels, scripting SPI reads and inspecting the EEPROM
//! afterwards:
//!
//! ```
//! use vcu_io::platform::mock::MockPlatform;
//! use vcu_io::platform::Platform;
//!
//! let mut platform = MockPlatform::new();
//! let handle = platform.clone();
//! let mut pin = platform.create_gpio(48).unwrap();
//! handle.set_pin_level(48, true);
//! assert!(vcu_io::platform::GpioInterface::read(&pin));
//! # let _ = &mut pin;
//! ```

#![cfg(any(test, feature = "mock"))]

mod eeprom;
mod gpio;
mod platform;
mod spi;
mod timer;
mod watchdog;

pub use eeprom::MockEeprom;
pub use gpio::MockGpio;
pub use platform::MockPlatform;
pub use spi::{MockSpi, SpiTransaction};
pub use timer::MockTimer;
pub use watchdog::MockWatchdog;
