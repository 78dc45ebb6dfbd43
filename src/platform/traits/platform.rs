//! Root platform trait

use super::{
    EepromInterface, GpioInterface, SpiConfig, SpiInterface, TimerInterface, WatchdogInterface,
};
use crate::platform::Result;

/// Root platform trait
///
/// Aggregates the peripheral interfaces the I/O subsystem needs and provides
/// the constructors for them. Concrete types are supplied through associated
/// types so dispatch is resolved at compile time.
///
/// The native analog acquisition unit is started through
/// [`Platform::start_acquisition`]; the platform's completion interrupt must
/// call [`crate::sysio::SamplingEngine::advance`] and hand the returned
/// buffer slot to the hardware. That handler is the only producer-side writer
/// and must not do anything else.
pub trait Platform: Sized {
    /// GPIO pin type
    type Gpio: GpioInterface;

    /// SPI bus type
    type Spi: SpiInterface;

    /// Timer type
    type Timer: TimerInterface;

    /// EEPROM type
    type Eeprom: EepromInterface;

    /// Watchdog type
    type Watchdog: WatchdogInterface;

    /// Claim a GPIO pin
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if the pin is already
    /// claimed or the number is invalid for the board.
    fn create_gpio(&mut self, pin: u8) -> Result<Self::Gpio>;

    /// Claim the shared SPI bus
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if the bus is already
    /// claimed.
    fn create_spi(&mut self, config: SpiConfig) -> Result<Self::Spi>;

    /// Claim a timer instance
    fn create_timer(&mut self) -> Result<Self::Timer>;

    /// Claim the configuration EEPROM
    fn create_eeprom(&mut self) -> Result<Self::Eeprom>;

    /// Claim the watchdog feed handle
    fn create_watchdog(&mut self) -> Result<Self::Watchdog>;

    /// Start the free-running analog acquisition unit
    ///
    /// `lines` is the number of interleaved physical lines (4 or 8). The
    /// unit samples continuously into the rotating raw buffers with no
    /// further CPU involvement beyond the completion interrupt.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` if the line count is not
    /// supported by the hardware.
    fn start_acquisition(&mut self, lines: u8) -> Result<()>;
}
