//! GPIO interface trait

use crate::platform::Result;

/// GPIO pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioMode {
    /// Input mode (high impedance)
    Input,
    /// Input mode with pull-up resistor
    InputPullUp,
    /// Output mode (push-pull)
    OutputPushPull,
}

/// GPIO interface trait
///
/// One instance per pin; a pin has exactly one owner and is never accessed
/// from more than one context at a time.
pub trait GpioInterface {
    /// Drive the pin high
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin is
    /// not configured as an output.
    fn set_high(&mut self) -> Result<()>;

    /// Drive the pin low
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin is
    /// not configured as an output.
    fn set_low(&mut self) -> Result<()>;

    /// Read the pin level; valid in both input and output modes
    fn read(&self) -> bool;

    /// Set the pin mode
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio` if the mode cannot be applied.
    fn set_mode(&mut self, mode: GpioMode) -> Result<()>;

    /// Current pin mode
    fn mode(&self) -> GpioMode;
}
