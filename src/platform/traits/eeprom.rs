//! EEPROM interface trait
//!
//! Byte-addressed persistent storage for the hardware revision, calibration
//! pairs and mode overrides. Unlike raw flash there is no erase discipline;
//! the part (or the board support crate emulating it) handles that.

use crate::platform::Result;

pub trait EepromInterface {
    /// Read `buf.len()` bytes starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Eeprom(EepromError::InvalidAddress)` if the
    /// range falls outside the device.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Eeprom` if the range is invalid or the write
    /// does not complete.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Device capacity in bytes
    fn capacity(&self) -> u32;
}
