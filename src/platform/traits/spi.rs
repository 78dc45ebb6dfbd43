//! SPI interface trait
//!
//! Chip select is not part of the bus interface; callers manage it with GPIO
//! pins, which is what the multi-chip ADC bank needs anyway.

use crate::platform::Result;

/// SPI mode (clock polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

/// SPI bus configuration; transfers are MSB first
#[derive(Debug, Clone, Copy)]
pub struct SpiConfig {
    /// Bus frequency in Hz
    pub frequency: u32,
    /// SPI mode (CPOL and CPHA)
    pub mode: SpiMode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000_000,
            mode: SpiMode::Mode0,
        }
    }
}

/// SPI interface trait
///
/// All transactions are synchronous and blocking; they must never be invoked
/// from interrupt context.
pub trait SpiInterface {
    /// Transmit `data`, discarding received bytes
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Spi` if the write fails.
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Receive into `buffer` while clocking out dummy bytes
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Spi` if the read fails.
    fn read(&mut self, buffer: &mut [u8]) -> Result<()>;

    /// Full-duplex transfer; both buffers must have the same length
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Spi` if the transfer fails or the buffer
    /// lengths differ.
    fn transfer(&mut self, write_buffer: &[u8], read_buffer: &mut [u8]) -> Result<()>;
}
