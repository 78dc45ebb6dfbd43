//! ADE7913 register definitions
//!
//! The SPI command byte carries the register address in bits 3..7 and the
//! read-enable flag in bit 2; bits 0..1 are reserved zero.

/// Read-enable flag in the command byte
const CMD_READ: u8 = 1 << 2;

/// Current channel conversion (IWV), signed 24-bit
pub const IWV: u8 = 0x00;

/// First voltage channel conversion (V1WV), signed 24-bit
pub const V1WV: u8 = 0x01;

/// Second voltage channel conversion (V2WV), signed 24-bit
pub const V2WV: u8 = 0x02;

/// CRC of the ADC readings
pub const ADC_CRC: u8 = 0x04;

/// CRC of the configuration registers
pub const CTRL_CRC: u8 = 0x05;

/// Counter snapshot
pub const CNT_SNAPSHOT: u8 = 0x07;

/// Configuration register
pub const CONFIG: u8 = 0x08;

/// Status register 0
pub const STATUS0: u8 = 0x09;

/// Configuration lock register
pub const LOCK: u8 = 0x0A;

/// Synchronization snapshot
pub const SYNC_SNAP: u8 = 0x0B;

/// Counter low byte
pub const COUNTER0: u8 = 0x0C;

/// Counter high byte
pub const COUNTER1: u8 = 0x0D;

/// EMI control register
pub const EMI_CTRL: u8 = 0x0E;

/// Status register 1
pub const STATUS1: u8 = 0x0F;

/// Temperature sensor offset
pub const TEMPOS: u8 = 0x18;

/// Key written to LOCK to freeze the configuration registers
pub const LOCK_KEY: u8 = 0xCA;

/// Key written to LOCK to unfreeze the configuration registers
pub const UNLOCK_KEY: u8 = 0x9C;

bitflags::bitflags! {
    /// CONFIG register fields
    ///
    /// ADC_FREQ is a two-bit field at bits 4..5: 0 = 8 kHz, 1 = 4 kHz,
    /// 2 = 2 kHz, 3 = 1 kHz.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Config: u8 {
        /// Drive the derived clock out to the downstream chips
        const CLKOUT_EN = 1 << 0;
        /// Power down the unused channel
        const PWRDWN_EN = 1 << 2;
        /// Route the temperature sensor to the second voltage channel
        const TEMP_EN = 1 << 3;
        /// ADC output rate 4 kHz
        const ADC_FREQ_4KHZ = 1 << 4;
        /// ADC output rate 2 kHz
        const ADC_FREQ_2KHZ = 2 << 4;
        /// ADC output rate 1 kHz
        const ADC_FREQ_1KHZ = 3 << 4;
        /// Software reset
        const SWRST = 1 << 6;
        /// Halve the conversion bandwidth
        const BW = 1 << 7;
    }
}

bitflags::bitflags! {
    /// STATUS0 register fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status0: u8 {
        /// Chip is still in reset; conversions are not valid yet
        const RESET_ON = 1 << 0;
        /// CRC of the configuration registers changed
        const CRC_STAT = 1 << 1;
        /// Configuration protection active
        const IC_PROT = 1 << 2;
    }
}

/// Command byte for reading `register`
pub const fn read_cmd(register: u8) -> u8 {
    (register << 3) | CMD_READ
}

/// Command byte for writing `register`
pub const fn write_cmd(register: u8) -> u8 {
    register << 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_encoding() {
        // Address in bits 3..7, read enable in bit 2
        assert_eq!(read_cmd(STATUS0), 0x4C);
        assert_eq!(write_cmd(CONFIG), 0x40);
        assert_eq!(read_cmd(IWV), 0x04);
    }

    #[test]
    fn test_config_freq_field() {
        assert_eq!((Config::CLKOUT_EN | Config::ADC_FREQ_2KHZ).bits(), 0x21);
        assert_eq!((Config::ADC_FREQ_1KHZ | Config::BW).bits(), 0xB0);
    }
}
