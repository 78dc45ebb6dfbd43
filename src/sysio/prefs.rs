//! Persisted I/O preferences
//!
//! Typed wrapper over the configuration EEPROM. The layout is fixed:
//!
//! | address      | contents                                  |
//! |--------------|-------------------------------------------|
//! | 0x00         | hardware revision byte                    |
//! | 0x01         | force-single-ended flag (1 = forced)      |
//! | 0x04 + 4*ch  | channel gain, u16 little-endian           |
//! | 0x06 + 4*ch  | channel offset, u16 little-endian         |
//!
//! Erased cells read 0xFF; an erased calibration pair falls back to unity
//! gain and zero offset so a fresh part behaves sanely.

use super::calibration::{AdcComp, NUM_ADC_COMP};
use crate::platform::{traits::EepromInterface, PlatformError, Result};

/// Hardware revision byte
pub const EE_REVISION_ADDR: u32 = 0x00;

/// Force-single-ended override flag
pub const EE_SINGLE_ENDED_ADDR: u32 = 0x01;

/// Start of the calibration pair table
pub const EE_ADC_COMP_BASE: u32 = 0x04;

/// Bytes per calibration pair
const EE_ADC_COMP_STRIDE: u32 = 4;

/// Typed access to the persisted I/O preferences
pub struct IoPrefs<E> {
    eeprom: E,
}

impl<E: EepromInterface> IoPrefs<E> {
    pub fn new(eeprom: E) -> Self {
        Self { eeprom }
    }

    /// Persisted hardware revision byte (0xFF when never written)
    pub fn revision(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.eeprom.read(EE_REVISION_ADDR, &mut buf)?;
        Ok(buf[0])
    }

    /// Persist the hardware revision
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` for revisions outside 1..=6.
    pub fn set_revision(&mut self, revision: u8) -> Result<()> {
        if !(1..=6).contains(&revision) {
            return Err(PlatformError::InvalidConfig);
        }
        self.eeprom.write(EE_REVISION_ADDR, &[revision])
    }

    /// Whether single-ended resolution is forced on differential profiles
    pub fn force_single_ended(&mut self) -> Result<bool> {
        let mut buf = [0u8; 1];
        self.eeprom.read(EE_SINGLE_ENDED_ADDR, &mut buf)?;
        Ok(buf[0] == 1)
    }

    /// Persist the single-ended override
    pub fn set_force_single_ended(&mut self, forced: bool) -> Result<()> {
        self.eeprom
            .write(EE_SINGLE_ENDED_ADDR, &[u8::from(forced)])
    }

    /// Calibration pair for one channel, defaulting when erased
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` for channels outside the
    /// calibrated set.
    pub fn adc_comp(&mut self, channel: usize) -> Result<AdcComp> {
        let base = self.comp_address(channel)?;
        let mut buf = [0u8; 4];
        self.eeprom.read(base, &mut buf)?;
        let gain = u16::from_le_bytes([buf[0], buf[1]]);
        let offset = u16::from_le_bytes([buf[2], buf[3]]);
        if gain == 0xFFFF && offset == 0xFFFF {
            return Ok(AdcComp::default());
        }
        Ok(AdcComp { gain, offset })
    }

    /// Persist the calibration pair for one channel
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` for channels outside the
    /// calibrated set.
    pub fn set_adc_comp(&mut self, channel: usize, comp: AdcComp) -> Result<()> {
        let base = self.comp_address(channel)?;
        let mut buf = [0u8; 4];
        buf[..2].copy_from_slice(&comp.gain.to_le_bytes());
        buf[2..].copy_from_slice(&comp.offset.to_le_bytes());
        self.eeprom.write(base, &buf)
    }

    fn comp_address(&self, channel: usize) -> Result<u32> {
        if channel >= NUM_ADC_COMP {
            return Err(PlatformError::InvalidConfig);
        }
        Ok(EE_ADC_COMP_BASE + EE_ADC_COMP_STRIDE * channel as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPlatform;
    use crate::platform::traits::Platform;

    fn make_prefs() -> (MockPlatform, IoPrefs<crate::platform::mock::MockEeprom>) {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();
        let prefs = IoPrefs::new(platform.create_eeprom().unwrap());
        (handle, prefs)
    }

    #[test]
    fn test_revision_round_trip() {
        let (_, mut prefs) = make_prefs();
        assert_eq!(prefs.revision().unwrap(), 0xFF);
        prefs.set_revision(4).unwrap();
        assert_eq!(prefs.revision().unwrap(), 4);
    }

    #[test]
    fn test_set_revision_rejects_unknown() {
        let (_, mut prefs) = make_prefs();
        assert_eq!(prefs.set_revision(0), Err(PlatformError::InvalidConfig));
        assert_eq!(prefs.set_revision(7), Err(PlatformError::InvalidConfig));
        assert_eq!(prefs.revision().unwrap(), 0xFF);
    }

    #[test]
    fn test_erased_comp_defaults_to_unity() {
        let (_, mut prefs) = make_prefs();
        assert_eq!(prefs.adc_comp(0).unwrap(), AdcComp::default());
    }

    #[test]
    fn test_comp_round_trip_at_fixed_addresses() {
        let (handle, mut prefs) = make_prefs();
        let comp = AdcComp { gain: 980, offset: 37 };
        prefs.set_adc_comp(2, comp).unwrap();
        assert_eq!(prefs.adc_comp(2).unwrap(), comp);
        // Pair 2 lives at 0x04 + 8: gain first, offset after
        assert_eq!(handle.eeprom_peek_u16(0x0C), 980);
        assert_eq!(handle.eeprom_peek_u16(0x0E), 37);
    }

    #[test]
    fn test_comp_channel_bounds() {
        let (_, mut prefs) = make_prefs();
        assert_eq!(prefs.adc_comp(7).err(), Some(PlatformError::InvalidConfig));
    }

    #[test]
    fn test_single_ended_flag_defaults_off() {
        let (_, mut prefs) = make_prefs();
        // Erased byte is 0xFF, not 1
        assert!(!prefs.force_single_ended().unwrap());
        prefs.set_force_single_ended(true).unwrap();
        assert!(prefs.force_single_ended().unwrap());
    }
}
