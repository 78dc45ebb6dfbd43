//! Hardware profile selection
//!
//! Each board revision wires the sensor lines and control pins differently.
//! The revision byte persisted in the preferences picks one of the fixed
//! tables below; anything unrecognized falls back to the legacy board so a
//! corrupt byte can never make the unit unbootable.

use super::sampling::SampleDepth;

/// Native digital input count
pub const NUM_DIGITAL_IN: usize = 4;

/// Native digital output count
pub const NUM_DIGITAL_OUT: usize = 8;

/// Native analog input count when sampling through the on-chip unit
pub const NUM_ANALOG_IN: usize = 4;

/// Analog channel count when sampling through the external bus ADC bank
pub const NUM_BUS_ANALOG_IN: usize = 7;

/// Sentinel for a pin table entry with no pin wired
pub const PIN_UNASSIGNED: u8 = 255;

/// Sentinel for an analog map entry with no physical line wired
pub const LINE_UNASSIGNED: u8 = 255;

/// Chip-select pins for the three bus ADC chips, in chip order
pub const BUS_ADC_CS_PINS: [u8; 3] = [26, 28, 30];

/// Data-ready pin shared by the bus ADC bank
pub const BUS_ADC_DRDY_PIN: u8 = 32;

/// Board revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareRevision {
    /// Pre-revision boards and unrecognized identifiers
    Legacy,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
}

/// Pin and channel map for one board revision
///
/// Selected once during setup; immutable afterwards apart from the
/// single-ended override.
#[derive(Debug, Clone, Copy)]
pub struct HardwareProfile {
    pub revision: HardwareRevision,
    /// Digital input pins
    pub digital_in: [u8; NUM_DIGITAL_IN],
    /// Digital output pins; `PIN_UNASSIGNED` entries are skipped
    pub digital_out: [u8; NUM_DIGITAL_OUT],
    /// Per-channel physical line pairs `[low, high]`; a `LINE_UNASSIGNED`
    /// high line means the channel is single-ended
    pub analog_map: [[u8; 2]; NUM_ANALOG_IN],
    /// Resolve channels single-ended even when a pair is mapped
    pub single_ended: bool,
    /// Sample through the external bus ADC bank instead of the native unit
    pub bus_adc: bool,
    /// Accumulation depth of the native acquisition unit
    pub depth: SampleDepth,
}

impl HardwareProfile {
    /// Select the profile for a persisted revision byte
    ///
    /// Revisions 3 through 5 have single-ended front ends, so the flag is
    /// forced on for them regardless of the persisted override.
    pub fn select(revision_byte: u8) -> Self {
        match revision_byte {
            2 => Self {
                revision: HardwareRevision::V2,
                digital_in: [9, 11, 12, 13],
                digital_out: [52, 22, 48, 32, 255, 255, 255, 255],
                analog_map: [[1, 0], [3, 2], [5, 4], [7, 6]],
                single_ended: false,
                bus_adc: false,
                depth: SampleDepth::X32,
            },
            3 => Self {
                revision: HardwareRevision::V3,
                digital_in: [48, 49, 50, 51],
                digital_out: [9, 8, 7, 6, 255, 255, 255, 255],
                analog_map: [[3, 255], [2, 255], [1, 255], [0, 255]],
                single_ended: true,
                bus_adc: false,
                depth: SampleDepth::X64,
            },
            4 | 5 => Self {
                revision: if revision_byte == 4 {
                    HardwareRevision::V4
                } else {
                    HardwareRevision::V5
                },
                digital_in: [48, 49, 50, 51],
                digital_out: [4, 5, 6, 7, 2, 3, 8, 9],
                analog_map: [[3, 255], [2, 255], [1, 255], [0, 255]],
                single_ended: true,
                bus_adc: false,
                depth: SampleDepth::X64,
            },
            6 => Self {
                revision: HardwareRevision::V6,
                digital_in: [48, 49, 50, 51],
                digital_out: [4, 5, 6, 7, 2, 3, 8, 9],
                analog_map: [[255, 255], [255, 255], [255, 255], [255, 255]],
                single_ended: true,
                bus_adc: true,
                depth: SampleDepth::X64,
            },
            other => Self {
                revision: if other == 1 {
                    HardwareRevision::V1
                } else {
                    HardwareRevision::Legacy
                },
                digital_in: [11, 9, 13, 12],
                digital_out: [52, 22, 48, 32, 255, 255, 255, 255],
                analog_map: [[1, 0], [2, 3], [4, 5], [7, 6]],
                single_ended: false,
                bus_adc: false,
                depth: SampleDepth::X32,
            },
        }
    }

    /// Apply the persisted single-ended override
    pub fn force_single_ended(&mut self) {
        self.single_ended = true;
    }

    /// Number of analog channels this profile addresses natively
    pub fn native_analog_count(&self) -> usize {
        if self.bus_adc {
            NUM_BUS_ANALOG_IN
        } else {
            NUM_ANALOG_IN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_revision_falls_back_to_legacy() {
        let profile = HardwareProfile::select(0xFF);
        assert_eq!(profile.revision, HardwareRevision::Legacy);
        assert_eq!(profile.digital_in, [11, 9, 13, 12]);
        assert!(!profile.bus_adc);
        assert!(!profile.single_ended);
        assert_eq!(profile.depth, SampleDepth::X32);
    }

    #[test]
    fn test_revision_1_shares_legacy_tables() {
        let legacy = HardwareProfile::select(0);
        let v1 = HardwareProfile::select(1);
        assert_eq!(v1.revision, HardwareRevision::V1);
        assert_eq!(v1.digital_in, legacy.digital_in);
        assert_eq!(v1.analog_map, legacy.analog_map);
    }

    #[test]
    fn test_single_ended_forced_on_v3_through_v5() {
        for rev in 3..=5 {
            assert!(HardwareProfile::select(rev).single_ended);
        }
        assert!(!HardwareProfile::select(2).single_ended);
    }

    #[test]
    fn test_v6_uses_bus_adc_with_no_native_lines() {
        let profile = HardwareProfile::select(6);
        assert!(profile.bus_adc);
        assert_eq!(profile.analog_map, [[255, 255]; 4]);
        assert_eq!(profile.native_analog_count(), NUM_BUS_ANALOG_IN);
    }

    #[test]
    fn test_force_single_ended_override() {
        let mut profile = HardwareProfile::select(2);
        profile.force_single_ended();
        assert!(profile.single_ended);
    }
}
