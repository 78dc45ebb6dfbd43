//! Per-channel calibration and correction math
//!
//! Gain is fixed-point scaled by 1024 so that 1024 means unity. The
//! correction paths are pure integer math with explicit guards: offset
//! subtraction saturates at zero, and any corrected magnitude past the
//! plausible range reads as zero instead of propagating a wrapped value.

/// Calibration entries: 4 native-equivalent channels plus 3 bus-sourced
pub const NUM_ADC_COMP: usize = 7;

/// Upper bound on a plausible corrected 16-bit reading
pub const ADC_SANE_MAX: u32 = 4096;

/// Fixed-point shift of the gain scale (1024 = unity)
const GAIN_SHIFT: u32 = 10;

/// Gain/offset pair for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcComp {
    /// Fixed-point gain, 1024 = unity
    pub gain: u16,
    /// Zero offset in raw units
    pub offset: u16,
}

impl Default for AdcComp {
    fn default() -> Self {
        Self { gain: 1024, offset: 0 }
    }
}

impl AdcComp {
    /// Correct a single-ended raw reading
    pub fn correct(&self, raw: u16) -> u16 {
        let shifted =
            (u32::from(raw.saturating_sub(self.offset)) * u32::from(self.gain)) >> GAIN_SHIFT;
        if shifted > ADC_SANE_MAX {
            0
        } else {
            shifted as u16
        }
    }

    /// Correct a differential pair, returning `high - low` after correction
    ///
    /// The front end only produces a valid swing in one direction, so a pair
    /// with `low >= high` before correction reads as zero rather than as a
    /// negative-magnitude value.
    pub fn correct_diff(&self, low: u16, high: u16) -> u16 {
        if low >= high {
            return 0;
        }
        let low_c =
            (u32::from(low.saturating_sub(self.offset)) * u32::from(self.gain)) >> GAIN_SHIFT;
        let high_c =
            (u32::from(high.saturating_sub(self.offset)) * u32::from(self.gain)) >> GAIN_SHIFT;
        let diff = high_c.saturating_sub(low_c);
        if diff > ADC_SANE_MAX {
            0
        } else {
            diff as u16
        }
    }

    /// Correct a full-precision 24-bit bus ADC reading
    ///
    /// The offset is stored in 16-bit units, so it scales up by 256 to match
    /// the raw width; the alternate shift and the gain divisor of 128 keep
    /// the extra precision these sources carry.
    pub fn correct_wide(&self, raw: i32) -> i32 {
        ((raw - i32::from(self.offset) * 256) >> 3) * i32::from(self.gain) / 128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_applies_offset_and_gain() {
        let comp = AdcComp { gain: 1024, offset: 100 };
        assert_eq!(comp.correct(1100), 1000);
        // Half gain
        let comp = AdcComp { gain: 512, offset: 0 };
        assert_eq!(comp.correct(2000), 1000);
    }

    #[test]
    fn test_correct_clamps_underflow_to_zero() {
        let comp = AdcComp { gain: 1024, offset: 500 };
        assert_eq!(comp.correct(400), 0);
    }

    #[test]
    fn test_correct_guards_implausible_magnitude() {
        let comp = AdcComp { gain: 2048, offset: 0 };
        // 3000 * 2 = 6000, past the plausible range
        assert_eq!(comp.correct(3000), 0);
        assert_eq!(comp.correct(2048), 4096);
    }

    #[test]
    fn test_correct_diff_basic() {
        let comp = AdcComp { gain: 1024, offset: 10 };
        // low' = 90, high' = 290
        assert_eq!(comp.correct_diff(100, 300), 200);
    }

    #[test]
    fn test_correct_diff_reversed_pair_reads_zero() {
        let comp = AdcComp { gain: 1024, offset: 10 };
        assert_eq!(comp.correct_diff(300, 100), 0);
        assert_eq!(comp.correct_diff(100, 100), 0);
    }

    #[test]
    fn test_correct_wide_scales() {
        // Unity gain: ((raw) >> 3) * 1024 / 128 = raw
        let comp = AdcComp::default();
        assert_eq!(comp.correct_wide(8000), 8000);
        // Offset in 16-bit units scales by 256
        let comp = AdcComp { gain: 1024, offset: 10 };
        assert_eq!(comp.correct_wide(10 * 256), 0);
    }

    #[test]
    fn test_correct_wide_negative() {
        let comp = AdcComp::default();
        assert_eq!(comp.correct_wide(-8000), -8000);
    }
}
