//! I/O subsystem error types

use crate::devices::adc::ade7913::Ade7913Error;
use crate::platform::PlatformError;
use core::fmt;

/// Errors surfaced by the subsystem facade
///
/// Accessor calls never return these; out-of-range indices yield neutral
/// values instead. Errors are reserved for setup and explicit maintenance
/// operations like offset calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Peripheral claim or access failure
    Platform(PlatformError),
    /// Bus ADC bank failed to reach a converting state
    AdcBringUp(Ade7913Error),
    /// Calibration requested for a channel outside the calibrated set
    InvalidChannel,
    /// Operation needs the bus ADC but the profile has none or bring-up failed
    BusAdcUnavailable,
}

impl From<PlatformError> for IoError {
    fn from(e: PlatformError) -> Self {
        IoError::Platform(e)
    }
}

impl From<Ade7913Error> for IoError {
    fn from(e: Ade7913Error) -> Self {
        IoError::AdcBringUp(e)
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoError::Platform(e) => write!(f, "platform error: {}", e),
            IoError::AdcBringUp(e) => write!(f, "ADC bring-up failed: {}", e),
            IoError::InvalidChannel => write!(f, "channel outside the calibrated set"),
            IoError::BusAdcUnavailable => write!(f, "bus ADC not available"),
        }
    }
}
