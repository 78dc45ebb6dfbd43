//! Watchdog interface trait

/// Watchdog feed handle
///
/// The ADC offset calibration loop blocks for several seconds while it
/// averages readings; it feeds the watchdog between samples so the safety
/// supervision does not trip. That loop is the only place outside the
/// application main loop allowed to feed it.
pub trait WatchdogInterface {
    /// Reset the watchdog countdown
    fn feed(&mut self);
}
