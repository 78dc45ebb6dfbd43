//! Timer interface trait
//!
//! Blocking delays for driver bring-up and calibration loops. These stall the
//! caller for milliseconds at a time and therefore must only be used from
//! ordinary control flow, never from the acquisition interrupt.

pub trait TimerInterface {
    /// Block for `us` microseconds
    fn delay_us(&mut self, us: u32);

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }

    /// Microseconds since boot
    fn now_us(&self) -> u64;
}
