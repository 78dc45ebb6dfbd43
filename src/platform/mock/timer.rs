//! Mock Timer implementation for testing

use crate::platform::traits::TimerInterface;

/// Mock timer using simulated time
///
/// Delays advance the simulated clock instantly so bring-up and calibration
/// loops run at full speed in tests.
#[derive(Debug, Default)]
pub struct MockTimer {
    now_us: u64,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerInterface for MockTimer {
    fn delay_us(&mut self, us: u32) {
        self.now_us = self.now_us.wrapping_add(u64::from(us));
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_accumulate() {
        let mut timer = MockTimer::new();
        assert_eq!(timer.now_us(), 0);

        timer.delay_us(1000);
        timer.delay_ms(5);
        assert_eq!(timer.now_us(), 6000);
    }
}
