//! Mock GPIO implementation for testing

use super::platform::PinRecord;
use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Mock GPIO pin
///
/// State lives in the shared pin table so tests can simulate input levels
/// and inspect output levels through the [`super::MockPlatform`] handle.
#[derive(Debug)]
pub struct MockGpio {
    pin: u8,
    pins: Rc<RefCell<BTreeMap<u8, PinRecord>>>,
}

impl MockGpio {
    pub(super) fn new(pin: u8, pins: Rc<RefCell<BTreeMap<u8, PinRecord>>>) -> Self {
        Self { pin, pins }
    }

    fn set_level(&mut self, high: bool) -> Result<()> {
        let mut pins = self.pins.borrow_mut();
        let record = pins
            .get_mut(&self.pin)
            .ok_or(PlatformError::Gpio(GpioError::InvalidPin))?;
        if record.mode != GpioMode::OutputPushPull {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        record.level = high;
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.set_level(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.set_level(false)
    }

    fn read(&self) -> bool {
        self.pins
            .borrow()
            .get(&self.pin)
            .map(|r| r.level)
            .unwrap_or(false)
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        let mut pins = self.pins.borrow_mut();
        let record = pins
            .get_mut(&self.pin)
            .ok_or(PlatformError::Gpio(GpioError::InvalidPin))?;
        record.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.pins
            .borrow()
            .get(&self.pin)
            .map(|r| r.mode)
            .unwrap_or(GpioMode::Input)
    }
}

#[cfg(test)]
mod tests {
    use super::super::MockPlatform;
    use crate::platform::traits::{GpioInterface, GpioMode, Platform};

    #[test]
    fn test_output_levels() {
        let mut platform = MockPlatform::new();
        let mut pin = platform.create_gpio(4).unwrap();
        pin.set_mode(GpioMode::OutputPushPull).unwrap();

        pin.set_high().unwrap();
        assert!(pin.read());
        pin.set_low().unwrap();
        assert!(!pin.read());
    }

    #[test]
    fn test_input_rejects_writes() {
        let mut platform = MockPlatform::new();
        let mut pin = platform.create_gpio(4).unwrap();
        pin.set_mode(GpioMode::Input).unwrap();

        assert!(pin.set_high().is_err());
        assert!(pin.set_low().is_err());
    }

    #[test]
    fn test_input_follows_simulated_level() {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();
        let pin = platform.create_gpio(48).unwrap();

        assert!(!pin.read());
        handle.set_pin_level(48, true);
        assert!(pin.read());
    }
}
