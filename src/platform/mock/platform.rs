//! Mock platform root
//!
//! Owns the shared peripheral state and hands out mock peripherals that
//! reference it.

use super::{MockEeprom, MockGpio, MockSpi, MockTimer, MockWatchdog, SpiTransaction};
use crate::platform::{
    traits::{GpioMode, Platform, SpiConfig},
    Result,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Recorded state of one mock pin
#[derive(Debug, Clone, Copy)]
pub(super) struct PinRecord {
    pub level: bool,
    pub mode: GpioMode,
}

/// Shared SPI bus state
#[derive(Debug, Default)]
pub(super) struct SpiBusState {
    /// Bytes returned by upcoming reads, front first
    pub queued: std::collections::VecDeque<u8>,
    /// Byte returned when the queue is empty
    pub default_read: u8,
    /// Every bus transaction in order
    pub transactions: Vec<SpiTransaction>,
}

/// Mock EEPROM capacity; enough for the preference layout with room to spare
const EEPROM_CAPACITY: usize = 4096;

/// Mock platform implementation
///
/// Clone it before passing ownership to the subsystem; clones share state.
#[derive(Debug, Clone)]
pub struct MockPlatform {
    pub(super) pins: Rc<RefCell<BTreeMap<u8, PinRecord>>>,
    pub(super) spi: Rc<RefCell<SpiBusState>>,
    pub(super) eeprom: Rc<RefCell<Vec<u8>>>,
    pub(super) watchdog_feeds: Rc<RefCell<u32>>,
    acquisition_lines: Rc<RefCell<Option<u8>>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            pins: Rc::new(RefCell::new(BTreeMap::new())),
            spi: Rc::new(RefCell::new(SpiBusState::default())),
            eeprom: Rc::new(RefCell::new(vec![0xFF; EEPROM_CAPACITY])),
            watchdog_feeds: Rc::new(RefCell::new(0)),
            acquisition_lines: Rc::new(RefCell::new(None)),
        }
    }

    /// Simulate an external signal on an input pin
    pub fn set_pin_level(&self, pin: u8, high: bool) {
        if let Some(record) = self.pins.borrow_mut().get_mut(&pin) {
            record.level = high;
        }
    }

    /// Current level of a claimed pin, or `None` if never claimed
    pub fn pin_level(&self, pin: u8) -> Option<bool> {
        self.pins.borrow().get(&pin).map(|r| r.level)
    }

    /// Current mode of a claimed pin, or `None` if never claimed
    pub fn pin_mode(&self, pin: u8) -> Option<GpioMode> {
        self.pins.borrow().get(&pin).map(|r| r.mode)
    }

    /// Queue bytes to be returned by upcoming SPI reads
    pub fn spi_enqueue(&self, data: &[u8]) {
        self.spi.borrow_mut().queued.extend(data.iter().copied());
    }

    /// Byte returned by SPI reads when nothing is queued (default 0x00)
    pub fn spi_set_default_read(&self, value: u8) {
        self.spi.borrow_mut().default_read = value;
    }

    /// SPI transaction log (for test verification)
    pub fn spi_transactions(&self) -> Vec<SpiTransaction> {
        self.spi.borrow().transactions.clone()
    }

    /// Clear the SPI transaction log
    pub fn spi_clear_transactions(&self) {
        self.spi.borrow_mut().transactions.clear();
    }

    /// Write raw bytes into the mock EEPROM
    pub fn eeprom_poke(&self, address: u32, data: &[u8]) {
        let mut mem = self.eeprom.borrow_mut();
        mem[address as usize..address as usize + data.len()].copy_from_slice(data);
    }

    /// Write a single byte into the mock EEPROM
    pub fn eeprom_poke_u8(&self, address: u32, value: u8) {
        self.eeprom_poke(address, &[value]);
    }

    /// Write a little-endian u16 into the mock EEPROM
    pub fn eeprom_poke_u16(&self, address: u32, value: u16) {
        self.eeprom_poke(address, &value.to_le_bytes());
    }

    /// Read a little-endian u16 back out of the mock EEPROM
    pub fn eeprom_peek_u16(&self, address: u32) -> u16 {
        let mem = self.eeprom.borrow();
        u16::from_le_bytes([mem[address as usize], mem[address as usize + 1]])
    }

    /// Number of watchdog feeds so far
    pub fn watchdog_feed_count(&self) -> u32 {
        *self.watchdog_feeds.borrow()
    }

    /// Line count passed to `start_acquisition`, if it was called
    pub fn acquisition_lines(&self) -> Option<u8> {
        *self.acquisition_lines.borrow()
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    type Gpio = MockGpio;
    type Spi = MockSpi;
    type Timer = MockTimer;
    type Eeprom = MockEeprom;
    type Watchdog = MockWatchdog;

    fn create_gpio(&mut self, pin: u8) -> Result<Self::Gpio> {
        self.pins.borrow_mut().entry(pin).or_insert(PinRecord {
            level: false,
            mode: GpioMode::Input,
        });
        Ok(MockGpio::new(pin, Rc::clone(&self.pins)))
    }

    fn create_spi(&mut self, _config: SpiConfig) -> Result<Self::Spi> {
        Ok(MockSpi::new(Rc::clone(&self.spi)))
    }

    fn create_timer(&mut self) -> Result<Self::Timer> {
        Ok(MockTimer::new())
    }

    fn create_eeprom(&mut self) -> Result<Self::Eeprom> {
        Ok(MockEeprom::new(Rc::clone(&self.eeprom)))
    }

    fn create_watchdog(&mut self) -> Result<Self::Watchdog> {
        Ok(MockWatchdog::new(Rc::clone(&self.watchdog_feeds)))
    }

    fn start_acquisition(&mut self, lines: u8) -> Result<()> {
        *self.acquisition_lines.borrow_mut() = Some(lines);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::traits::GpioInterface;

    #[test]
    fn test_clones_share_pin_state() {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();

        let pin = platform.create_gpio(48).unwrap();
        handle.set_pin_level(48, true);
        assert!(pin.read());
    }

    #[test]
    fn test_acquisition_lines_recorded() {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();
        assert_eq!(handle.acquisition_lines(), None);

        platform.start_acquisition(4).unwrap();
        assert_eq!(handle.acquisition_lines(), Some(4));
    }
}
