//! Mock EEPROM implementation for testing
//!
//! In-memory storage initialized to 0xFF (erased state), shared with the
//! [`super::MockPlatform`] handle for seeding and inspection.

use crate::platform::{error::EepromError, traits::EepromInterface, Result};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
pub struct MockEeprom {
    memory: Rc<RefCell<Vec<u8>>>,
}

impl MockEeprom {
    pub(super) fn new(memory: Rc<RefCell<Vec<u8>>>) -> Self {
        Self { memory }
    }
}

impl EepromInterface for MockEeprom {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        let memory = self.memory.borrow();
        let start = address as usize;
        let end = start + buf.len();
        if end > memory.len() {
            return Err(EepromError::InvalidAddress.into());
        }
        buf.copy_from_slice(&memory[start..end]);
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let mut memory = self.memory.borrow_mut();
        let start = address as usize;
        let end = start + data.len();
        if end > memory.len() {
            return Err(EepromError::InvalidAddress.into());
        }
        memory[start..end].copy_from_slice(data);
        Ok(())
    }

    fn capacity(&self) -> u32 {
        self.memory.borrow().len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::super::MockPlatform;
    use crate::platform::traits::{EepromInterface, Platform};

    #[test]
    fn test_roundtrip() {
        let mut platform = MockPlatform::new();
        let mut eeprom = platform.create_eeprom().unwrap();

        eeprom.write(0x10, &[1, 2, 3]).unwrap();
        let mut buf = [0u8; 3];
        eeprom.read(0x10, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn test_erased_reads_ff() {
        let mut platform = MockPlatform::new();
        let mut eeprom = platform.create_eeprom().unwrap();

        let mut buf = [0u8; 2];
        eeprom.read(0, &mut buf).unwrap();
        assert_eq!(buf, [0xFF, 0xFF]);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut platform = MockPlatform::new();
        let mut eeprom = platform.create_eeprom().unwrap();

        let capacity = eeprom.capacity();
        let mut buf = [0u8; 1];
        assert!(eeprom.read(capacity, &mut buf).is_err());
        assert!(eeprom.write(capacity, &buf).is_err());
    }
}
