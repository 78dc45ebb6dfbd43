//! Mock SPI implementation for testing

use super::platform::SpiBusState;
use crate::platform::{traits::SpiInterface, Result};
use std::cell::RefCell;
use std::rc::Rc;

/// SPI transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpiTransaction {
    /// Write only
    Write { data: Vec<u8> },
    /// Read only; `data` is what the mock returned
    Read { data: Vec<u8> },
    /// Full-duplex transfer
    Transfer { write: Vec<u8>, read: Vec<u8> },
}

/// Mock SPI bus
///
/// Returns queued bytes (or a configurable default when the queue runs dry)
/// and records every transaction for test verification. Scripting lives on
/// [`super::MockPlatform`].
#[derive(Debug)]
pub struct MockSpi {
    state: Rc<RefCell<SpiBusState>>,
}

impl MockSpi {
    pub(super) fn new(state: Rc<RefCell<SpiBusState>>) -> Self {
        Self { state }
    }

    fn next_byte(state: &mut SpiBusState) -> u8 {
        state.queued.pop_front().unwrap_or(state.default_read)
    }
}

impl SpiInterface for MockSpi {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.state
            .borrow_mut()
            .transactions
            .push(SpiTransaction::Write {
                data: data.to_vec(),
            });
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for byte in buffer.iter_mut() {
            *byte = Self::next_byte(&mut state);
        }
        state.transactions.push(SpiTransaction::Read {
            data: buffer.to_vec(),
        });
        Ok(())
    }

    fn transfer(&mut self, write_buffer: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for byte in read_buffer.iter_mut() {
            *byte = Self::next_byte(&mut state);
        }
        state.transactions.push(SpiTransaction::Transfer {
            write: write_buffer.to_vec(),
            read: read_buffer.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::MockPlatform;
    use super::*;
    use crate::platform::traits::{Platform, SpiConfig};

    #[test]
    fn test_read_returns_queued_then_default() {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();
        let mut spi = platform.create_spi(SpiConfig::default()).unwrap();

        handle.spi_enqueue(&[0xAA, 0xBB]);
        handle.spi_set_default_read(0x01);

        let mut buf = [0u8; 3];
        spi.read(&mut buf).unwrap();
        assert_eq!(buf, [0xAA, 0xBB, 0x01]);
    }

    #[test]
    fn test_transactions_recorded_in_order() {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();
        let mut spi = platform.create_spi(SpiConfig::default()).unwrap();

        spi.write(&[0x4C]).unwrap();
        let mut buf = [0u8; 1];
        spi.read(&mut buf).unwrap();

        let log = handle.spi_transactions();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], SpiTransaction::Write { data: vec![0x4C] });
        assert_eq!(log[1], SpiTransaction::Read { data: vec![0x00] });
    }
}
