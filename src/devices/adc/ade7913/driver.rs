//! ADE7913 bank driver
//!
//! Synchronous, blocking driver for the three-chip bank. All transactions
//! run from ordinary control flow; nothing here may be called from the
//! acquisition interrupt (bring-up alone blocks for over 100 ms).

use super::registers::{self, Config, Status0};
use crate::platform::{
    traits::{GpioInterface, SpiInterface, TimerInterface, WatchdogInterface},
    PlatformError,
};
use core::fmt;

/// Bounded retry count while waiting for a chip to leave reset
const READY_RETRIES: u32 = 10;

/// Backoff between ready polls
const READY_POLL_MS: u32 = 6;

/// Settle delay after enabling chip 1's clock output, before chips 2 and 3
/// can answer (datasheet power-up time plus margin)
const CLOCK_SETTLE_MS: u32 = 110;

/// Readings averaged by the offset calibration routine
pub const CALIBRATION_SAMPLES: u32 = 400;

/// Delay between calibration readings
const CALIBRATION_POLL_MS: u32 = 7;

/// One of the three chips in the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Chip {
    /// Crystal-driven chip, distributes the clock to the other two
    One,
    Two,
    Three,
}

impl Chip {
    fn index(self) -> usize {
        match self {
            Chip::One => 0,
            Chip::Two => 1,
            Chip::Three => 2,
        }
    }

    fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Sub-sensor within a chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sensor {
    /// Current channel (IWV)
    Current,
    /// First voltage channel (V1WV)
    Voltage1,
    /// Second voltage channel (V2WV)
    Voltage2,
}

impl Sensor {
    fn register(self) -> u8 {
        match self {
            Sensor::Current => registers::IWV,
            Sensor::Voltage1 => registers::V1WV,
            Sensor::Voltage2 => registers::V2WV,
        }
    }
}

/// Bank driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ade7913Error {
    /// A chip never left reset within the bounded retries
    NotReady(Chip),
    /// Underlying bus or pin failure
    Platform(PlatformError),
}

impl From<PlatformError> for Ade7913Error {
    fn from(e: PlatformError) -> Self {
        Ade7913Error::Platform(e)
    }
}

impl fmt::Display for Ade7913Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ade7913Error::NotReady(chip) => {
                write!(f, "ADC chip {} never reported ready", chip.number())
            }
            Ade7913Error::Platform(e) => write!(f, "ADC bus failure: {}", e),
        }
    }
}

/// Three ADE7913 chips on a shared SPI bus with per-chip selects
pub struct Ade7913Bank<S, G> {
    spi: S,
    cs: [G; 3],
}

impl<S, G> Ade7913Bank<S, G>
where
    S: SpiInterface,
    G: GpioInterface,
{
    /// Create a bank over an already-configured bus
    ///
    /// The chip-select pins must be outputs, driven high (deselected).
    pub fn new(spi: S, cs: [G; 3]) -> Self {
        Self { spi, cs }
    }

    /// Bring the bank up into a known, converting state
    ///
    /// Polls chip 1 out of reset, enables its clock output so chips 2 and 3
    /// power up, waits for both (polling the two interleaved, not one after
    /// the other), then sets their sample rate and bandwidth. There is no
    /// partial success: any chip staying in reset fails the whole bank.
    ///
    /// # Errors
    ///
    /// `Ade7913Error::NotReady` identifies the first chip that never left
    /// reset; the caller must not use the bank afterwards.
    pub fn bring_up<T: TimerInterface>(&mut self, timer: &mut T) -> Result<(), Ade7913Error> {
        // One dummy byte with nothing selected flushes the bus after power-on
        self.spi.write(&[0])?;

        crate::log_info!("waiting for ADC chip 1 to leave reset");
        if !self.wait_ready(Chip::One, timer)? {
            return Err(Ade7913Error::NotReady(Chip::One));
        }

        crate::log_info!("ADC chip 1 ready, enabling clock output");
        self.write_register(
            Chip::One,
            registers::CONFIG,
            (Config::CLKOUT_EN | Config::ADC_FREQ_2KHZ).bits(),
        )?;

        // Chips 2 and 3 power up from the distributed clock
        timer.delay_ms(CLOCK_SETTLE_MS);

        let (mut chip2_ok, mut chip3_ok) = (false, false);
        for _ in 0..READY_RETRIES {
            if !chip2_ok {
                chip2_ok = self.is_ready(Chip::Two)?;
                if !chip2_ok {
                    timer.delay_ms(READY_POLL_MS);
                }
            }
            if !chip3_ok {
                chip3_ok = self.is_ready(Chip::Three)?;
                if !chip3_ok {
                    timer.delay_ms(READY_POLL_MS);
                }
            }
            if chip2_ok && chip3_ok {
                break;
            }
        }
        if !chip2_ok {
            return Err(Ade7913Error::NotReady(Chip::Two));
        }
        if !chip3_ok {
            return Err(Ade7913Error::NotReady(Chip::Three));
        }

        // Downstream chips run slower with reduced bandwidth
        let downstream = (Config::ADC_FREQ_1KHZ | Config::BW).bits();
        self.write_register(Chip::Two, registers::CONFIG, downstream)?;
        self.write_register(Chip::Three, registers::CONFIG, downstream)?;

        crate::log_info!("ADC chips 2 and 3 started");
        Ok(())
    }

    /// Read one raw conversion as a sign-extended 24-bit value
    ///
    /// # Errors
    ///
    /// Returns `Ade7913Error::Platform` on a bus failure.
    pub fn read_raw(&mut self, chip: Chip, sensor: Sensor) -> Result<i32, Ade7913Error> {
        let bytes = self.with_selected(chip, |spi| {
            spi.write(&[registers::read_cmd(sensor.register())])?;
            let mut buf = [0u8; 3];
            spi.read(&mut buf)?;
            Ok(buf)
        })?;
        Ok(decode_sample(bytes))
    }

    /// Derive a zero-input offset by averaging consecutive readings
    ///
    /// Blocks for roughly `CALIBRATION_SAMPLES * 7 ms`; the watchdog is fed
    /// between readings so the safety supervision does not trip.
    ///
    /// # Errors
    ///
    /// Returns `Ade7913Error::Platform` on a bus failure.
    pub fn calibrate_offset<T, W>(
        &mut self,
        chip: Chip,
        sensor: Sensor,
        timer: &mut T,
        watchdog: &mut W,
    ) -> Result<i32, Ade7913Error>
    where
        T: TimerInterface,
        W: WatchdogInterface,
    {
        // 400 full-scale 24-bit readings overflow i32, so accumulate wider
        let mut accum: i64 = 0;
        for _ in 0..CALIBRATION_SAMPLES {
            accum += i64::from(self.read_raw(chip, sensor)?);
            watchdog.feed();
            timer.delay_ms(CALIBRATION_POLL_MS);
        }
        Ok((accum / i64::from(CALIBRATION_SAMPLES)) as i32)
    }

    /// Poll a chip's status until it leaves reset, with bounded retries
    fn wait_ready<T: TimerInterface>(
        &mut self,
        chip: Chip,
        timer: &mut T,
    ) -> Result<bool, Ade7913Error> {
        for _ in 0..READY_RETRIES {
            if self.is_ready(chip)? {
                return Ok(true);
            }
            timer.delay_ms(READY_POLL_MS);
        }
        Ok(false)
    }

    fn is_ready(&mut self, chip: Chip) -> Result<bool, Ade7913Error> {
        let status = self.read_register(chip, registers::STATUS0)?;
        Ok(!Status0::from_bits_truncate(status).contains(Status0::RESET_ON))
    }

    fn read_register(&mut self, chip: Chip, register: u8) -> Result<u8, Ade7913Error> {
        self.with_selected(chip, |spi| {
            spi.write(&[registers::read_cmd(register)])?;
            let mut buf = [0u8; 1];
            spi.read(&mut buf)?;
            Ok(buf[0])
        })
    }

    fn write_register(&mut self, chip: Chip, register: u8, value: u8) -> Result<(), Ade7913Error> {
        self.with_selected(chip, |spi| {
            spi.write(&[registers::write_cmd(register), value])
        })
    }

    /// Run `f` with `chip` selected, deselecting afterwards even on error
    fn with_selected<R>(
        &mut self,
        chip: Chip,
        f: impl FnOnce(&mut S) -> crate::platform::Result<R>,
    ) -> Result<R, Ade7913Error> {
        self.cs[chip.index()].set_low()?;
        let result = f(&mut self.spi);
        self.cs[chip.index()].set_high()?;
        Ok(result?)
    }
}

/// Assemble three MSB-first bytes into a sign-extended 24-bit value
fn decode_sample(bytes: [u8; 3]) -> i32 {
    let raw =
        (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2]);
    // Shift the sign bit up to bit 31, then arithmetic-shift back down
    ((raw << 8) as i32) >> 8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockPlatform, SpiTransaction};
    use crate::platform::traits::{GpioMode, Platform, SpiConfig};

    fn make_bank(
        platform: &mut MockPlatform,
    ) -> Ade7913Bank<crate::platform::mock::MockSpi, crate::platform::mock::MockGpio> {
        let spi = platform.create_spi(SpiConfig::default()).unwrap();
        let cs = [26, 28, 30].map(|pin| {
            let mut gpio = platform.create_gpio(pin).unwrap();
            gpio.set_mode(GpioMode::OutputPushPull).unwrap();
            gpio.set_high().unwrap();
            gpio
        });
        Ade7913Bank::new(spi, cs)
    }

    #[test]
    fn test_decode_sign_extension() {
        // Sign bit set: negative
        assert_eq!(decode_sample([0x80, 0x00, 0x00]), -0x80_0000);
        // Plain positive value
        assert_eq!(decode_sample([0x00, 0x01, 0x00]), 256);
        // All ones: -1
        assert_eq!(decode_sample([0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(decode_sample([0x7F, 0xFF, 0xFF]), 0x7F_FFFF);
    }

    #[test]
    fn test_bring_up_configures_all_chips() {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();
        let mut bank = make_bank(&mut platform);
        let mut timer = platform.create_timer().unwrap();

        // Default read of 0x00 means every status poll reports ready
        bank.bring_up(&mut timer).unwrap();

        let log = handle.spi_transactions();
        // Dummy flush byte first
        assert_eq!(log[0], SpiTransaction::Write { data: vec![0x00] });
        // Chip 1 config: clock out enabled, 2 kHz
        assert!(log.contains(&SpiTransaction::Write {
            data: vec![registers::write_cmd(registers::CONFIG), 0x21],
        }));
        // Chips 2 and 3 config written last: 1 kHz, reduced bandwidth
        let config_writes: Vec<_> = log
            .iter()
            .filter(|t| {
                matches!(t, SpiTransaction::Write { data }
                    if data.first() == Some(&registers::write_cmd(registers::CONFIG))
                        && data.get(1) == Some(&0xB0))
            })
            .collect();
        assert_eq!(config_writes.len(), 2);
    }

    #[test]
    fn test_bring_up_fails_when_chip1_never_ready() {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();
        let mut bank = make_bank(&mut platform);
        let mut timer = platform.create_timer().unwrap();

        // STATUS0 permanently reports RESET_ON
        handle.spi_set_default_read(0x01);

        let result = bank.bring_up(&mut timer);
        assert_eq!(result, Err(Ade7913Error::NotReady(Chip::One)));

        // Bounded retries: dummy byte plus 10 status polls (write + read each)
        let log = handle.spi_transactions();
        assert_eq!(log.len(), 1 + 2 * READY_RETRIES as usize);
        // No configuration register was ever written
        assert!(!log.iter().any(|t| {
            matches!(t, SpiTransaction::Write { data }
                if data.first() == Some(&registers::write_cmd(registers::CONFIG)))
        }));
    }

    #[test]
    fn test_bring_up_fails_when_downstream_chip_never_ready() {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();
        let mut bank = make_bank(&mut platform);
        let mut timer = platform.create_timer().unwrap();

        // Chip 1 ready immediately; afterwards both downstream chips stay in
        // reset for longer than the retry budget
        handle.spi_enqueue(&[0x00]);
        handle.spi_set_default_read(0x01);

        let result = bank.bring_up(&mut timer);
        assert_eq!(result, Err(Ade7913Error::NotReady(Chip::Two)));
    }

    #[test]
    fn test_read_raw_selects_sensor_register() {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();
        let mut bank = make_bank(&mut platform);

        handle.spi_enqueue(&[0x00, 0x10, 0x00]);
        let value = bank.read_raw(Chip::Three, Sensor::Voltage2).unwrap();
        assert_eq!(value, 0x1000);

        let log = handle.spi_transactions();
        assert_eq!(
            log[0],
            SpiTransaction::Write {
                data: vec![registers::read_cmd(registers::V2WV)],
            }
        );
    }

    #[test]
    fn test_calibrate_offset_averages_and_feeds_watchdog() {
        let mut platform = MockPlatform::new();
        let handle = platform.clone();
        let mut bank = make_bank(&mut platform);
        let mut timer = platform.create_timer().unwrap();
        let mut watchdog = platform.create_watchdog().unwrap();

        // Every byte reads 0x01, so every sample decodes to 0x010101
        handle.spi_set_default_read(0x01);

        let offset = bank
            .calibrate_offset(Chip::One, Sensor::Voltage1, &mut timer, &mut watchdog)
            .unwrap();
        assert_eq!(offset, 0x010101);
        assert_eq!(handle.watchdog_feed_count(), CALIBRATION_SAMPLES);
    }
}
