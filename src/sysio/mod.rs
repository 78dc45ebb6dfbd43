//! Vehicle I/O subsystem
//!
//! One [`SystemIo`] instance owns the platform peripherals and exposes the
//! channel accessor contract to the rest of the firmware. Construction is a
//! two-step: [`SystemIo::new`] claims the always-needed peripherals, then
//! [`SystemIo::setup`] reads the persisted preferences, selects the hardware
//! profile, configures pins and starts whichever sampling path the profile
//! uses. Setup runs exactly once.
//!
//! Accessors never fail: an out-of-range index reads as a neutral value and
//! writes go nowhere. Errors only come out of setup and of the explicit
//! calibration routine.

pub mod calibration;
pub mod error;
pub mod extended;
pub mod prefs;
pub mod profile;
pub mod sampling;

pub use calibration::{AdcComp, NUM_ADC_COMP};
pub use error::IoError;
pub use extended::{ExtendedIo, MAX_IO_DEVICES, NUM_EXTENDED_IO};
pub use prefs::IoPrefs;
pub use profile::{
    HardwareProfile, HardwareRevision, LINE_UNASSIGNED, NUM_ANALOG_IN, NUM_DIGITAL_IN,
    NUM_DIGITAL_OUT, PIN_UNASSIGNED,
};
pub use sampling::{SampleDepth, SamplingEngine};

use crate::devices::adc::ade7913::{Ade7913Bank, Chip, Sensor};
use crate::devices::traits::IoDevice;
use crate::platform::traits::{
    GpioInterface, GpioMode, Platform, SpiConfig, SpiMode,
};
use profile::{BUS_ADC_CS_PINS, BUS_ADC_DRDY_PIN};

/// The I/O subsystem facade
pub struct SystemIo<'a, P: Platform> {
    platform: P,
    timer: P::Timer,
    watchdog: P::Watchdog,
    prefs: IoPrefs<P::Eeprom>,
    profile: HardwareProfile,
    comp: [AdcComp; NUM_ADC_COMP],
    dig_in_pins: [Option<P::Gpio>; NUM_DIGITAL_IN],
    dig_out_pins: [Option<P::Gpio>; NUM_DIGITAL_OUT],
    sampling: SamplingEngine,
    bus_adc: Option<Ade7913Bank<P::Spi, P::Gpio>>,
    bus_drdy: Option<P::Gpio>,
    resolved: [u16; NUM_ANALOG_IN],
    extended: ExtendedIo<'a>,
}

impl<'a, P: Platform> SystemIo<'a, P> {
    /// Claim the peripherals every profile needs
    ///
    /// # Errors
    ///
    /// Returns `IoError::Platform` if a peripheral cannot be claimed.
    pub fn new(mut platform: P) -> Result<Self, IoError> {
        let timer = platform.create_timer()?;
        let watchdog = platform.create_watchdog()?;
        let prefs = IoPrefs::new(platform.create_eeprom()?);
        Ok(Self {
            platform,
            timer,
            watchdog,
            prefs,
            profile: HardwareProfile::select(0xFF),
            comp: [AdcComp::default(); NUM_ADC_COMP],
            dig_in_pins: core::array::from_fn(|_| None),
            dig_out_pins: core::array::from_fn(|_| None),
            sampling: SamplingEngine::new(SampleDepth::X32),
            bus_adc: None,
            bus_drdy: None,
            resolved: [0; NUM_ANALOG_IN],
            extended: ExtendedIo::new(),
        })
    }

    /// Select the hardware profile and bring the sampling path up
    ///
    /// # Errors
    ///
    /// Returns `IoError::Platform` on a pin or acquisition-unit failure and
    /// `IoError::AdcBringUp` when a bus ADC chip never reports ready. After
    /// a bring-up failure the digital side still works; bus analog channels
    /// read zero.
    pub fn setup(&mut self) -> Result<(), IoError> {
        let revision = self.prefs.revision()?;
        self.profile = HardwareProfile::select(revision);
        if self.prefs.force_single_ended()? {
            self.profile.force_single_ended();
        }
        crate::log_info!("I/O setup: hardware revision byte {}", revision);

        for ch in 0..NUM_ADC_COMP {
            self.comp[ch] = self.prefs.adc_comp(ch)?;
            crate::log_debug!(
                "adc channel {}: gain {} offset {}",
                ch,
                self.comp[ch].gain,
                self.comp[ch].offset
            );
        }

        let profile = self.profile;
        for (slot, &pin) in self.dig_in_pins.iter_mut().zip(profile.digital_in.iter()) {
            if pin == PIN_UNASSIGNED {
                continue;
            }
            let mut gpio = self.platform.create_gpio(pin)?;
            gpio.set_mode(GpioMode::Input)?;
            *slot = Some(gpio);
        }
        for (slot, &pin) in self.dig_out_pins.iter_mut().zip(profile.digital_out.iter()) {
            if pin == PIN_UNASSIGNED {
                continue;
            }
            let mut gpio = self.platform.create_gpio(pin)?;
            gpio.set_mode(GpioMode::OutputPushPull)?;
            gpio.set_low()?;
            *slot = Some(gpio);
        }

        self.sampling = SamplingEngine::new(profile.depth);
        self.resolved = [0; NUM_ANALOG_IN];

        if profile.bus_adc {
            let mut drdy = self.platform.create_gpio(BUS_ADC_DRDY_PIN)?;
            drdy.set_mode(GpioMode::Input)?;
            self.bus_drdy = Some(drdy);

            let cs = [
                claim_chip_select(&mut self.platform, BUS_ADC_CS_PINS[0])?,
                claim_chip_select(&mut self.platform, BUS_ADC_CS_PINS[1])?,
                claim_chip_select(&mut self.platform, BUS_ADC_CS_PINS[2])?,
            ];
            let spi = self.platform.create_spi(SpiConfig {
                frequency: 1_000_000,
                mode: SpiMode::Mode3,
            })?;
            let mut bank = Ade7913Bank::new(spi, cs);
            bank.bring_up(&mut self.timer)?;
            self.bus_adc = Some(bank);
        } else {
            self.platform.start_acquisition(profile.depth.lines())?;
        }

        crate::log_info!("I/O setup complete");
        Ok(())
    }

    /// Fold newly completed raw buffers into the resolved channel values
    ///
    /// Called periodically from ordinary control flow. A no-op when no new
    /// buffer has completed, and always a no-op in bus-sampled mode where
    /// channels are read synchronously instead.
    pub fn adc_poll(&mut self) {
        if self.profile.bus_adc {
            return;
        }
        if self.sampling.poll() {
            for ch in 0..NUM_ANALOG_IN {
                self.resolved[ch] = self.resolve_channel(ch);
            }
        }
    }

    /// Resolved analog input value; out-of-range indices read zero
    pub fn analog_in(&mut self, index: usize) -> u16 {
        let native = self.profile.native_analog_count();
        if index < native {
            if self.profile.bus_adc {
                return self.bus_analog_in(index);
            }
            return self.resolved[index];
        }
        self.extended.analog_input(index - native)
    }

    /// Digital input state; native inputs are active-low
    pub fn digital_in(&mut self, index: usize) -> bool {
        if index < NUM_DIGITAL_IN {
            return match self.dig_in_pins[index].as_ref() {
                Some(pin) => !pin.read(),
                None => false,
            };
        }
        self.extended.digital_input(index - NUM_DIGITAL_IN)
    }

    /// Drive a digital output; out-of-range indices are a no-op
    pub fn set_digital_output(&mut self, index: usize, active: bool) {
        if index < NUM_DIGITAL_OUT {
            if let Some(pin) = self.dig_out_pins[index].as_mut() {
                let result = if active { pin.set_high() } else { pin.set_low() };
                if let Err(e) = result {
                    crate::log_warn!("digital output {} write failed: {}", index, e);
                }
            }
            return;
        }
        self.extended.set_digital_output(index - NUM_DIGITAL_OUT, active);
    }

    /// Read back a digital output's driven state
    pub fn digital_output(&mut self, index: usize) -> bool {
        if index < NUM_DIGITAL_OUT {
            return match self.dig_out_pins[index].as_ref() {
                Some(pin) => pin.read(),
                None => false,
            };
        }
        self.extended.digital_output(index - NUM_DIGITAL_OUT)
    }

    /// Set an analog output; all analog outputs are device-backed
    pub fn set_analog_out(&mut self, index: usize, value: i32) {
        self.extended.set_analog_output(index, value);
    }

    /// Read back an analog output
    pub fn analog_out(&mut self, index: usize) -> i32 {
        self.extended.analog_output(index)
    }

    /// Total addressable digital inputs (native + extended)
    pub fn num_digital_inputs(&self) -> usize {
        NUM_DIGITAL_IN + self.extended.digital_input_count()
    }

    /// Total addressable digital outputs (native + extended)
    pub fn num_digital_outputs(&self) -> usize {
        NUM_DIGITAL_OUT + self.extended.digital_output_count()
    }

    /// Total addressable analog inputs (native + extended)
    pub fn num_analog_inputs(&self) -> usize {
        self.profile.native_analog_count() + self.extended.analog_input_count()
    }

    /// Total addressable analog outputs (all extended)
    pub fn num_analog_outputs(&self) -> usize {
        self.extended.analog_output_count()
    }

    /// Register a bus device's extended channels
    ///
    /// Returns `false` when the device table is full.
    pub fn register_device(&mut self, device: &'a mut dyn IoDevice) -> bool {
        self.extended.register(device)
    }

    /// Derive and store a zero-offset for one bus ADC channel
    ///
    /// Averages 400 consecutive raw readings, stores the result in the
    /// calibration entry and optionally persists it. Blocks for roughly
    /// three seconds; the watchdog is fed throughout.
    ///
    /// # Errors
    ///
    /// `IoError::InvalidChannel` outside the calibrated set,
    /// `IoError::BusAdcUnavailable` when the profile has no bus ADC or its
    /// bring-up failed, `IoError::AdcBringUp` on a bus failure mid-run.
    pub fn calibrate_adc_offset(&mut self, channel: usize, persist: bool) -> Result<u16, IoError> {
        if channel >= NUM_ADC_COMP {
            return Err(IoError::InvalidChannel);
        }
        let (chip, sensor) = bus_channel_source(channel);
        let bank = self.bus_adc.as_mut().ok_or(IoError::BusAdcUnavailable)?;
        let average = bank.calibrate_offset(chip, sensor, &mut self.timer, &mut self.watchdog)?;
        // Raw readings carry 24 bits; offsets are stored in 16-bit units
        let offset = (average >> 8).clamp(0, 0xFFFF) as u16;
        self.comp[channel].offset = offset;
        if persist {
            self.prefs.set_adc_comp(channel, self.comp[channel])?;
        }
        crate::log_info!("adc channel {} offset calibrated to {}", channel, offset);
        Ok(offset)
    }

    /// Full-precision motor current reading; zero without a working bus ADC
    pub fn current_reading(&mut self) -> i32 {
        self.wide_reading(Chip::One, Sensor::Current, 6)
    }

    /// Full-precision pack-high voltage reading
    pub fn pack_high_reading(&mut self) -> i32 {
        self.wide_reading(Chip::Three, Sensor::Voltage1, 4)
    }

    /// Full-precision pack-low voltage reading
    pub fn pack_low_reading(&mut self) -> i32 {
        self.wide_reading(Chip::Three, Sensor::Voltage2, 5)
    }

    /// Persisted hardware revision byte
    ///
    /// # Errors
    ///
    /// Returns `IoError::Platform` on an EEPROM failure.
    pub fn revision(&mut self) -> Result<u8, IoError> {
        Ok(self.prefs.revision()?)
    }

    /// Persist a new hardware revision; takes effect at the next setup
    ///
    /// # Errors
    ///
    /// Returns `IoError::Platform` for revisions outside 1..=6 or on an
    /// EEPROM failure.
    pub fn set_revision(&mut self, revision: u8) -> Result<(), IoError> {
        Ok(self.prefs.set_revision(revision)?)
    }

    /// The sampling engine, for the platform's acquisition-completion glue
    pub fn sampling(&mut self) -> &mut SamplingEngine {
        &mut self.sampling
    }

    /// Level of the bus ADC data-ready line; `false` on non-bus profiles
    pub fn bus_data_ready(&self) -> bool {
        match self.bus_drdy.as_ref() {
            Some(pin) => pin.read(),
            None => false,
        }
    }

    fn resolve_channel(&self, channel: usize) -> u16 {
        let [low, high] = self.profile.analog_map[channel];
        if low == LINE_UNASSIGNED {
            return 0;
        }
        let comp = self.comp[channel];
        if self.profile.single_ended || high == LINE_UNASSIGNED {
            comp.correct(self.sampling.line_value(low as usize))
        } else {
            comp.correct_diff(
                self.sampling.line_value(low as usize),
                self.sampling.line_value(high as usize),
            )
        }
    }

    fn bus_analog_in(&mut self, channel: usize) -> u16 {
        let comp = self.comp[channel];
        let Some(bank) = self.bus_adc.as_mut() else {
            return 0;
        };
        let (chip, sensor) = bus_channel_source(channel);
        match bank.read_raw(chip, sensor) {
            // Truncate to 16 bits; the front end never swings negative here
            Ok(raw) => comp.correct((raw >> 8).max(0) as u16),
            Err(e) => {
                crate::log_warn!("bus ADC read failed: {}", e);
                0
            }
        }
    }

    fn wide_reading(&mut self, chip: Chip, sensor: Sensor, channel: usize) -> i32 {
        let comp = self.comp[channel];
        let Some(bank) = self.bus_adc.as_mut() else {
            return 0;
        };
        match bank.read_raw(chip, sensor) {
            Ok(raw) => comp.correct_wide(raw),
            Err(e) => {
                crate::log_warn!("bus ADC read failed: {}", e);
                0
            }
        }
    }
}

fn claim_chip_select<P: Platform>(platform: &mut P, pin: u8) -> Result<P::Gpio, IoError> {
    let mut gpio = platform.create_gpio(pin)?;
    gpio.set_mode(GpioMode::OutputPushPull)?;
    gpio.set_high()?;
    Ok(gpio)
}

/// Which chip and sub-sensor backs each bus-mode analog channel
fn bus_channel_source(channel: usize) -> (Chip, Sensor) {
    match channel {
        0 => (Chip::One, Sensor::Voltage1),
        1 => (Chip::One, Sensor::Voltage2),
        2 => (Chip::Two, Sensor::Voltage1),
        3 => (Chip::Two, Sensor::Voltage2),
        4 => (Chip::One, Sensor::Current),
        5 => (Chip::Three, Sensor::Voltage1),
        _ => (Chip::Three, Sensor::Voltage2),
    }
}
