//! Mock I/O expander for testing

#![cfg(any(test, feature = "mock"))]

use crate::devices::traits::IoDevice;

/// Mock bus device with configurable channel counts
///
/// Inputs are seeded through the setters; outputs record what the subsystem
/// wrote so tests can assert on dispatch and local offsets.
#[derive(Debug, Default)]
pub struct MockIoDevice {
    digital_inputs: Vec<bool>,
    digital_outputs: Vec<bool>,
    analog_inputs: Vec<u16>,
    analog_outputs: Vec<i32>,
}

impl MockIoDevice {
    /// Create a device with the given channel counts, all values zeroed
    pub fn new(dig_in: usize, dig_out: usize, ana_in: usize, ana_out: usize) -> Self {
        Self {
            digital_inputs: vec![false; dig_in],
            digital_outputs: vec![false; dig_out],
            analog_inputs: vec![0; ana_in],
            analog_outputs: vec![0; ana_out],
        }
    }

    /// Seed a digital input value
    pub fn set_digital_input(&mut self, offset: usize, active: bool) {
        self.digital_inputs[offset] = active;
    }

    /// Seed an analog input value
    pub fn set_analog_input(&mut self, offset: usize, value: u16) {
        self.analog_inputs[offset] = value;
    }

    /// What the subsystem last wrote to a digital output
    pub fn recorded_digital_output(&self, offset: usize) -> bool {
        self.digital_outputs[offset]
    }

    /// What the subsystem last wrote to an analog output
    pub fn recorded_analog_output(&self, offset: usize) -> i32 {
        self.analog_outputs[offset]
    }
}

impl IoDevice for MockIoDevice {
    fn digital_input_count(&self) -> usize {
        self.digital_inputs.len()
    }

    fn digital_output_count(&self) -> usize {
        self.digital_outputs.len()
    }

    fn analog_input_count(&self) -> usize {
        self.analog_inputs.len()
    }

    fn analog_output_count(&self) -> usize {
        self.analog_outputs.len()
    }

    fn digital_input(&mut self, offset: usize) -> bool {
        self.digital_inputs.get(offset).copied().unwrap_or(false)
    }

    fn set_digital_output(&mut self, offset: usize, active: bool) {
        if let Some(slot) = self.digital_outputs.get_mut(offset) {
            *slot = active;
        }
    }

    fn digital_output(&mut self, offset: usize) -> bool {
        self.digital_outputs.get(offset).copied().unwrap_or(false)
    }

    fn analog_input(&mut self, offset: usize) -> u16 {
        self.analog_inputs.get(offset).copied().unwrap_or(0)
    }

    fn set_analog_output(&mut self, offset: usize, value: i32) {
        if let Some(slot) = self.analog_outputs.get_mut(offset) {
            *slot = value;
        }
    }

    fn analog_output(&mut self, offset: usize) -> i32 {
        self.analog_outputs.get(offset).copied().unwrap_or(0)
    }
}
