//! Bus-attached I/O expander contract
//!
//! Devices on the vehicle bus can contribute analog/digital channels beyond
//! the native set. They report how many channels they provide per capability
//! and answer get/set calls by local offset (0-based within the device).
//! The extended channel registry maps subsystem-level indices onto these
//! local offsets; devices never see global indices.
//!
//! Registration happens once during the single-threaded setup phase and
//! devices live for the life of the process, so the registry keeps plain
//! mutable borrows.

/// Contract for a bus device contributing extended I/O channels
///
/// Every method has a neutral default so a device only implements the
/// capabilities it actually has. The get/set primitives take `&mut self`
/// because answering them may involve a bus transaction.
pub trait IoDevice {
    /// Number of digital inputs the device contributes
    fn digital_input_count(&self) -> usize {
        0
    }

    /// Number of digital outputs the device contributes
    fn digital_output_count(&self) -> usize {
        0
    }

    /// Number of analog inputs the device contributes
    fn analog_input_count(&self) -> usize {
        0
    }

    /// Number of analog outputs the device contributes
    fn analog_output_count(&self) -> usize {
        0
    }

    /// Read a digital input by local offset
    fn digital_input(&mut self, _offset: usize) -> bool {
        false
    }

    /// Drive a digital output by local offset
    fn set_digital_output(&mut self, _offset: usize, _active: bool) {}

    /// Read back a digital output by local offset
    fn digital_output(&mut self, _offset: usize) -> bool {
        false
    }

    /// Read an analog input by local offset
    fn analog_input(&mut self, _offset: usize) -> u16 {
        0
    }

    /// Set an analog output by local offset
    fn set_analog_output(&mut self, _offset: usize, _value: i32) {}

    /// Read back an analog output by local offset
    fn analog_output(&mut self, _offset: usize) -> i32 {
        0
    }
}
