//! Extended channel registry
//!
//! Bus devices contribute channels past the native set. Each capability has
//! its own slot table; slots are handed out contiguously from index 0, so an
//! unassigned slot guarantees everything above it is unassigned too. The
//! registry borrows the devices; the application owns their lifetime and
//! nothing is ever detached.

use crate::devices::traits::IoDevice;

/// Extended slots per capability
pub const NUM_EXTENDED_IO: usize = 24;

/// Maximum registered devices
pub const MAX_IO_DEVICES: usize = 8;

/// One extended channel slot
#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    /// Index into the device table, or `None` when unassigned
    device: Option<u8>,
    /// Channel offset local to the device
    local_offset: u8,
}

/// Slot tables and device borrows for the extended channel range
pub struct ExtendedIo<'a> {
    devices: heapless::Vec<&'a mut dyn IoDevice, MAX_IO_DEVICES>,
    digital_in: [Slot; NUM_EXTENDED_IO],
    digital_out: [Slot; NUM_EXTENDED_IO],
    analog_in: [Slot; NUM_EXTENDED_IO],
    analog_out: [Slot; NUM_EXTENDED_IO],
    // Contiguous assigned run per capability, recomputed after registration
    digital_in_extent: usize,
    digital_out_extent: usize,
    analog_in_extent: usize,
    analog_out_extent: usize,
}

impl<'a> ExtendedIo<'a> {
    pub fn new() -> Self {
        Self {
            devices: heapless::Vec::new(),
            digital_in: [Slot::default(); NUM_EXTENDED_IO],
            digital_out: [Slot::default(); NUM_EXTENDED_IO],
            analog_in: [Slot::default(); NUM_EXTENDED_IO],
            analog_out: [Slot::default(); NUM_EXTENDED_IO],
            digital_in_extent: 0,
            digital_out_extent: 0,
            analog_in_extent: 0,
            analog_out_extent: 0,
        }
    }

    /// Register a device's channels across every capability it reports
    ///
    /// Channels past the slot capacity are dropped silently. Returns `false`
    /// only when the device table itself is full.
    pub fn register(&mut self, device: &'a mut dyn IoDevice) -> bool {
        let dig_in = device.digital_input_count();
        let dig_out = device.digital_output_count();
        let ana_in = device.analog_input_count();
        let ana_out = device.analog_output_count();

        if self.devices.push(device).is_err() {
            crate::log_warn!("extended I/O device table full, device not registered");
            return false;
        }
        let index = (self.devices.len() - 1) as u8;

        assign_run(&mut self.digital_in, index, dig_in);
        assign_run(&mut self.digital_out, index, dig_out);
        assign_run(&mut self.analog_in, index, ana_in);
        assign_run(&mut self.analog_out, index, ana_out);

        self.digital_in_extent = assigned_run(&self.digital_in);
        self.digital_out_extent = assigned_run(&self.digital_out);
        self.analog_in_extent = assigned_run(&self.analog_in);
        self.analog_out_extent = assigned_run(&self.analog_out);

        crate::log_info!(
            "registered extended I/O device {}: {} din {} dout {} ain {} aout",
            index,
            dig_in,
            dig_out,
            ana_in,
            ana_out
        );
        true
    }

    /// Extended digital input count
    pub fn digital_input_count(&self) -> usize {
        self.digital_in_extent
    }

    /// Extended digital output count
    pub fn digital_output_count(&self) -> usize {
        self.digital_out_extent
    }

    /// Extended analog input count
    pub fn analog_input_count(&self) -> usize {
        self.analog_in_extent
    }

    /// Extended analog output count
    pub fn analog_output_count(&self) -> usize {
        self.analog_out_extent
    }

    /// Read an extended digital input; unassigned slots read `false`
    pub fn digital_input(&mut self, index: usize) -> bool {
        match self.resolve(&self.digital_in, index) {
            Some((device, offset)) => self.devices[device].digital_input(offset),
            None => false,
        }
    }

    /// Drive an extended digital output; unassigned slots are a no-op
    pub fn set_digital_output(&mut self, index: usize, active: bool) {
        if let Some((device, offset)) = self.resolve(&self.digital_out, index) {
            self.devices[device].set_digital_output(offset, active);
        }
    }

    /// Read back an extended digital output
    pub fn digital_output(&mut self, index: usize) -> bool {
        match self.resolve(&self.digital_out, index) {
            Some((device, offset)) => self.devices[device].digital_output(offset),
            None => false,
        }
    }

    /// Read an extended analog input; unassigned slots read zero
    pub fn analog_input(&mut self, index: usize) -> u16 {
        match self.resolve(&self.analog_in, index) {
            Some((device, offset)) => self.devices[device].analog_input(offset),
            None => 0,
        }
    }

    /// Set an extended analog output; unassigned slots are a no-op
    pub fn set_analog_output(&mut self, index: usize, value: i32) {
        if let Some((device, offset)) = self.resolve(&self.analog_out, index) {
            self.devices[device].set_analog_output(offset, value);
        }
    }

    /// Read back an extended analog output
    pub fn analog_output(&mut self, index: usize) -> i32 {
        match self.resolve(&self.analog_out, index) {
            Some((device, offset)) => self.devices[device].analog_output(offset),
            None => 0,
        }
    }

    fn resolve(&self, slots: &[Slot; NUM_EXTENDED_IO], index: usize) -> Option<(usize, usize)> {
        let slot = slots.get(index)?;
        let device = slot.device?;
        Some((device as usize, slot.local_offset as usize))
    }
}

impl<'a> Default for ExtendedIo<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Assign `count` contiguous slots to `device`, clipping at capacity
fn assign_run(slots: &mut [Slot; NUM_EXTENDED_IO], device: u8, count: usize) {
    if count == 0 {
        return;
    }
    let start = assigned_run(slots);
    let end = (start + count).min(NUM_EXTENDED_IO);
    for (offset, slot) in slots[start..end].iter_mut().enumerate() {
        slot.device = Some(device);
        slot.local_offset = offset as u8;
    }
}

/// Length of the contiguous assigned run starting at slot 0
///
/// A gap ends the extended range; nothing past the first unassigned slot is
/// ever counted.
fn assigned_run(slots: &[Slot; NUM_EXTENDED_IO]) -> usize {
    slots
        .iter()
        .position(|s| s.device.is_none())
        .unwrap_or(NUM_EXTENDED_IO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::mock::MockIoDevice;

    #[test]
    fn test_contiguous_assignment_across_devices() {
        let mut a = MockIoDevice::new(0, 0, 2, 0);
        let mut b = MockIoDevice::new(0, 0, 1, 0);
        a.set_analog_input(0, 11);
        a.set_analog_input(1, 22);
        b.set_analog_input(0, 33);

        let mut registry = ExtendedIo::new();
        assert!(registry.register(&mut a));
        assert!(registry.register(&mut b));

        assert_eq!(registry.analog_input_count(), 3);
        assert_eq!(registry.analog_input(0), 11);
        assert_eq!(registry.analog_input(1), 22);
        assert_eq!(registry.analog_input(2), 33);
    }

    #[test]
    fn test_capacity_clipping_drops_excess_channels() {
        let mut big = MockIoDevice::new(0, 0, 20, 0);
        let mut more = MockIoDevice::new(0, 0, 10, 0);

        let mut registry = ExtendedIo::new();
        assert!(registry.register(&mut big));
        assert!(registry.register(&mut more));

        // 20 + 10 clips at the 24-slot capacity
        assert_eq!(registry.analog_input_count(), NUM_EXTENDED_IO);
        assert_eq!(registry.analog_input(NUM_EXTENDED_IO), 0);
    }

    #[test]
    fn test_capabilities_counted_independently() {
        let mut dev = MockIoDevice::new(3, 1, 0, 2);
        let mut registry = ExtendedIo::new();
        assert!(registry.register(&mut dev));

        assert_eq!(registry.digital_input_count(), 3);
        assert_eq!(registry.digital_output_count(), 1);
        assert_eq!(registry.analog_input_count(), 0);
        assert_eq!(registry.analog_output_count(), 2);
    }

    #[test]
    fn test_unassigned_slot_reads_neutral() {
        let mut dev = MockIoDevice::new(1, 1, 0, 0);
        let mut registry = ExtendedIo::new();
        assert!(registry.register(&mut dev));

        assert!(!registry.digital_input(1));
        assert_eq!(registry.analog_input(0), 0);
        // Writes past the assigned run go nowhere
        registry.set_digital_output(1, true);
        assert!(!registry.digital_output(1));
    }

    #[test]
    fn test_output_dispatch_uses_local_offset() {
        let mut a = MockIoDevice::new(0, 2, 0, 0);
        let mut b = MockIoDevice::new(0, 1, 0, 0);
        let mut registry = ExtendedIo::new();
        assert!(registry.register(&mut a));
        assert!(registry.register(&mut b));

        registry.set_digital_output(2, true);
        assert!(registry.digital_output(2));
        assert!(!registry.digital_output(0));
        assert!(!registry.digital_output(1));
    }

    #[test]
    fn test_device_table_full_refuses_registration() {
        let mut devices: Vec<MockIoDevice> =
            (0..=MAX_IO_DEVICES).map(|_| MockIoDevice::new(1, 0, 0, 0)).collect();
        let mut registry = ExtendedIo::new();
        let mut results = Vec::new();
        for dev in devices.iter_mut() {
            results.push(registry.register(dev));
        }
        assert_eq!(results.len(), MAX_IO_DEVICES + 1);
        assert!(results[..MAX_IO_DEVICES].iter().all(|&r| r));
        assert!(!results[MAX_IO_DEVICES]);
        assert_eq!(registry.digital_input_count(), MAX_IO_DEVICES);
    }
}
