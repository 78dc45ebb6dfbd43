//! Device traits

pub mod io_device;

pub use io_device::IoDevice;
