//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the microcontrollers the
//! control unit has shipped on. All hardware access from the I/O subsystem
//! goes through these traits; board support crates supply the concrete
//! implementations and wire the acquisition-complete interrupt to
//! [`crate::sysio::SamplingEngine::advance`].

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{
    EepromInterface, GpioInterface, Platform, SpiInterface, TimerInterface, WatchdogInterface,
};
