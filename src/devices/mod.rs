//! Device drivers
//!
//! Drivers built on the platform abstraction traits, plus the contract that
//! bus-attached expander devices implement to contribute extra channels.
//!
//! ## Modules
//!
//! - `adc`: external serial-bus ADC drivers
//! - `traits`: device trait definitions (`IoDevice`)

pub mod adc;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
