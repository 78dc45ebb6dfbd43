//! ADE7913 isolated sigma-delta ADC bank
//!
//! Three ADE7913 chips share one SPI bus with independent chip selects.
//! Chip 1 runs from the crystal and distributes a derived clock on its
//! CLKOUT pin to wake chips 2 and 3, which is why bring-up is a staged,
//! order-dependent sequence rather than three independent init calls.
//!
//! Each chip converts a current channel and two voltage channels as signed
//! 24-bit values.

mod driver;
pub mod registers;

pub use driver::{Ade7913Bank, Ade7913Error, Chip, Sensor, CALIBRATION_SAMPLES};
