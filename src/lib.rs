#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! vcu_io - analog/digital I/O subsystem for an electric vehicle control unit
//!
//! This library samples the vehicle's analog sensor channels (pack voltage,
//! motor current, throttle/brake position), exposes the digital inputs and
//! outputs, and lets bus-attached expander devices contribute additional
//! channels beyond the native set.

// Platform abstraction layer; all hardware access goes through these traits
pub mod platform;

// Device drivers and the bus-device contract
pub mod devices;

// Logging and other shared infrastructure
pub mod core;

// The I/O subsystem itself: profiles, sampling, calibration, accessors
pub mod sysio;
