//! Shared infrastructure
//!
//! Currently this is just the logging macros; the device/tick scheduler that
//! drives the subsystem periodically lives in the application, not here.

pub mod logging;
