//! Logging abstraction
//!
//! Provides unified logging macros that work across targets:
//! - Embedded (`defmt` feature): routed to defmt
//! - Host tests / `std` feature: println!/eprintln!
//! - Bare no_std without defmt: compiled out
//!
//! The macros must stay cheap enough to call from ordinary control flow but
//! are never called from the acquisition-complete interrupt path.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);
        #[cfg(all(not(feature = "defmt"), any(test, feature = "std")))]
        println!("[INFO] {}", format!($($arg)*));
        #[cfg(all(not(feature = "defmt"), not(any(test, feature = "std"))))]
        ::core::mem::drop(::core::format_args!($($arg)*));
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);
        #[cfg(all(not(feature = "defmt"), any(test, feature = "std")))]
        println!("[WARN] {}", format!($($arg)*));
        #[cfg(all(not(feature = "defmt"), not(any(test, feature = "std"))))]
        ::core::mem::drop(::core::format_args!($($arg)*));
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);
        #[cfg(all(not(feature = "defmt"), any(test, feature = "std")))]
        eprintln!("[ERROR] {}", format!($($arg)*));
        #[cfg(all(not(feature = "defmt"), not(any(test, feature = "std"))))]
        ::core::mem::drop(::core::format_args!($($arg)*));
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
        #[cfg(all(not(feature = "defmt"), any(test, feature = "std")))]
        println!("[DEBUG] {}", format!($($arg)*));
        #[cfg(all(not(feature = "defmt"), not(any(test, feature = "std"))))]
        ::core::mem::drop(::core::format_args!($($arg)*));
    }};
}
