//! External bus ADC drivers

pub mod ade7913;
