//! Configuration module for stepper-sequencer.
//!
//! Provides types for loading and validating the controller configuration
//! from TOML files (with `std` feature) or pre-built values.

mod controller;
mod sequence;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use controller::{ControllerConfig, DefaultsConfig, MotorConfig};
pub use sequence::SequenceConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Hertz, Milliseconds, Ticks};
