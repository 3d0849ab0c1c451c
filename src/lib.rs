//! # stepper-sequencer
//!
//! Single-axis stepper positioning core with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Pulse-counted moves**: bounded moves stop themselves from the tick
//!   interrupt; continuous moves run until stopped
//! - **Homing sequence**: a polled state machine gated by dwell times and a
//!   rolling current window
//! - **Interrupt-safe state**: lock-free pulse counter, critical-section
//!   rotation counter
//! - **no_std compatible**: Core library works without standard library
//! - **Serial protocol**: line-framed text commands answered with JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_sequencer::{Positioner, ControllerConfig, MemoryStore, SwitchBank};
//!
//! let config = ControllerConfig::default();
//! let switches = SwitchBank::new(current_pin, holdoff_pin, division_pin);
//! let mut positioner = Positioner::new(&config, pulse_timer, tick_irq, switches, systick);
//! positioner.init()?;
//! positioner.load_parameters(&mut store)?;
//!
//! positioner.start_sequence();
//! loop {
//!     positioner.poll()?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Logging macros, must come first
#[macro_use]
mod fmt;

// Core modules
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod motor;
pub mod sensor;
pub mod sequence;
pub mod shared;
pub mod state;
pub mod store;
pub mod switches;
pub mod system;

// Re-exports for ergonomic API
pub use clock::Clock;
pub use config::{validate_config, ControllerConfig, SequenceConfig};
pub use error::{Error, Result};
pub use motor::{MotorDirection, MoveReport, PulseOutput, StepperDriver, TargetPulses, TickSource};
pub use sensor::Ina236;
pub use sequence::{SequenceController, SequenceState};
pub use shared::Shared;
pub use state::MotionState;
pub use store::{MemoryStore, ParameterStore};
pub use switches::{SwitchBank, SwitchOutputs};
pub use system::Positioner;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Hertz, Milliseconds, Ticks};
