//! Unit test harness for stepper-sequencer.
//!
//! This module organizes unit tests for each component of the library.

mod command;
mod config;
mod driver;
