//! Homing sequence controller.
//!
//! A polled state machine that drives the stepper and the mode switches
//! through an ordered set of phases, gated by dwell times and the
//! current-sample window.

mod controller;
mod state;

pub use controller::SequenceController;
pub use state::SequenceState;
