//! Motor module for stepper-sequencer.
//!
//! Provides the pulse-train stepper driver, its peripheral seams and the
//! interrupt-safe pulse counter.

mod callback;
mod counter;
mod driver;
pub mod hal;
pub mod state;

pub use callback::{CompletionCallback, NoCallback};
pub use counter::{PulseCounter, TickOutcome};
pub use driver::StepperDriver;
pub use hal::{PulseOutput, TickSource};
pub use state::{Channel, FrequencySetting, MotorDirection, MoveReport, StopReason, TargetPulses};
