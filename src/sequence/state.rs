//! Sequence phases.

use core::fmt;

/// Phase of the homing sequence.
///
/// Phases run strictly in declaration order, from `SetupSwitches` to
/// `Complete`, then back to `Idle`. `Fault` is entered when a phase fails
/// and is left by the next `start()` or `abort()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceState {
    /// Not running.
    #[default]
    Idle,
    /// Drive the switches into their search configuration.
    SetupSwitches,
    /// Settle, then start the continuous clockwise move.
    StartMoving,
    /// Wait for the whole current window to drop below the threshold.
    MonitorCurrent,
    /// Release the current and division switches.
    AdjustSwitches,
    /// Stop, settle, then run the bounded final move.
    FinalMove,
    /// Wait for the final move to finish.
    Complete,
    /// A phase failed; see `SequenceController::fault`.
    Fault,
}

impl SequenceState {
    /// Whether the sequence is in progress.
    #[inline]
    pub fn is_running(self) -> bool {
        !matches!(self, SequenceState::Idle | SequenceState::Fault)
    }

    /// Phase name for status output.
    pub fn name(self) -> &'static str {
        match self {
            SequenceState::Idle => "Idle",
            SequenceState::SetupSwitches => "SetupSwitches",
            SequenceState::StartMoving => "StartMoving",
            SequenceState::MonitorCurrent => "MonitorCurrent",
            SequenceState::AdjustSwitches => "AdjustSwitches",
            SequenceState::FinalMove => "FinalMove",
            SequenceState::Complete => "Complete",
            SequenceState::Fault => "Fault",
        }
    }
}

impl fmt::Display for SequenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
