//! Sequence timing configuration.

use serde::Deserialize;

use super::units::Milliseconds;

/// Timing and move parameters of the homing sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Dwell after the switches are set before motion starts.
    pub settle_ms: Milliseconds,

    /// Dwell between stopping the exploratory move and the final move.
    pub stop_settle_ms: Milliseconds,

    /// Pulse count of the final bounded move.
    pub final_move_steps: u16,

    /// Maximum time spent in MonitorCurrent. Zero disables the timeout.
    pub monitor_timeout_ms: Milliseconds,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            settle_ms: Milliseconds(100),
            stop_settle_ms: Milliseconds(50),
            final_move_steps: 2000,
            monitor_timeout_ms: Milliseconds(60_000),
        }
    }
}

impl SequenceConfig {
    /// MonitorCurrent timeout, if enabled.
    #[inline]
    pub fn monitor_timeout(&self) -> Option<Milliseconds> {
        (self.monitor_timeout_ms.0 > 0).then_some(self.monitor_timeout_ms)
    }
}
