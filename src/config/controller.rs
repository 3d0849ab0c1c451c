//! Controller configuration - root configuration structure.

use serde::Deserialize;

use super::sequence::SequenceConfig;
use super::units::Hertz;

/// Root configuration structure from TOML.
///
/// Every section is optional; missing values fall back to the factory
/// defaults of the positioning firmware.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Stepper driver parameters.
    pub motor: MotorConfig,

    /// Homing sequence timing.
    pub sequence: SequenceConfig,

    /// Runtime parameters used until a stored value is loaded.
    pub defaults: DefaultsConfig,
}

/// Stepper driver parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Fixed frequency used by bounded moves and the final sequence phase.
    #[serde(rename = "origin_freq_hz")]
    pub origin_freq: Hertz,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            origin_freq: Hertz(1000),
        }
    }
}

/// Power-on values of the runtime parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Move frequency for the exploratory phase (0 means stop).
    #[serde(rename = "freq_hz")]
    pub freq: Hertz,

    /// Current threshold for the MonitorCurrent phase.
    pub threshold: i16,

    /// STATUS verbosity (0..=3).
    pub debug_level: u8,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            freq: Hertz(500),
            threshold: 50,
            debug_level: 0,
        }
    }
}

impl ControllerConfig {
    /// Origin frequency shorthand.
    #[inline]
    pub fn origin_freq(&self) -> Hertz {
        self.motor.origin_freq
    }
}
