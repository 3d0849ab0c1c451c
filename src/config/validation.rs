//! Configuration validation.

use crate::error::{ConfigError, Error, Result};
use crate::state::MAX_DEBUG_LEVEL;

use super::units::{MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};
use super::ControllerConfig;

/// Validate a controller configuration.
///
/// Checks:
/// - Origin frequency is within 1-1000 Hz
/// - Default move frequency is within 0-1000 Hz
/// - Final move has a non-zero step count
/// - Default debug level is within 0-3
pub fn validate_config(config: &ControllerConfig) -> Result<()> {
    let origin = config.motor.origin_freq.value();
    if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&origin) {
        return Err(Error::Config(ConfigError::InvalidOriginFrequency(origin)));
    }

    let freq = config.defaults.freq.value();
    if freq > MAX_FREQUENCY_HZ {
        return Err(Error::Config(ConfigError::InvalidFrequency(freq)));
    }

    if config.sequence.final_move_steps == 0 {
        return Err(Error::Config(ConfigError::InvalidFinalMoveSteps));
    }

    if config.defaults.debug_level > MAX_DEBUG_LEVEL {
        return Err(Error::Config(ConfigError::InvalidDebugLevel(
            config.defaults.debug_level,
        )));
    }

    Ok(())
}
