//! Unit tests for configuration parsing and validation.

use stepper_sequencer::config::{parse_config, validate_config, ControllerConfig};
use stepper_sequencer::error::{ConfigError, Error};
use stepper_sequencer::{Hertz, Milliseconds, MotionState};

/// A complete configuration round-trips into the runtime state.
#[test]
fn test_config_drives_power_on_state() {
    let toml_str = r#"
[motor]
origin_freq_hz = 900

[sequence]
settle_ms = 150
final_move_steps = 500

[defaults]
freq_hz = 300
threshold = -10
debug_level = 2
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.sequence.settle_ms, Milliseconds(150));
    assert_eq!(config.sequence.stop_settle_ms, Milliseconds(50));
    assert_eq!(config.sequence.monitor_timeout(), Some(Milliseconds(60_000)));

    let state = MotionState::from_config(&config);
    assert_eq!(state.origin_freq(), Hertz(900));
    assert_eq!(state.freq(), Hertz(300));
    assert_eq!(state.threshold(), -10);
    assert_eq!(state.debug_level(), 2);
}

/// Unknown TOML types are parse errors, not silent defaults.
#[test]
fn test_wrong_type_is_parse_error() {
    let result = parse_config("[defaults]\nthreshold = \"high\"\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test validation fails for a zero step final move.
#[test]
fn test_zero_final_move_rejected() {
    let mut config = ControllerConfig::default();
    config.sequence.final_move_steps = 0;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidFinalMoveSteps))
    ));
}

/// Test validation fails for a default frequency above 1 kHz.
#[test]
fn test_default_frequency_above_limit() {
    let mut config = ControllerConfig::default();
    config.defaults.freq = Hertz(1500);
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidFrequency(1500)))
    ));
}
