//! Error types for stepper-sequencer.
//!
//! Provides unified error handling across configuration, the stepper driver,
//! the sequence controller and the collaborators around them.

use core::fmt;

use embedded_hal::i2c;

use crate::motor::MotorDirection;
use crate::sequence::SequenceState;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for stepper driver operations.
pub type MotorResult<T> = core::result::Result<T, MotorError>;

/// Unified error type for all stepper-sequencer operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Stepper driver error
    Motor(MotorError),
    /// Sequence controller error
    Sequence(SequenceError),
    /// Command parsing error
    Command(CommandError),
    /// Parameter store error
    Store(StoreError),
    /// Current sensor error
    Sensor(SensorError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Origin frequency outside 1..=1000 Hz
    InvalidOriginFrequency(u16),
    /// Default move frequency outside 0..=1000 Hz
    InvalidFrequency(u16),
    /// Final move step count must be non-zero
    InvalidFinalMoveSteps,
    /// Debug level outside 0..=3
    InvalidDebugLevel(u8),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Hardware block that rejected a configuration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    /// Directional pulse outputs
    PulseOutput,
    /// Periodic tick interrupt source
    TickSource,
    /// Switch GPIO outputs
    Switches,
}

/// Stepper driver errors.
///
/// Invalid move requests still leave the driver stopped; the error only
/// reports why the move did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// A peripheral configuration call failed
    PeripheralFault(Peripheral),
    /// Bounded move with zero steps or without a direction
    InvalidMove {
        /// Requested direction
        direction: MotorDirection,
        /// Requested step count
        steps: u16,
    },
    /// Continuous move requested with `Stopped`
    InvalidDirection,
}

/// Sequence controller errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// A phase waited longer than its configured timeout
    Timeout {
        /// Phase that stalled
        phase: SequenceState,
        /// Time spent in the phase
        elapsed_ms: u32,
    },
    /// Configured move frequency is zero, the sequence cannot start moving
    InvalidFrequency,
    /// The driver rejected a command
    Driver(MotorError),
    /// Switch outputs could not be written
    Switches,
}

/// Command line errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Line contained no command
    Empty,
    /// Command keyword not recognised
    UnknownCommand,
    /// Parameter name not recognised
    UnknownParameter,
    /// A required argument is missing
    MissingArgument,
    /// Argument could not be parsed or is out of range
    InvalidValue,
}

/// Parameter store errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Backing storage rejected the operation
    Backend,
    /// No room left for a new key
    Full,
}

/// Current sensor errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Read attempted before a successful `init`
    NotInitialized,
    /// I2C transfer failed
    Bus(i2c::ErrorKind),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Sequence(e) => write!(f, "Sequence error: {}", e),
            Error::Command(e) => write!(f, "Command error: {}", e),
            Error::Store(e) => write!(f, "Store error: {}", e),
            Error::Sensor(e) => write!(f, "Sensor error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidOriginFrequency(v) => {
                write!(f, "Invalid origin frequency: {} Hz. Must be 1-1000", v)
            }
            ConfigError::InvalidFrequency(v) => {
                write!(f, "Invalid frequency: {} Hz. Must be 0-1000", v)
            }
            ConfigError::InvalidFinalMoveSteps => write!(f, "Final move steps must be > 0"),
            ConfigError::InvalidDebugLevel(v) => write!(f, "Invalid debug level: {}. Must be 0-3", v),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Peripheral::PulseOutput => write!(f, "pulse output"),
            Peripheral::TickSource => write!(f, "tick source"),
            Peripheral::Switches => write!(f, "switch outputs"),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PeripheralFault(p) => write!(f, "{} configuration failed", p),
            MotorError::InvalidMove { direction, steps } => {
                write!(f, "Invalid move: {} steps {:?}", steps, direction)
            }
            MotorError::InvalidDirection => write!(f, "Continuous move needs a direction"),
        }
    }
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceError::Timeout { phase, elapsed_ms } => {
                write!(f, "{:?} timed out after {} ms", phase, elapsed_ms)
            }
            SequenceError::InvalidFrequency => write!(f, "Move frequency is zero"),
            SequenceError::Driver(e) => write!(f, "Driver fault: {}", e),
            SequenceError::Switches => write!(f, "Switch outputs could not be written"),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "Empty command"),
            CommandError::UnknownCommand => write!(f, "Unknown command"),
            CommandError::UnknownParameter => write!(f, "Unknown parameter"),
            CommandError::MissingArgument => write!(f, "Missing argument"),
            CommandError::InvalidValue => write!(f, "Invalid value"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Backend => write!(f, "Storage backend failure"),
            StoreError::Full => write!(f, "Storage full"),
        }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::NotInitialized => write!(f, "Sensor not initialized"),
            SensorError::Bus(kind) => write!(f, "I2C error: {:?}", kind),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<SequenceError> for Error {
    fn from(e: SequenceError) -> Self {
        Error::Sequence(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Error::Sensor(e)
    }
}

impl From<MotorError> for SequenceError {
    fn from(e: MotorError) -> Self {
        SequenceError::Driver(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for SequenceError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

#[cfg(feature = "std")]
impl std::error::Error for StoreError {}

#[cfg(feature = "std")]
impl std::error::Error for SensorError {}
