//! Text command parsing.

use crate::config::units::{Hertz, MAX_FREQUENCY_HZ};
use crate::error::CommandError;
use crate::motor::MotorDirection;
use crate::state::MAX_DEBUG_LEVEL;
use crate::switches::Switch;

/// Leading keyword of a command, echoed as `Cmd` in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verb {
    /// `SET`
    Set,
    /// `GET`
    Get,
    /// `MOVE`
    Move,
    /// `START`
    Start,
    /// `STATUS`
    Status,
    /// `SAVE`
    Save,
    /// Anything else.
    Unknown,
}

impl Verb {
    /// Keyword as sent on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Verb::Set => "SET",
            Verb::Get => "GET",
            Verb::Move => "MOVE",
            Verb::Start => "START",
            Verb::Status => "STATUS",
            Verb::Save => "SAVE",
            Verb::Unknown => "UNKNOWN",
        }
    }
}

/// Argument of a `SET` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    /// `SET FREQ <0..1000>`
    Freq(Hertz),
    /// `SET THRES <i16>`
    Threshold(i16),
    /// `SET CURRENT|HOLDOFF|DIVISION ON|OFF`
    Switch(Switch, bool),
    /// `SET ROUNDCOUNT <any>` resets the counter.
    ResetRoundCount,
    /// `SET DEBUGLEVEL <0..3>`
    DebugLevel(u8),
    /// `SET DEBUG ON|OFF`
    Debug(bool),
}

impl Setting {
    /// Parameter name as sent on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Setting::Freq(_) => "FREQ",
            Setting::Threshold(_) => "THRES",
            Setting::Switch(Switch::Current, _) => "CURRENT",
            Setting::Switch(Switch::Holdoff, _) => "HOLDOFF",
            Setting::Switch(Switch::Division, _) => "DIVISION",
            Setting::ResetRoundCount => "ROUNDCOUNT",
            Setting::DebugLevel(_) => "DEBUGLEVEL",
            Setting::Debug(_) => "DEBUG",
        }
    }
}

/// Readable parameter of a `GET` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parameter {
    /// Move frequency.
    Freq,
    /// Current threshold.
    Threshold,
    /// Current switch.
    Current,
    /// Hold-off switch.
    Holdoff,
    /// Division switch.
    Division,
    /// Zero-point input.
    ZeroPoint,
    /// Rotation count.
    RoundCount,
    /// Sensor init status.
    Ina236Init,
    /// Sensor read status.
    Ina236Read,
    /// Current window in storage order.
    Data,
    /// STATUS verbosity.
    DebugLevel,
}

impl Parameter {
    /// Parameter name as sent on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Parameter::Freq => "FREQ",
            Parameter::Threshold => "THRES",
            Parameter::Current => "CURRENT",
            Parameter::Holdoff => "HOLDOFF",
            Parameter::Division => "DIVISION",
            Parameter::ZeroPoint => "ZEROPOINT",
            Parameter::RoundCount => "ROUNDCOUNT",
            Parameter::Ina236Init => "INA236INIT",
            Parameter::Ina236Read => "INA236READ",
            Parameter::Data => "DATA",
            Parameter::DebugLevel => "DEBUGLEVEL",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let parameter = match name {
            "FREQ" => Parameter::Freq,
            "THRES" => Parameter::Threshold,
            "CURRENT" => Parameter::Current,
            "HOLDOFF" => Parameter::Holdoff,
            "DIVISION" => Parameter::Division,
            "ZEROPOINT" => Parameter::ZeroPoint,
            "ROUNDCOUNT" => Parameter::RoundCount,
            "INA236INIT" => Parameter::Ina236Init,
            "INA236READ" => Parameter::Ina236Read,
            "DATA" => Parameter::Data,
            "DEBUGLEVEL" => Parameter::DebugLevel,
            _ => return None,
        };
        Some(parameter)
    }
}

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Change a runtime parameter.
    Set(Setting),
    /// Read a parameter.
    Get(Parameter),
    /// Bounded move. Zero steps is forwarded so the driver stops.
    Move {
        /// Clockwise or counter-clockwise.
        direction: MotorDirection,
        /// Pulse count.
        steps: u16,
    },
    /// Start the homing sequence.
    Start,
    /// Level-dependent status report.
    Status,
    /// Persist the runtime parameters.
    Save,
}

/// A line that could not be parsed, with enough context for the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFailure<'a> {
    /// Command keyword, `Unknown` if not recognised.
    pub verb: Verb,
    /// Parameter or direction token, when one was given.
    pub parameter: Option<&'a str>,
    /// What was wrong.
    pub error: CommandError,
}

impl<'a> CommandFailure<'a> {
    fn new(verb: Verb, parameter: Option<&'a str>, error: CommandError) -> Self {
        Self {
            verb,
            parameter,
            error,
        }
    }
}

/// Parse one command line.
///
/// Tokens are separated by whitespace and keywords are case-sensitive.
pub fn parse(line: &str) -> Result<Command, CommandFailure<'_>> {
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Err(CommandFailure::new(Verb::Unknown, None, CommandError::Empty));
    };

    let verb = match keyword {
        "SET" => Verb::Set,
        "GET" => Verb::Get,
        "MOVE" => Verb::Move,
        "START" => Verb::Start,
        "STATUS" => Verb::Status,
        "SAVE" => Verb::Save,
        _ => return Err(CommandFailure::new(Verb::Unknown, None, CommandError::UnknownCommand)),
    };

    let key = tokens.next();
    let value = tokens.next();
    let fail = |error| CommandFailure::new(verb, key, error);

    match verb {
        Verb::Set => {
            let (Some(key), Some(value)) = (key, value) else {
                return Err(fail(CommandError::MissingArgument));
            };
            parse_setting(key, value).map(Command::Set).map_err(fail)
        }
        Verb::Get => {
            let key = key.ok_or_else(|| fail(CommandError::MissingArgument))?;
            Parameter::from_name(key)
                .map(Command::Get)
                .ok_or_else(|| fail(CommandError::UnknownParameter))
        }
        Verb::Move => {
            let (Some(dir), Some(steps)) = (key, value) else {
                return Err(fail(CommandError::MissingArgument));
            };
            let direction = match dir {
                "CW" => MotorDirection::Clockwise,
                "CCW" => MotorDirection::CounterClockwise,
                _ => return Err(fail(CommandError::InvalidValue)),
            };
            let steps = steps.parse::<u16>().map_err(|_| fail(CommandError::InvalidValue))?;
            Ok(Command::Move { direction, steps })
        }
        Verb::Start | Verb::Status | Verb::Save => {
            if key.is_some() {
                return Err(CommandFailure::new(Verb::Unknown, None, CommandError::UnknownCommand));
            }
            Ok(match verb {
                Verb::Start => Command::Start,
                Verb::Status => Command::Status,
                _ => Command::Save,
            })
        }
        Verb::Unknown => Err(fail(CommandError::UnknownCommand)),
    }
}

fn parse_setting(key: &str, value: &str) -> Result<Setting, CommandError> {
    match key {
        "FREQ" => {
            let freq = value.parse::<u16>().map_err(|_| CommandError::InvalidValue)?;
            if freq > MAX_FREQUENCY_HZ {
                return Err(CommandError::InvalidValue);
            }
            Ok(Setting::Freq(Hertz(freq)))
        }
        "THRES" => value
            .parse::<i16>()
            .map(Setting::Threshold)
            .map_err(|_| CommandError::InvalidValue),
        "CURRENT" => on_off(value).map(|on| Setting::Switch(Switch::Current, on)),
        "HOLDOFF" => on_off(value).map(|on| Setting::Switch(Switch::Holdoff, on)),
        "DIVISION" => on_off(value).map(|on| Setting::Switch(Switch::Division, on)),
        "ROUNDCOUNT" => Ok(Setting::ResetRoundCount),
        "DEBUGLEVEL" => match value.parse::<u8>() {
            Ok(level) if level <= MAX_DEBUG_LEVEL => Ok(Setting::DebugLevel(level)),
            _ => Err(CommandError::InvalidValue),
        },
        "DEBUG" => on_off(value).map(Setting::Debug),
        _ => Err(CommandError::UnknownParameter),
    }
}

fn on_off(value: &str) -> Result<bool, CommandError> {
    match value {
        "ON" => Ok(true),
        "OFF" => Ok(false),
        _ => Err(CommandError::InvalidValue),
    }
}
