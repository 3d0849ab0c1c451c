//! Motor state vocabulary.

use crate::config::units::{Hertz, Ticks};

/// Direction of the active pulse train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorDirection {
    /// No pulse output enabled.
    #[default]
    Stopped,
    /// Pulses on the clockwise output.
    Clockwise,
    /// Pulses on the counter-clockwise output.
    CounterClockwise,
}

impl MotorDirection {
    /// Status symbol: `'0'` stopped, `'+'` clockwise, `'-'` counter-clockwise.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            MotorDirection::Stopped => '0',
            MotorDirection::Clockwise => '+',
            MotorDirection::CounterClockwise => '-',
        }
    }

    /// Pulse output channel for this direction, `None` when stopped.
    #[inline]
    pub fn channel(self) -> Option<Channel> {
        match self {
            MotorDirection::Stopped => None,
            MotorDirection::Clockwise => Some(Channel::Clockwise),
            MotorDirection::CounterClockwise => Some(Channel::CounterClockwise),
        }
    }
}

/// One of the two directional pulse outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Clockwise output.
    Clockwise,
    /// Counter-clockwise output.
    CounterClockwise,
}

impl Channel {
    /// The opposite output.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Channel::Clockwise => Channel::CounterClockwise,
            Channel::CounterClockwise => Channel::Clockwise,
        }
    }
}

/// Pulse budget of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TargetPulses {
    /// Stop automatically after this many pulses.
    Bounded(u16),
    /// Run until stopped explicitly; pulses are not counted.
    Continuous,
}

impl TargetPulses {
    /// Bounded pulse count, if any.
    #[inline]
    pub fn bounded(self) -> Option<u16> {
        match self {
            TargetPulses::Bounded(n) => Some(n),
            TargetPulses::Continuous => None,
        }
    }
}

/// Why a move ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopReason {
    /// `stop()` was called, directly or through `set_frequency(0)`.
    Requested,
    /// The pulse counter reached the bounded target.
    TargetReached,
}

/// Summary of a finished move, handed to the completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveReport {
    /// Direction the motor was moving in.
    pub direction: MotorDirection,
    /// Pulses counted before the stop (always 0 for continuous moves).
    pub delivered: u16,
    /// Pulse budget of the move.
    pub target: TargetPulses,
    /// What ended the move.
    pub reason: StopReason,
}

/// Result of programming a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrequencySetting {
    /// A zero frequency was requested and the motor was stopped.
    Stopped,
    /// The pulse timer now runs at `freq` with `period` reference ticks.
    Programmed {
        /// Clamped frequency.
        freq: Hertz,
        /// Auto-reload period.
        period: Ticks,
    },
}
