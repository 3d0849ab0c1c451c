//! Shared motion state.
//!
//! [`MotionState`] is the explicit context object handed to the driver and
//! the sequence controller. It holds the runtime parameters, the switch
//! flags, the current-sample window, the rotation counter and a read-only
//! mirror of the driver for status output.

mod buffer;
mod rounds;

pub use buffer::{CurrentBuffer, CURRENT_BUFFER_LEN};
pub use rounds::RoundCounter;

use crate::config::units::{Hertz, MAX_FREQUENCY_HZ};
use crate::config::ControllerConfig;
use crate::error::{ConfigError, Error, Result, StoreError};
use crate::motor::{MotorDirection, MoveReport, TargetPulses};
use crate::store::{ParameterStore, KEY_DEBUG_LEVEL, KEY_FREQ, KEY_THRESHOLD};

/// Highest STATUS verbosity level.
pub const MAX_DEBUG_LEVEL: u8 = 3;

/// Requested levels of the three mode switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchState {
    /// Current-sense switch.
    pub current: bool,
    /// Hold-off switch.
    pub holdoff: bool,
    /// Division switch.
    pub division: bool,
}

/// Driver state as last reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionMirror {
    /// A move is active.
    pub moving: bool,
    /// Pulse budget of the active move, `Bounded(0)` when stopped.
    pub target: TargetPulses,
    /// Pulses counted so far.
    pub current_steps: u16,
    /// Active direction.
    pub direction: MotorDirection,
}

impl Default for MotionMirror {
    fn default() -> Self {
        Self {
            moving: false,
            target: TargetPulses::Bounded(0),
            current_steps: 0,
            direction: MotorDirection::Stopped,
        }
    }
}

impl MotionMirror {
    /// Target steps as shown in status output.
    ///
    /// Continuous moves report `u16::MAX`.
    #[inline]
    pub fn target_steps(&self) -> u16 {
        self.target.bounded().unwrap_or(u16::MAX)
    }
}

/// Outcome of the last current-sensor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorStatus {
    /// Last `init` succeeded.
    pub init_ok: bool,
    /// Last read succeeded.
    pub read_ok: bool,
}

/// Process-wide motion context.
#[derive(Debug)]
pub struct MotionState {
    freq: Hertz,
    origin_freq: Hertz,
    threshold: i16,
    switches: SwitchState,
    current_buffer: CurrentBuffer,
    round_count: RoundCounter,
    zero_point: bool,
    debug_level: u8,
    debug_enabled: bool,
    motion: MotionMirror,
    last_move: Option<MoveReport>,
    completed: Option<MoveReport>,
    sensor: SensorStatus,
}

impl Default for MotionState {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}

impl MotionState {
    /// Build the power-on state from configuration defaults.
    ///
    /// Switches start off, the buffer zeroed and the motion mirror stopped.
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            freq: Hertz(config.defaults.freq.value().min(MAX_FREQUENCY_HZ)),
            origin_freq: config.origin_freq().clamped(),
            threshold: config.defaults.threshold,
            switches: SwitchState::default(),
            current_buffer: CurrentBuffer::new(),
            round_count: RoundCounter::new(),
            zero_point: false,
            debug_level: config.defaults.debug_level.min(MAX_DEBUG_LEVEL),
            debug_enabled: false,
            motion: MotionMirror::default(),
            last_move: None,
            completed: None,
            sensor: SensorStatus::default(),
        }
    }

    // ---- Parameters ----

    /// Move frequency of the exploratory phase (0 means stop).
    #[inline]
    pub fn freq(&self) -> Hertz {
        self.freq
    }

    /// Set the move frequency. Accepts `0..=1000` Hz.
    pub fn set_freq(&mut self, freq: Hertz) -> Result<()> {
        if freq.value() > MAX_FREQUENCY_HZ {
            return Err(Error::Config(ConfigError::InvalidFrequency(freq.value())));
        }
        self.freq = freq;
        Ok(())
    }

    /// Fixed frequency of bounded moves.
    #[inline]
    pub fn origin_freq(&self) -> Hertz {
        self.origin_freq
    }

    /// Current threshold.
    #[inline]
    pub fn threshold(&self) -> i16 {
        self.threshold
    }

    /// Set the current threshold.
    #[inline]
    pub fn set_threshold(&mut self, threshold: i16) {
        self.threshold = threshold;
    }

    /// STATUS verbosity.
    #[inline]
    pub fn debug_level(&self) -> u8 {
        self.debug_level
    }

    /// Set the STATUS verbosity. Accepts `0..=3`.
    pub fn set_debug_level(&mut self, level: u8) -> Result<()> {
        if level > MAX_DEBUG_LEVEL {
            return Err(Error::Config(ConfigError::InvalidDebugLevel(level)));
        }
        self.debug_level = level;
        Ok(())
    }

    /// Whether completion notices are emitted.
    #[inline]
    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    /// Enable or disable completion notices.
    #[inline]
    pub fn set_debug_enabled(&mut self, enabled: bool) {
        self.debug_enabled = enabled;
    }

    // ---- Switches ----

    /// Requested switch levels.
    #[inline]
    pub fn switches(&self) -> SwitchState {
        self.switches
    }

    /// Mutable access to the switch flags.
    ///
    /// Changes reach the GPIOs only once applied to a
    /// [`SwitchOutputs`](crate::switches::SwitchOutputs).
    #[inline]
    pub fn switches_mut(&mut self) -> &mut SwitchState {
        &mut self.switches
    }

    // ---- Inputs ----

    /// Current-sample window.
    #[inline]
    pub fn current_buffer(&self) -> &CurrentBuffer {
        &self.current_buffer
    }

    /// Record a current sample.
    #[inline]
    pub fn push_sample(&mut self, sample: i16) {
        self.current_buffer.push(sample);
    }

    /// Rotation counter.
    #[inline]
    pub fn round_count(&self) -> &RoundCounter {
        &self.round_count
    }

    /// Zero-point input level at the last poll.
    #[inline]
    pub fn zero_point(&self) -> bool {
        self.zero_point
    }

    /// Store the zero-point input level.
    #[inline]
    pub fn set_zero_point(&mut self, level: bool) {
        self.zero_point = level;
    }

    /// Current sensor status.
    #[inline]
    pub fn sensor_status(&self) -> SensorStatus {
        self.sensor
    }

    /// Record the outcome of a sensor `init`.
    #[inline]
    pub fn set_sensor_init(&mut self, ok: bool) {
        self.sensor.init_ok = ok;
    }

    /// Record the outcome of a sensor read.
    #[inline]
    pub fn record_sensor_read(&mut self, ok: bool) {
        self.sensor.read_ok = ok;
    }

    // ---- Motion mirror ----

    /// Driver mirror.
    #[inline]
    pub fn motion(&self) -> &MotionMirror {
        &self.motion
    }

    /// Last finished move.
    #[inline]
    pub fn last_move(&self) -> Option<&MoveReport> {
        self.last_move.as_ref()
    }

    /// Take the move finished since the previous call, if any.
    #[inline]
    pub fn take_completed(&mut self) -> Option<MoveReport> {
        self.completed.take()
    }

    pub(crate) fn record_move_start(&mut self, direction: MotorDirection, target: TargetPulses) {
        self.motion = MotionMirror {
            moving: true,
            target,
            current_steps: 0,
            direction,
        };
    }

    pub(crate) fn record_progress(&mut self, current_steps: u16) {
        self.motion.current_steps = current_steps;
    }

    pub(crate) fn record_stop(&mut self, report: Option<MoveReport>) {
        self.motion = MotionMirror::default();
        if let Some(report) = report {
            self.last_move = Some(report);
            self.completed = Some(report);
        }
    }

    // ---- Persistence ----

    /// Apply stored parameters.
    ///
    /// Missing keys and out-of-range values keep the current setting.
    pub fn load_from<S: ParameterStore>(&mut self, store: &mut S) -> core::result::Result<(), StoreError> {
        if let Some(raw) = store.read(KEY_FREQ)? {
            match u16::try_from(raw) {
                Ok(freq) if freq <= MAX_FREQUENCY_HZ => self.freq = Hertz(freq),
                _ => warn!("stored frequency {} out of range", raw),
            }
        }

        if let Some(raw) = store.read(KEY_THRESHOLD)? {
            self.threshold = raw as u16 as i16;
        }

        if let Some(raw) = store.read(KEY_DEBUG_LEVEL)? {
            match u8::try_from(raw) {
                Ok(level) if level <= MAX_DEBUG_LEVEL => self.debug_level = level,
                _ => warn!("stored debug level {} out of range", raw),
            }
        }

        debug!(
            "parameters loaded: freq {} threshold {} level {}",
            self.freq.value(),
            self.threshold,
            self.debug_level
        );
        Ok(())
    }

    /// Persist frequency, threshold and debug level.
    pub fn save_to<S: ParameterStore>(&self, store: &mut S) -> core::result::Result<(), StoreError> {
        store.write(KEY_FREQ, u32::from(self.freq.value()))?;
        store.write(KEY_THRESHOLD, u32::from(self.threshold as u16))?;
        store.write(KEY_DEBUG_LEVEL, u32::from(self.debug_level))?;
        info!("parameters saved");
        Ok(())
    }
}
