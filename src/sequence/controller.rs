//! Polled homing sequence.

use crate::clock::elapsed_ms;
use crate::config::units::Milliseconds;
use crate::config::SequenceConfig;
use crate::error::{MotorResult, SequenceError};
use crate::motor::{CompletionCallback, MotorDirection, PulseOutput, StepperDriver, TickSource};
use crate::state::MotionState;
use crate::switches::SwitchOutputs;

use super::state::SequenceState;

/// Finite-state machine driving the homing sequence.
///
/// Never blocks: every dwell is a comparison against the millisecond clock
/// on the next [`process`](Self::process) call.
#[derive(Debug, Clone)]
pub struct SequenceController {
    config: SequenceConfig,
    state: SequenceState,
    phase_started_ms: u32,
    fault: Option<SequenceError>,
}

impl SequenceController {
    /// Create an idle controller.
    pub fn new(config: SequenceConfig) -> Self {
        Self {
            config,
            state: SequenceState::Idle,
            phase_started_ms: 0,
            fault: None,
        }
    }

    /// Return to `Idle` and forget any fault.
    pub fn init(&mut self) {
        self.state = SequenceState::Idle;
        self.fault = None;
    }

    /// Begin the sequence.
    ///
    /// Returns `false` without touching anything when already running. A
    /// faulted sequence is restarted.
    pub fn start(&mut self, now_ms: u32) -> bool {
        if self.is_running() {
            debug!("sequence already running in {}", self.state);
            return false;
        }
        self.fault = None;
        self.enter(SequenceState::SetupSwitches, now_ms);
        true
    }

    /// True while a phase other than `Idle` or `Fault` is active.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Current phase.
    #[inline]
    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Error that put the sequence into `Fault`.
    #[inline]
    pub fn fault(&self) -> Option<SequenceError> {
        self.fault
    }

    /// Timing configuration.
    #[inline]
    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Stop the driver and return to `Idle` from any phase.
    pub fn abort<P, T, L>(
        &mut self,
        driver: &mut StepperDriver<P, T, L>,
        state: &mut MotionState,
    ) -> MotorResult<()>
    where
        P: PulseOutput,
        T: TickSource,
        L: CompletionCallback,
    {
        if self.state != SequenceState::Idle {
            info!("sequence aborted in {}", self.state);
        }
        self.state = SequenceState::Idle;
        self.fault = None;
        driver.stop(state)
    }

    /// Advance the sequence by at most one phase.
    ///
    /// A no-op unless running. On failure the driver is stopped, the
    /// controller enters `Fault` and the error is returned.
    pub fn process<P, T, L, S>(
        &mut self,
        now_ms: u32,
        driver: &mut StepperDriver<P, T, L>,
        switches: &mut S,
        state: &mut MotionState,
    ) -> Result<SequenceState, SequenceError>
    where
        P: PulseOutput,
        T: TickSource,
        L: CompletionCallback,
        S: SwitchOutputs,
    {
        if !self.is_running() {
            return Ok(self.state);
        }

        match self.step(now_ms, driver, switches, state) {
            Ok(()) => Ok(self.state),
            Err(e) => {
                warn!("sequence fault in {}: {}", self.state, e);
                let _ = driver.stop(state);
                self.state = SequenceState::Fault;
                self.fault = Some(e);
                Err(e)
            }
        }
    }

    fn step<P, T, L, S>(
        &mut self,
        now_ms: u32,
        driver: &mut StepperDriver<P, T, L>,
        switches: &mut S,
        state: &mut MotionState,
    ) -> Result<(), SequenceError>
    where
        P: PulseOutput,
        T: TickSource,
        L: CompletionCallback,
        S: SwitchOutputs,
    {
        let elapsed = elapsed_ms(now_ms, self.phase_started_ms);

        match self.state {
            SequenceState::SetupSwitches => {
                let flags = state.switches_mut();
                flags.current = true;
                flags.holdoff = false;
                flags.division = true;
                switches
                    .apply(state.switches())
                    .map_err(|_| SequenceError::Switches)?;
                self.enter(SequenceState::StartMoving, now_ms);
            }

            SequenceState::StartMoving => {
                if dwell_done(elapsed, self.config.settle_ms) {
                    let freq = state.freq();
                    if freq.value() == 0 {
                        return Err(SequenceError::InvalidFrequency);
                    }
                    driver.set_frequency(freq, state)?;
                    driver.continue_move(MotorDirection::Clockwise, state)?;
                    self.enter(SequenceState::MonitorCurrent, now_ms);
                }
            }

            SequenceState::MonitorCurrent => {
                if state.current_buffer().all_below(state.threshold()) {
                    self.enter(SequenceState::AdjustSwitches, now_ms);
                } else if let Some(timeout) = self.config.monitor_timeout() {
                    if dwell_done(elapsed, timeout) {
                        return Err(SequenceError::Timeout {
                            phase: SequenceState::MonitorCurrent,
                            elapsed_ms: elapsed,
                        });
                    }
                }
            }

            SequenceState::AdjustSwitches => {
                let flags = state.switches_mut();
                flags.current = false;
                flags.division = false;
                switches
                    .apply(state.switches())
                    .map_err(|_| SequenceError::Switches)?;
                self.enter(SequenceState::FinalMove, now_ms);
            }

            SequenceState::FinalMove => {
                driver.stop(state)?;
                if dwell_done(elapsed, self.config.stop_settle_ms) {
                    driver.set_frequency(state.origin_freq(), state)?;
                    driver.move_steps(
                        MotorDirection::Clockwise,
                        self.config.final_move_steps,
                        state,
                    )?;
                    self.enter(SequenceState::Complete, now_ms);
                }
            }

            SequenceState::Complete => {
                if !driver.is_moving() {
                    info!("sequence complete");
                    self.enter(SequenceState::Idle, now_ms);
                }
            }

            SequenceState::Idle | SequenceState::Fault => {}
        }

        Ok(())
    }

    fn enter(&mut self, next: SequenceState, now_ms: u32) {
        debug!("sequence {} -> {}", self.state, next);
        self.state = next;
        self.phase_started_ms = now_ms;
    }
}

#[inline]
fn dwell_done(elapsed: u32, dwell: Milliseconds) -> bool {
    elapsed >= dwell.value()
}
