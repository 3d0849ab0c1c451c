//! Stepper motor driver.
//!
//! Generic over the pulse timer seams in [`super::hal`] and a completion
//! callback.

use crate::config::units::{Hertz, Ticks};
use crate::error::{MotorError, MotorResult, Peripheral};
use crate::state::MotionState;

use super::callback::{CompletionCallback, NoCallback};
use super::counter::{PulseCounter, TickOutcome};
use super::hal::{PulseOutput, TickSource};
use super::state::{Channel, FrequencySetting, MotorDirection, MoveReport, StopReason, TargetPulses};

/// Pulse-train stepper driver.
///
/// Generic over:
/// - `P`: the two directional pulse outputs (must implement [`PulseOutput`])
/// - `T`: the per-pulse update interrupt (must implement [`TickSource`])
/// - `L`: completion callback (defaults to [`NoCallback`])
///
/// Every entry point that can end a move takes the [`MotionState`] so the
/// status mirror stays in step with the driver.
pub struct StepperDriver<P, T, L = NoCallback>
where
    P: PulseOutput,
    T: TickSource,
    L: CompletionCallback,
{
    /// Directional pulse outputs.
    output: P,

    /// Update interrupt source.
    ticks: T,

    /// Completion handler.
    callback: L,

    /// Pulse counter updated from the tick interrupt.
    counter: PulseCounter,

    /// Active direction.
    direction: MotorDirection,

    /// Pulse budget of the current or last move.
    target: TargetPulses,

    /// True between a move start and the next stop.
    moving: bool,

    /// Frequency used by bounded moves.
    origin_freq: Hertz,

    /// Last programmed frequency.
    frequency: Option<Hertz>,

    /// Last programmed period.
    period: Ticks,
}

impl<P, T> StepperDriver<P, T, NoCallback>
where
    P: PulseOutput,
    T: TickSource,
{
    /// Create a stopped driver. Call [`init`](Self::init) before moving.
    pub fn new(output: P, ticks: T, origin_freq: Hertz) -> Self {
        Self {
            output,
            ticks,
            callback: NoCallback,
            counter: PulseCounter::new(),
            direction: MotorDirection::Stopped,
            target: TargetPulses::Bounded(0),
            moving: false,
            origin_freq: origin_freq.clamped(),
            frequency: None,
            period: Ticks::default(),
        }
    }
}

impl<P, T, L> StepperDriver<P, T, L>
where
    P: PulseOutput,
    T: TickSource,
    L: CompletionCallback,
{
    /// Replace the callback type.
    pub fn with_callback<L2: CompletionCallback>(self, callback: L2) -> StepperDriver<P, T, L2> {
        StepperDriver {
            output: self.output,
            ticks: self.ticks,
            callback,
            counter: self.counter,
            direction: self.direction,
            target: self.target,
            moving: self.moving,
            origin_freq: self.origin_freq,
            frequency: self.frequency,
            period: self.period,
        }
    }

    /// Register the completion callback, replacing the previous one.
    pub fn set_completion_callback(&mut self, callback: L) {
        self.callback = callback;
    }

    /// Force both outputs idle, disable ticks and program the origin frequency.
    pub fn init(&mut self, state: &mut MotionState) -> MotorResult<()> {
        self.counter.disarm();
        self.counter.reset();
        self.moving = false;
        self.direction = MotorDirection::Stopped;
        self.target = TargetPulses::Bounded(0);

        pulse_fault(self.output.disable(Channel::Clockwise))?;
        pulse_fault(self.output.disable(Channel::CounterClockwise))?;
        tick_fault(self.ticks.disable())?;
        self.ticks.clear_pending();

        self.program(self.origin_freq)?;
        state.record_stop(None);

        info!("stepper driver ready, origin {} Hz", self.origin_freq.value());
        Ok(())
    }

    /// Program the pulse frequency.
    ///
    /// Zero stops the motor. Other values are clamped to `[1, 1000]` Hz and
    /// programmed as `round(1_000_000 / f) - 1` ticks at 50% duty.
    pub fn set_frequency(&mut self, freq: Hertz, state: &mut MotionState) -> MotorResult<FrequencySetting> {
        if freq.value() == 0 {
            self.stop(state)?;
            return Ok(FrequencySetting::Stopped);
        }

        let freq = freq.clamped();
        let period = self.program(freq)?;
        Ok(FrequencySetting::Programmed { freq, period })
    }

    /// Start a bounded move of `steps` pulses at the origin frequency.
    ///
    /// Zero steps or a `Stopped` direction stop the motor and return
    /// [`MotorError::InvalidMove`].
    pub fn move_steps(
        &mut self,
        direction: MotorDirection,
        steps: u16,
        state: &mut MotionState,
    ) -> MotorResult<()> {
        let channel = match direction.channel() {
            Some(channel) if steps > 0 => channel,
            _ => {
                self.stop(state)?;
                return Err(MotorError::InvalidMove { direction, steps });
            }
        };

        self.end_active_move(state)?;

        let target = TargetPulses::Bounded(steps);
        self.counter.arm(target);
        self.target = target;

        if let Err(e) = self.start_bounded(channel) {
            let _ = self.stop(state);
            return Err(e);
        }

        self.begin(direction, state);
        info!("move {} pulses {}", steps, direction);
        Ok(())
    }

    /// Start an unbounded move at the current frequency.
    ///
    /// Pulses are not counted and the tick interrupt stays disabled; only
    /// [`stop`](Self::stop) ends the move.
    pub fn continue_move(&mut self, direction: MotorDirection, state: &mut MotionState) -> MotorResult<()> {
        let Some(channel) = direction.channel() else {
            self.stop(state)?;
            return Err(MotorError::InvalidDirection);
        };

        self.end_active_move(state)?;

        self.counter.arm(TargetPulses::Continuous);
        self.target = TargetPulses::Continuous;

        if let Err(e) = self.start_continuous(channel) {
            let _ = self.stop(state);
            return Err(e);
        }

        self.begin(direction, state);
        info!("continuous move {}", direction);
        Ok(())
    }

    /// Stop the motor.
    ///
    /// Always forces both outputs idle and disables ticks. The callback runs
    /// only when this call ends a move; stopping an idle driver does not
    /// re-fire it. A peripheral fault is returned after the bookkeeping is
    /// complete.
    pub fn stop(&mut self, state: &mut MotionState) -> MotorResult<()> {
        self.halt(StopReason::Requested, state)
    }

    /// Whether a move is active.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Active direction.
    #[inline]
    pub fn direction(&self) -> MotorDirection {
        self.direction
    }

    /// Pulse budget of the current or last move.
    #[inline]
    pub fn target(&self) -> TargetPulses {
        self.target
    }

    /// Frequency used by bounded moves.
    #[inline]
    pub fn origin_freq(&self) -> Hertz {
        self.origin_freq
    }

    /// Last programmed frequency.
    #[inline]
    pub fn frequency(&self) -> Option<Hertz> {
        self.frequency
    }

    /// Last programmed period.
    #[inline]
    pub fn period(&self) -> Ticks {
        self.period
    }

    /// Pulses counted in the current or last bounded move.
    #[inline]
    pub fn current_pulses(&self) -> u16 {
        self.counter.current()
    }

    /// Zero the pulse count.
    #[inline]
    pub fn reset_pulse_count(&mut self) {
        self.counter.reset();
    }

    /// Main-loop poll: mirror progress and stop once the target is reached.
    ///
    /// The tick handler normally stops the move itself; this is the backstop.
    pub fn process(&mut self, state: &mut MotionState) -> MotorResult<()> {
        if !self.moving {
            return Ok(());
        }

        state.record_progress(self.counter.current());
        if self.counter.target_reached() {
            self.halt(StopReason::TargetReached, state)?;
        }
        Ok(())
    }

    /// Tick interrupt handler. Counts one pulse and stops on the target.
    pub fn on_tick(&mut self, state: &mut MotionState) -> MotorResult<TickOutcome> {
        self.ticks.clear_pending();

        let outcome = self.counter.tick();
        if matches!(outcome, TickOutcome::TargetReached(_)) && self.moving {
            self.halt(StopReason::TargetReached, state)?;
        }
        Ok(outcome)
    }

    /// Borrow the pulse outputs.
    #[inline]
    pub fn output(&self) -> &P {
        &self.output
    }

    /// Borrow the tick source.
    #[inline]
    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    /// Borrow the completion callback.
    #[inline]
    pub fn callback(&self) -> &L {
        &self.callback
    }

    /// Take the peripherals and callback back.
    pub fn release(self) -> (P, T, L) {
        (self.output, self.ticks, self.callback)
    }

    fn program(&mut self, freq: Hertz) -> MotorResult<Ticks> {
        let period = freq.period();
        pulse_fault(self.output.set_period(period))?;
        pulse_fault(self.output.set_duty(period.half()))?;
        self.frequency = Some(freq);
        self.period = period;
        debug!("frequency {} Hz, period {}", freq.value(), period.value());
        Ok(period)
    }

    fn select_channel(&mut self, channel: Channel) -> MotorResult<()> {
        pulse_fault(self.output.disable(channel.other()))?;
        pulse_fault(self.output.enable(channel))
    }

    fn start_bounded(&mut self, channel: Channel) -> MotorResult<()> {
        self.program(self.origin_freq)?;
        tick_fault(self.ticks.reset_counter())?;
        self.ticks.clear_pending();
        self.select_channel(channel)?;
        tick_fault(self.ticks.enable())
    }

    fn start_continuous(&mut self, channel: Channel) -> MotorResult<()> {
        self.select_channel(channel)?;
        tick_fault(self.ticks.disable())
    }

    fn begin(&mut self, direction: MotorDirection, state: &mut MotionState) {
        self.direction = direction;
        self.moving = true;
        state.record_move_start(direction, self.target);
    }

    /// A move replaced by a new one is reported as a requested stop.
    fn end_active_move(&mut self, state: &mut MotionState) -> MotorResult<()> {
        if self.moving {
            self.halt(StopReason::Requested, state)?;
        }
        Ok(())
    }

    fn halt(&mut self, reason: StopReason, state: &mut MotionState) -> MotorResult<()> {
        let mut fault = None;
        let cw = self.output.disable(Channel::Clockwise);
        let ccw = self.output.disable(Channel::CounterClockwise);
        if cw.is_err() || ccw.is_err() {
            fault = Some(Peripheral::PulseOutput);
        }
        if self.ticks.disable().is_err() {
            fault.get_or_insert(Peripheral::TickSource);
        }
        self.ticks.clear_pending();
        self.counter.disarm();

        let was_moving = core::mem::replace(&mut self.moving, false);
        let direction = core::mem::replace(&mut self.direction, MotorDirection::Stopped);
        let report = was_moving.then(|| MoveReport {
            direction,
            delivered: match self.target {
                TargetPulses::Bounded(_) => self.counter.current(),
                TargetPulses::Continuous => 0,
            },
            target: self.target,
            reason,
        });

        state.record_stop(report);
        if let Some(report) = report {
            info!("stopped after {} pulses ({})", report.delivered, reason);
            self.callback.on_complete(&report);
        }

        match fault {
            Some(peripheral) => {
                error!("stop incomplete: {} fault", peripheral);
                Err(MotorError::PeripheralFault(peripheral))
            }
            None => Ok(()),
        }
    }
}

fn pulse_fault<E: core::fmt::Debug>(result: Result<(), E>) -> MotorResult<()> {
    result.map_err(|_| {
        error!("pulse output fault");
        MotorError::PeripheralFault(Peripheral::PulseOutput)
    })
}

fn tick_fault<E: core::fmt::Debug>(result: Result<(), E>) -> MotorResult<()> {
    result.map_err(|_| {
        error!("tick source fault");
        MotorError::PeripheralFault(Peripheral::TickSource)
    })
}
