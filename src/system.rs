//! Positioner: the driver, the sequence and their collaborators in one place.

use core::fmt::Write as _;

use embedded_hal::digital::{self, Error as _, InputPin};
use heapless::String;

use crate::clock::Clock;
use crate::command::{self, Command, LineBuffer, Parameter, Response, ResponseBuilder, SampleList, Setting, Verb};
use crate::config::ControllerConfig;
use crate::error::{Error, MotorError, MotorResult, Peripheral, Result, SensorError};
use crate::motor::{
    CompletionCallback, MotorDirection, NoCallback, PulseOutput, StepperDriver, TickOutcome, TickSource,
};
use crate::sensor::{CurrentSensor, Ina236};
use crate::sequence::{SequenceController, SequenceState};
use crate::state::MotionState;
use crate::store::ParameterStore;
use crate::switches::{Switch, SwitchOutputs};

/// Completion notice line queued when debug output is enabled.
pub type Notice = String<48>;

/// Single-axis positioner.
///
/// Generic over:
/// - `P`, `T`: the pulse timer seams of the [`StepperDriver`]
/// - `S`: mode switch outputs
/// - `C`: millisecond clock
/// - `L`: completion callback (defaults to [`NoCallback`])
///
/// Owns the [`MotionState`] and hands it to the driver and the sequence on
/// every call. Share it with interrupt handlers through
/// [`Shared`](crate::Shared).
pub struct Positioner<P, T, S, C, L = NoCallback>
where
    P: PulseOutput,
    T: TickSource,
    S: SwitchOutputs,
    C: Clock,
    L: CompletionCallback,
{
    driver: StepperDriver<P, T, L>,
    sequencer: SequenceController,
    state: MotionState,
    switches: S,
    clock: C,
    line: LineBuffer,
}

impl<P, T, S, C> Positioner<P, T, S, C, NoCallback>
where
    P: PulseOutput,
    T: TickSource,
    S: SwitchOutputs,
    C: Clock,
{
    /// Assemble a positioner. Call [`init`](Self::init) before use.
    pub fn new(config: &ControllerConfig, output: P, ticks: T, switches: S, clock: C) -> Self {
        Self {
            driver: StepperDriver::new(output, ticks, config.origin_freq()),
            sequencer: SequenceController::new(config.sequence.clone()),
            state: MotionState::from_config(config),
            switches,
            clock,
            line: LineBuffer::new(),
        }
    }
}

impl<P, T, S, C, L> Positioner<P, T, S, C, L>
where
    P: PulseOutput,
    T: TickSource,
    S: SwitchOutputs,
    C: Clock,
    L: CompletionCallback,
{
    /// Replace the driver's completion callback type.
    pub fn with_callback<L2: CompletionCallback>(self, callback: L2) -> Positioner<P, T, S, C, L2> {
        Positioner {
            driver: self.driver.with_callback(callback),
            sequencer: self.sequencer,
            state: self.state,
            switches: self.switches,
            clock: self.clock,
            line: self.line,
        }
    }

    /// Initialise the driver, reset the sequence and drive the switches to
    /// their current (power-on: all off) levels.
    pub fn init(&mut self) -> Result<()> {
        self.driver.init(&mut self.state)?;
        self.sequencer.init();
        self.apply_switches()?;
        info!("positioner ready");
        Ok(())
    }

    /// Apply stored parameters over the configuration defaults.
    pub fn load_parameters<St: ParameterStore>(&mut self, store: &mut St) -> Result<()> {
        self.state.load_from(store)?;
        Ok(())
    }

    /// Main-loop poll: driver backstop, then one sequence step.
    pub fn poll(&mut self) -> Result<SequenceState> {
        self.driver.process(&mut self.state)?;
        let now = self.clock.now_ms();
        let phase = self
            .sequencer
            .process(now, &mut self.driver, &mut self.switches, &mut self.state)?;
        Ok(phase)
    }

    /// Tick interrupt entry point.
    #[inline]
    pub fn on_tick(&mut self) -> MotorResult<TickOutcome> {
        self.driver.on_tick(&mut self.state)
    }

    /// Rotation-edge interrupt entry point.
    ///
    /// Counts up while moving clockwise and down while moving
    /// counter-clockwise; edges while stopped are ignored. Returns the count.
    pub fn on_rotation_edge(&mut self) -> u16 {
        let rounds = self.state.round_count();
        match self.state.motion().direction {
            MotorDirection::Clockwise => rounds.increment(),
            MotorDirection::CounterClockwise => rounds.decrement(),
            MotorDirection::Stopped => rounds.get(),
        }
    }

    /// Start the homing sequence; `false` if it is already running.
    pub fn start_sequence(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.sequencer.start(now)
    }

    /// Stop the motor and return the sequence to `Idle`.
    pub fn abort_sequence(&mut self) -> MotorResult<()> {
        self.sequencer.abort(&mut self.driver, &mut self.state)
    }

    /// Bounded move at the origin frequency.
    pub fn move_steps(&mut self, direction: MotorDirection, steps: u16) -> MotorResult<()> {
        self.driver.move_steps(direction, steps, &mut self.state)
    }

    /// Stop the motor. The sequence notices on its next poll.
    pub fn stop(&mut self) -> MotorResult<()> {
        self.driver.stop(&mut self.state)
    }

    /// Write the switch flags of the motion state to the outputs.
    pub fn apply_switches(&mut self) -> Result<()> {
        self.switches
            .apply(self.state.switches())
            .map_err(|_| Error::Motor(MotorError::PeripheralFault(Peripheral::Switches)))
    }

    /// Initialise the current sensor and record the outcome.
    pub fn init_sensor<I2C>(&mut self, sensor: &mut Ina236<I2C>) -> core::result::Result<(), SensorError>
    where
        I2C: embedded_hal::i2c::I2c,
    {
        let result = sensor.init();
        self.state.set_sensor_init(result.is_ok());
        if result.is_err() {
            warn!("current sensor init failed");
        }
        result
    }

    /// Read one current sample into the window.
    pub fn sample_current<Sn: CurrentSensor>(&mut self, sensor: &mut Sn) -> core::result::Result<i16, SensorError> {
        let result = sensor.read_current();
        self.state.record_sensor_read(result.is_ok());
        if let Ok(sample) = result {
            self.state.push_sample(sample);
        }
        result
    }

    /// Poll the zero-point input.
    pub fn poll_zero_point<Z: InputPin>(&mut self, pin: &mut Z) -> core::result::Result<bool, digital::ErrorKind> {
        let level = pin.is_high().map_err(|e| e.kind())?;
        self.state.set_zero_point(level);
        Ok(level)
    }

    /// Completion notice for the move finished since the last call.
    ///
    /// `None` unless debug output is enabled.
    pub fn take_notice(&mut self) -> Option<Notice> {
        let report = self.state.take_completed()?;
        if !self.state.debug_enabled() {
            return None;
        }
        let mut notice = Notice::new();
        write!(notice, "Motor move completed: {} steps\r\n", report.delivered).ok()?;
        Some(notice)
    }

    /// Feed received bytes; every completed line is executed and its
    /// response handed to `respond`.
    pub fn receive<St: ParameterStore>(
        &mut self,
        bytes: &[u8],
        store: &mut St,
        mut respond: impl FnMut(&Response),
    ) {
        for &byte in bytes {
            if let Some(line) = self.line.push(byte) {
                if let Some(response) = self.handle_line(&line, store) {
                    respond(&response);
                }
            }
        }
    }

    /// Parse and execute one line. Blank lines produce no response.
    pub fn handle_line<St: ParameterStore>(&mut self, line: &str, store: &mut St) -> Option<Response> {
        if line.trim().is_empty() {
            return None;
        }
        let response = match command::parse(line) {
            Ok(cmd) => self.handle_command(cmd, store),
            Err(failure) => {
                debug!("rejected command: {}", failure.error);
                command::failure(&failure)
            }
        };
        Some(response)
    }

    /// Execute a parsed command and build its response.
    pub fn handle_command<St: ParameterStore>(&mut self, cmd: Command, store: &mut St) -> Response {
        match cmd {
            Command::Set(setting) => self.apply_setting(setting),
            Command::Get(parameter) => self.read_parameter(parameter),
            Command::Move { direction, steps } => {
                let name = match direction {
                    MotorDirection::CounterClockwise => "CCW",
                    _ => "CW",
                };
                let result = self.move_steps(direction, steps);
                let builder = match result {
                    Ok(()) => ResponseBuilder::success(Verb::Move),
                    Err(_) => ResponseBuilder::error(Verb::Move),
                }
                .text("Direction", name)
                .value("Step", steps);

                match result {
                    Ok(()) => builder,
                    Err(e) => with_message(builder, e),
                }
                .finish()
            }
            Command::Start => {
                self.start_sequence();
                ResponseBuilder::success(Verb::Start).finish()
            }
            Command::Status => self.status(),
            Command::Save => match self.state.save_to(store) {
                Ok(()) => ResponseBuilder::success(Verb::Save).finish(),
                Err(e) => with_message(ResponseBuilder::error(Verb::Save), e).finish(),
            },
        }
    }

    fn apply_setting(&mut self, setting: Setting) -> Response {
        let result: Result<Reply> = match setting {
            Setting::Freq(freq) => self
                .state
                .set_freq(freq)
                .map(|()| Reply::Number(freq.value().into())),
            Setting::Threshold(threshold) => {
                self.state.set_threshold(threshold);
                Ok(Reply::Number(threshold.into()))
            }
            Setting::Switch(switch, on) => {
                let flags = self.state.switches_mut();
                match switch {
                    Switch::Current => flags.current = on,
                    Switch::Holdoff => flags.holdoff = on,
                    Switch::Division => flags.division = on,
                }
                self.switches
                    .set(switch, on)
                    .map(|()| Reply::Flag(on))
                    .map_err(|_| Error::Motor(MotorError::PeripheralFault(Peripheral::Switches)))
            }
            Setting::ResetRoundCount => {
                self.state.round_count().reset();
                Ok(Reply::Number(0))
            }
            Setting::DebugLevel(level) => self
                .state
                .set_debug_level(level)
                .map(|()| Reply::Number(level.into())),
            Setting::Debug(on) => {
                self.state.set_debug_enabled(on);
                Ok(Reply::Flag(on))
            }
        };

        let builder = match result {
            Ok(_) => ResponseBuilder::success(Verb::Set),
            Err(_) => ResponseBuilder::error(Verb::Set),
        }
        .text("Parameter", setting.name());

        match result {
            Ok(reply) => builder.value("Value", reply),
            Err(e) => with_message(builder, e),
        }
        .finish()
    }

    fn read_parameter(&mut self, parameter: Parameter) -> Response {
        let state = &self.state;
        let builder = ResponseBuilder::success(Verb::Get).text("Parameter", parameter.name());
        let builder = match parameter {
            Parameter::Freq => builder.value("Value", state.freq().value()),
            Parameter::Threshold => builder.value("Value", state.threshold()),
            Parameter::Current => builder.value("Value", state.switches().current),
            Parameter::Holdoff => builder.value("Value", state.switches().holdoff),
            Parameter::Division => builder.value("Value", state.switches().division),
            Parameter::ZeroPoint => builder.value("Value", state.zero_point()),
            Parameter::RoundCount => builder.value("Value", state.round_count().get()),
            Parameter::Ina236Init => builder.value("Value", state.sensor_status().init_ok),
            Parameter::Ina236Read => builder.value("Value", state.sensor_status().read_ok),
            Parameter::Data => builder.value("Value", SampleList(state.current_buffer().slots())),
            Parameter::DebugLevel => builder.value("Value", state.debug_level()),
        };
        builder.finish()
    }

    fn status(&self) -> Response {
        let state = &self.state;
        let level = state.debug_level();
        let mut builder = ResponseBuilder::success(Verb::Status).value("Level", level);

        if level >= 1 {
            let switches = state.switches();
            builder = builder
                .value("FREQ", state.freq().value())
                .value("THRES", state.threshold())
                .value("CURRENT", switches.current)
                .value("HOLDOFF", switches.holdoff)
                .value("DIVISION", switches.division);
        }

        if level >= 2 {
            builder = builder.value("LastCurrent", state.current_buffer().latest());
        }

        if level >= 3 {
            let motion = state.motion();
            let mut symbol = [0u8; 4];
            builder = builder
                .text("Motor", motion.direction.symbol().encode_utf8(&mut symbol))
                .value("TargetStep", motion.target_steps())
                .value("CurrentStep", motion.current_steps)
                .value("RoundCount", state.round_count().get())
                .value("ZeroPoint", state.zero_point());
        }

        builder.finish()
    }

    // ---- Accessors ----

    /// Motion state.
    #[inline]
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    /// Mutable motion state.
    #[inline]
    pub fn state_mut(&mut self) -> &mut MotionState {
        &mut self.state
    }

    /// Stepper driver.
    #[inline]
    pub fn driver(&self) -> &StepperDriver<P, T, L> {
        &self.driver
    }

    /// Sequence controller.
    #[inline]
    pub fn sequencer(&self) -> &SequenceController {
        &self.sequencer
    }

    /// Switch outputs.
    #[inline]
    pub fn switches(&self) -> &S {
        &self.switches
    }

    /// Millisecond clock.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

fn with_message(builder: ResponseBuilder, error: impl core::fmt::Display) -> ResponseBuilder {
    let mut message: String<64> = String::new();
    let _ = write!(message, "{}", error);
    builder.text("Message", &message)
}

/// Value echoed by a successful `SET`.
#[derive(Debug, Clone, Copy)]
enum Reply {
    Number(i32),
    Flag(bool),
}

impl core::fmt::Display for Reply {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Reply::Number(n) => write!(f, "{}", n),
            Reply::Flag(on) => write!(f, "{}", on),
        }
    }
}
