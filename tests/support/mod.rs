//! Recording fakes for the peripheral seams.

#![allow(dead_code)]

use core::cell::Cell;

use stepper_sequencer::motor::{Channel, PulseOutput, TickSource};
use stepper_sequencer::state::SwitchState;
use stepper_sequencer::switches::{Switch, SwitchOutputs};
use stepper_sequencer::{Clock, Positioner, Ticks};

/// Pulse timer that records what was programmed.
#[derive(Debug, Default)]
pub struct FakeTimer {
    pub cw: bool,
    pub ccw: bool,
    pub period: Option<Ticks>,
    pub duty: Option<Ticks>,
    pub enable_calls: usize,
    pub fail_enable: bool,
}

impl FakeTimer {
    pub fn active(&self) -> Option<Channel> {
        match (self.cw, self.ccw) {
            (true, false) => Some(Channel::Clockwise),
            (false, true) => Some(Channel::CounterClockwise),
            (false, false) => None,
            (true, true) => panic!("both outputs enabled"),
        }
    }
}

impl PulseOutput for FakeTimer {
    type Error = ();

    fn enable(&mut self, channel: Channel) -> Result<(), ()> {
        self.enable_calls += 1;
        if self.fail_enable {
            return Err(());
        }
        match channel {
            Channel::Clockwise => self.cw = true,
            Channel::CounterClockwise => self.ccw = true,
        }
        Ok(())
    }

    fn disable(&mut self, channel: Channel) -> Result<(), ()> {
        match channel {
            Channel::Clockwise => self.cw = false,
            Channel::CounterClockwise => self.ccw = false,
        }
        Ok(())
    }

    fn set_period(&mut self, period: Ticks) -> Result<(), ()> {
        self.period = Some(period);
        Ok(())
    }

    fn set_duty(&mut self, duty: Ticks) -> Result<(), ()> {
        self.duty = Some(duty);
        Ok(())
    }
}

/// Tick interrupt source that records its enable state.
#[derive(Debug, Default)]
pub struct FakeTicks {
    pub enabled: bool,
    pub counter_resets: usize,
    pub cleared: usize,
}

impl TickSource for FakeTicks {
    type Error = ();

    fn enable(&mut self) -> Result<(), ()> {
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), ()> {
        self.enabled = false;
        Ok(())
    }

    fn reset_counter(&mut self) -> Result<(), ()> {
        self.counter_resets += 1;
        Ok(())
    }

    fn clear_pending(&mut self) {
        self.cleared += 1;
    }
}

/// Switch outputs that keep the last written levels.
#[derive(Debug, Default)]
pub struct FakeSwitches {
    pub levels: SwitchState,
    pub writes: usize,
    pub fail: bool,
}

impl SwitchOutputs for FakeSwitches {
    type Error = ();

    fn set(&mut self, switch: Switch, on: bool) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.writes += 1;
        match switch {
            Switch::Current => self.levels.current = on,
            Switch::Holdoff => self.levels.holdoff = on,
            Switch::Division => self.levels.division = on,
        }
        Ok(())
    }
}

/// Manually advanced millisecond clock.
#[derive(Debug, Default)]
pub struct FakeClock {
    now: Cell<u32>,
}

impl FakeClock {
    pub fn starting_at(ms: u32) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

pub type TestPositioner<'a> = Positioner<FakeTimer, FakeTicks, FakeSwitches, &'a FakeClock>;

/// Initialised positioner on the default configuration.
pub fn positioner(clock: &FakeClock) -> TestPositioner<'_> {
    let config = stepper_sequencer::ControllerConfig::default();
    let mut positioner = Positioner::new(
        &config,
        FakeTimer::default(),
        FakeTicks::default(),
        FakeSwitches::default(),
        clock,
    );
    positioner.init().expect("init should succeed");
    positioner
}
