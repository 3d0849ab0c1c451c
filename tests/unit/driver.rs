//! Unit tests for the stepper driver.

use core::cell::Cell;

use proptest::prelude::*;

use stepper_sequencer::error::{MotorError, Peripheral};
use stepper_sequencer::motor::{
    Channel, FrequencySetting, MoveReport, StepperDriver, StopReason, TickOutcome,
};
use stepper_sequencer::{Hertz, MotionState, MotorDirection, TargetPulses, Ticks};

use crate::support::{FakeTicks, FakeTimer};

fn driver() -> (StepperDriver<FakeTimer, FakeTicks>, MotionState) {
    let mut state = MotionState::default();
    let mut driver = StepperDriver::new(FakeTimer::default(), FakeTicks::default(), Hertz(1000));
    driver.init(&mut state).expect("init should succeed");
    (driver, state)
}

// =============================================================================
// Frequency programming
// =============================================================================

#[test]
fn test_init_programs_origin_frequency() {
    let (driver, state) = driver();
    assert_eq!(driver.output().period, Some(Ticks(999)));
    assert_eq!(driver.output().duty, Some(Ticks(499)));
    assert_eq!(driver.output().active(), None);
    assert!(!driver.ticks().enabled);
    assert!(!state.motion().moving);
}

#[test]
fn test_out_of_range_frequency_clamps() {
    let (mut driver, mut state) = driver();
    let setting = driver.set_frequency(Hertz(5000), &mut state).unwrap();
    assert_eq!(
        setting,
        FrequencySetting::Programmed {
            freq: Hertz(1000),
            period: Ticks(999)
        }
    );
}

#[test]
fn test_zero_frequency_stops() {
    let (mut driver, mut state) = driver();
    driver
        .continue_move(MotorDirection::Clockwise, &mut state)
        .unwrap();
    assert!(driver.is_moving());

    let setting = driver.set_frequency(Hertz(0), &mut state).unwrap();
    assert_eq!(setting, FrequencySetting::Stopped);
    assert!(!driver.is_moving());
    assert_eq!(driver.output().active(), None);
}

proptest! {
    #[test]
    fn prop_period_is_rounded_reciprocal(freq in 1u16..=1000) {
        let (mut driver, mut state) = driver();
        let expected = (1_000_000f64 / f64::from(freq)).round() as u32 - 1;

        driver.set_frequency(Hertz(freq), &mut state).unwrap();
        prop_assert_eq!(driver.period(), Ticks(expected));
        prop_assert_eq!(driver.output().period, Some(Ticks(expected)));
        prop_assert_eq!(driver.output().duty, Some(Ticks(expected / 2)));
    }
}

// =============================================================================
// Bounded moves
// =============================================================================

#[test]
fn test_move_2000_fires_callback_once() {
    let calls = Cell::new(0u32);
    let last = Cell::new(None::<MoveReport>);
    let mut state = MotionState::default();
    let mut driver = StepperDriver::new(FakeTimer::default(), FakeTicks::default(), Hertz(1000))
        .with_callback(|report: &MoveReport| {
            calls.set(calls.get() + 1);
            last.set(Some(*report));
        });
    driver.init(&mut state).unwrap();

    driver
        .move_steps(MotorDirection::Clockwise, 2000, &mut state)
        .unwrap();
    assert_eq!(driver.output().active(), Some(Channel::Clockwise));
    assert!(driver.ticks().enabled);

    for n in 1..2000u16 {
        assert_eq!(driver.on_tick(&mut state).unwrap(), TickOutcome::Counted(n));
        assert!(driver.is_moving(), "stopped early at tick {}", n);
    }
    assert_eq!(
        driver.on_tick(&mut state).unwrap(),
        TickOutcome::TargetReached(2000)
    );
    assert!(!driver.is_moving());
    assert_eq!(calls.get(), 1);
    assert_eq!(
        last.get(),
        Some(MoveReport {
            direction: MotorDirection::Clockwise,
            delivered: 2000,
            target: TargetPulses::Bounded(2000),
            reason: StopReason::TargetReached,
        })
    );

    // Late ticks and further stops do not re-fire the callback
    driver.on_tick(&mut state).unwrap();
    driver.stop(&mut state).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(driver.current_pulses(), 2000);
}

proptest! {
    #[test]
    fn prop_pulses_saturate_at_target(target in 1u16..300, ticks in 0u16..600) {
        let (mut driver, mut state) = driver();
        driver.move_steps(MotorDirection::CounterClockwise, target, &mut state).unwrap();

        for _ in 0..ticks {
            driver.on_tick(&mut state).unwrap();
        }

        prop_assert_eq!(driver.current_pulses(), ticks.min(target));
        prop_assert_eq!(driver.is_moving(), ticks < target);
        prop_assert_eq!(state.motion().moving, ticks < target);
    }
}

#[test]
fn test_move_resets_counter_and_timer() {
    let (mut driver, mut state) = driver();
    driver
        .set_frequency(Hertz(200), &mut state)
        .unwrap();
    driver
        .move_steps(MotorDirection::Clockwise, 10, &mut state)
        .unwrap();

    // Bounded moves always run at the origin frequency
    assert_eq!(driver.period(), Ticks(999));
    assert_eq!(driver.ticks().counter_resets, 1);
    assert_eq!(driver.current_pulses(), 0);
    assert_eq!(state.motion().target, TargetPulses::Bounded(10));
    assert_eq!(state.motion().direction, MotorDirection::Clockwise);
}

#[test]
fn test_invalid_moves_stop() {
    let (mut driver, mut state) = driver();
    driver
        .move_steps(MotorDirection::Clockwise, 50, &mut state)
        .unwrap();

    assert_eq!(
        driver.move_steps(MotorDirection::Clockwise, 0, &mut state),
        Err(MotorError::InvalidMove {
            direction: MotorDirection::Clockwise,
            steps: 0
        })
    );
    assert!(!driver.is_moving());
    assert_eq!(driver.output().active(), None);

    assert_eq!(
        driver.continue_move(MotorDirection::Stopped, &mut state),
        Err(MotorError::InvalidDirection)
    );
    assert_eq!(driver.direction(), MotorDirection::Stopped);
}

#[test]
fn test_direction_switch_idles_other_output() {
    let (mut driver, mut state) = driver();
    driver
        .continue_move(MotorDirection::Clockwise, &mut state)
        .unwrap();
    driver
        .move_steps(MotorDirection::CounterClockwise, 5, &mut state)
        .unwrap();
    assert_eq!(driver.output().active(), Some(Channel::CounterClockwise));
}

#[test]
fn test_replaced_move_is_reported_once() {
    let calls = Cell::new(0u32);
    let mut state = MotionState::default();
    let mut driver = StepperDriver::new(FakeTimer::default(), FakeTicks::default(), Hertz(1000))
        .with_callback(|_: &MoveReport| calls.set(calls.get() + 1));
    driver.init(&mut state).unwrap();

    driver
        .move_steps(MotorDirection::Clockwise, 100, &mut state)
        .unwrap();
    for _ in 0..40 {
        driver.on_tick(&mut state).unwrap();
    }
    driver
        .move_steps(MotorDirection::CounterClockwise, 100, &mut state)
        .unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(
        state.last_move().copied(),
        Some(MoveReport {
            direction: MotorDirection::Clockwise,
            delivered: 40,
            target: TargetPulses::Bounded(100),
            reason: StopReason::Requested,
        })
    );

    // The new move starts from zero in the new direction
    assert!(driver.is_moving());
    assert_eq!(driver.current_pulses(), 0);
    assert_eq!(state.motion().direction, MotorDirection::CounterClockwise);
}

#[test]
fn test_process_mirrors_progress() {
    let (mut driver, mut state) = driver();
    driver
        .move_steps(MotorDirection::Clockwise, 10, &mut state)
        .unwrap();
    for _ in 0..4 {
        driver.on_tick(&mut state).unwrap();
    }
    driver.process(&mut state).unwrap();
    assert_eq!(state.motion().current_steps, 4);
    assert!(driver.is_moving());
}

// =============================================================================
// Continuous moves and stop
// =============================================================================

#[test]
fn test_continuous_move_does_not_count() {
    let (mut driver, mut state) = driver();
    driver
        .continue_move(MotorDirection::Clockwise, &mut state)
        .unwrap();
    assert!(!driver.ticks().enabled);
    assert_eq!(driver.target(), TargetPulses::Continuous);

    assert_eq!(driver.on_tick(&mut state).unwrap(), TickOutcome::Ignored);
    driver.process(&mut state).unwrap();
    assert!(driver.is_moving());

    driver.stop(&mut state).unwrap();
    let report = state.last_move().copied().expect("stop should report");
    assert_eq!(report.delivered, 0);
    assert_eq!(report.target, TargetPulses::Continuous);
    assert_eq!(report.reason, StopReason::Requested);
}

#[test]
fn test_stop_is_idempotent() {
    let calls = Cell::new(0u32);
    let mut state = MotionState::default();
    let mut driver = StepperDriver::new(FakeTimer::default(), FakeTicks::default(), Hertz(1000))
        .with_callback(|_: &MoveReport| calls.set(calls.get() + 1));
    driver.init(&mut state).unwrap();

    driver
        .continue_move(MotorDirection::CounterClockwise, &mut state)
        .unwrap();
    driver.stop(&mut state).unwrap();
    driver.stop(&mut state).unwrap();

    assert!(!driver.is_moving());
    assert_eq!(driver.direction(), MotorDirection::Stopped);
    assert_eq!(state.motion().direction, MotorDirection::Stopped);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_enable_failure_is_reported_and_stopped() {
    let mut state = MotionState::default();
    let timer = FakeTimer {
        fail_enable: true,
        ..FakeTimer::default()
    };
    let mut driver = StepperDriver::new(timer, FakeTicks::default(), Hertz(1000));
    driver.init(&mut state).unwrap();

    assert_eq!(
        driver.move_steps(MotorDirection::Clockwise, 10, &mut state),
        Err(MotorError::PeripheralFault(Peripheral::PulseOutput))
    );
    assert!(!driver.is_moving());
    assert!(!driver.ticks().enabled);
    assert!(!state.motion().moving);
}
