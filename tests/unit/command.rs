//! Unit tests for the command protocol.

use stepper_sequencer::store::{KEY_DEBUG_LEVEL, KEY_FREQ, KEY_THRESHOLD};
use stepper_sequencer::{Hertz, MemoryStore, MotorDirection, ParameterStore, SequenceState};

use crate::support::{positioner, FakeClock, TestPositioner};

fn send(p: &mut TestPositioner<'_>, store: &mut MemoryStore, line: &str) -> String {
    p.handle_line(line, store)
        .map(|response| response.as_str().to_owned())
        .expect("line should produce a response")
}

// =============================================================================
// SET / GET
// =============================================================================

#[test]
fn test_set_freq() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();

    assert_eq!(
        send(&mut p, &mut store, "SET FREQ 750"),
        "{\"Cmd\": \"SET\", \"Status\": \"Success\", \"Parameter\": \"FREQ\", \"Value\": 750}\r\n"
    );
    assert_eq!(p.state().freq(), Hertz(750));

    let response = send(&mut p, &mut store, "SET FREQ 1001");
    assert!(response.starts_with("{\"Cmd\": \"SET\", \"Status\": \"Error\", \"Parameter\": \"FREQ\""));
    assert_eq!(p.state().freq(), Hertz(750));
}

#[test]
fn test_set_switch_drives_output() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();

    assert_eq!(
        send(&mut p, &mut store, "SET HOLDOFF ON"),
        "{\"Cmd\": \"SET\", \"Status\": \"Success\", \"Parameter\": \"HOLDOFF\", \"Value\": true}\r\n"
    );
    assert!(p.state().switches().holdoff);
    assert!(p.switches().levels.holdoff);

    send(&mut p, &mut store, "SET HOLDOFF OFF");
    assert!(!p.switches().levels.holdoff);
}

#[test]
fn test_get_values() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();

    send(&mut p, &mut store, "SET THRES -25");
    assert_eq!(
        send(&mut p, &mut store, "GET THRES"),
        "{\"Cmd\": \"GET\", \"Status\": \"Success\", \"Parameter\": \"THRES\", \"Value\": -25}\r\n"
    );
    assert!(send(&mut p, &mut store, "GET ZEROPOINT").contains("\"Value\": false"));
    assert!(send(&mut p, &mut store, "GET INA236INIT").contains("\"Value\": false"));
}

#[test]
fn test_get_data_in_storage_order() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();
    for sample in [1, 2, 3, 4, 5, 6, 7, 8, 9] {
        p.state_mut().push_sample(sample);
    }

    assert!(send(&mut p, &mut store, "GET DATA").ends_with("\"Value\": [9, 2, 3, 4, 5, 6, 7, 8]}\r\n"));
}

#[test]
fn test_roundcount_reset() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();

    p.move_steps(MotorDirection::Clockwise, 100).unwrap();
    p.on_rotation_edge();
    p.on_rotation_edge();
    assert!(send(&mut p, &mut store, "GET ROUNDCOUNT").contains("\"Value\": 2"));

    assert!(send(&mut p, &mut store, "SET ROUNDCOUNT 0").contains("\"Value\": 0"));
    assert_eq!(p.state().round_count().get(), 0);
}

// =============================================================================
// MOVE / START
// =============================================================================

#[test]
fn test_move_command() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();

    assert_eq!(
        send(&mut p, &mut store, "MOVE CCW 300"),
        "{\"Cmd\": \"MOVE\", \"Status\": \"Success\", \"Direction\": \"CCW\", \"Step\": 300}\r\n"
    );
    assert!(p.driver().is_moving());
    assert_eq!(p.state().motion().direction, MotorDirection::CounterClockwise);

    let response = send(&mut p, &mut store, "MOVE CW 0");
    assert!(response.starts_with("{\"Cmd\": \"MOVE\", \"Status\": \"Error\""));
    assert!(!p.driver().is_moving());

    assert!(send(&mut p, &mut store, "MOVE CW 70000").contains("\"Status\": \"Error\""));
}

#[test]
fn test_start_command() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();

    assert_eq!(
        send(&mut p, &mut store, "START"),
        "{\"Cmd\": \"START\", \"Status\": \"Success\"}\r\n"
    );
    assert_eq!(p.sequencer().state(), SequenceState::SetupSwitches);
}

#[test]
fn test_unknown_command() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();

    assert_eq!(
        send(&mut p, &mut store, "HOME"),
        "{\"Cmd\": \"UNKNOWN\", \"Status\": \"Error\", \"Message\": \"Unknown command\"}\r\n"
    );
    assert!(p.handle_line("   ", &mut store).is_none());
}

// =============================================================================
// STATUS
// =============================================================================

#[test]
fn test_status_levels() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();

    assert_eq!(
        send(&mut p, &mut store, "STATUS"),
        "{\"Cmd\": \"STATUS\", \"Status\": \"Success\", \"Level\": 0}\r\n"
    );

    send(&mut p, &mut store, "SET DEBUGLEVEL 1");
    assert_eq!(
        send(&mut p, &mut store, "STATUS"),
        "{\"Cmd\": \"STATUS\", \"Status\": \"Success\", \"Level\": 1, \"FREQ\": 500, \"THRES\": 50, \
         \"CURRENT\": false, \"HOLDOFF\": false, \"DIVISION\": false}\r\n"
    );

    p.state_mut().push_sample(-7);
    send(&mut p, &mut store, "SET DEBUGLEVEL 2");
    assert!(send(&mut p, &mut store, "STATUS").ends_with(", \"LastCurrent\": -7}\r\n"));

    p.move_steps(MotorDirection::Clockwise, 40).unwrap();
    p.on_tick().unwrap();
    p.poll().unwrap();
    send(&mut p, &mut store, "SET DEBUGLEVEL 3");
    assert!(send(&mut p, &mut store, "STATUS").ends_with(
        ", \"Motor\": \"+\", \"TargetStep\": 40, \"CurrentStep\": 1, \"RoundCount\": 0, \"ZeroPoint\": false}\r\n"
    ));
}

// =============================================================================
// SAVE and notices
// =============================================================================

#[test]
fn test_save_persists_parameters() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();

    send(&mut p, &mut store, "SET FREQ 320");
    send(&mut p, &mut store, "SET THRES -1");
    send(&mut p, &mut store, "SET DEBUGLEVEL 2");
    assert_eq!(
        send(&mut p, &mut store, "SAVE"),
        "{\"Cmd\": \"SAVE\", \"Status\": \"Success\"}\r\n"
    );

    assert_eq!(store.read(KEY_FREQ), Ok(Some(320)));
    assert_eq!(store.read(KEY_THRESHOLD), Ok(Some(0xFFFF)));
    assert_eq!(store.read(KEY_DEBUG_LEVEL), Ok(Some(2)));

    let mut restored = positioner(&clock);
    restored.load_parameters(&mut store).unwrap();
    assert_eq!(restored.state().freq(), Hertz(320));
    assert_eq!(restored.state().threshold(), -1);
}

#[test]
fn test_completion_notice_when_debug_enabled() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();

    p.move_steps(MotorDirection::Clockwise, 3).unwrap();
    for _ in 0..3 {
        p.on_tick().unwrap();
    }
    assert_eq!(p.take_notice(), None);

    send(&mut p, &mut store, "SET DEBUG ON");
    p.move_steps(MotorDirection::Clockwise, 3).unwrap();
    for _ in 0..3 {
        p.on_tick().unwrap();
    }
    assert_eq!(
        p.take_notice().as_deref(),
        Some("Motor move completed: 3 steps\r\n")
    );
    assert_eq!(p.take_notice(), None);
}

#[test]
fn test_receive_frames_lines() {
    let clock = FakeClock::default();
    let mut p = positioner(&clock);
    let mut store: MemoryStore = MemoryStore::new();
    let mut responses = Vec::new();

    p.receive(b"SET FREQ 100\r\nGET FR", &mut store, |r| responses.push(r.as_str().to_owned()));
    assert_eq!(responses.len(), 1);
    p.receive(b"EQ\n", &mut store, |r| responses.push(r.as_str().to_owned()));
    assert_eq!(responses.len(), 2);
    assert!(responses[1].contains("\"Value\": 100"));
}
