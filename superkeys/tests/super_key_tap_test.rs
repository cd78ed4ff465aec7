pub mod common;

use superkeys::EventResult;
use superkeys::state::KeyPhase;
use superkeys::types::key::Key;
use superkeys::types::keyswitch::{KeyAddr, KeySwitchState};

use crate::common::*;

const SK0: Key = Key::super_key(0);
const SK1: Key = Key::super_key(1);

#[test]
fn test_single_tap_fires_after_timeout() {
    let keyboard = super_key_test! {
        map: [A, B, X, X],
        layout: [SK0],
        sequence: [
            [0, true, 0],
            [0, false, 30],
        ],
        expected: [pressed(A), RuntimeEvent::SendReport, released(A)],
    };
    // Fired once the 200 ms window after the tap passed
    assert_eq!(keyboard.times_of(pressed(A)), vec![201]);
    assert_eq!(keyboard.times_of(released(A)), vec![202]);
    assert!(keyboard.forwarded.is_empty());
}

#[test]
fn test_double_tap() {
    let keyboard = super_key_test! {
        map: [A, B, X, X],
        layout: [SK0],
        sequence: [
            [0, true, 0],
            [0, false, 30],
            [0, true, 30],
            [0, false, 30],
        ],
        expected: [pressed(B), RuntimeEvent::SendReport, released(B)],
    };
    // The window restarts with the second tap
    assert_eq!(keyboard.times_of(pressed(B)), vec![261]);
}

#[test]
fn test_triple_tap_falls_back_to_double() {
    super_key_test! {
        map: [A, B, X, X],
        layout: [SK0],
        sequence: [
            [0, true, 0],
            [0, false, 20],
            [0, true, 20],
            [0, false, 20],
            [0, true, 20],
            [0, false, 20],
        ],
        expected: [pressed(B), RuntimeEvent::SendReport, released(B)],
    };
}

#[test]
fn test_taps_beyond_max_saturate() {
    super_key_test! {
        map: [A, B, C, X, X],
        layout: [SK0],
        sequence: [
            [0, true, 0],
            [0, false, 20],
            [0, true, 20],
            [0, false, 20],
            [0, true, 20],
            [0, false, 20],
            [0, true, 20],
            [0, false, 20],
            [0, true, 20],
            [0, false, 20],
        ],
        expected: [pressed(C), RuntimeEvent::SendReport, released(C)],
    };
}

#[test]
fn test_tap_moves_layer() {
    // Layer move 2
    super_key_test! {
        map: [Key(17494), X, X],
        layout: [SK0],
        sequence: [
            [0, true, 0],
            [0, false, 30],
        ],
        expected: [RuntimeEvent::LayerMove(2), RuntimeEvent::SendReport],
    };
}

#[test]
fn test_double_tap_plays_macro() {
    // Macro 3
    super_key_test! {
        map: [A, Key(53855), X, X],
        layout: [SK0],
        sequence: [
            [0, true, 0],
            [0, false, 30],
            [0, true, 30],
            [0, false, 30],
        ],
        expected: [RuntimeEvent::Macro(3), RuntimeEvent::SendReport],
    };
}

#[test]
fn test_empty_list_never_fires() {
    let mut keyboard = super_key_test! {
        map: [X, A, X, X],
        layout: [SK0, C, SK1],
        sequence: [
            // Tap
            [0, true, 0],
            [0, false, 30],
            // Hold
            [0, true, 300],
            [0, false, 600],
        ],
        expected: [],
    };
    assert!(keyboard.times_of(held(A)).is_empty());

    // The list after the empty one still works
    keyboard.run_sequence(&key_sequence![[2, true, 0], [2, false, 30]]);
    keyboard.wait(300);
    assert_eq!(
        keyboard.actions_without_held(),
        vec![pressed(A), RuntimeEvent::SendReport, released(A)]
    );
}

#[test]
fn test_sequence_resets_after_release() {
    let keyboard = super_key_test! {
        map: [A, B, X, X],
        layout: [SK0],
        sequence: [
            [0, true, 0],
            [0, false, 30],
        ],
        expected: [pressed(A), RuntimeEvent::SendReport, released(A)],
    };
    assert_eq!(keyboard.engine.active(), None);
    let state = keyboard.engine.state(0).unwrap();
    assert_eq!(state.phase, KeyPhase::Idle);
    assert_eq!(state.addr, KeyAddr::new(0, 0));
}

#[test]
fn test_unknown_super_key_is_consumed() {
    let keyboard = super_key_test! {
        map: [A, X, X],
        layout: [Key::super_key(10)],
        sequence: [
            [0, true, 0],
            [0, false, 30],
        ],
        expected: [],
    };
    assert!(keyboard.forwarded.is_empty());
}

#[test]
fn test_injected_events_pass_through() {
    let mut keyboard = TestKeyboard::new(&[A, X, X], &[SK0]);
    let result = keyboard.engine.on_keyswitch_event(
        SK0,
        KeyAddr::new(0, 0),
        KeySwitchState::PRESSED.as_injected(),
        &mut keyboard.runtime,
    );
    assert_eq!(result, EventResult::Ok);
    assert_eq!(keyboard.engine.active(), None);
}

#[test]
fn test_plain_keys_pass_without_active_super_key() {
    let keyboard = super_key_test! {
        map: [A, X, X],
        layout: [SK0, C],
        sequence: [
            [1, true, 0],
            [1, false, 30],
        ],
        expected: [],
    };
    assert_eq!(keyboard.forwarded_presses(), vec![(0, C)]);
}
