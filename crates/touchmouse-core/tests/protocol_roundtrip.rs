//! Integration tests for the touchmouse-core codec and classifier.
//!
//! These tests go through the public API only: samples are classified, the
//! resulting actions are encoded, and a small parser (which only exists here;
//! the relay itself never decodes) checks the bytes a listener would see.

use std::time::{Duration, Instant};

use touchmouse_core::{encode_action, Action, GestureClassifier, TouchSample};

/// Parses a datagram payload back into an [`Action`].
fn parse(bytes: &[u8]) -> Option<Action> {
    let text = std::str::from_utf8(bytes).ok()?;
    if text == "click" {
        return Some(Action::Click);
    }
    let (dx, dy) = text.strip_prefix("mouse: ")?.split_once(',')?;
    Some(Action::Move {
        dx: dx.parse().ok()?,
        dy: dy.parse().ok()?,
    })
}

#[test]
fn test_roundtrip_click() {
    let msg = encode_action(&Action::Click);
    assert_eq!(parse(msg.as_bytes()), Some(Action::Click));
}

#[test]
fn test_roundtrip_moves_over_representative_range() {
    let values = [
        i32::MIN,
        -1_000_000,
        -4096,
        -17,
        -4,
        -1,
        0,
        1,
        4,
        17,
        4096,
        1_000_000,
        i32::MAX,
    ];

    for &dx in &values {
        for &dy in &values {
            let original = Action::Move { dx, dy };
            let msg = encode_action(&original);
            assert_eq!(
                parse(msg.as_bytes()),
                Some(original),
                "round-trip failed for {msg}"
            );
        }
    }
}

#[test]
fn test_parser_rejects_padding_and_trailing_bytes() {
    // Sanity check on the test parser itself so the round-trip proves something.
    assert_eq!(parse(b"mouse: 1,2\n"), None);
    assert_eq!(parse(b"mouse:1,2"), None);
    assert_eq!(parse(b"click "), None);
}

#[test]
fn test_tap_gesture_produces_click_datagram() {
    // Arrange
    let t0 = Instant::now();
    let mut classifier = GestureClassifier::default();

    // Act
    let mut wire = Vec::new();
    for (sample, at) in [
        (TouchSample::begin(30, 30), Duration::ZERO),
        (TouchSample::end(30, 30), Duration::from_millis(200)),
    ] {
        if let Some(action) = classifier.classify(sample, t0 + at) {
            wire.push(encode_action(&action));
        }
    }

    // Assert
    assert_eq!(wire.len(), 1);
    assert_eq!(wire[0].as_bytes(), b"click");
}

#[test]
fn test_long_press_release_produces_single_move_datagram() {
    // Arrange
    let t0 = Instant::now();
    let mut classifier = GestureClassifier::default();

    // Act
    classifier.classify(TouchSample::begin(10, 10), t0);
    let action = classifier
        .classify(TouchSample::end(50, 30), t0 + Duration::from_millis(1500))
        .expect("release after threshold must emit a move");

    // Assert
    assert_eq!(encode_action(&action).as_bytes(), b"mouse: 160,80");
}

#[test]
fn test_drag_stream_decodes_to_per_sample_deltas() {
    // Arrange
    let t0 = Instant::now();
    let mut classifier = GestureClassifier::default();
    let path = [(0, 0), (2, 1), (5, 1), (5, -2)];
    classifier.classify(TouchSample::begin(path[0].0, path[0].1), t0);

    // Act
    let decoded: Vec<Action> = path[1..]
        .iter()
        .enumerate()
        .filter_map(|(i, &(x, y))| {
            classifier.classify(
                TouchSample::moved(x, y),
                t0 + Duration::from_millis(16 * (i as u64 + 1)),
            )
        })
        .map(|a| parse(encode_action(&a).as_bytes()).expect("decodable"))
        .collect();

    // Assert
    assert_eq!(
        decoded,
        vec![
            Action::Move { dx: 8, dy: 4 },
            Action::Move { dx: 12, dy: 0 },
            Action::Move { dx: 0, dy: -12 },
        ]
    );
}
