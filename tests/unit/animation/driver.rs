use smallvec::smallvec;

use super::*;
use crate::animation::spec::Property;

fn single_target(from: VisualState, to: VisualState, duration_ms: f64, delay: Delay) -> PlayRequest {
    PlayRequest {
        targets: smallvec![PlayTarget {
            node: NodeId(1),
            from,
            index: 0,
        }],
        to,
        duration_ms,
        ease: Ease::Linear,
        delay,
    }
}

fn opacity(v: f64) -> VisualState {
    VisualState::default().with(Property::Opacity, v)
}

#[test]
fn linear_track_interpolates_halfway() {
    let mut driver = TimelineDriver::new();
    driver.play(single_target(opacity(0.0), opacity(1.0), 100.0, Delay::None));

    let updates = driver.advance(TimeMs(50.0));
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].node, NodeId(1));
    assert!(!updates[0].done);
    assert!((updates[0].state.get(Property::Opacity).unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn completion_emits_final_state_and_retires_the_track() {
    let mut driver = TimelineDriver::new();
    driver.play(single_target(opacity(0.0), opacity(1.0), 100.0, Delay::None));

    let updates = driver.advance(TimeMs(150.0));
    assert_eq!(updates.len(), 1);
    assert!(updates[0].done);
    assert_eq!(updates[0].state.get(Property::Opacity), Some(1.0));
    assert!(driver.is_idle());
    assert!(driver.advance(TimeMs(200.0)).is_empty());
}

#[test]
fn delayed_track_is_silent_until_its_start() {
    let mut driver = TimelineDriver::new();
    driver.play(single_target(
        opacity(0.0),
        opacity(1.0),
        100.0,
        Delay::Fixed(200.0),
    ));

    assert!(driver.advance(TimeMs(100.0)).is_empty());
    let updates = driver.advance(TimeMs(250.0));
    assert_eq!(updates.len(), 1);
    assert!((updates[0].state.get(Property::Opacity).unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn stagger_schedules_targets_by_index() {
    let mut driver = TimelineDriver::new();
    driver.play(PlayRequest {
        targets: smallvec![
            PlayTarget {
                node: NodeId(1),
                from: opacity(0.0),
                index: 0,
            },
            PlayTarget {
                node: NodeId(2),
                from: opacity(0.0),
                index: 1,
            },
            PlayTarget {
                node: NodeId(3),
                from: opacity(0.0),
                index: 2,
            },
        ],
        to: opacity(1.0),
        duration_ms: 1000.0,
        ease: Ease::Linear,
        delay: Delay::Stagger {
            start_ms: 0.0,
            step_ms: 50.0,
        },
    });

    let moving: Vec<NodeId> = driver.advance(TimeMs(25.0)).iter().map(|u| u.node).collect();
    assert_eq!(moving, vec![NodeId(1)]);

    let moving: Vec<NodeId> = driver.advance(TimeMs(75.0)).iter().map(|u| u.node).collect();
    assert_eq!(moving, vec![NodeId(1), NodeId(2)]);

    let moving: Vec<NodeId> = driver
        .advance(TimeMs(125.0))
        .iter()
        .map(|u| u.node)
        .collect();
    assert_eq!(moving, vec![NodeId(1), NodeId(2), NodeId(3)]);
}

#[test]
fn cancel_drops_every_track_of_the_handle() {
    let mut driver = TimelineDriver::new();
    let handle = driver.play(single_target(opacity(0.0), opacity(1.0), 100.0, Delay::None));
    assert_eq!(driver.active_tracks(), 1);

    driver.cancel(handle);
    assert!(driver.is_idle());
    assert!(driver.advance(TimeMs(50.0)).is_empty());
}

#[test]
fn missing_from_property_starts_at_its_resting_value() {
    let mut driver = TimelineDriver::new();
    driver.play(single_target(
        VisualState::default(),
        VisualState::default().with(Property::Scale, 0.5),
        100.0,
        Delay::None,
    ));

    // Scale rests at 1.0, so halfway toward 0.5 is 0.75.
    let updates = driver.advance(TimeMs(50.0));
    assert!((updates[0].state.get(Property::Scale).unwrap() - 0.75).abs() < 1e-9);
}

#[test]
fn time_never_moves_backwards() {
    let mut driver = TimelineDriver::new();
    driver.play(single_target(opacity(0.0), opacity(1.0), 100.0, Delay::None));

    driver.advance(TimeMs(60.0));
    let updates = driver.advance(TimeMs(10.0));
    assert_eq!(driver.now(), TimeMs(60.0));
    assert!((updates[0].state.get(Property::Opacity).unwrap() - 0.6).abs() < 1e-9);
}

#[test]
fn handles_are_unique_per_request() {
    let mut driver = TimelineDriver::new();
    let a = driver.play(single_target(opacity(0.0), opacity(1.0), 100.0, Delay::None));
    let b = driver.play(single_target(opacity(0.0), opacity(1.0), 100.0, Delay::None));
    assert_ne!(a, b);
}
