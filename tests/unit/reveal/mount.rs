use super::*;
use crate::animation::driver::TimelineDriver;
use crate::animation::ease::Ease;
use crate::animation::spec::{Property, VisualState};
use crate::foundation::core::TimeMs;

fn fade_in() -> RevealSpec {
    RevealSpec::new()
        .to(Property::Opacity, 1.0)
        .duration(100.0)
        .easing(Ease::Linear)
}

fn hero_page() -> (ElementTree, NodeId, NodeId) {
    let mut tree = ElementTree::new("root");
    let container = tree.append_child(tree.root(), "main");
    let hero = tree.append_child(container, "h1");
    tree.add_class(hero, "hero");
    // Start faded out so the play has something visible to do.
    tree.apply_style(
        hero,
        &VisualState::default().with(Property::Opacity, 0.0),
    );
    (tree, container, hero)
}

#[test]
fn plays_once_after_the_configured_delay() {
    let (mut tree, container, hero) = hero_page();
    let mut driver = TimelineDriver::new();

    let mut mount = MountReveal::register(
        &tree,
        Some(container),
        ".hero",
        fade_in(),
        200.0,
        true,
        &mut driver,
    )
    .unwrap();
    assert!(!mount.is_inert());
    assert!(!mount.is_finished());

    // Nothing moves inside the delay window.
    let updates = driver.advance(TimeMs(150.0));
    assert!(updates.is_empty());
    mount.absorb(&updates, &mut tree);
    assert_eq!(tree.style(hero).get(Property::Opacity), Some(0.0));

    // Halfway through the 100ms play.
    let updates = driver.advance(TimeMs(250.0));
    mount.absorb(&updates, &mut tree);
    assert!((tree.style(hero).get(Property::Opacity).unwrap() - 0.5).abs() < 1e-9);

    let updates = driver.advance(TimeMs(300.0));
    mount.absorb(&updates, &mut tree);
    assert_eq!(tree.style(hero).get(Property::Opacity), Some(1.0));
    assert!(mount.is_finished());
}

#[test]
fn disabled_player_registers_nothing() {
    let (tree, container, _) = hero_page();
    let mut driver = TimelineDriver::new();

    let mount = MountReveal::register(
        &tree,
        Some(container),
        ".hero",
        fade_in(),
        0.0,
        false,
        &mut driver,
    )
    .unwrap();
    assert!(mount.is_inert());
    assert!(driver.is_idle());
}

#[test]
fn zero_matches_and_missing_container_are_inert() {
    let (tree, container, _) = hero_page();
    let mut driver = TimelineDriver::new();

    let mount =
        MountReveal::register(&tree, Some(container), ".missing", fade_in(), 0.0, true, &mut driver)
            .unwrap();
    assert!(mount.is_inert());

    let mount =
        MountReveal::register(&tree, None, ".hero", fade_in(), 0.0, true, &mut driver).unwrap();
    assert!(mount.is_inert());
    assert!(driver.is_idle());
}

#[test]
fn negative_or_non_finite_delay_is_rejected() {
    let (tree, container, _) = hero_page();
    let mut driver = TimelineDriver::new();

    assert!(
        MountReveal::register(&tree, Some(container), ".hero", fade_in(), -1.0, true, &mut driver)
            .is_err()
    );
    assert!(
        MountReveal::register(
            &tree,
            Some(container),
            ".hero",
            fade_in(),
            f64::NAN,
            true,
            &mut driver,
        )
        .is_err()
    );
}

#[test]
fn teardown_before_the_delay_cancels_the_play() {
    let (mut tree, container, hero) = hero_page();
    let mut driver = TimelineDriver::new();

    let mut mount = MountReveal::register(
        &tree,
        Some(container),
        ".hero",
        fade_in(),
        200.0,
        true,
        &mut driver,
    )
    .unwrap();

    mount.teardown(&mut driver);
    assert!(driver.is_idle());
    assert!(mount.is_finished());

    let updates = driver.advance(TimeMs(500.0));
    assert!(updates.is_empty());
    mount.absorb(&updates, &mut tree);
    assert_eq!(tree.style(hero).get(Property::Opacity), Some(0.0));
}
