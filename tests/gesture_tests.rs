// Host-side tests for pointer gesture classification.

use glam::Vec2;
use shelf_core::constants::{SWIPE_PX, TAP_MS, TAP_PX};
use shelf_core::gesture::{classify, HorizontalDir, VerticalDir};
use shelf_core::{DeviceProfile, Gesture, GestureClassifier, GestureThresholds};

fn mobile() -> GestureThresholds {
    GestureThresholds::for_profile(DeviceProfile::Mobile)
}

fn desktop() -> GestureThresholds {
    GestureThresholds::for_profile(DeviceProfile::Desktop)
}

#[test]
fn just_inside_tap_limits_is_a_tap() {
    let d = TAP_PX - 1.0;
    let at = Vec2::new(100.0, 200.0);
    assert_eq!(
        classify(&mobile(), at, Vec2::new(d, d), TAP_MS - 1.0),
        Some(Gesture::Tap { at })
    );
    assert_eq!(
        classify(&mobile(), at, Vec2::new(-d, d), TAP_MS - 1.0),
        Some(Gesture::Tap { at })
    );
}

#[test]
fn long_press_is_not_a_tap() {
    let g = classify(&mobile(), Vec2::ZERO, Vec2::ZERO, TAP_MS);
    assert_eq!(g, None);
}

#[test]
fn horizontal_swipe_ignores_duration() {
    let dx = SWIPE_PX + 1.0;
    for dt in [10.0, TAP_MS - 1.0, 5_000.0] {
        assert_eq!(
            classify(&mobile(), Vec2::ZERO, Vec2::new(dx, 0.0), dt),
            Some(Gesture::SwipeHorizontal(HorizontalDir::Right))
        );
        assert_eq!(
            classify(&mobile(), Vec2::ZERO, Vec2::new(-dx, 0.0), dt),
            Some(Gesture::SwipeHorizontal(HorizontalDir::Left))
        );
    }
}

#[test]
fn vertical_swipe_direction_follows_screen_y() {
    assert_eq!(
        classify(&mobile(), Vec2::ZERO, Vec2::new(4.0, -60.0), 120.0),
        Some(Gesture::SwipeVertical(VerticalDir::Up))
    );
    assert_eq!(
        classify(&mobile(), Vec2::ZERO, Vec2::new(-4.0, 60.0), 120.0),
        Some(Gesture::SwipeVertical(VerticalDir::Down))
    );
}

#[test]
fn ambiguous_motion_fires_nothing() {
    // past the tap slop but short of a swipe, or perfectly diagonal
    assert_eq!(classify(&mobile(), Vec2::ZERO, Vec2::new(12.0, 3.0), 100.0), None);
    assert_eq!(classify(&mobile(), Vec2::ZERO, Vec2::new(50.0, 50.0), 100.0), None);
}

#[test]
fn desktop_click_has_no_time_limit_and_drags_past_slop() {
    let at = Vec2::new(10.0, 10.0);
    assert_eq!(
        classify(&desktop(), at, Vec2::new(2.0, -3.0), 2_500.0),
        Some(Gesture::Tap { at })
    );
    assert_eq!(
        classify(&desktop(), at, Vec2::new(80.0, 0.0), 50.0),
        Some(Gesture::Drag {
            delta: Vec2::new(80.0, 0.0)
        })
    );
}

#[test]
fn classifier_fires_once_per_interaction() {
    let mut c = GestureClassifier::new(mobile());
    c.pointer_down(1, Vec2::new(50.0, 50.0), 0.0);
    assert_eq!(c.pointer_move(1, Vec2::new(52.0, 51.0)), Some(Vec2::new(2.0, 1.0)));
    let g = c.pointer_up(1, Vec2::new(53.0, 52.0), 120.0);
    assert_eq!(
        g,
        Some(Gesture::Tap {
            at: Vec2::new(53.0, 52.0)
        })
    );
    assert_eq!(c.pointer_up(1, Vec2::new(53.0, 52.0), 130.0), None);
    assert!(c.active().is_none());
}

#[test]
fn foreign_pointer_and_cancel_are_ignored() {
    let mut c = GestureClassifier::new(mobile());
    c.pointer_down(7, Vec2::ZERO, 0.0);
    assert_eq!(c.pointer_move(8, Vec2::new(100.0, 0.0)), None);
    assert_eq!(c.pointer_up(8, Vec2::ZERO, 10.0), None);
    c.cancel(7);
    assert_eq!(c.pointer_up(7, Vec2::ZERO, 20.0), None);
}
