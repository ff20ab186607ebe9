// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;
use shelf_core::DeviceProfile;
use std::time::Duration;

#[test]
fn canvas_local_subtracts_rect_origin() {
    assert_eq!(canvas_local(120.0, 80.0, 20.0, 30.0), Vec2::new(100.0, 50.0));
}

#[test]
fn wheel_delta_normalizes_lines_and_pages() {
    assert_eq!(wheel_delta_px(3.0, 0), 3.0);
    assert_eq!(wheel_delta_px(3.0, 1), 3.0 * constants::WHEEL_LINE_PX);
    assert_eq!(wheel_delta_px(-1.0, 2), -constants::WHEEL_PAGE_PX);
}

#[test]
fn frame_dt_is_capped() {
    let cap = Duration::from_millis(constants::MAX_FRAME_DT_MS);
    assert_eq!(clamp_frame_dt(Duration::from_millis(16)), Duration::from_millis(16));
    assert_eq!(clamp_frame_dt(Duration::from_secs(30)), cap);
}

#[test]
fn only_navigation_keys_are_claimed() {
    for key in ["Escape", "ArrowLeft", "ArrowRight"] {
        assert!(is_viewer_key(key));
    }
    for key in ["ArrowUp", "Tab", " ", "h"] {
        assert!(!is_viewer_key(key));
    }
}

#[test]
fn mobile_reader_overlay_receives_pointer_input() {
    let mobile = pointer_target_ids(DeviceProfile::Mobile);
    assert!(mobile.contains(&constants::CANVAS_ID));
    assert!(mobile.contains(&constants::MOBILE_OVERLAY_ID));

    let desktop = pointer_target_ids(DeviceProfile::Desktop);
    assert_eq!(desktop, &[constants::CANVAS_ID]);
}
