use glam::Vec2;
use shelf_core::DeviceProfile;
use std::time::Duration;

use crate::constants::{
    CANVAS_ID, MAX_FRAME_DT_MS, MOBILE_OVERLAY_ID, WHEEL_LINE_PX, WHEEL_PAGE_PX,
};

/// Pointer position relative to the canvas' top-left corner, in CSS pixels.
#[inline]
pub fn canvas_local(client_x: f32, client_y: f32, rect_left: f32, rect_top: f32) -> Vec2 {
    Vec2::new(client_x - rect_left, client_y - rect_top)
}

/// Wheel delta in pixels, whatever unit the browser reported.
///
/// `delta_mode` follows `WheelEvent.deltaMode`: 0 pixels, 1 lines, 2 pages.
#[inline]
pub fn wheel_delta_px(delta_y: f32, delta_mode: u32) -> f32 {
    match delta_mode {
        1 => delta_y * WHEEL_LINE_PX,
        2 => delta_y * WHEEL_PAGE_PX,
        _ => delta_y,
    }
}

/// Frame delta handed to the viewer, capped at `MAX_FRAME_DT_MS`.
#[inline]
pub fn clamp_frame_dt(dt: Duration) -> Duration {
    dt.min(Duration::from_millis(MAX_FRAME_DT_MS))
}

/// Keys the viewer reacts to; everything else is left to the page.
#[inline]
pub fn is_viewer_key(key: &str) -> bool {
    matches!(key, "Escape" | "ArrowLeft" | "ArrowRight")
}

/// Elements whose pointer events feed the gesture classifier. The mobile
/// reader sits above the canvas while a book is open and takes the taps.
pub fn pointer_target_ids(profile: DeviceProfile) -> &'static [&'static str] {
    match profile {
        DeviceProfile::Desktop => &[CANVAS_ID],
        DeviceProfile::Mobile => &[CANVAS_ID, MOBILE_OVERLAY_ID],
    }
}
