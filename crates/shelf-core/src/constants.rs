use glam::Vec3;

// Shared geometry, layout and timing constants for the book viewer.

// Book geometry (local units)
pub const PAGE_WIDTH: f32 = 1.9;
pub const PAGE_HEIGHT: f32 = 2.7;
pub const COVER_WIDTH: f32 = 2.0;
pub const COVER_HEIGHT: f32 = 2.8;
pub const BOOK_THICKNESS: f32 = 0.18;
pub const COVER_GAP: f32 = 0.01; // covers sit just outside the block
pub const PAGE_BASE_Z: f32 = 0.02;
pub const PAGE_STEP_Z: f32 = 0.001; // tiny step between stacked pages

// Page poses inside a spread
pub const SPREAD_CLOSED_Z: f32 = 0.06;
pub const SPREAD_OPEN_Z: f32 = 0.4;
pub const SPREAD_OPEN_Y: f32 = 0.1;
pub const SPREAD_CLOSED_TILT: f32 = 0.002; // radians, near-flat when not reading
pub const DESKTOP_OPEN_PAGE_SCALE: f32 = 1.2;
pub const MOBILE_OPEN_PAGE_SCALE: f32 = 1.8;

// Desktop shelf layout
pub const SHELF_RADIUS: f32 = 4.0;
pub const SHELF_HEIGHT: f32 = 1.0;
pub const DESKTOP_CAMERA_EYE: Vec3 = Vec3::new(0.0, 3.2, 6.0);
pub const DESKTOP_CAMERA_TARGET: Vec3 = Vec3::ZERO;
pub const DESKTOP_FOV_DEG: f32 = 60.0;

// Mobile stack layout
pub const STACK_SPACING: f32 = 3.4; // vertical distance between stacked books
pub const STACK_CENTER_Y: f32 = 1.0;
pub const MOBILE_CAMERA_Z: f32 = 12.0; // far enough back that the whole stack fits
pub const MOBILE_BOOK_SCALE: f32 = 1.12; // slightly larger books make better tap targets
pub const MOBILE_BOOK_TILT: f32 = 0.02;
pub const MOBILE_SPIN_RATE: f32 = 0.6; // radians per second
pub const MOBILE_SPIN_PHASE: f32 = 0.15; // per-book phase offset

// Mobile hit-proxies
pub const HIT_PROXY_WIDTH: f32 = PAGE_WIDTH * 2.6;
pub const HIT_PROXY_HEIGHT: f32 = PAGE_WIDTH * 1.9;
pub const HIT_PROXY_FRONT_OFFSET: f32 = 0.02;
pub const HIT_PROXY_NUDGE: f32 = 0.22; // toward the camera
pub const HIT_PROXY_Y_STEP: f32 = 0.02; // per-book y offset so stacked proxies never coincide
pub const HIT_PROXY_SCALE: Vec3 = Vec3::new(1.25, 1.15, 1.15);

// Reading pose (desktop)
pub const READING_BOOK_POS: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const READING_CAMERA_POS: Vec3 = Vec3::new(0.0, 2.2, 3.6);
pub const READING_CAMERA_TARGET: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const COVER_OPEN_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;

// Default durations (milliseconds)
pub const OPEN_DURATION_MS: u64 = 600;
pub const CLOSE_DURATION_MS: u64 = 600;
pub const COVER_CLOSE_DURATION_MS: u64 = 400;
pub const FLIP_DURATION_MS: u64 = 600;
pub const SPREAD_REVEAL_MS: u64 = 400;
pub const MOBILE_REVEAL_MS: u64 = 300;
pub const STACK_SCROLL_MS: u64 = 400;

// Gesture thresholds
pub const TAP_PX: f32 = 8.0;
pub const TAP_MS: f64 = 400.0;
pub const SWIPE_PX: f32 = 30.0;
pub const DESKTOP_CLICK_SLOP_PX: f32 = 5.0; // movement beyond this turns a click into an orbit drag

// Orbit camera (desktop)
pub const ORBIT_RADIANS_PER_PX: f32 = 0.005;
pub const ORBIT_MIN_DISTANCE: f32 = 2.0;
pub const ORBIT_MAX_DISTANCE: f32 = 12.0;
pub const ZOOM_PER_WHEEL_UNIT: f32 = 0.002;

// Device profile heuristic
pub const MOBILE_MIN_DIMENSION_PX: f32 = 600.0;

// Placeholder colors (linear RGBA)
pub const PLACEHOLDER_PAGE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const BLOCK_COLOR: [f32; 4] = [0.95, 0.95, 0.93, 1.0];
pub const SPINE_EDGE_COLOR: [f32; 4] = [0.17, 0.17, 0.17, 1.0];
