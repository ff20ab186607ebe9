// Browser-side constants. Engine tuning lives in `shelf_core::constants`.

// Canvas and its configuration attributes
pub const CANVAS_ID: &str = "app-canvas";
pub const CONFIG_ATTR: &str = "data-viewer-config"; // JSON, see ViewerConfig
pub const CATALOG_ATTR: &str = "data-catalog"; // JSON array of catalog entries

// Persisted device profile override
pub const STORAGE_FORCE_MOBILE_KEY: &str = "forceMobile";

// Desktop info strip
pub const INFO_OVERLAY_ID: &str = "book-info-overlay";
pub const INFO_CONTENT_ID: &str = "book-info-content";

// Mobile single-page reader
pub const MOBILE_OVERLAY_ID: &str = "mobile-overlay";
pub const MOBILE_TITLE_ID: &str = "mobile-overlay-title";
pub const MOBILE_COUNTER_ID: &str = "mobile-overlay-counter";
pub const MOBILE_IMAGE_ID: &str = "mobile-overlay-img";
pub const MOBILE_CLOSE_ID: &str = "mobile-overlay-close";

// Purchase inquiry form
pub const SELECT_FORM_ID: &str = "select-form";
pub const INQUIRE_BUTTON_ID: &str = "inquire-button";

// Frame pacing
pub const MAX_FRAME_DT_MS: u64 = 250;

// Wheel normalization for WheelEvent.deltaMode
pub const WHEEL_LINE_PX: f32 = 16.0;
pub const WHEEL_PAGE_PX: f32 = 800.0;

// Renderer
pub const CLEAR_COLOR: [f64; 4] = [0.93, 0.93, 0.92, 1.0];
pub const LIGHT_DIR: [f32; 3] = [0.4, 0.8, 0.6];
pub const AMBIENT: f32 = 0.45;
