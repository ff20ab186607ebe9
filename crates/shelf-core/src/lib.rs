//! Book viewer interaction engine.
//!
//! Platform-free core of the 3D book shelf: device profile selection, the
//! per-book scene model, hit testing, gesture classification, the viewer state
//! machine, tweening and page spreads. The web front-end feeds it pointer
//! events and frame times and draws whatever [`scene::SceneGraph`] holds.

pub mod animator;
pub mod assets;
pub mod book;
pub mod camera;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod easing;
pub mod error;
pub mod gesture;
pub mod hit_test;
pub mod inquiry;
pub mod profile;
pub mod scene;
pub mod spread;
pub mod viewer;

pub use assets::{AssetResolver, NullResolver, TextureHandle};
pub use book::{BookInstance, BookSlot, Page, PageSide};
pub use camera::{Camera, CameraPose, Ray};
pub use catalog::{Catalog, CatalogEntry};
pub use config::ViewerConfig;
pub use error::{CatalogError, ConfigError, SceneError};
pub use gesture::{Gesture, GestureClassifier, GestureThresholds};
pub use profile::{select_profile, DeviceProfile, ProfileSignals};
pub use viewer::{NavDirection, SessionSnapshot, Viewer, ViewerSession, ViewerState};
