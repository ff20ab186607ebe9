//! Runtime options for the viewer.
//!
//! Everything has a default taken from `constants.rs`; a host can override
//! any subset through a JSON object, e.g. `{"animate_flips": true}`.

use crate::constants::*;
use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Turn desktop spreads through a pivoting page instead of swapping instantly.
    pub animate_flips: bool,
    pub open_ms: u64,
    pub close_ms: u64,
    pub cover_close_ms: u64,
    pub flip_ms: u64,
    pub spread_reveal_ms: u64,
    pub mobile_reveal_ms: u64,
    pub stack_scroll_ms: u64,
    pub orbit_radians_per_px: f32,
    pub orbit_min_distance: f32,
    pub orbit_max_distance: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            animate_flips: false,
            open_ms: OPEN_DURATION_MS,
            close_ms: CLOSE_DURATION_MS,
            cover_close_ms: COVER_CLOSE_DURATION_MS,
            flip_ms: FLIP_DURATION_MS,
            spread_reveal_ms: SPREAD_REVEAL_MS,
            mobile_reveal_ms: MOBILE_REVEAL_MS,
            stack_scroll_ms: STACK_SCROLL_MS,
            orbit_radians_per_px: ORBIT_RADIANS_PER_PX,
            orbit_min_distance: ORBIT_MIN_DISTANCE,
            orbit_max_distance: ORBIT_MAX_DISTANCE,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn open_duration(&self) -> Duration {
        Duration::from_millis(self.open_ms)
    }

    pub fn close_duration(&self) -> Duration {
        Duration::from_millis(self.close_ms)
    }

    pub fn cover_close_duration(&self) -> Duration {
        Duration::from_millis(self.cover_close_ms)
    }

    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_ms)
    }

    pub fn spread_reveal_duration(&self) -> Duration {
        Duration::from_millis(self.spread_reveal_ms)
    }

    pub fn mobile_reveal_duration(&self) -> Duration {
        Duration::from_millis(self.mobile_reveal_ms)
    }

    pub fn stack_scroll_duration(&self) -> Duration {
        Duration::from_millis(self.stack_scroll_ms)
    }
}
