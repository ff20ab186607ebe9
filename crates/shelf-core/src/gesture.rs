//! Pointer gesture classification.
//!
//! A pointer interaction is recorded on down, accumulated on move and
//! classified exactly once on up, so a single gesture never triggers two
//! actions.

use crate::constants::*;
use crate::profile::DeviceProfile;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureThresholds {
    /// Max displacement on each axis for a tap (exclusive).
    pub tap_px: f32,
    /// Max press duration for a tap in milliseconds (exclusive).
    pub tap_ms: f64,
    /// Min displacement along the dominant axis for a swipe. `None` turns
    /// every non-tap into a drag.
    pub swipe_px: Option<f32>,
}

impl GestureThresholds {
    pub fn for_profile(profile: DeviceProfile) -> Self {
        match profile {
            // mouse clicks: no time limit, motion past the slop is an orbit drag
            DeviceProfile::Desktop => Self {
                tap_px: DESKTOP_CLICK_SLOP_PX,
                tap_ms: f64::INFINITY,
                swipe_px: None,
            },
            DeviceProfile::Mobile => Self {
                tap_px: TAP_PX,
                tap_ms: TAP_MS,
                swipe_px: Some(SWIPE_PX),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalDir {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalDir {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Tap { at: Vec2 },
    SwipeHorizontal(HorizontalDir),
    SwipeVertical(VerticalDir),
    Drag { delta: Vec2 },
}

/// Decide what a finished interaction was. `delta` is up minus down in
/// pixels (y grows downward), `dt_ms` the press duration.
pub fn classify(th: &GestureThresholds, at: Vec2, delta: Vec2, dt_ms: f64) -> Option<Gesture> {
    let (ax, ay) = (delta.x.abs(), delta.y.abs());
    if ax < th.tap_px && ay < th.tap_px && dt_ms < th.tap_ms {
        return Some(Gesture::Tap { at });
    }
    let Some(swipe) = th.swipe_px else {
        return Some(Gesture::Drag { delta });
    };
    if ax > ay && ax > swipe {
        let dir = if delta.x < 0.0 {
            HorizontalDir::Left
        } else {
            HorizontalDir::Right
        };
        return Some(Gesture::SwipeHorizontal(dir));
    }
    if ay > ax && ay > swipe {
        let dir = if delta.y < 0.0 {
            VerticalDir::Up
        } else {
            VerticalDir::Down
        };
        return Some(Gesture::SwipeVertical(dir));
    }
    None
}

/// One pointer interaction in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub pointer_id: i32,
    pub start: Vec2,
    pub start_ms: f64,
    pub last: Vec2,
    pub delta: Vec2,
}

#[derive(Debug)]
pub struct GestureClassifier {
    thresholds: GestureThresholds,
    active: Option<GestureSample>,
}

impl GestureClassifier {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            active: None,
        }
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    pub fn active(&self) -> Option<&GestureSample> {
        self.active.as_ref()
    }

    pub fn pointer_down(&mut self, pointer_id: i32, pos: Vec2, t_ms: f64) {
        self.active = Some(GestureSample {
            pointer_id,
            start: pos,
            start_ms: t_ms,
            last: pos,
            delta: Vec2::ZERO,
        });
    }

    /// Track motion; returns the movement since the previous event.
    pub fn pointer_move(&mut self, pointer_id: i32, pos: Vec2) -> Option<Vec2> {
        let s = self.active.as_mut().filter(|s| s.pointer_id == pointer_id)?;
        let step = pos - s.last;
        s.last = pos;
        s.delta = pos - s.start;
        Some(step)
    }

    pub fn pointer_up(&mut self, pointer_id: i32, pos: Vec2, t_ms: f64) -> Option<Gesture> {
        if self.active.as_ref()?.pointer_id != pointer_id {
            return None;
        }
        let s = self.active.take()?;
        let gesture = classify(&self.thresholds, pos, pos - s.start, t_ms - s.start_ms);
        log::debug!("[gesture] {:?} after {:.0}ms -> {gesture:?}", pos - s.start, t_ms - s.start_ms);
        gesture
    }

    /// Drop the interaction without firing anything.
    pub fn cancel(&mut self, pointer_id: i32) {
        if self.active.as_ref().is_some_and(|s| s.pointer_id == pointer_id) {
            self.active = None;
        }
    }
}
