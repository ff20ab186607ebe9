//! Device profile selection.
//!
//! The profile is resolved once at startup and handed to every component that
//! behaves differently on phones: camera control, page layout, gesture
//! thresholds and the open-state navigation mapping.

use crate::constants::MOBILE_MIN_DIMENSION_PX;
use glam::Vec2;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Compile-time override (`--features force-mobile`).
pub const FORCE_MOBILE: bool = cfg!(feature = "force-mobile");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceProfile {
    /// Orbit camera around a ring of books, two-page spreads.
    Desktop,
    /// Vertical stack of books, single-page overlay reader.
    Mobile,
}

impl DeviceProfile {
    #[inline]
    pub fn is_mobile(self) -> bool {
        matches!(self, DeviceProfile::Mobile)
    }
}

/// Raw inputs gathered by the host before the profile is resolved.
#[derive(Clone, Debug, Default)]
pub struct ProfileSignals {
    /// Viewport size in logical (CSS) pixels.
    pub viewport: Vec2,
    pub user_agent: String,
    /// `?mobile=...` query flag, if present and recognized.
    pub query_override: Option<bool>,
    /// Persisted `forceMobile` flag, if present and recognized.
    pub persisted_override: Option<bool>,
}

/// Where the final decision came from; logged once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileSource {
    Query,
    Persisted,
    CompileTime,
    UserAgent,
    Viewport,
    Default,
}

const MOBILE_UA_PATTERN: &str = r"(?i)Mobi|Android|iPhone|iPad|Phone";

fn mobile_user_agent() -> Option<&'static Regex> {
    static UA: OnceLock<Option<Regex>> = OnceLock::new();
    UA.get_or_init(|| Regex::new(MOBILE_UA_PATTERN).ok()).as_ref()
}

/// Resolve the profile, first match wins:
/// query flag, persisted flag, compile-time flag, user agent, viewport size.
pub fn select_profile(signals: &ProfileSignals) -> (DeviceProfile, ProfileSource) {
    let pick = |mobile: bool| {
        if mobile {
            DeviceProfile::Mobile
        } else {
            DeviceProfile::Desktop
        }
    };
    if let Some(mobile) = signals.query_override {
        return (pick(mobile), ProfileSource::Query);
    }
    if let Some(mobile) = signals.persisted_override {
        return (pick(mobile), ProfileSource::Persisted);
    }
    if FORCE_MOBILE {
        return (DeviceProfile::Mobile, ProfileSource::CompileTime);
    }
    if mobile_user_agent().is_some_and(|re| re.is_match(&signals.user_agent)) {
        return (DeviceProfile::Mobile, ProfileSource::UserAgent);
    }
    let min_dim = signals.viewport.x.min(signals.viewport.y);
    if min_dim > 0.0 && min_dim < MOBILE_MIN_DIMENSION_PX {
        return (DeviceProfile::Mobile, ProfileSource::Viewport);
    }
    (DeviceProfile::Desktop, ProfileSource::Default)
}

/// Parse the `mobile` key out of a URL query string (`?a=b&mobile=1`).
///
/// `1`/`true` force mobile, `0`/`false` force desktop, anything else is ignored.
pub fn parse_query_override(query: &str) -> Option<bool> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == "mobile")
        .and_then(|(_, v)| parse_flag(v))
}

/// Parse a persisted `forceMobile` value.
pub fn parse_persisted_override(value: Option<&str>) -> Option<bool> {
    value.and_then(parse_flag)
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
