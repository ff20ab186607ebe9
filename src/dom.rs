use crate::constants::*;
use glam::Vec2;
use shelf_core::profile::{parse_persisted_override, parse_query_override};
use shelf_core::{Catalog, ProfileSignals, ViewerConfig};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    let Some(el) = document.get_element_by_id(element_id) else {
        log::warn!("[dom] #{element_id} missing, control disabled");
        return;
    };
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Canvas size in CSS pixels (the space pointer positions are reported in).
pub fn css_size(canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(rect.width() as f32, rect.height() as f32)
}

/// Gather everything the profile selector looks at.
pub fn profile_signals(window: &web::Window) -> ProfileSignals {
    let viewport = Vec2::new(
        window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32,
        window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as f32,
    );
    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let query_override = window
        .location()
        .search()
        .ok()
        .and_then(|q| parse_query_override(&q));
    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|s| s.get_item(STORAGE_FORCE_MOBILE_KEY).ok().flatten());
    ProfileSignals {
        viewport,
        user_agent,
        query_override,
        persisted_override: parse_persisted_override(stored.as_deref()),
    }
}

/// Viewer options from the canvas' config attribute; defaults on absence or error.
pub fn read_config(canvas: &web::HtmlCanvasElement) -> ViewerConfig {
    match canvas.get_attribute(CONFIG_ATTR) {
        Some(json) => ViewerConfig::from_json(&json).unwrap_or_else(|e| {
            log::warn!("[config] {e}; using defaults");
            ViewerConfig::default()
        }),
        None => ViewerConfig::default(),
    }
}

/// Catalog from the canvas' catalog attribute, or the built-in books.
pub fn read_catalog(canvas: &web::HtmlCanvasElement) -> Catalog {
    match canvas.get_attribute(CATALOG_ATTR) {
        Some(json) => Catalog::from_json(&json).unwrap_or_else(|e| {
            log::warn!("[catalog] {e}; using built-in catalog");
            Catalog::builtin()
        }),
        None => Catalog::builtin(),
    }
}

/// Show/hide an element by id; missing elements are ignored.
pub fn set_shown(document: &web::Document, id: &str, shown: bool) -> bool {
    let Some(el) = document.get_element_by_id(id) else {
        return false;
    };
    let cl = el.class_list();
    if shown {
        _ = cl.remove_1("hidden");
        _ = el.set_attribute("style", "");
    } else {
        _ = cl.add_1("hidden");
        _ = el.set_attribute("style", "display:none");
    }
    true
}

pub fn set_text(document: &web::Document, id: &str, text: &str) -> bool {
    match document.get_element_by_id(id) {
        Some(el) => {
            el.set_text_content(Some(text));
            true
        }
        None => false,
    }
}
