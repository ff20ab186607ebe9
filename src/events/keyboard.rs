use crate::input;
use shelf_core::Viewer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Typing into a form field never drives the viewer.
fn from_text_field(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        .is_some_and(|input| input.type_() != "checkbox")
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, viewer: &Rc<RefCell<Viewer>>) {
    let key = ev.key();
    if !input::is_viewer_key(&key) || from_text_field(ev) {
        return;
    }
    if viewer.borrow_mut().handle_key(&key) {
        log::debug!("[keys] {key}");
        ev.prevent_default();
    }
}

pub fn wire_global_keydown(viewer: Rc<RefCell<Viewer>>) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &viewer);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
