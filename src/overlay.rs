use crate::constants::*;
use crate::dom;
use shelf_core::{SessionSnapshot, Viewer, ViewerState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Push a session snapshot into the overlay panels.
///
/// Every panel is optional; a page without it simply shows less.
pub fn apply(document: &web::Document, snap: &SessionSnapshot) {
    let open = snap.state == Some(ViewerState::Open);
    let mobile = snap.profile.is_some_and(|p| p.is_mobile());

    if mobile {
        if !dom::set_shown(document, MOBILE_OVERLAY_ID, open) {
            log::warn!("[overlay] #{MOBILE_OVERLAY_ID} missing");
        }
        if open {
            dom::set_text(document, MOBILE_TITLE_ID, snap.title.as_deref().unwrap_or(""));
            dom::set_text(document, MOBILE_COUNTER_ID, snap.counter.as_deref().unwrap_or(""));
            if let (Some(img), Some(src)) = (
                document.get_element_by_id(MOBILE_IMAGE_ID),
                snap.page_image.as_deref(),
            ) {
                _ = img.set_attribute("src", src);
            }
        }
        return;
    }

    if !dom::set_shown(document, INFO_OVERLAY_ID, open) {
        log::warn!("[overlay] #{INFO_OVERLAY_ID} missing");
        return;
    }
    if open {
        dom::set_text(document, INFO_CONTENT_ID, &info_text(snap));
    }
}

fn info_text(snap: &SessionSnapshot) -> String {
    format!(
        "{}\n{}\nPages: {} · Price: {} · {}",
        snap.title.as_deref().unwrap_or(""),
        snap.description.as_deref().unwrap_or(""),
        snap.printed_pages.map(|p| p.to_string()).unwrap_or_default(),
        snap.price.as_deref().unwrap_or(""),
        snap.binding.as_deref().unwrap_or(""),
    )
}

/// Close button on the mobile reader, inquiry checkboxes and button.
pub fn wire_controls(document: &web::Document, viewer: Rc<RefCell<Viewer>>) {
    if viewer.borrow().profile().is_mobile() {
        let v = viewer.clone();
        dom::add_click_listener(document, MOBILE_CLOSE_ID, move || v.borrow_mut().close());
    }
    wire_inquiry_checkboxes(document, viewer.clone());
    dom::add_click_listener(document, INQUIRE_BUTTON_ID, move || {
        let v = viewer.borrow();
        let titles = v.inquiry().titles(v.catalog());
        log::info!("[inquiry] selected: {}", titles.join(", "));
    });
}

fn wire_inquiry_checkboxes(document: &web::Document, viewer: Rc<RefCell<Viewer>>) {
    let selector = format!("#{SELECT_FORM_ID} input[type=checkbox]");
    let Ok(list) = document.query_selector_all(&selector) else {
        return;
    };
    for i in 0..list.length() {
        let Some(input) = list
            .item(i)
            .and_then(|n| n.dyn_into::<web::HtmlInputElement>().ok())
        else {
            continue;
        };
        let Ok(id) = input.value().parse::<u32>() else {
            continue;
        };
        let v = viewer.clone();
        let target = input.clone();
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
            v.borrow_mut().set_inquiry(id, target.checked());
        }) as Box<dyn FnMut()>);
        _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
