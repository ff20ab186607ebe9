use crate::constants::MOBILE_CLOSE_ID;
use crate::input;
use glam::Vec2;
use shelf_core::Viewer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub viewer: Rc<RefCell<Viewer>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    let profile = w.viewer.borrow().profile();
    let document = w.canvas.owner_document();
    for id in input::pointer_target_ids(profile) {
        let target = document
            .as_ref()
            .and_then(|d| d.get_element_by_id(id));
        let Some(target) = target else {
            log::warn!("[pointer] #{id} missing, no pointer input there");
            continue;
        };
        wire_pointerdown(&w, &target);
        wire_pointermove(&w, &target);
        wire_pointerup(&w, &target);
        wire_pointercancel(&w, &target);
    }
    wire_wheel(&w);
}

fn pointer_pos(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    input::canvas_local(
        ev.client_x() as f32,
        ev.client_y() as f32,
        rect.left() as f32,
        rect.top() as f32,
    )
}

/// The reader's close button handles its own clicks.
fn on_close_control(ev: &web::Event) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .is_some_and(|el| el.closest(&format!("#{MOBILE_CLOSE_ID}")).ok().flatten().is_some())
}

fn listen<E>(target: &web::Element, event: &str, handler: impl FnMut(E) + 'static)
where
    E: wasm_bindgen::convert::FromWasmAbi + 'static,
    dyn FnMut(E): wasm_bindgen::closure::WasmClosure,
{
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerdown(w: &InputWiring, target: &web::Element) {
    let w = w.clone();
    let el = target.clone();
    listen(target, "pointerdown", move |ev: web::PointerEvent| {
        if on_close_control(&ev) {
            return;
        }
        let pos = pointer_pos(&ev, &w.canvas);
        w.viewer
            .borrow_mut()
            .pointer_down(ev.pointer_id(), pos, ev.time_stamp());
        _ = el.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    });
}

fn wire_pointermove(w: &InputWiring, target: &web::Element) {
    let w = w.clone();
    listen(target, "pointermove", move |ev: web::PointerEvent| {
        let pos = pointer_pos(&ev, &w.canvas);
        w.viewer.borrow_mut().pointer_move(ev.pointer_id(), pos);
    });
}

fn wire_pointerup(w: &InputWiring, target: &web::Element) {
    let w = w.clone();
    let el = target.clone();
    listen(target, "pointerup", move |ev: web::PointerEvent| {
        let pos = pointer_pos(&ev, &w.canvas);
        let gesture = w
            .viewer
            .borrow_mut()
            .pointer_up(ev.pointer_id(), pos, ev.time_stamp());
        if let Some(g) = gesture {
            log::debug!("[pointer] #{} {:?}", el.id(), g);
        }
        _ = el.release_pointer_capture(ev.pointer_id());
    });
}

fn wire_pointercancel(w: &InputWiring, target: &web::Element) {
    let w = w.clone();
    let el = target.clone();
    listen(target, "pointercancel", move |ev: web::PointerEvent| {
        w.viewer.borrow_mut().pointer_cancel(ev.pointer_id());
        _ = el.release_pointer_capture(ev.pointer_id());
    });
}

fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let canvas = w.canvas.clone();
    listen(&canvas, "wheel", move |ev: web::WheelEvent| {
        let dy = input::wheel_delta_px(ev.delta_y() as f32, ev.delta_mode());
        w.viewer.borrow_mut().wheel(dy);
        ev.prevent_default();
    });
}
