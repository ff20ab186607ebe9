use crate::dom;
use crate::input;
use crate::overlay;
use crate::render;
use instant::Instant;
use shelf_core::{SessionSnapshot, Viewer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub viewer: Rc<RefCell<Viewer>>,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub gpu: Option<render::GpuState<'a>>,
    pub last_instant: Instant,
    pub last_snapshot: Option<SessionSnapshot>,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = input::clamp_frame_dt(now - self.last_instant);
        self.last_instant = now;

        let mut viewer = self.viewer.borrow_mut();

        let css = dom::css_size(&self.canvas);
        if css.x > 0.0 && css.y > 0.0 && css != viewer.viewport() {
            viewer.resize(css);
        }

        viewer.tick(dt);

        let snap = viewer.snapshot();
        if self.last_snapshot.as_ref() != Some(&snap) {
            if log::log_enabled!(log::Level::Debug) {
                log::debug!(
                    "[session] {}",
                    serde_json::to_string(&snap).unwrap_or_default()
                );
            }
            overlay::apply(&self.document, &snap);
            self.last_snapshot = Some(snap);
        }

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = g.render(viewer.scene(), viewer.camera()) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
