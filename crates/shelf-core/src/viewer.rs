//! The viewer state machine.
//!
//! [`Viewer`] owns the scene, camera, books and the single [`ViewerSession`].
//! Input arrives as pointer/wheel/key calls, time as [`Viewer::tick`]. Every
//! session change happens in here; other modules only read the session.
//!
//! ```text
//! Closed --select--> Opening --complete--> Open --close--> Closing --complete--> Closed
//! ```
//!
//! Completion of Opening/Closing may be reported twice (tween callback and a
//! fallback timer). Each transition stamps a fresh [`Ticket`]; a completion is
//! applied only if the state, the selected book and the ticket all still match.

use crate::animator::{AnimationEvent, Animator, Channel, Ticket};
use crate::assets::AssetResolver;
use crate::book::{self, BookInstance, BookSlot};
use crate::camera::{face_towards, Camera, CameraPose};
use crate::catalog::Catalog;
use crate::config::ViewerConfig;
use crate::constants::*;
use crate::error::SceneError;
use crate::gesture::{Gesture, GestureClassifier, GestureThresholds, HorizontalDir, VerticalDir};
use crate::hit_test::{self, Hit};
use crate::inquiry::InquirySelection;
use crate::profile::DeviceProfile;
use crate::scene::SceneGraph;
use crate::spread::{self, FlipDirection};
use glam::{Quat, Vec2, Vec3};
use serde::Serialize;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerState {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavDirection {
    Next,
    Prev,
}

/// Process-wide viewing state. Read-only outside this module.
#[derive(Clone, Debug)]
pub struct ViewerSession {
    selected: Option<BookSlot>,
    state: ViewerState,
    spread: usize,
    saved_camera: Option<CameraPose>,
    profile: DeviceProfile,
    focused: usize,
    ticket: Ticket,
}

impl ViewerSession {
    fn new(profile: DeviceProfile) -> Self {
        Self {
            selected: None,
            state: ViewerState::Closed,
            spread: 0,
            saved_camera: None,
            profile,
            focused: 0,
            ticket: Ticket::default(),
        }
    }

    pub fn selected(&self) -> Option<BookSlot> {
        self.selected
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    /// Pages are interactive.
    pub fn open_mode(&self) -> bool {
        self.state == ViewerState::Open
    }

    /// Left page (desktop) or page (mobile) of the selected book.
    pub fn spread(&self) -> usize {
        self.spread
    }

    pub fn saved_camera(&self) -> Option<CameraPose> {
        self.saved_camera
    }

    pub fn profile(&self) -> DeviceProfile {
        self.profile
    }

    /// Book centered in the mobile stack.
    pub fn focused(&self) -> usize {
        self.focused
    }
}

/// What the overlay panels need to render.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: Option<ViewerState>,
    pub profile: Option<DeviceProfile>,
    pub selected_id: Option<u32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub binding: Option<String>,
    pub price: Option<String>,
    pub printed_pages: Option<u32>,
    pub page: Option<usize>,
    pub page_count: Option<usize>,
    pub page_image: Option<String>,
    /// `"k/N"`, 1-based.
    pub counter: Option<String>,
    pub focused: usize,
}

pub struct Viewer {
    catalog: Catalog,
    scene: SceneGraph,
    camera: Camera,
    books: Vec<BookInstance>,
    session: ViewerSession,
    gestures: GestureClassifier,
    animator: Animator,
    config: ViewerConfig,
    viewport: Vec2,
    clock: Duration,
    next_ticket: u64,
    inquiry: InquirySelection,
}

impl Viewer {
    pub fn new(
        catalog: Catalog,
        profile: DeviceProfile,
        config: ViewerConfig,
        viewport: Vec2,
        resolver: &mut dyn AssetResolver,
    ) -> Result<Self, SceneError> {
        let mut scene = SceneGraph::new();
        let books = book::build_books(&mut scene, &catalog, profile, resolver)?;
        let camera = Camera::for_profile(profile, viewport.x / viewport.y.max(1.0));
        log::info!(
            "[viewer] {} books, profile {:?}, flips {}",
            books.len(),
            profile,
            if config.animate_flips { "animated" } else { "instant" }
        );
        let mut viewer = Self {
            catalog,
            scene,
            camera,
            books,
            session: ViewerSession::new(profile),
            gestures: GestureClassifier::new(GestureThresholds::for_profile(profile)),
            animator: Animator::new(),
            config,
            viewport,
            clock: Duration::ZERO,
            next_ticket: 0,
            inquiry: InquirySelection::new(),
        };
        if profile.is_mobile() {
            book::update_hit_proxies(&mut viewer.scene, &viewer.books, &viewer.camera);
        }
        Ok(viewer)
    }

    // ---------------- accessors ----------------

    pub fn session(&self) -> &ViewerSession {
        &self.session
    }

    pub fn state(&self) -> ViewerState {
        self.session.state
    }

    pub fn profile(&self) -> DeviceProfile {
        self.session.profile
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn books(&self) -> &[BookInstance] {
        &self.books
    }

    pub fn book(&self, slot: BookSlot) -> Option<&BookInstance> {
        self.books.get(slot.0)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn inquiry(&self) -> &InquirySelection {
        &self.inquiry
    }

    pub fn toggle_inquiry(&mut self, id: u32) -> bool {
        self.inquiry.toggle(&self.catalog, id)
    }

    pub fn set_inquiry(&mut self, id: u32, selected: bool) {
        self.inquiry.set(&self.catalog, id, selected);
    }

    pub fn clear_inquiry(&mut self) {
        self.inquiry.clear();
    }

    pub fn is_animating(&self) -> bool {
        self.animator.active_tweens() > 0 || self.animator.pending_timers() > 0
    }

    // ---------------- input ----------------

    pub fn pointer_down(&mut self, pointer_id: i32, pos: Vec2, t_ms: f64) {
        self.gestures.pointer_down(pointer_id, pos, t_ms);
    }

    pub fn pointer_move(&mut self, pointer_id: i32, pos: Vec2) {
        let Some(step) = self.gestures.pointer_move(pointer_id, pos) else {
            return;
        };
        if self.orbit_enabled() {
            self.camera.orbit_yaw(-step.x * self.config.orbit_radians_per_px);
        }
    }

    pub fn pointer_up(&mut self, pointer_id: i32, pos: Vec2, t_ms: f64) -> Option<Gesture> {
        let gesture = self.gestures.pointer_up(pointer_id, pos, t_ms)?;
        self.handle_gesture(gesture);
        Some(gesture)
    }

    pub fn pointer_cancel(&mut self, pointer_id: i32) {
        self.gestures.cancel(pointer_id);
    }

    /// Mouse wheel zoom, `delta_y` in pixels as reported by the browser.
    pub fn wheel(&mut self, delta_y: f32) {
        if !self.orbit_enabled() {
            return;
        }
        let d = self.camera.distance() * (1.0 + delta_y * ZOOM_PER_WHEEL_UNIT);
        self.camera
            .zoom_to(d, self.config.orbit_min_distance, self.config.orbit_max_distance);
    }

    /// Keyboard shortcuts; returns whether the key was used.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match key {
            "Escape" if self.session.selected.is_some() => {
                self.close();
                true
            }
            "ArrowRight" if self.session.open_mode() => {
                self.navigate(NavDirection::Next);
                true
            }
            "ArrowLeft" if self.session.open_mode() => {
                self.navigate(NavDirection::Prev);
                true
            }
            _ => false,
        }
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.camera.aspect = (viewport.x / viewport.y.max(1.0)).max(1e-3);
    }

    fn orbit_enabled(&self) -> bool {
        self.session.profile == DeviceProfile::Desktop && self.session.state == ViewerState::Closed
    }

    pub fn hit_test(&self, pos: Vec2) -> Option<Hit> {
        let ray = self.camera.ray_from_screen(pos, self.viewport);
        hit_test::pick(&self.scene, &ray)
    }

    pub fn handle_gesture(&mut self, gesture: Gesture) {
        let mobile = self.session.profile.is_mobile();
        match gesture {
            Gesture::Tap { at } => self.tap(at),
            Gesture::SwipeHorizontal(dir) if mobile && self.session.open_mode() => {
                self.navigate(match dir {
                    HorizontalDir::Left => NavDirection::Next,
                    HorizontalDir::Right => NavDirection::Prev,
                });
            }
            Gesture::SwipeVertical(dir) if mobile => match self.session.state {
                ViewerState::Opening | ViewerState::Open => self.close(),
                ViewerState::Closed => self.scroll_stack(dir),
                ViewerState::Closing => {}
            },
            _ => {}
        }
    }

    fn tap(&mut self, at: Vec2) {
        let state = self.session.state;
        let selected = self.session.selected;
        if self.session.profile.is_mobile() && state == ViewerState::Open {
            self.navigate(NavDirection::Next);
            return;
        }
        let hit = self.hit_test(at);
        match (state, hit) {
            (ViewerState::Closed, Some(h)) => self.select(h.book),
            (ViewerState::Open, Some(h)) if Some(h.book) == selected => {
                // screen halves, not page bounds
                if at.x < self.viewport.x / 2.0 {
                    self.navigate(NavDirection::Prev);
                } else {
                    self.navigate(NavDirection::Next);
                }
            }
            (ViewerState::Open, None) => self.close(),
            (_, Some(h)) if Some(h.book) != selected => self.select(h.book),
            _ => {}
        }
    }

    // ---------------- transitions ----------------

    fn next_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Open `slot`, closing any other book first.
    pub fn select(&mut self, slot: BookSlot) {
        if slot.0 >= self.books.len() {
            log::debug!("[viewer] no book in slot {}", slot.0);
            return;
        }
        match (self.session.state, self.session.selected) {
            (ViewerState::Closed, _) => self.begin_open(slot),
            (ViewerState::Closing, Some(cur)) if cur == slot => self.begin_open(slot),
            (_, Some(cur)) if cur == slot => {}
            (_, Some(cur)) => {
                self.close_now(cur);
                self.begin_open(slot);
            }
            (_, None) => self.begin_open(slot),
        }
    }

    fn begin_open(&mut self, slot: BookSlot) {
        let reopening =
            self.session.state == ViewerState::Closing && self.session.selected == Some(slot);
        let ticket = self.next_ticket();
        let profile = self.session.profile;
        let dur = self.config.open_duration();

        if !reopening {
            self.session.saved_camera = Some(self.camera.pose());
        }
        self.session.selected = Some(slot);
        self.session.state = ViewerState::Opening;
        self.session.spread = 0;
        self.session.ticket = ticket;

        let Some(book) = self.books.get_mut(slot.0) else {
            return;
        };
        book.spread = 0;
        if book.original.is_none() {
            book.original = self.scene.get(book.root).map(|n| n.local);
        }
        let event = AnimationEvent::Opened { slot, ticket };
        match profile {
            DeviceProfile::Desktop => {
                let a = &mut self.animator;
                a.move_node(&self.scene, book.root, READING_BOOK_POS, dur);
                a.rotate_node(
                    &self.scene,
                    book.root,
                    face_towards(READING_BOOK_POS, READING_CAMERA_POS),
                    dur,
                );
                a.rotate_node(
                    &self.scene,
                    book.cover_pivot,
                    Quat::from_rotation_y(COVER_OPEN_ANGLE),
                    dur,
                );
                a.move_camera(&self.camera, READING_CAMERA_POS, dur);
                let aim = a.aim_camera(&self.camera, READING_CAMERA_TARGET, dur);
                a.on_complete(aim, event);
                a.schedule(dur, event);
            }
            DeviceProfile::Mobile => {
                book::face_reader(&mut self.scene, book);
                self.animator.schedule(Duration::ZERO, event);
            }
        }
        log::info!("[viewer] opening book {}", slot.0);
    }

    fn complete_open(&mut self, slot: BookSlot, ticket: Ticket) {
        if self.session.state != ViewerState::Opening
            || self.session.selected != Some(slot)
            || self.session.ticket != ticket
        {
            log::debug!("[viewer] stale open completion for book {}", slot.0);
            return;
        }
        let profile = self.session.profile;
        let reveal = match profile {
            DeviceProfile::Desktop => self.config.spread_reveal_duration(),
            DeviceProfile::Mobile => self.config.mobile_reveal_duration(),
        };
        self.session.state = ViewerState::Open;
        let Some(book) = self.books.get_mut(slot.0) else {
            return;
        };
        book.open = true;
        book.set_covers_visible(&mut self.scene, false);
        spread::apply_spread(
            &mut self.scene,
            &mut self.animator,
            book,
            self.session.spread,
            profile,
            true,
            reveal,
        );
        self.session.spread = book.spread;
        log::info!("[viewer] book {} open at page {}", slot.0, book.spread);
    }

    /// Begin closing the open (or opening) book.
    pub fn close(&mut self) {
        let (ViewerState::Opening | ViewerState::Open) = self.session.state else {
            return;
        };
        let Some(slot) = self.session.selected else {
            return;
        };
        let ticket = self.next_ticket();
        self.session.state = ViewerState::Closing;
        self.session.ticket = ticket;
        self.put_away(slot);

        let Some(book) = self.books.get(slot.0) else {
            return;
        };
        let event = AnimationEvent::Closed { slot, ticket };
        match self.session.profile {
            DeviceProfile::Desktop => {
                let dur = self.config.close_duration();
                let rest = book.original.unwrap_or_else(|| {
                    book::layout_transform(slot, self.books.len(), DeviceProfile::Desktop)
                });
                let a = &mut self.animator;
                a.move_node(&self.scene, book.root, rest.translation, dur);
                a.rotate_node(&self.scene, book.root, rest.rotation, dur);
                a.rotate_node(
                    &self.scene,
                    book.cover_pivot,
                    Quat::IDENTITY,
                    self.config.cover_close_duration(),
                );
                if let Some(pose) = self.session.saved_camera {
                    a.move_camera(&self.camera, pose.eye, dur);
                    let aim = a.aim_camera(&self.camera, pose.target, dur);
                    a.on_complete(aim, event);
                }
                a.schedule(dur, event);
            }
            DeviceProfile::Mobile => self.animator.schedule(Duration::ZERO, event),
        }
        log::info!("[viewer] closing book {}", slot.0);
    }

    /// Tear down the reading presentation: stop any flip, hide the pages,
    /// show the covers again.
    fn put_away(&mut self, slot: BookSlot) {
        let profile = self.session.profile;
        let Some(book) = self.books.get_mut(slot.0) else {
            return;
        };
        if spread::finish_flip(&mut self.scene, &mut self.animator, book, profile, false).is_some() {
            log::debug!("[flip] book {} flip aborted by close", slot.0);
        }
        book.open = false;
        spread::hide_pages(&mut self.scene, &mut self.animator, book);
        book.set_covers_visible(&mut self.scene, true);
    }

    /// Snap book and camera to their captured resting values.
    fn settle(&mut self, slot: BookSlot) {
        let Some(book) = self.books.get(slot.0) else {
            return;
        };
        for ch in [
            Channel::translation(book.root),
            Channel::rotation(book.root),
            Channel::rotation(book.cover_pivot),
        ] {
            self.animator.cancel(ch);
        }
        if let Some(node) = self.scene.get_mut(book.cover_pivot) {
            node.local.rotation = Quat::IDENTITY;
        }
        if self.session.profile == DeviceProfile::Desktop {
            if let (Some(orig), Some(node)) = (book.original, self.scene.get_mut(book.root)) {
                node.local.translation = orig.translation;
                node.local.rotation = orig.rotation;
            }
        }
        if let Some(pose) = self.session.saved_camera.take() {
            self.animator.cancel(Channel::CameraEye);
            self.animator.cancel(Channel::CameraTarget);
            self.camera.set_pose(pose);
        }
        self.session.state = ViewerState::Closed;
        self.session.selected = None;
        self.session.spread = 0;
    }

    fn complete_close(&mut self, slot: BookSlot, ticket: Ticket) {
        if self.session.state != ViewerState::Closing
            || self.session.selected != Some(slot)
            || self.session.ticket != ticket
        {
            log::debug!("[viewer] stale close completion for book {}", slot.0);
            return;
        }
        self.settle(slot);
        log::info!("[viewer] book {} closed", slot.0);
    }

    /// Close `slot` synchronously, skipping the animation.
    fn close_now(&mut self, slot: BookSlot) {
        self.session.ticket = self.next_ticket();
        self.put_away(slot);
        self.settle(slot);
        log::info!("[viewer] book {} closed immediately", slot.0);
    }

    /// Move through the open book. Out-of-range requests clamp; on mobile,
    /// stepping past either end closes the book.
    pub fn navigate(&mut self, dir: NavDirection) {
        if self.session.state != ViewerState::Open {
            return;
        }
        let Some(slot) = self.session.selected else {
            return;
        };
        let profile = self.session.profile;
        let Some(count) = self.books.get(slot.0).map(BookInstance::page_count) else {
            return;
        };
        let cur = self.session.spread;
        let target = match (profile, dir) {
            (DeviceProfile::Desktop, NavDirection::Next) => spread::desktop_spread_index(cur + 2, count),
            (DeviceProfile::Desktop, NavDirection::Prev) => {
                spread::desktop_spread_index(cur.saturating_sub(2), count)
            }
            (DeviceProfile::Mobile, NavDirection::Next) if cur + 1 >= count => {
                log::debug!("[viewer] past last page, closing");
                self.close();
                return;
            }
            (DeviceProfile::Mobile, NavDirection::Prev) if cur == 0 => {
                log::debug!("[viewer] before first page, closing");
                self.close();
                return;
            }
            (DeviceProfile::Mobile, NavDirection::Next) => cur + 1,
            (DeviceProfile::Mobile, NavDirection::Prev) => cur - 1,
        };
        if target == cur {
            log::debug!("[viewer] spread {cur} already at the end");
            return;
        }

        if profile == DeviceProfile::Desktop && self.config.animate_flips {
            let ticket = self.next_ticket();
            let flip_ms = self.config.flip_duration();
            let Some(book) = self.books.get_mut(slot.0) else {
                return;
            };
            let direction = match dir {
                NavDirection::Next => FlipDirection::Forward,
                NavDirection::Prev => FlipDirection::Backward,
            };
            spread::begin_flip(
                &mut self.scene,
                &mut self.animator,
                book,
                direction,
                target,
                flip_ms,
                ticket,
            );
            return;
        }
        self.show_spread(slot, target);
    }

    fn show_spread(&mut self, slot: BookSlot, spread: usize) {
        let profile = self.session.profile;
        let Some(book) = self.books.get_mut(slot.0) else {
            return;
        };
        spread::apply_spread(
            &mut self.scene,
            &mut self.animator,
            book,
            spread,
            profile,
            true,
            Duration::ZERO,
        );
        self.session.spread = book.spread;
        log::debug!("[viewer] book {} at page {}", slot.0, book.spread);
    }

    fn flip_finished(&mut self, slot: BookSlot, ticket: Ticket) {
        let profile = self.session.profile;
        let open = self.session.open_mode() && self.session.selected == Some(slot);
        let Some(book) = self.books.get_mut(slot.0) else {
            return;
        };
        if book.flip.map(|f| f.ticket) != Some(ticket) {
            return;
        }
        let Some(flip) = spread::finish_flip(&mut self.scene, &mut self.animator, book, profile, open)
        else {
            return;
        };
        if open {
            self.show_spread(slot, flip.target_spread);
        }
    }

    /// Mobile: move the camera to the next/previous book in the stack.
    fn scroll_stack(&mut self, dir: VerticalDir) {
        let last = self.books.len().saturating_sub(1);
        let focused = match dir {
            VerticalDir::Up => (self.session.focused + 1).min(last),
            VerticalDir::Down => self.session.focused.saturating_sub(1),
        };
        if focused == self.session.focused {
            return;
        }
        self.session.focused = focused;
        let at = book::layout_transform(BookSlot(focused), self.books.len(), DeviceProfile::Mobile)
            .translation;
        let dur = self.config.stack_scroll_duration();
        self.animator
            .move_camera(&self.camera, Vec3::new(at.x, at.y, MOBILE_CAMERA_Z), dur);
        self.animator
            .aim_camera(&self.camera, Vec3::new(at.x, at.y, 0.0), dur);
        log::debug!("[viewer] stack focus {focused}");
    }

    // ---------------- time ----------------

    /// Advance animations by `dt` and apply any transitions they complete.
    pub fn tick(&mut self, dt: Duration) {
        self.clock += dt;
        let mobile = self.session.profile.is_mobile();
        if mobile {
            let skip = self
                .session
                .selected
                .filter(|_| self.session.state != ViewerState::Closed);
            book::spin_idle(&mut self.scene, &self.books, self.clock, skip);
        }
        let events = self.animator.advance(dt, &mut self.scene, &mut self.camera);
        for ev in events {
            match ev {
                AnimationEvent::Opened { slot, ticket } => self.complete_open(slot, ticket),
                AnimationEvent::Closed { slot, ticket } => self.complete_close(slot, ticket),
                AnimationEvent::FlipFinished { slot, ticket } => self.flip_finished(slot, ticket),
            }
        }
        if mobile {
            book::update_hit_proxies(&mut self.scene, &self.books, &self.camera);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    // ---------------- output ----------------

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snap = SessionSnapshot {
            state: Some(self.session.state),
            profile: Some(self.session.profile),
            focused: self.session.focused,
            ..SessionSnapshot::default()
        };
        let Some(slot) = self.session.selected else {
            return snap;
        };
        let Some(entry) = self.catalog.get(slot.0) else {
            return snap;
        };
        let page = self.session.spread;
        snap.selected_id = Some(entry.id);
        snap.title = Some(entry.title.clone());
        snap.description = Some(entry.description.clone());
        snap.binding = Some(entry.binding.clone());
        snap.price = Some(entry.price.clone());
        snap.printed_pages = Some(entry.printed_pages);
        snap.page = Some(page);
        snap.page_count = Some(entry.page_count);
        snap.page_image = entry.page_path(page).map(str::to_string);
        snap.counter = Some(format!("{}/{}", page + 1, entry.page_count));
        snap
    }
}
