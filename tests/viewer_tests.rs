// Host-side scenario tests for the viewer state machine.

use glam::{Vec2, Vec3};
use proptest::prelude::*;
use shelf_core::gesture::{HorizontalDir, VerticalDir};
use shelf_core::{
    BookSlot, Catalog, DeviceProfile, Gesture, NavDirection, NullResolver, TextureHandle, Viewer,
    ViewerConfig, ViewerState,
};
use std::time::Duration;

const DESKTOP_VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
const MOBILE_VIEWPORT: Vec2 = Vec2::new(400.0, 800.0);

fn viewer(profile: DeviceProfile, config: ViewerConfig) -> Viewer {
    let viewport = match profile {
        DeviceProfile::Desktop => DESKTOP_VIEWPORT,
        DeviceProfile::Mobile => MOBILE_VIEWPORT,
    };
    Viewer::new(
        Catalog::builtin(),
        profile,
        config,
        viewport,
        &mut NullResolver,
    )
    .expect("viewer builds")
}

fn desktop() -> Viewer {
    viewer(DeviceProfile::Desktop, ViewerConfig::default())
}

fn mobile() -> Viewer {
    viewer(DeviceProfile::Mobile, ViewerConfig::default())
}

/// Step the viewer in 16ms frames.
fn run(v: &mut Viewer, ms: u64) {
    let frames = ms.div_ceil(16);
    for _ in 0..frames {
        v.tick(Duration::from_millis(16));
    }
}

fn project(v: &Viewer, world: Vec3) -> Vec2 {
    let clip = v.camera().view_proj() * world.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    let vp = v.viewport();
    Vec2::new((ndc.x + 1.0) * 0.5 * vp.x, (1.0 - ndc.y) * 0.5 * vp.y)
}

fn tap(v: &mut Viewer, at: Vec2) -> Option<Gesture> {
    v.pointer_down(1, at, 1_000.0);
    v.pointer_up(1, at, 1_080.0)
}

fn visible_pages(v: &Viewer, slot: usize) -> Vec<usize> {
    v.books()[slot]
        .visible_pages(v.scene())
        .map(|p| p.index)
        .collect()
}

fn open_books(v: &Viewer) -> usize {
    v.books().iter().filter(|b| b.open).count()
}

#[test]
fn desktop_open_navigate_close() {
    let mut v = desktop();
    let book = &v.books()[0];
    let original = v.scene().get(book.root).expect("root").local;
    let camera_before = v.camera().pose();

    let at = project(&v, v.scene().world_transform(book.root).translation);
    assert_eq!(v.hit_test(at).map(|h| h.book), Some(BookSlot(0)));
    assert!(matches!(tap(&mut v, at), Some(Gesture::Tap { .. })));
    assert_eq!(v.state(), ViewerState::Opening);
    assert_eq!(v.session().selected(), Some(BookSlot(0)));

    run(&mut v, 1_200);
    assert_eq!(v.state(), ViewerState::Open);
    assert_eq!(v.session().spread(), 0);
    assert_eq!(visible_pages(&v, 0), vec![0, 1]);

    // right half of the screen, on the right-hand page
    let right_page = v.books()[0].pages[1].node;
    let at = project(&v, v.scene().world_transform(right_page).translation);
    assert!(at.x > DESKTOP_VIEWPORT.x / 2.0);
    tap(&mut v, at);
    assert_eq!(v.session().spread(), 2);
    assert_eq!(visible_pages(&v, 0), vec![2, 3]);

    let outside = Vec2::new(4.0, 4.0);
    assert!(v.hit_test(outside).is_none());
    tap(&mut v, outside);
    assert_eq!(v.state(), ViewerState::Closing);

    run(&mut v, 1_200);
    assert_eq!(v.state(), ViewerState::Closed);
    assert_eq!(v.session().selected(), None);
    let rest = v.scene().get(v.books()[0].root).expect("root").local;
    assert!(rest.translation.abs_diff_eq(original.translation, 1e-4));
    assert!(rest.rotation.abs_diff_eq(original.rotation, 1e-4));
    assert!(v.camera().eye.abs_diff_eq(camera_before.eye, 1e-4));
    assert!(v.camera().target.abs_diff_eq(camera_before.target, 1e-4));
    assert!(visible_pages(&v, 0).is_empty());
}

#[test]
fn left_half_tap_goes_back() {
    let mut v = desktop();
    v.select(BookSlot(1));
    run(&mut v, 1_200);
    v.navigate(NavDirection::Next);
    v.navigate(NavDirection::Next);
    assert_eq!(v.session().spread(), 4);

    let left_page = v.books()[1].pages[4].node;
    let at = project(&v, v.scene().world_transform(left_page).translation);
    assert!(at.x < DESKTOP_VIEWPORT.x / 2.0);
    tap(&mut v, at);
    assert_eq!(v.session().spread(), 2);
}

#[test]
fn desktop_navigation_clamps_at_both_ends() {
    let mut v = desktop();
    v.select(BookSlot(0));
    run(&mut v, 1_200);
    v.navigate(NavDirection::Prev);
    assert_eq!(v.session().spread(), 0);
    for _ in 0..10 {
        v.navigate(NavDirection::Next);
    }
    assert_eq!(v.session().spread(), 8);
    assert_eq!(visible_pages(&v, 0), vec![8, 9]);
    assert_eq!(v.state(), ViewerState::Open);
}

#[test]
fn keys_drive_navigation_and_close() {
    let mut v = desktop();
    assert!(!v.handle_key("Escape"));
    v.select(BookSlot(2));
    run(&mut v, 1_200);
    assert!(v.handle_key("ArrowRight"));
    assert_eq!(v.session().spread(), 2);
    assert!(v.handle_key("ArrowLeft"));
    assert_eq!(v.session().spread(), 0);
    assert!(!v.handle_key("Enter"));
    assert!(v.handle_key("Escape"));
    assert_eq!(v.state(), ViewerState::Closing);
}

#[test]
fn selecting_another_book_closes_the_first() {
    let mut v = desktop();
    v.select(BookSlot(0));
    run(&mut v, 1_200);
    assert!(v.books()[0].open);

    v.select(BookSlot(2));
    assert!(!v.books()[0].open);
    assert_eq!(v.session().selected(), Some(BookSlot(2)));
    assert_eq!(v.state(), ViewerState::Opening);
    assert!(visible_pages(&v, 0).is_empty());

    run(&mut v, 1_200);
    assert_eq!(v.state(), ViewerState::Open);
    assert_eq!(open_books(&v), 1);
    assert!(v.books()[2].open);
}

#[test]
fn late_open_completion_after_close_is_ignored() {
    let mut v = desktop();
    v.select(BookSlot(0));
    run(&mut v, 200);
    v.close();
    assert_eq!(v.state(), ViewerState::Closing);
    // the open tween and its fallback timer would both have fired by now
    run(&mut v, 500);
    assert_ne!(v.state(), ViewerState::Open);
    assert!(!v.books()[0].open);
    run(&mut v, 1_000);
    assert_eq!(v.state(), ViewerState::Closed);
    assert_eq!(open_books(&v), 0);
}

#[test]
fn reopening_while_closing_wins_over_the_close() {
    let mut v = desktop();
    let camera_before = v.camera().pose();
    v.select(BookSlot(1));
    run(&mut v, 1_200);
    v.close();
    run(&mut v, 100);
    v.select(BookSlot(1));
    assert_eq!(v.state(), ViewerState::Opening);
    run(&mut v, 1_500);
    assert_eq!(v.state(), ViewerState::Open);
    assert!(v.books()[1].open);
    // the pose captured before the first open is the one restored later
    assert_eq!(v.session().saved_camera(), Some(camera_before));
}

#[test]
fn orbit_and_zoom_only_while_closed_on_desktop() {
    let mut v = desktop();
    let eye = v.camera().eye;
    v.pointer_down(3, Vec2::new(100.0, 100.0), 0.0);
    v.pointer_move(3, Vec2::new(160.0, 100.0));
    let g = v.pointer_up(3, Vec2::new(160.0, 100.0), 400.0);
    assert!(matches!(g, Some(Gesture::Drag { .. })));
    assert!(!v.camera().eye.abs_diff_eq(eye, 1e-4));
    assert!((v.camera().distance() - eye.length()).abs() < 1e-3);

    let d = v.camera().distance();
    v.wheel(-100.0);
    assert!(v.camera().distance() < d);
    for _ in 0..100 {
        v.wheel(500.0);
    }
    assert!(v.camera().distance() <= v.config().orbit_max_distance + 1e-4);

    v.select(BookSlot(0));
    run(&mut v, 1_200);
    let eye = v.camera().eye;
    v.pointer_down(3, Vec2::new(100.0, 100.0), 0.0);
    v.pointer_move(3, Vec2::new(300.0, 100.0));
    v.pointer_cancel(3);
    v.wheel(-300.0);
    assert!(v.camera().eye.abs_diff_eq(eye, 1e-6));
}

#[test]
fn animated_flip_lands_on_the_next_spread() {
    let config = ViewerConfig {
        animate_flips: true,
        ..ViewerConfig::default()
    };
    let mut v = viewer(DeviceProfile::Desktop, config);
    v.select(BookSlot(0));
    run(&mut v, 1_200);
    let nodes = v.scene().len();

    v.navigate(NavDirection::Next);
    let flip = v.books()[0].flip.expect("flip started");
    assert_eq!(flip.page, 1);
    assert_eq!(v.scene().len(), nodes + 1);
    // a second request mid-flip is dropped
    v.navigate(NavDirection::Next);
    assert_eq!(v.books()[0].flip.map(|f| f.ticket), Some(flip.ticket));

    run(&mut v, 800);
    let book = &v.books()[0];
    assert!(book.flip.is_none());
    assert_eq!(v.scene().len(), nodes);
    assert_eq!(v.session().spread(), 2);
    assert_eq!(visible_pages(&v, 0), vec![2, 3]);
    let page1 = v.scene().get(book.pages[1].node).expect("page");
    assert_eq!(page1.parent(), Some(book.root));
}

#[test]
fn closing_mid_flip_returns_the_page() {
    let config = ViewerConfig {
        animate_flips: true,
        ..ViewerConfig::default()
    };
    let mut v = viewer(DeviceProfile::Desktop, config);
    v.select(BookSlot(0));
    run(&mut v, 1_200);
    let nodes = v.scene().len();
    v.navigate(NavDirection::Next);
    run(&mut v, 200);
    v.close();
    assert!(v.books()[0].flip.is_none());
    assert_eq!(v.scene().len(), nodes);
    run(&mut v, 1_200);
    assert_eq!(v.state(), ViewerState::Closed);
    let book = &v.books()[0];
    assert_eq!(
        v.scene().get(book.pages[1].node).and_then(|n| n.parent()),
        Some(book.root)
    );
}

#[test]
fn mobile_last_page_advance_closes() {
    let mut v = mobile();
    v.select(BookSlot(0));
    run(&mut v, 32);
    assert_eq!(v.state(), ViewerState::Open);
    assert_eq!(visible_pages(&v, 0), vec![0]);

    for _ in 0..9 {
        v.handle_gesture(Gesture::SwipeHorizontal(HorizontalDir::Left));
    }
    assert_eq!(v.session().spread(), 9);
    assert_eq!(v.snapshot().counter.as_deref(), Some("10/10"));

    tap(&mut v, Vec2::new(200.0, 400.0));
    assert_eq!(v.state(), ViewerState::Closing);
    run(&mut v, 32);
    assert_eq!(v.state(), ViewerState::Closed);
    assert_eq!(open_books(&v), 0);
}

#[test]
fn mobile_back_from_first_page_closes() {
    let mut v = mobile();
    v.select(BookSlot(1));
    run(&mut v, 32);
    v.handle_gesture(Gesture::SwipeHorizontal(HorizontalDir::Right));
    assert_eq!(v.state(), ViewerState::Closing);
}

#[test]
fn mobile_open_page_faces_the_camera_after_spinning() {
    let mut v = mobile();
    run(&mut v, 2_600);
    v.select(BookSlot(0));
    run(&mut v, 400);
    assert_eq!(v.state(), ViewerState::Open);

    let page = v.books()[0].pages[0].node;
    let world = v.scene().world_matrix(page);
    let normal = world.transform_vector3(Vec3::Z).normalize();
    let to_camera = (v.camera().eye - world.transform_point3(Vec3::ZERO)).normalize();
    assert!(normal.dot(to_camera) > 0.9, "page normal {normal:?} vs {to_camera:?}");

    run(&mut v, 1_000);
    let still = v.scene().world_matrix(page).transform_vector3(Vec3::Z).normalize();
    assert!(still.abs_diff_eq(normal, 1e-4));
}

#[test]
fn mobile_tap_on_hit_proxy_opens_that_book() {
    let mut v = mobile();
    run(&mut v, 16);
    let proxy = v.books()[2].hit_proxy.expect("mobile books have proxies");
    let at = project(&v, v.scene().world_transform(proxy).translation);
    assert_eq!(v.hit_test(at).map(|h| h.book), Some(BookSlot(2)));
    tap(&mut v, at);
    assert_eq!(v.session().selected(), Some(BookSlot(2)));
    run(&mut v, 32);
    assert_eq!(v.state(), ViewerState::Open);
    assert_eq!(v.snapshot().page_image.as_deref(), Some("images/book3-p1.jpg"));
}

#[test]
fn mobile_vertical_swipes_scroll_then_close() {
    let mut v = mobile();
    v.handle_gesture(Gesture::SwipeVertical(VerticalDir::Up));
    assert_eq!(v.session().focused(), 1);
    v.handle_gesture(Gesture::SwipeVertical(VerticalDir::Up));
    v.handle_gesture(Gesture::SwipeVertical(VerticalDir::Up));
    assert_eq!(v.session().focused(), 2);
    v.handle_gesture(Gesture::SwipeVertical(VerticalDir::Down));
    assert_eq!(v.session().focused(), 1);

    v.select(BookSlot(1));
    run(&mut v, 32);
    v.handle_gesture(Gesture::SwipeVertical(VerticalDir::Down));
    assert_eq!(v.state(), ViewerState::Closing);
}

#[test]
fn missing_images_keep_every_page() {
    let mut covers_only = |path: &str| path.contains("cover").then_some(TextureHandle(7));
    let mut v = Viewer::new(
        Catalog::builtin(),
        DeviceProfile::Desktop,
        ViewerConfig::default(),
        DESKTOP_VIEWPORT,
        &mut covers_only,
    )
    .expect("viewer builds");
    for book in v.books() {
        assert_eq!(book.page_count(), 10);
        assert!(book.pages.iter().all(|p| p.placeholder));
        assert!(!book.cover_placeholder);
    }
    v.select(BookSlot(0));
    run(&mut v, 1_200);
    v.navigate(NavDirection::Next);
    assert_eq!(visible_pages(&v, 0), vec![2, 3]);
}

#[test]
fn snapshot_describes_the_open_book() {
    let mut v = desktop();
    let closed = v.snapshot();
    assert_eq!(closed.state, Some(ViewerState::Closed));
    assert_eq!(closed.selected_id, None);

    v.select(BookSlot(1));
    run(&mut v, 1_200);
    v.navigate(NavDirection::Next);
    let snap = v.snapshot();
    assert_eq!(snap.selected_id, Some(2));
    assert_eq!(snap.title.as_deref(), Some("David Frisch - Impressions"));
    assert_eq!(snap.page, Some(2));
    assert_eq!(snap.counter.as_deref(), Some("3/10"));
    assert_eq!(snap.printed_pages, Some(126));
}

#[test]
fn inquiry_selection_follows_catalog() {
    let mut v = desktop();
    assert!(v.toggle_inquiry(3));
    v.set_inquiry(1, true);
    v.set_inquiry(1, true);
    assert!(!v.toggle_inquiry(99));
    let titles = v.inquiry().titles(v.catalog());
    assert_eq!(titles.len(), 2);
    assert!(titles[0].contains("Thank You"));
    v.set_inquiry(3, false);
    assert_eq!(v.inquiry().ids().collect::<Vec<_>>(), vec![1]);
    v.clear_inquiry();
    assert!(v.inquiry().is_empty());
}

#[derive(Clone, Debug)]
enum Op {
    Select(usize),
    Close,
    Next,
    Prev,
    Tick(u64),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4).prop_map(Op::Select),
        Just(Op::Close),
        Just(Op::Next),
        Just(Op::Prev),
        (0u64..900).prop_map(Op::Tick),
    ]
}

fn arb_profile() -> impl Strategy<Value = DeviceProfile> {
    prop_oneof![Just(DeviceProfile::Desktop), Just(DeviceProfile::Mobile)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn at_most_one_book_is_ever_open(
        profile in arb_profile(),
        flips in any::<bool>(),
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        let config = ViewerConfig { animate_flips: flips, ..ViewerConfig::default() };
        let mut v = viewer(profile, config);
        for op in ops {
            match op {
                Op::Select(i) => v.select(BookSlot(i)),
                Op::Close => v.close(),
                Op::Next => v.navigate(NavDirection::Next),
                Op::Prev => v.navigate(NavDirection::Prev),
                Op::Tick(ms) => run(&mut v, ms),
            }
            prop_assert!(open_books(&v) <= 1);
            let s = v.session();
            if s.open_mode() {
                prop_assert!(s.selected().is_some());
            }
            if s.state() == ViewerState::Closed {
                prop_assert_eq!(open_books(&v), 0);
            }
            if let Some(slot) = s.selected() {
                let count = v.books()[slot.0].page_count();
                prop_assert!(s.spread() < count);
                if profile == DeviceProfile::Desktop {
                    prop_assert_eq!(s.spread() % 2, 0);
                }
                for (i, b) in v.books().iter().enumerate() {
                    if i != slot.0 {
                        prop_assert!(!b.open);
                    }
                }
            }
        }
    }
}
