//! Which pages are shown, where they sit, and the pivoting page flip.

use crate::animator::{AnimationEvent, Animator, Channel, Ticket, TweenId};
use crate::book::{page_rest_transform, BookInstance, PageSide};
use crate::constants::*;
use crate::easing::Easing;
use crate::profile::DeviceProfile;
use crate::scene::{Node, NodeId, SceneGraph, Transform};
use glam::{Quat, Vec3};
use std::f32::consts::PI;
use std::ops::Range;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipDirection {
    Forward,
    Backward,
}

/// A page turn in flight. The page is parented to `pivot` until the flip ends.
#[derive(Clone, Copy, Debug)]
pub struct FlipOperation {
    pub page: usize,
    pub pivot: NodeId,
    pub start_angle: f32,
    pub end_angle: f32,
    pub direction: FlipDirection,
    /// Spread shown once the page lands.
    pub target_spread: usize,
    pub tween: TweenId,
    pub ticket: Ticket,
}

/// Highest left-page index a desktop spread can start at.
pub fn max_desktop_spread(page_count: usize) -> usize {
    if page_count < 2 {
        return 0;
    }
    page_count - if page_count % 2 == 0 { 2 } else { 1 }
}

/// Clamp a requested desktop spread into range and round it down to even.
pub fn desktop_spread_index(requested: usize, page_count: usize) -> usize {
    requested.min(max_desktop_spread(page_count)) & !1
}

pub fn mobile_page_index(requested: usize, page_count: usize) -> usize {
    requested.min(page_count.saturating_sub(1))
}

/// Clamp an index for the given profile.
pub fn clamp_spread(requested: usize, page_count: usize, profile: DeviceProfile) -> usize {
    match profile {
        DeviceProfile::Desktop => desktop_spread_index(requested, page_count),
        DeviceProfile::Mobile => mobile_page_index(requested, page_count),
    }
}

/// Page indices visible for `spread`.
pub fn visible_range(spread: usize, page_count: usize, profile: DeviceProfile) -> Range<usize> {
    let start = clamp_spread(spread, page_count, profile);
    let width = match profile {
        DeviceProfile::Desktop => 2,
        DeviceProfile::Mobile => 1,
    };
    start.min(page_count)..(start + width).min(page_count)
}

/// Flat pose of a visible page, relative to its book.
///
/// Closed spreads sit just off the block with a hair of tilt; open spreads are
/// enlarged, pulled toward the reader and perfectly flat.
pub fn canonical_pose(side: PageSide, profile: DeviceProfile, open: bool) -> Transform {
    let sign = match side {
        PageSide::Left => -1.0,
        PageSide::Right => 1.0,
    };
    match (profile, open) {
        (DeviceProfile::Desktop, false) => Transform::from_translation(Vec3::new(
            sign * PAGE_WIDTH / 2.0,
            0.0,
            SPREAD_CLOSED_Z,
        ))
        .with_rotation(Quat::from_rotation_y(-sign * SPREAD_CLOSED_TILT)),
        (DeviceProfile::Desktop, true) => Transform::from_translation(Vec3::new(
            sign * PAGE_WIDTH * DESKTOP_OPEN_PAGE_SCALE / 2.0,
            SPREAD_OPEN_Y,
            SPREAD_OPEN_Z,
        ))
        .with_scale(Vec3::new(DESKTOP_OPEN_PAGE_SCALE, DESKTOP_OPEN_PAGE_SCALE, 1.0)),
        (DeviceProfile::Mobile, false) => {
            Transform::from_translation(Vec3::new(0.0, 0.0, SPREAD_CLOSED_Z))
        }
        (DeviceProfile::Mobile, true) => {
            Transform::from_translation(Vec3::new(0.0, SPREAD_OPEN_Y, SPREAD_OPEN_Z))
                .with_scale(Vec3::new(MOBILE_OPEN_PAGE_SCALE, MOBILE_OPEN_PAGE_SCALE, 1.0))
        }
    }
}

/// Show exactly the pages of `spread` and hide the rest.
///
/// Pages are snapped to their closed spread pose; when `open`, they then tween
/// to the enlarged reading pose over `reveal`.
pub fn apply_spread(
    scene: &mut SceneGraph,
    animator: &mut Animator,
    book: &mut BookInstance,
    spread: usize,
    profile: DeviceProfile,
    open: bool,
    reveal: Duration,
) {
    let count = book.page_count();
    book.spread = clamp_spread(spread, count, profile);
    let shown = visible_range(book.spread, count, profile);
    for page in &book.pages {
        animator.cancel_node(page.node);
        if !shown.contains(&page.index) {
            scene.set_visible(page.node, false);
            scene.set_local(page.node, page_rest_transform(page.index));
            continue;
        }
        scene.set_visible(page.node, true);
        if open && reveal.is_zero() {
            scene.set_local(page.node, canonical_pose(page.side, profile, true));
            continue;
        }
        scene.set_local(page.node, canonical_pose(page.side, profile, false));
        if open {
            let target = canonical_pose(page.side, profile, true);
            if profile == DeviceProfile::Desktop {
                animator.move_node(scene, page.node, target.translation, reveal);
                animator.rotate_node(scene, page.node, target.rotation, reveal);
            } else if let Some(n) = scene.get_mut(page.node) {
                n.local.translation = target.translation;
                n.local.rotation = target.rotation;
            }
            animator.scale_node(scene, page.node, target.scale, reveal);
        }
    }
    log::debug!("[spread] book {} shows {:?}", book.slot.0, shown);
}

/// Hide every page and put it back on the stack.
pub fn hide_pages(scene: &mut SceneGraph, animator: &mut Animator, book: &BookInstance) {
    for page in &book.pages {
        animator.cancel_node(page.node);
        scene.set_visible(page.node, false);
        scene.set_local(page.node, page_rest_transform(page.index));
    }
}

/// Start turning a page of `book` toward `target_spread`.
///
/// Forward flips turn the current right page over the spine, backward flips
/// turn the left page back. Returns `false` (and does nothing) if a flip is
/// already running on this book or there is no page to turn.
pub fn begin_flip(
    scene: &mut SceneGraph,
    animator: &mut Animator,
    book: &mut BookInstance,
    direction: FlipDirection,
    target_spread: usize,
    duration: Duration,
    ticket: Ticket,
) -> bool {
    if book.flip.is_some() {
        log::debug!("[flip] book {} already flipping, ignored", book.slot.0);
        return false;
    }
    let index = match direction {
        FlipDirection::Forward => book.spread + 1,
        FlipDirection::Backward => book.spread,
    };
    let Some(page) = book.page(index).cloned() else {
        return false;
    };

    let half = PAGE_WIDTH / 2.0;
    // inner edge: +x for a left page, -x for a right page
    let edge_x = match page.side {
        PageSide::Left => half,
        PageSide::Right => -half,
    };
    let page_world = scene.world_transform(page.node);
    let pivot_pos = page_world.translation + page_world.rotation * Vec3::new(edge_x * page_world.scale.x, 0.0, 0.0);
    let base = page_world.rotation;

    let Ok(pivot) = scene.spawn(
        scene.root(),
        Node::group(format!("flip-pivot-{}", book.slot.0))
            .with_transform(Transform::from_translation(pivot_pos).with_rotation(base)),
    ) else {
        return false;
    };
    if let Err(err) = scene.attach(page.node, pivot) {
        log::warn!("[flip] could not reparent page {index}: {err}");
        let _ = scene.remove(pivot);
        return false;
    }
    animator.cancel_node(page.node);

    let end_angle = match direction {
        FlipDirection::Forward => -PI,
        FlipDirection::Backward => PI,
    };
    let tween = animator.yaw_node(pivot, base, 0.0, end_angle, duration, Easing::QuadraticInOut);
    animator.on_complete(
        tween,
        AnimationEvent::FlipFinished {
            slot: book.slot,
            ticket,
        },
    );
    book.flip = Some(FlipOperation {
        page: index,
        pivot,
        start_angle: 0.0,
        end_angle,
        direction,
        target_spread,
        tween,
        ticket,
    });
    log::debug!("[flip] book {} page {index} {direction:?}", book.slot.0);
    true
}

/// Return the flipped page to its book in its flat pose and drop the pivot.
///
/// Safe to call at any point of the flip; also used to abort one.
pub fn finish_flip(
    scene: &mut SceneGraph,
    animator: &mut Animator,
    book: &mut BookInstance,
    profile: DeviceProfile,
    open: bool,
) -> Option<FlipOperation> {
    let flip = book.flip.take()?;
    animator.cancel(Channel::rotation(flip.pivot));
    if let Some(page) = book.page(flip.page) {
        if let Err(err) = scene.set_parent(page.node, book.root) {
            log::warn!("[flip] could not return page {}: {err}", flip.page);
        }
        scene.set_local(page.node, canonical_pose(page.side, profile, open));
    }
    if let Err(err) = scene.remove(flip.pivot) {
        log::warn!("[flip] pivot cleanup failed: {err}");
    }
    Some(flip)
}
