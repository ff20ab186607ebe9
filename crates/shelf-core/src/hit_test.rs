//! Screen point → book/page resolution.

use crate::book::BookSlot;
use crate::camera::Ray;
use crate::scene::{NodeId, NodeTag, SceneGraph, Shape};
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub book: BookSlot,
    pub page: Option<usize>,
    pub node: NodeId,
    pub distance: f32,
}

/// Ray/shape intersection in the shape's local frame. Planes are two-sided.
fn intersect_local(shape: Shape, origin: Vec3, dir: Vec3) -> Option<f32> {
    match shape {
        Shape::None => None,
        Shape::Plane { width, height } => {
            if dir.z.abs() < 1e-8 {
                return None;
            }
            let t = -origin.z / dir.z;
            if t < 0.0 {
                return None;
            }
            let p = origin + dir * t;
            (p.x.abs() <= width / 2.0 && p.y.abs() <= height / 2.0).then_some(t)
        }
        Shape::Box { size } => {
            let half = size / 2.0;
            let inv = dir.recip();
            let t0 = (-half - origin) * inv;
            let t1 = (half - origin) * inv;
            let tmin = t0.min(t1).max_element();
            let tmax = t0.max(t1).min_element();
            if tmax < 0.0 || tmin > tmax {
                return None;
            }
            Some(if tmin >= 0.0 { tmin } else { tmax })
        }
    }
}

/// Distance along `ray` (world units) to `id`'s shape, if it is hit.
pub fn intersect_node(scene: &SceneGraph, id: NodeId, ray: &Ray) -> Option<f32> {
    let node = scene.get(id)?;
    let world = scene.world_matrix(id);
    let inv = world.inverse();
    let origin = inv.transform_point3(ray.origin);
    let dir = inv.transform_vector3(ray.dir);
    let t = intersect_local(node.shape, origin, dir)?;
    let hit_world = world.transform_point3(origin + dir * t);
    Some(hit_world.distance(ray.origin))
}

/// All candidate intersections, nearest first.
///
/// Only pickable nodes count, and only while drawn, except hit-proxies which
/// are pickable while hidden.
pub fn intersections(scene: &SceneGraph, ray: &Ray) -> Vec<(NodeId, f32)> {
    let mut hits: Vec<(NodeId, f32)> = scene
        .iter()
        .filter(|(id, n)| {
            n.pickable
                && (matches!(n.tag, NodeTag::HitProxy(_)) || scene.is_visible_in_world(*id))
        })
        .filter_map(|(id, _)| intersect_node(scene, id, ray).map(|d| (id, d)))
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits
}

/// Map a hit node to its owning book, noting the page on the way up.
pub fn resolve_owner(scene: &SceneGraph, id: NodeId) -> Option<(BookSlot, Option<usize>)> {
    if let Some(NodeTag::HitProxy(slot)) = scene.get(id).map(|n| n.tag) {
        return Some((slot, None));
    }
    let mut page = None;
    for n in scene.ancestors(id) {
        match scene.get(n).map(|n| n.tag) {
            Some(NodeTag::Page { slot, index }) => page = page.or(Some((slot, index))),
            Some(NodeTag::BookRoot(slot)) => return Some((slot, page.map(|(_, i)| i))),
            _ => {}
        }
    }
    // a page mid-flip hangs off its pivot, not the book
    page.map(|(slot, index)| (slot, Some(index)))
}

/// Nearest intersection that belongs to a book.
pub fn pick(scene: &SceneGraph, ray: &Ray) -> Option<Hit> {
    let hit = intersections(scene, ray).into_iter().find_map(|(node, distance)| {
        resolve_owner(scene, node).map(|(book, page)| Hit {
            book,
            page,
            node,
            distance,
        })
    });
    match &hit {
        Some(h) => log::debug!(
            "[hit] book {} page {:?} at {:.2}",
            h.book.0,
            h.page,
            h.distance
        ),
        None => log::debug!("[hit] nothing"),
    }
    hit
}
