//! Live per-book 3D state.
//!
//! Each catalog entry gets one [`BookInstance`] that owns its scene nodes
//! (root, covers, block, pages and, on mobile, a hit-proxy) together with the
//! mutable reading state. Books are addressed by a stable [`BookSlot`].

use crate::assets::{AssetCache, AssetResolver, ResolvedMaterial};
use crate::camera::Camera;
use crate::catalog::{Catalog, CatalogEntry};
use crate::constants::*;
use crate::error::SceneError;
use crate::profile::DeviceProfile;
use crate::scene::{Material, Node, NodeId, NodeTag, SceneGraph, Shape, Transform};
use crate::spread::FlipOperation;
use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::time::Duration;

/// Index of a book in the catalog and in the viewer's book array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookSlot(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSide {
    Left,
    Right,
}

impl PageSide {
    /// Even pages sit left of the spine, odd pages right.
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            PageSide::Left
        } else {
            PageSide::Right
        }
    }
}

#[derive(Clone, Debug)]
pub struct Page {
    pub index: usize,
    pub node: NodeId,
    pub side: PageSide,
    /// The page image failed to resolve; drawn as a blank sheet.
    pub placeholder: bool,
}

#[derive(Debug)]
pub struct BookInstance {
    pub slot: BookSlot,
    pub root: NodeId,
    pub block: NodeId,
    pub front_cover: NodeId,
    pub back_cover: NodeId,
    /// Spine-side hinge the front cover swings on.
    pub cover_pivot: NodeId,
    pub pages: Vec<Page>,
    pub hit_proxy: Option<NodeId>,
    pub hit_proxy_y_offset: f32,
    pub cover_placeholder: bool,
    /// Shelf transform captured the first time the book opens.
    pub original: Option<Transform>,
    /// Left page index (desktop) or page index (mobile).
    pub spread: usize,
    pub open: bool,
    pub flip: Option<FlipOperation>,
}

impl BookInstance {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Nodes hidden while the book is being read.
    pub fn cover_nodes(&self) -> [NodeId; 3] {
        [self.front_cover, self.back_cover, self.block]
    }

    pub fn set_covers_visible(&self, scene: &mut SceneGraph, visible: bool) {
        for n in self.cover_nodes() {
            scene.set_visible(n, visible);
        }
    }

    pub fn visible_pages<'a>(&'a self, scene: &'a SceneGraph) -> impl Iterator<Item = &'a Page> + 'a {
        self.pages
            .iter()
            .filter(move |p| scene.get(p.node).is_some_and(|n| n.visible))
    }
}

/// Where book `slot` of `count` rests when nobody is reading it.
pub fn layout_transform(slot: BookSlot, count: usize, profile: DeviceProfile) -> Transform {
    let i = slot.0 as f32;
    let n = count.max(1) as f32;
    match profile {
        DeviceProfile::Desktop => {
            let angle = (i / n) * TAU;
            Transform::from_translation(Vec3::new(
                angle.cos() * SHELF_RADIUS,
                SHELF_HEIGHT,
                angle.sin() * SHELF_RADIUS,
            ))
            .with_rotation(Quat::from_rotation_y(-angle + FRAC_PI_2))
        }
        DeviceProfile::Mobile => {
            let top = STACK_CENTER_Y + ((n - 1.0) * STACK_SPACING) / 2.0;
            Transform::from_translation(Vec3::new(0.0, top - i * STACK_SPACING, 0.0))
                .with_rotation(mobile_rotation(0.0))
                .with_scale(Vec3::splat(MOBILE_BOOK_SCALE))
        }
    }
}

#[inline]
fn mobile_rotation(yaw: f32) -> Quat {
    Quat::from_euler(EulerRot::XYZ, MOBILE_BOOK_TILT, yaw, 0.0)
}

/// Stacked rest pose of a hidden page: flat against the block, one step per page.
pub fn page_rest_transform(index: usize) -> Transform {
    Transform::from_translation(Vec3::new(
        0.0,
        0.0,
        PAGE_BASE_Z + PAGE_STEP_Z * (index + 1) as f32,
    ))
}

/// Spawn the scene nodes for every catalog entry.
///
/// Missing images never change the shape of a book: every catalog page gets a
/// page node, with a placeholder material if its texture does not resolve.
pub fn build_books(
    scene: &mut SceneGraph,
    catalog: &Catalog,
    profile: DeviceProfile,
    resolver: &mut dyn AssetResolver,
) -> Result<Vec<BookInstance>, SceneError> {
    let mut cache = AssetCache::new();
    let count = catalog.len();
    let mut books = Vec::with_capacity(count);
    for (i, entry) in catalog.entries().iter().enumerate() {
        books.push(build_book(
            scene,
            &mut cache,
            &mut *resolver,
            entry,
            BookSlot(i),
            count,
            profile,
        )?);
    }
    Ok(books)
}

fn build_book(
    scene: &mut SceneGraph,
    cache: &mut AssetCache,
    resolver: &mut dyn AssetResolver,
    entry: &CatalogEntry,
    slot: BookSlot,
    count: usize,
    profile: DeviceProfile,
) -> Result<BookInstance, SceneError> {
    let root = scene.spawn(
        scene.root(),
        Node::group(format!("book-{}", entry.id))
            .with_transform(layout_transform(slot, count, profile))
            .with_tag(NodeTag::BookRoot(slot)),
    )?;

    let [r, g, b] = entry.spine_color;
    let cover = cache.material(resolver, &entry.cover, [r, g, b, 1.0]);

    let block = scene.spawn(
        root,
        Node::mesh(
            "block",
            Shape::Box {
                size: Vec3::new(COVER_WIDTH, COVER_HEIGHT, BOOK_THICKNESS),
            },
            Material::flat(BLOCK_COLOR),
        ),
    )?;
    let back_cover = scene.spawn(
        root,
        Node::mesh(
            "back-cover",
            Shape::Plane {
                width: COVER_WIDTH,
                height: COVER_HEIGHT,
            },
            cover.material,
        )
        .with_transform(
            Transform::from_translation(Vec3::new(0.0, 0.0, -BOOK_THICKNESS / 2.0 - COVER_GAP))
                .with_rotation(Quat::from_rotation_y(PI)),
        ),
    )?;
    let cover_pivot = scene.spawn(
        root,
        Node::group("cover-pivot")
            .with_transform(Transform::from_translation(Vec3::new(-COVER_WIDTH / 2.0, 0.0, 0.0))),
    )?;
    let front_cover = scene.spawn(
        cover_pivot,
        Node::mesh(
            "front-cover",
            Shape::Plane {
                width: COVER_WIDTH,
                height: COVER_HEIGHT,
            },
            cover.material,
        )
        .with_transform(Transform::from_translation(Vec3::new(
            COVER_WIDTH / 2.0,
            0.0,
            BOOK_THICKNESS / 2.0 + COVER_GAP,
        ))),
    )?;

    let mut pages = Vec::with_capacity(entry.page_count);
    for index in 0..entry.page_count {
        let resolved = match entry.page_path(index) {
            Some(path) => cache.material(resolver, path, PLACEHOLDER_PAGE_COLOR),
            None => ResolvedMaterial {
                material: Material::flat(PLACEHOLDER_PAGE_COLOR),
                placeholder: true,
            },
        };
        let node = scene.spawn(
            root,
            Node::mesh(
                format!("page-{index}"),
                Shape::Plane {
                    width: PAGE_WIDTH,
                    height: PAGE_HEIGHT,
                },
                resolved.material,
            )
            .with_transform(page_rest_transform(index))
            .with_tag(NodeTag::Page { slot, index })
            .hidden(),
        )?;
        pages.push(Page {
            index,
            node,
            side: PageSide::for_index(index),
            placeholder: resolved.placeholder,
        });
    }

    let (hit_proxy, hit_proxy_y_offset) = if profile.is_mobile() {
        let mut proxy = Node::mesh(
            format!("hit-proxy-{}", entry.id),
            Shape::Plane {
                width: HIT_PROXY_WIDTH,
                height: HIT_PROXY_HEIGHT,
            },
            Material::flat([0.0; 4]),
        )
        .with_tag(NodeTag::HitProxy(slot))
        .hidden();
        proxy.local.scale = HIT_PROXY_SCALE;
        let id = scene.spawn(scene.root(), proxy)?;
        let offset = (slot.0 as f32 - (count as f32 - 1.0) / 2.0) * HIT_PROXY_Y_STEP;
        (Some(id), offset)
    } else {
        (None, 0.0)
    };

    log::debug!(
        "[books] built {} ({} pages, {} placeholders)",
        entry.title,
        pages.len(),
        pages.iter().filter(|p| p.placeholder).count()
    );

    Ok(BookInstance {
        slot,
        root,
        block,
        front_cover,
        back_cover,
        cover_pivot,
        pages,
        hit_proxy,
        hit_proxy_y_offset,
        cover_placeholder: cover.placeholder,
        original: None,
        spread: 0,
        open: false,
        flip: None,
    })
}

/// Slow idle rotation for the mobile stack. `skip` is left alone (the book
/// being read).
pub fn spin_idle(scene: &mut SceneGraph, books: &[BookInstance], elapsed: Duration, skip: Option<BookSlot>) {
    let t = elapsed.as_secs_f32() * MOBILE_SPIN_RATE;
    for book in books.iter().filter(|b| Some(b.slot) != skip) {
        let yaw = book.slot.0 as f32 * MOBILE_SPIN_PHASE + t;
        if let Some(node) = scene.get_mut(book.root) {
            node.local.rotation = mobile_rotation(yaw);
        }
    }
}

/// Square a mobile book up to the reader, dropping whatever yaw the idle
/// spin left on it.
pub fn face_reader(scene: &mut SceneGraph, book: &BookInstance) {
    if let Some(node) = scene.get_mut(book.root) {
        node.local.rotation = mobile_rotation(0.0);
    }
}

/// Keep each hit-proxy in front of its book's front face, facing the camera.
pub fn update_hit_proxies(scene: &mut SceneGraph, books: &[BookInstance], camera: &Camera) {
    let facing = camera.orientation();
    for book in books {
        let Some(proxy) = book.hit_proxy else {
            continue;
        };
        let front = scene
            .world_matrix(book.root)
            .transform_point3(Vec3::new(0.0, 0.0, BOOK_THICKNESS / 2.0 + HIT_PROXY_FRONT_OFFSET));
        let to_cam = (camera.eye - front).try_normalize().unwrap_or(Vec3::Z);
        let pos = front + Vec3::new(0.0, book.hit_proxy_y_offset, 0.0) + to_cam * HIT_PROXY_NUDGE;
        scene.set_local(
            proxy,
            Transform::from_translation(pos)
                .with_rotation(facing)
                .with_scale(HIT_PROXY_SCALE),
        );
    }
}
