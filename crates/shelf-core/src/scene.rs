//! Minimal retained scene graph.
//!
//! Nodes live in an arena indexed by [`NodeId`]; slot 0 is the root. Each node
//! carries a local [`Transform`], a visibility flag, an optional drawable
//! [`Shape`] and a [`NodeTag`] that links it back to the book model.

use crate::assets::TextureHandle;
use crate::book::BookSlot;
use crate::error::SceneError;
use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn from_matrix(m: Mat4) -> Self {
        let (scale, rotation, translation) = m.to_scale_rotation_translation();
        Self {
            translation,
            rotation: rotation.normalize(),
            scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Drawable/pickable geometry in node-local space, centered on the origin.
/// Planes lie in the local XY plane facing +Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    None,
    Plane { width: f32, height: f32 },
    Box { size: Vec3 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 4],
    pub texture: Option<TextureHandle>,
}

impl Material {
    pub const fn flat(color: [f32; 4]) -> Self {
        Self {
            color,
            texture: None,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::flat([1.0; 4])
    }
}

/// Back-reference from a scene node to the book model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NodeTag {
    #[default]
    None,
    BookRoot(BookSlot),
    /// Oversized invisible tap target owned by a book but parented to the root.
    HitProxy(BookSlot),
    Page { slot: BookSlot, index: usize },
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub local: Transform,
    pub visible: bool,
    pub shape: Shape,
    pub material: Material,
    pub pickable: bool,
    pub tag: NodeTag,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl Node {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Transform::IDENTITY,
            visible: true,
            shape: Shape::None,
            material: Material::default(),
            pickable: false,
            tag: NodeTag::None,
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn mesh(name: impl Into<String>, shape: Shape, material: Material) -> Self {
        Self {
            shape,
            material,
            pickable: true,
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, local: Transform) -> Self {
        self.local = local;
        self
    }

    pub fn with_tag(mut self, tag: NodeTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<Option<Node>>,
    free: Vec<u32>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::group("root"))],
            free: Vec::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.get_mut(id).ok_or(SceneError::MissingNode(id))
    }

    /// Insert `node` as the last child of `parent`.
    pub fn spawn(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::MissingNode(parent));
        }
        node.parent = Some(parent);
        node.children.clear();
        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot as usize] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId((self.nodes.len() - 1) as u32)
            }
        };
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Remove `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), SceneError> {
        if id == NodeId::ROOT {
            return Err(SceneError::Root);
        }
        let parent = self.get(id).ok_or(SceneError::MissingNode(id))?.parent;
        if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(n.index()).and_then(Option::take) {
                stack.extend(node.children.iter().copied());
                self.free.push(n.0);
            }
        }
        Ok(())
    }

    /// Walk from `id` up to the root, starting with `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cur = self.contains(id).then_some(id);
        std::iter::from_fn(move || {
            let here = cur?;
            cur = self.get(here).and_then(|n| n.parent);
            Some(here)
        })
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        for n in self.ancestors(id) {
            if let Some(node) = self.get(n) {
                m = node.local.to_matrix() * m;
            }
        }
        m
    }

    pub fn world_transform(&self, id: NodeId) -> Transform {
        Transform::from_matrix(self.world_matrix(id))
    }

    /// A node is drawn only if it and every ancestor are visible.
    pub fn is_visible_in_world(&self, id: NodeId) -> bool {
        self.contains(id)
            && self
                .ancestors(id)
                .all(|n| self.get(n).is_some_and(|node| node.visible))
    }

    fn check_reparent(&self, child: NodeId, parent: NodeId) -> Result<(), SceneError> {
        if child == NodeId::ROOT {
            return Err(SceneError::Root);
        }
        if !self.contains(child) {
            return Err(SceneError::MissingNode(child));
        }
        if !self.contains(parent) {
            return Err(SceneError::MissingNode(parent));
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(SceneError::Cycle { child, parent });
        }
        Ok(())
    }

    fn relink(&mut self, child: NodeId, parent: NodeId) -> Result<(), SceneError> {
        let old = self.node_mut(child)?.parent.replace(parent);
        if let Some(p) = old.and_then(|p| self.get_mut(p)) {
            p.children.retain(|c| *c != child);
        }
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Move `child` under `parent`, keeping its local transform.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), SceneError> {
        self.check_reparent(child, parent)?;
        self.relink(child, parent)
    }

    /// Move `child` under `parent`, rewriting its local transform so its
    /// world transform is unchanged.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), SceneError> {
        self.check_reparent(child, parent)?;
        let world = self.world_matrix(child);
        let parent_inv = self.world_matrix(parent).inverse();
        self.relink(child, parent)?;
        self.node_mut(child)?.local = Transform::from_matrix(parent_inv * world);
        Ok(())
    }

    pub fn set_local(&mut self, id: NodeId, local: Transform) {
        if let Some(n) = self.get_mut(id) {
            n.local = local;
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.get_mut(id) {
            n.visible = visible;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    /// Visible nodes with geometry, paired with their world matrix.
    pub fn drawables(&self) -> impl Iterator<Item = (NodeId, Mat4, &Node)> {
        self.iter().filter_map(move |(id, n)| {
            (!matches!(n.shape, Shape::None) && self.is_visible_in_world(id))
                .then(|| (id, self.world_matrix(id), n))
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        // the root always exists
        false
    }
}
