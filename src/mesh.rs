use glam::{Mat4, Vec3};
use shelf_core::scene::{SceneGraph, Shape};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    pub fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
        }
    }
}

/// Unit quad in the XY plane facing +Z, two triangles.
pub const QUAD_VERTICES: [Vertex; 6] = {
    const N: [f32; 3] = [0.0, 0.0, 1.0];
    [
        Vertex { position: [-0.5, -0.5, 0.0], normal: N },
        Vertex { position: [0.5, -0.5, 0.0], normal: N },
        Vertex { position: [0.5, 0.5, 0.0], normal: N },
        Vertex { position: [-0.5, -0.5, 0.0], normal: N },
        Vertex { position: [0.5, 0.5, 0.0], normal: N },
        Vertex { position: [-0.5, 0.5, 0.0], normal: N },
    ]
};

/// Unit cube centered on the origin, 36 vertices with flat normals.
pub fn cube_vertices() -> Vec<Vertex> {
    let faces = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    let mut out = Vec::with_capacity(36);
    for n in faces {
        // u x v == n, so every face winds counter-clockwise seen from outside
        let u = if n.x.abs() > 0.5 { Vec3::Y } else { Vec3::X };
        let v = n.cross(u);
        let c = n * 0.5;
        let corner = |a: f32, b: f32| Vertex {
            position: (c + u * a + v * b).to_array(),
            normal: n.to_array(),
        };
        out.extend_from_slice(&[
            corner(-0.5, -0.5),
            corner(0.5, -0.5),
            corner(0.5, 0.5),
            corner(-0.5, -0.5),
            corner(0.5, 0.5),
            corner(-0.5, 0.5),
        ]);
    }
    out
}

/// Per-frame instance data, planes first then boxes.
#[derive(Default, Debug)]
pub struct InstanceBatch {
    pub planes: Vec<InstanceRaw>,
    pub boxes: Vec<InstanceRaw>,
}

impl InstanceBatch {
    pub fn collect(scene: &SceneGraph) -> Self {
        let mut batch = Self::default();
        batch.fill(scene);
        batch
    }

    /// Refill from the scene, keeping allocations.
    pub fn fill(&mut self, scene: &SceneGraph) {
        self.planes.clear();
        self.boxes.clear();
        for (_, world, node) in scene.drawables() {
            let color = node.material.color;
            match node.shape {
                Shape::Plane { width, height } => self.planes.push(InstanceRaw::new(
                    world * Mat4::from_scale(Vec3::new(width, height, 1.0)),
                    color,
                )),
                Shape::Box { size } => self
                    .boxes
                    .push(InstanceRaw::new(world * Mat4::from_scale(size), color)),
                Shape::None => {}
            }
        }
    }

    pub fn len(&self) -> usize {
        self.planes.len() + self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Contiguous upload order matching the draw ranges.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len() * std::mem::size_of::<InstanceRaw>());
        bytes.extend_from_slice(bytemuck::cast_slice(&self.planes));
        bytes.extend_from_slice(bytemuck::cast_slice(&self.boxes));
        bytes
    }
}
