// Host-side tests for renderer instance packing.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod mesh {
    include!("../src/mesh.rs");
}

use glam::{Mat4, Vec3};
use mesh::*;
use shelf_core::scene::{Material, Node, SceneGraph, Shape, Transform};

#[test]
fn cube_faces_wind_outward() {
    let verts = cube_vertices();
    assert_eq!(verts.len(), 36);
    for tri in verts.chunks(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| Vec3::from(v.position));
        let n = Vec3::from(tri[0].normal);
        assert!((b - a).cross(c - a).dot(n) > 0.0);
        assert!(a.dot(n) > 0.49);
    }
}

#[test]
fn batch_skips_hidden_and_shapeless_nodes() {
    let mut scene = SceneGraph::new();
    let group = scene
        .spawn(
            scene.root(),
            Node::group("g").with_transform(Transform::from_translation(Vec3::X)),
        )
        .unwrap();
    scene
        .spawn(
            group,
            Node::mesh(
                "plane",
                Shape::Plane {
                    width: 2.0,
                    height: 3.0,
                },
                Material::flat([1.0, 0.0, 0.0, 1.0]),
            ),
        )
        .unwrap();
    scene
        .spawn(
            group,
            Node::mesh(
                "box",
                Shape::Box {
                    size: Vec3::splat(0.5),
                },
                Material::default(),
            ),
        )
        .unwrap();
    scene
        .spawn(
            scene.root(),
            Node::mesh(
                "hidden",
                Shape::Plane {
                    width: 1.0,
                    height: 1.0,
                },
                Material::default(),
            )
            .hidden(),
        )
        .unwrap();

    let batch = InstanceBatch::collect(&scene);
    assert_eq!(batch.planes.len(), 1);
    assert_eq!(batch.boxes.len(), 1);
    let want = Mat4::from_translation(Vec3::X) * Mat4::from_scale(Vec3::new(2.0, 3.0, 1.0));
    assert!(Mat4::from_cols_array_2d(&batch.planes[0].model).abs_diff_eq(want, 1e-6));
    assert_eq!(batch.planes[0].color, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(
        batch.to_bytes().len(),
        2 * std::mem::size_of::<InstanceRaw>()
    );
}
