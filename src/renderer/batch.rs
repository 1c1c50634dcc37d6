//! Per-frame draw batch
//!
//! Every mesh is transformed to world space on the CPU and packed into two
//! vertex lists: filled triangles for the sun, edge lines for the wireframe
//! shapes. There is no depth buffer, so draws are ordered back to front by
//! distance from the camera.

use std::ops::Range;

use glam::{Mat4, Vec3};

use super::vertex::Vertex;
use crate::geometry::MeshLibrary;
use crate::settings::color_to_rgba;
use crate::sim::SceneGraph;

/// How a draw's vertices are assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Lines,
}

/// One object's slice of a vertex list
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub topology: Topology,
    pub vertices: Range<u32>,
    /// Distance from the camera eye to the object's center
    pub depth: f32,
}

/// Everything uploaded for one frame
#[derive(Debug, Clone, Default)]
pub struct DrawBatch {
    pub triangles: Vec<Vertex>,
    pub lines: Vec<Vertex>,
    /// Back to front
    pub draws: Vec<Draw>,
}

/// sRGB channel to linear, for an sRGB render target
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Packed color in the space the surface expects
pub fn surface_color(color: u32, srgb_target: bool) -> [f32; 4] {
    let [r, g, b, a] = color_to_rgba(color);
    if srgb_target {
        [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
    } else {
        [r, g, b, a]
    }
}

impl DrawBatch {
    /// Build the batch for the scene as seen from `eye`.
    ///
    /// `sun_triangles` is the sun mesh in local space, three corners per
    /// triangle (`Mesh::triangle_vertices`).
    pub fn build(
        scene: &SceneGraph,
        eye: Vec3,
        sun_triangles: &[Vec3],
        meshes: &MeshLibrary,
        srgb_target: bool,
    ) -> Self {
        let mut batch = Self::default();

        let sun_color = surface_color(scene.sun.color, srgb_target);
        let sun_model = Mat4::from_translation(scene.sun.position);
        let start = batch.triangles.len() as u32;
        batch.triangles.extend(
            sun_triangles
                .iter()
                .map(|&p| Vertex::new(sun_model.transform_point3(p), sun_color)),
        );
        batch.draws.push(Draw {
            topology: Topology::Triangles,
            vertices: start..batch.triangles.len() as u32,
            depth: eye.distance(scene.sun.position),
        });

        for shape in &scene.shapes {
            let mesh = meshes.mesh(shape.kind);
            let model = shape.model_matrix();
            let color = surface_color(shape.color, srgb_target);
            let start = batch.lines.len() as u32;
            for &[a, b] in meshes.edges(shape.kind) {
                for i in [a, b] {
                    let p = model.transform_point3(mesh.positions[i as usize]);
                    batch.lines.push(Vertex::new(p, color));
                }
            }
            batch.draws.push(Draw {
                topology: Topology::Lines,
                vertices: start..batch.lines.len() as u32,
                depth: eye.distance(shape.position),
            });
        }

        // Stable, so equal depths keep scene order
        batch.draws.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        batch
    }
}
