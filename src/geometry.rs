//! Indexed triangle meshes for the scene's shapes
//!
//! Vertex layout and triangulation follow the usual parametric construction
//! (box faces, latitude/longitude sphere, open-top cylinder for the cone,
//! tube-around-ring torus), all centered on the local origin. The same mesh
//! feeds the wireframe renderer and the hover picker, so what you see is what
//! you can hover.

use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::settings::ShapeKind;

/// Sphere tessellation used by both the sun and the Sphere shape
pub const SPHERE_SEGMENTS: (u32, u32) = (32, 32);
/// Cone radial segments
pub const CONE_SEGMENTS: u32 = 32;
/// Torus (radial, tubular) segments
pub const TORUS_SEGMENTS: (u32, u32) = (32, 64);

/// Indexed triangle mesh in local space
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    /// Triangle list, three indices per triangle
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Mesh for one of the orbiting shape kinds, at its default size
    pub fn for_kind(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Box => Self::cuboid(1.0, 1.0, 1.0),
            ShapeKind::Sphere => Self::sphere(0.5, SPHERE_SEGMENTS.0, SPHERE_SEGMENTS.1),
            ShapeKind::Cone => Self::cone(0.5, 1.0, CONE_SEGMENTS),
            ShapeKind::Torus => Self::torus(0.5, 0.2, TORUS_SEGMENTS.0, TORUS_SEGMENTS.1),
        }
    }

    /// Axis-aligned box, one quad (two triangles) per face
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let h = Vec3::new(width, height, depth) * 0.5;
        let mut mesh = Self::default();

        // (normal, u axis, v axis)
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        for (normal, u, v) in faces {
            let base = mesh.positions.len() as u32;
            let center = normal * h;
            let du = u * h;
            let dv = v * h;
            mesh.positions.push(center - du + dv);
            mesh.positions.push(center + du + dv);
            mesh.positions.push(center - du - dv);
            mesh.positions.push(center + du - dv);
            mesh.indices
                .extend_from_slice(&[base, base + 2, base + 1, base + 2, base + 3, base + 1]);
        }

        mesh
    }

    /// Latitude/longitude sphere with degenerate pole triangles dropped
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let mut mesh = Self::default();
        let mut grid = Vec::with_capacity(height_segments as usize + 1);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let mut row = Vec::with_capacity(width_segments as usize + 1);
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let x = -radius * (u * TAU).cos() * (v * PI).sin();
                let y = radius * (v * PI).cos();
                let z = radius * (u * TAU).sin() * (v * PI).sin();
                row.push(mesh.positions.len() as u32);
                mesh.positions.push(Vec3::new(x, y, z));
            }
            grid.push(row);
        }

        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];
                if iy != 0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments as usize - 1 {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        mesh
    }

    /// Cone with its apex at +height/2 and a closed base at -height/2
    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        let radial_segments = radial_segments.max(3);
        let half = height / 2.0;
        let mut mesh = Self::default();

        // Side: apex row then base row
        let apex_start = mesh.positions.len() as u32;
        mesh.positions.extend(std::iter::repeat_n(
            Vec3::new(0.0, half, 0.0),
            radial_segments as usize + 1,
        ));
        let ring_start = mesh.positions.len() as u32;
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            mesh.positions
                .push(Vec3::new(radius * theta.sin(), -half, radius * theta.cos()));
        }
        for x in 0..radial_segments {
            let apex = apex_start + x;
            let b = ring_start + x;
            let c = ring_start + x + 1;
            mesh.indices.extend_from_slice(&[apex, b, c]);
        }

        // Base cap
        let center = mesh.positions.len() as u32;
        mesh.positions.push(Vec3::new(0.0, -half, 0.0));
        for x in 0..radial_segments {
            mesh.indices
                .extend_from_slice(&[center, ring_start + x + 1, ring_start + x]);
        }

        mesh
    }

    /// Torus in the local XY plane (ring radius around Z, tube around the ring)
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial_segments = radial_segments.max(3);
        let tubular_segments = tubular_segments.max(3);
        let mut mesh = Self::default();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * TAU;
                let ring = radius + tube * v.cos();
                mesh.positions
                    .push(Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin()));
            }
        }

        let stride = tubular_segments + 1;
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = stride * j + i - 1;
                let b = stride * (j - 1) + i - 1;
                let c = stride * (j - 1) + i;
                let d = stride * j + i;
                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        mesh
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Triangle corners in draw order, three per triangle
    pub fn triangle_vertices(&self) -> Vec<Vec3> {
        self.triangles().flatten().collect()
    }

    /// Unique triangle edges, for wireframe drawing.
    ///
    /// Edges are deduplicated by index pair, so seams where vertices are
    /// duplicated (sphere/torus wrap) still draw once per distinct index.
    pub fn wireframe_edges(&self) -> Vec<[u32; 2]> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut edges = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.push([key.0, key.1]);
                }
            }
        }
        edges
    }

    /// Radius of the origin-centered sphere enclosing every vertex
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| p.length())
            .fold(0.0f32, f32::max)
    }
}

/// One mesh per shape kind, built once and shared by drawing and picking
#[derive(Debug, Clone)]
pub struct MeshLibrary {
    cuboid: Mesh,
    sphere: Mesh,
    cone: Mesh,
    torus: Mesh,
    radii: [f32; 4],
    /// Wireframe edges per kind, same order as `radii`
    edges: [Vec<[u32; 2]>; 4],
}

impl MeshLibrary {
    pub fn new() -> Self {
        let cuboid = Mesh::for_kind(ShapeKind::Box);
        let sphere = Mesh::for_kind(ShapeKind::Sphere);
        let cone = Mesh::for_kind(ShapeKind::Cone);
        let torus = Mesh::for_kind(ShapeKind::Torus);
        let radii = [
            cuboid.bounding_radius(),
            sphere.bounding_radius(),
            cone.bounding_radius(),
            torus.bounding_radius(),
        ];
        let edges = [
            cuboid.wireframe_edges(),
            sphere.wireframe_edges(),
            cone.wireframe_edges(),
            torus.wireframe_edges(),
        ];
        Self {
            cuboid,
            sphere,
            cone,
            torus,
            radii,
            edges,
        }
    }

    pub fn mesh(&self, kind: ShapeKind) -> &Mesh {
        match kind {
            ShapeKind::Box => &self.cuboid,
            ShapeKind::Sphere => &self.sphere,
            ShapeKind::Cone => &self.cone,
            ShapeKind::Torus => &self.torus,
        }
    }

    /// Cached `Mesh::bounding_radius` for a kind
    pub fn bounding_radius(&self, kind: ShapeKind) -> f32 {
        self.radii[Self::slot(kind)]
    }

    /// Cached `Mesh::wireframe_edges` for a kind
    pub fn edges(&self, kind: ShapeKind) -> &[[u32; 2]] {
        &self.edges[Self::slot(kind)]
    }

    fn slot(kind: ShapeKind) -> usize {
        match kind {
            ShapeKind::Box => 0,
            ShapeKind::Sphere => 1,
            ShapeKind::Cone => 2,
            ShapeKind::Torus => 3,
        }
    }
}

impl Default for MeshLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_counts() {
        let mesh = Mesh::cuboid(1.0, 1.0, 1.0);
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        // Every corner sits at distance sqrt(3)/2
        assert!((mesh.bounding_radius() - 3.0f32.sqrt() / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let mesh = Mesh::sphere(0.5, 32, 32);
        for p in &mesh.positions {
            assert!((p.length() - 0.5).abs() < 1e-5);
        }
        // Pole rows contribute one triangle per segment, others two
        assert_eq!(mesh.triangle_count(), 32 * 32 * 2 - 2 * 32);
    }

    #[test]
    fn test_cone_extent() {
        let mesh = Mesh::cone(0.5, 1.0, 32);
        let max_y = mesh.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let min_y = mesh.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert!((max_y - 0.5).abs() < 1e-6);
        assert!((min_y + 0.5).abs() < 1e-6);
        assert_eq!(mesh.triangle_count(), 64);
    }

    #[test]
    fn test_torus_bounds() {
        let mesh = Mesh::torus(0.5, 0.2, 32, 64);
        assert!((mesh.bounding_radius() - 0.7).abs() < 1e-5);
        assert_eq!(mesh.triangle_count(), 32 * 64 * 2);
        for p in &mesh.positions {
            assert!(p.z.abs() <= 0.2 + 1e-6);
        }
    }

    #[test]
    fn test_wireframe_edges_unique() {
        let mesh = Mesh::cuboid(1.0, 1.0, 1.0);
        let edges = mesh.wireframe_edges();
        // 4 border edges + 1 diagonal per face, faces share no vertices
        assert_eq!(edges.len(), 6 * 5);
        let unique: HashSet<_> = edges.iter().copied().collect();
        assert_eq!(unique.len(), edges.len());
    }

    #[test]
    fn test_library_radii_match_meshes() {
        let library = MeshLibrary::new();
        for kind in [ShapeKind::Box, ShapeKind::Sphere, ShapeKind::Cone, ShapeKind::Torus] {
            assert_eq!(library.bounding_radius(kind), library.mesh(kind).bounding_radius());
        }
        assert!((library.bounding_radius(ShapeKind::Sphere) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_library_edges_match_meshes() {
        let library = MeshLibrary::new();
        for kind in [ShapeKind::Box, ShapeKind::Sphere, ShapeKind::Cone, ShapeKind::Torus] {
            assert_eq!(library.edges(kind), library.mesh(kind).wireframe_edges().as_slice());
        }
    }

    #[test]
    fn test_triangle_vertices() {
        let mesh = Mesh::cuboid(1.0, 1.0, 1.0);
        let vertices = mesh.triangle_vertices();
        assert_eq!(vertices.len(), mesh.triangle_count() * 3);
        assert_eq!(vertices[0], mesh.positions[mesh.indices[0] as usize]);
    }
}
