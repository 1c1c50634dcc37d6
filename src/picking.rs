//! Hover picking via ray casting
//!
//! A ray from the camera through the pointer is tested against every shape:
//! first its bounding sphere, then the actual mesh triangles in the shape's
//! local space. The nearest hit along the ray wins. Nothing is cached, since
//! both the camera and the shapes move between events.

use glam::{Vec2, Vec3};

use crate::Viewport;
use crate::camera::PerspectiveCamera;
use crate::geometry::MeshLibrary;
use crate::sim::OrbitingShape;

/// Triangles closer to parallel than this are skipped
const PARALLEL_EPS: f32 = 1e-8;

/// Half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the first sphere crossing in front of the origin.
    ///
    /// An origin inside the sphere counts as a hit at the exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let t0 = -b - sqrt_d;
        let t1 = -b + sqrt_d;
        if t0 >= 0.0 {
            Some(t0)
        } else if t1 >= 0.0 {
            Some(t1)
        } else {
            None
        }
    }

    /// Möller–Trumbore, both faces
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < PARALLEL_EPS {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(q) * inv_det;
        (t > 0.0).then_some(t)
    }
}

/// The shape under the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Index into the shape list
    pub index: usize,
    /// Shape display name
    pub name: String,
    /// Ray parameter (world units from the camera)
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

/// Nearest hit, or none
pub type HoverResult = Option<Hit>;

/// Pixel coordinates (origin top-left) to normalized device coordinates
#[inline]
pub fn pointer_to_ndc(pointer: Vec2, viewport: Viewport) -> Vec2 {
    let width = viewport.width.max(1) as f32;
    let height = viewport.height.max(1) as f32;
    Vec2::new(
        (pointer.x / width) * 2.0 - 1.0,
        -(pointer.y / height) * 2.0 + 1.0,
    )
}

/// Nearest intersection of `ray` with one shape's mesh
pub fn intersect_shape(ray: &Ray, shape: &OrbitingShape, meshes: &MeshLibrary) -> Option<f32> {
    ray.intersect_sphere(shape.position, meshes.bounding_radius(shape.kind))?;

    // Rigid transform: local distances equal world distances
    let inverse = shape.model_matrix().inverse();
    let local = Ray::new(
        inverse.transform_point3(ray.origin),
        inverse.transform_vector3(ray.direction),
    );

    meshes
        .mesh(shape.kind)
        .triangles()
        .filter_map(|[a, b, c]| local.intersect_triangle(a, b, c))
        .min_by(f32::total_cmp)
}

/// Nearest shape along an already-built ray
pub fn pick_ray(ray: &Ray, shapes: &[OrbitingShape], meshes: &MeshLibrary) -> HoverResult {
    let mut best: Option<(usize, f32)> = None;
    for (index, shape) in shapes.iter().enumerate() {
        if let Some(t) = intersect_shape(ray, shape, meshes) {
            if best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((index, t));
            }
        }
    }

    best.map(|(index, distance)| Hit {
        index,
        name: shapes[index].name.clone(),
        distance,
        point: ray.at(distance),
    })
}

/// Shape under a pointer given in pixels
pub fn pick(
    pointer: Vec2,
    viewport: Viewport,
    camera: &PerspectiveCamera,
    shapes: &[OrbitingShape],
    meshes: &MeshLibrary,
) -> HoverResult {
    if shapes.is_empty() {
        return None;
    }
    let ndc = pointer_to_ndc(pointer, viewport);
    let ray = camera.ray_from_ndc(ndc);
    pick_ray(&ray, shapes, meshes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Settings, ShapeKind, ShapeSpec};

    const VIEWPORT: Viewport = Viewport {
        width: 800,
        height: 600,
    };

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(&Settings::default(), 800.0 / 600.0)
    }

    fn shape_at(name: &str, kind: ShapeKind, position: Vec3) -> OrbitingShape {
        let spec = ShapeSpec::new(name, kind, 0xffffff, 1.0, 0.01);
        let mut shape = OrbitingShape::new(&spec, 0.0, 0.01);
        shape.position = position;
        shape
    }

    fn pixel_of(camera: &PerspectiveCamera, point: Vec3) -> Vec2 {
        let ndc = camera.project(point);
        Vec2::new(
            (ndc.x + 1.0) / 2.0 * VIEWPORT.width as f32,
            (1.0 - ndc.y) / 2.0 * VIEWPORT.height as f32,
        )
    }

    #[test]
    fn test_pointer_to_ndc_corners() {
        assert_eq!(pointer_to_ndc(Vec2::new(0.0, 0.0), VIEWPORT), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(Vec2::new(800.0, 600.0), VIEWPORT), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_to_ndc(Vec2::new(400.0, 300.0), VIEWPORT), Vec2::ZERO);
    }

    #[test]
    fn test_ray_sphere() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!((ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap() - 9.0).abs() < 1e-5);
        assert!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0).is_none());
        // Behind the origin
        assert!(ray.intersect_sphere(Vec3::new(0.0, 0.0, 20.0), 1.0).is_none());
    }

    #[test]
    fn test_ray_triangle_both_faces() {
        let (a, b, c) = (Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let front = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let back = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!((front.intersect_triangle(a, b, c).unwrap() - 5.0).abs() < 1e-5);
        assert!((back.intersect_triangle(a, b, c).unwrap() - 5.0).abs() < 1e-5);
        let miss = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(miss.intersect_triangle(a, b, c).is_none());
    }

    #[test]
    fn test_pick_shape_under_pointer() {
        let cam = camera();
        let meshes = MeshLibrary::new();
        let shapes = vec![
            shape_at("Cube", ShapeKind::Box, Vec3::new(2.0, 0.0, 0.0)),
            shape_at("Torus", ShapeKind::Torus, Vec3::new(-5.0, 0.0, 0.0)),
        ];
        let hit = pick(pixel_of(&cam, shapes[0].position), VIEWPORT, &cam, &shapes, &meshes).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.name, "Cube");
        assert!(hit.distance > 0.0);
    }

    #[test]
    fn test_pick_sphere_distance() {
        let cam = camera();
        let meshes = MeshLibrary::new();
        let shapes = vec![shape_at("Sphere", ShapeKind::Sphere, Vec3::ZERO)];
        let hit = pick(Vec2::new(400.0, 300.0), VIEWPORT, &cam, &shapes, &meshes).unwrap();
        let expected = cam.eye.length() - 0.5;
        assert!((hit.distance - expected).abs() < 0.02);
    }

    #[test]
    fn test_pick_nearest_wins_regardless_of_order() {
        let cam = camera();
        let meshes = MeshLibrary::new();
        let far = shape_at("Far", ShapeKind::Sphere, Vec3::ZERO);
        let near = shape_at("Near", ShapeKind::Sphere, cam.eye * 0.5);
        let center = Vec2::new(400.0, 300.0);

        let hit = pick(center, VIEWPORT, &cam, &[far.clone(), near.clone()], &meshes).unwrap();
        assert_eq!(hit.name, "Near");
        assert_eq!(hit.index, 1);

        let hit = pick(center, VIEWPORT, &cam, &[near, far], &meshes).unwrap();
        assert_eq!(hit.name, "Near");
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn test_pick_is_idempotent() {
        let cam = camera();
        let meshes = MeshLibrary::new();
        let shapes = vec![shape_at("Cone", ShapeKind::Cone, Vec3::new(0.0, 0.0, 4.0))];
        let pointer = pixel_of(&cam, shapes[0].position);
        let first = pick(pointer, VIEWPORT, &cam, &shapes, &meshes);
        let second = pick(pointer, VIEWPORT, &cam, &shapes, &meshes);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_pick_none_cases() {
        let cam = camera();
        let meshes = MeshLibrary::new();
        assert_eq!(pick(Vec2::new(400.0, 300.0), VIEWPORT, &cam, &[], &meshes), None);

        let shapes = vec![shape_at("Cube", ShapeKind::Box, Vec3::new(2.0, 0.0, 0.0))];
        assert_eq!(pick(Vec2::new(0.0, 0.0), VIEWPORT, &cam, &shapes, &meshes), None);
    }

    #[test]
    fn test_pick_through_torus_hole() {
        let meshes = MeshLibrary::new();
        // Torus lies in its local XY plane; look straight down its axis
        let mut cam = camera();
        cam.eye = Vec3::new(0.0, 0.0, 10.0);
        let shapes = vec![shape_at("Torus", ShapeKind::Torus, Vec3::ZERO)];
        assert_eq!(pick(Vec2::new(400.0, 300.0), VIEWPORT, &cam, &shapes, &meshes), None);
    }
}
