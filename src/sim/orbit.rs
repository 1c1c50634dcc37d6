//! Orbit motion model
//!
//! Each shape carries its own angular state. The angle is authoritative:
//! position is always derived from it, never integrated separately, so a
//! shape cannot drift off its circle.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::settings::{ShapeKind, ShapeSpec};

/// A shape circling the sun in the XZ plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitingShape {
    /// Display name (tooltip text)
    pub name: String,
    pub kind: ShapeKind,
    /// Packed 0xRRGGBB
    pub color: u32,
    /// Orbit radius (> 0)
    pub orbit_radius: f32,
    /// Radians added to `angle` per frame
    pub angular_speed: f32,
    /// Orbit angle (radians, not wrapped)
    pub angle: f32,
    /// World position, derived from `angle`
    pub position: Vec3,
    /// Self-rotation (rx, ry), independent of the orbit
    pub rotation: Vec2,
    /// Radians added to rx and ry per frame
    pub spin_step: f32,
}

impl OrbitingShape {
    pub fn new(spec: &ShapeSpec, angle: f32, spin_step: f32) -> Self {
        let mut shape = Self {
            name: spec.name.clone(),
            kind: spec.kind,
            color: spec.color,
            orbit_radius: spec.orbit_radius,
            angular_speed: spec.angular_speed,
            angle,
            position: Vec3::ZERO,
            rotation: Vec2::ZERO,
            spin_step,
        };
        shape.position = shape.position_at(angle);
        shape
    }

    /// Position on the orbit for a given angle
    #[inline]
    pub fn position_at(&self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(self.orbit_radius * cos, 0.0, self.orbit_radius * sin)
    }

    /// Advance the orbit and the self-rotation by `dt_frames` frames.
    ///
    /// Spin is per frame, not per second: on a faster display everything
    /// turns faster.
    pub fn advance(&mut self, dt_frames: f32) {
        self.angle += self.angular_speed * dt_frames;
        self.position = self.position_at(self.angle);
        self.rotation += Vec2::splat(self.spin_step * dt_frames);
    }

    /// Local-to-world transform (translation × XYZ Euler rotation)
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0);
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// Advance every shape by the same number of frames, in table order
pub fn advance_all(shapes: &mut [OrbitingShape], dt_frames: f32) {
    for shape in shapes.iter_mut() {
        shape.advance(dt_frames);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cube(angle: f32) -> OrbitingShape {
        let spec = ShapeSpec::new("Cube", ShapeKind::Box, 0x44aa88, 2.0, 0.01);
        OrbitingShape::new(&spec, angle, 0.01)
    }

    #[test]
    fn test_new_places_shape_on_orbit() {
        let shape = cube(0.0);
        assert!((shape.position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(shape.rotation, Vec2::ZERO);
    }

    #[test]
    fn test_cube_after_100_frames() {
        let initial = 0.3;
        let mut shape = cube(initial);
        for _ in 0..100 {
            shape.advance(1.0);
        }

        assert!((shape.angle - (initial + 1.0)).abs() < 1e-4);
        let expected = Vec3::new(2.0 * (initial + 1.0).cos(), 0.0, 2.0 * (initial + 1.0).sin());
        assert!((shape.position - expected).length() < 1e-3);
        assert!((shape.rotation.x - 1.0).abs() < 1e-4);
        assert!((shape.rotation.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_advance_is_deterministic() {
        let mut a = cube(1.234);
        let mut b = cube(1.234);
        for _ in 0..500 {
            a.advance(1.0);
            b.advance(1.0);
        }
        assert_eq!(a.angle, b.angle);
        assert_eq!(a.position, b.position);
        assert_eq!(a.rotation, b.rotation);
    }

    #[test]
    fn test_fractional_frames() {
        let mut whole = cube(0.0);
        let mut halves = cube(0.0);
        whole.advance(1.0);
        halves.advance(0.5);
        halves.advance(0.5);
        assert!((whole.angle - halves.angle).abs() < 1e-7);
    }

    #[test]
    fn test_model_matrix_translation() {
        let mut shape = cube(0.5);
        shape.advance(3.0);
        let origin = shape.model_matrix().transform_point3(Vec3::ZERO);
        assert!((origin - shape.position).length() < 1e-6);
    }

    #[test]
    fn test_advance_all_keeps_table_order() {
        let specs = [
            ShapeSpec::new("A", ShapeKind::Box, 0, 1.0, 0.1),
            ShapeSpec::new("B", ShapeKind::Torus, 0, 2.0, 0.2),
        ];
        let mut shapes: Vec<_> = specs.iter().map(|s| OrbitingShape::new(s, 0.0, 0.01)).collect();
        advance_all(&mut shapes, 1.0);
        assert_eq!(shapes[0].name, "A");
        assert!((shapes[0].angle - 0.1).abs() < 1e-7);
        assert!((shapes[1].angle - 0.2).abs() < 1e-7);
    }

    proptest! {
        #[test]
        fn prop_angle_is_linear_in_frames(
            initial in 0.0f32..std::f32::consts::TAU,
            speed in 0.0f32..0.05,
            frames in 0u32..2000,
        ) {
            let spec = ShapeSpec::new("P", ShapeKind::Sphere, 0, 3.0, speed);
            let mut shape = OrbitingShape::new(&spec, initial, 0.01);
            for _ in 0..frames {
                shape.advance(1.0);
            }
            let expected = initial + frames as f32 * speed;
            prop_assert!((shape.angle - expected).abs() <= 1e-4 * (1.0 + expected.abs()));
        }

        #[test]
        fn prop_stays_on_circle(
            initial in 0.0f32..std::f32::consts::TAU,
            radius in 0.1f32..50.0,
            speed in -0.1f32..0.1,
            frames in 0u32..500,
        ) {
            let spec = ShapeSpec::new("P", ShapeKind::Cone, 0, radius, speed);
            let mut shape = OrbitingShape::new(&spec, initial, 0.01);
            for _ in 0..frames {
                shape.advance(1.0);
                let p = shape.position;
                prop_assert_eq!(p.y, 0.0);
                let r2 = p.x * p.x + p.z * p.z;
                prop_assert!((r2 - radius * radius).abs() <= radius * radius * 1e-4);
            }
        }
    }
}
