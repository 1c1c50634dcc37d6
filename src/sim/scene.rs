//! Scene graph store
//!
//! Holds the sun, the light and the orbiting shapes. Created once at startup
//! from the settings table; the shape set never changes size afterwards.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::orbit::{OrbitingShape, advance_all};
use crate::settings::Settings;

/// The central body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sun {
    pub radius: f32,
    /// Packed 0xRRGGBB
    pub color: u32,
    pub position: Vec3,
}

/// Point light sitting in the sun.
///
/// Every material in the scene is unlit, so the light is carried for
/// completeness but does not change what is drawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointLight {
    pub color: u32,
    pub intensity: f32,
    /// Range beyond which the light has no effect (0 = infinite)
    pub distance: f32,
    pub position: Vec3,
}

/// Everything that is drawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneGraph {
    /// Seed for the initial orbit angles
    pub seed: u64,
    pub sun: Sun,
    pub light: PointLight,
    /// Orbiting shapes, in settings table order
    pub shapes: Vec<OrbitingShape>,
    /// Number of `advance` calls so far, whatever their `dt_frames`
    pub frame: u64,
}

impl SceneGraph {
    /// Build the scene, giving every shape a seeded random angle in [0, 2π)
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let shapes = settings
            .shapes
            .iter()
            .map(|spec| {
                let angle = rng.random_range(0.0..TAU);
                OrbitingShape::new(spec, angle, settings.spin_step)
            })
            .collect();

        Self {
            seed,
            sun: Sun {
                radius: settings.sun_radius,
                color: settings.sun_color,
                position: Vec3::ZERO,
            },
            light: PointLight {
                color: settings.light_color,
                intensity: settings.light_intensity,
                distance: settings.light_distance,
                position: Vec3::ZERO,
            },
            shapes,
            frame: 0,
        }
    }

    /// Advance every shape by `dt_frames` and count one tick
    pub fn advance(&mut self, dt_frames: f32) {
        advance_all(&mut self.shapes, dt_frames);
        self.frame += 1;
    }

    /// Look a shape up by display name
    pub fn find(&self, name: &str) -> Option<&OrbitingShape> {
        self.shapes.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_from_default_settings() {
        let scene = SceneGraph::new(&Settings::default(), 42);
        assert_eq!(scene.shapes.len(), 4);
        assert_eq!(scene.sun.radius, 0.7);
        assert_eq!(scene.sun.color, 0xffd700);
        assert_eq!(scene.light.position, Vec3::ZERO);
        assert_eq!(scene.light.intensity, 2.0);
        for shape in &scene.shapes {
            assert!((0.0..TAU).contains(&shape.angle));
        }
    }

    #[test]
    fn test_same_seed_same_angles() {
        let a = SceneGraph::new(&Settings::default(), 7);
        let b = SceneGraph::new(&Settings::default(), 7);
        let c = SceneGraph::new(&Settings::default(), 8);
        let angles = |s: &SceneGraph| s.shapes.iter().map(|x| x.angle).collect::<Vec<_>>();
        assert_eq!(angles(&a), angles(&b));
        assert_ne!(angles(&a), angles(&c));
    }

    #[test]
    fn test_advance_counts_frames() {
        let mut scene = SceneGraph::new(&Settings::default(), 1);
        let before = scene.find("Torus").unwrap().angle;
        for _ in 0..10 {
            scene.advance(1.0);
        }
        assert_eq!(scene.frame, 10);
        let after = scene.find("Torus").unwrap().angle;
        assert!((after - before - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_frame_counts_ticks_not_dt() {
        let mut scene = SceneGraph::new(&Settings::default(), 1);
        scene.advance(0.5);
        scene.advance(2.0);
        assert_eq!(scene.frame, 2);
    }

    #[test]
    fn test_find_missing() {
        let scene = SceneGraph::new(&Settings::default(), 1);
        assert!(scene.find("Pyramid").is_none());
    }
}
