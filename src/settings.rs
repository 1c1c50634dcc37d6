//! Scene settings
//!
//! The fixed in-code configuration table: which shapes orbit, how fast, and
//! how the sun, light, camera, controls and tooltip are set up. `Default` is
//! the shipped scene; `from_json` allows an override for tests and tooling.

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Geometry of an orbiting shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Unit box
    Box,
    /// Sphere, radius 0.5
    Sphere,
    /// Cone, radius 0.5, height 1
    Cone,
    /// Torus, radius 0.5, tube 0.2
    Torus,
}

/// One row of the shape table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    /// Display name shown in the tooltip
    pub name: String,
    pub kind: ShapeKind,
    /// Packed 0xRRGGBB
    pub color: u32,
    /// Distance from the sun
    pub orbit_radius: f32,
    /// Radians per frame
    pub angular_speed: f32,
}

impl ShapeSpec {
    pub fn new(name: &str, kind: ShapeKind, color: u32, orbit_radius: f32, angular_speed: f32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            color,
            orbit_radius,
            angular_speed,
        }
    }
}

/// Scene settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Shapes ===
    pub shapes: Vec<ShapeSpec>,
    /// Self-rotation added to rx and ry every frame (radians)
    pub spin_step: f32,

    // === Sun & light ===
    pub sun_radius: f32,
    pub sun_color: u32,
    pub light_color: u32,
    pub light_intensity: f32,
    pub light_distance: f32,

    // === Camera ===
    /// Vertical field of view (degrees)
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: [f32; 3],

    // === Controls ===
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    // === Tooltip ===
    /// Pixel offset from the pointer to the tooltip's top-left corner
    pub tooltip_offset: f32,

    // === Native ===
    /// Frames simulated by the headless native run
    pub headless_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shapes: vec![
                ShapeSpec::new("Cube", ShapeKind::Box, 0x44aa88, 2.0, 0.01),
                ShapeSpec::new("Sphere", ShapeKind::Sphere, 0xaa8844, 3.0, 0.008),
                ShapeSpec::new("Cone", ShapeKind::Cone, 0x8844aa, 4.0, 0.006),
                ShapeSpec::new("Torus", ShapeKind::Torus, 0xaa4444, 5.0, 0.005),
            ],
            spin_step: 0.01,

            sun_radius: 0.7,
            sun_color: 0xffd700,
            light_color: 0xffffff,
            light_intensity: 2.0,
            light_distance: 100.0,

            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_position: [0.0, 6.0, 10.0],

            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: 500.0,

            tooltip_offset: 10.0,

            headless_frames: 100,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject tables the motion model and picker cannot work with
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.shapes.is_empty() {
            return Err(SceneError::InvalidSettings("shape table is empty".into()));
        }
        for spec in &self.shapes {
            if spec.name.trim().is_empty() {
                return Err(SceneError::InvalidSettings("shape name is empty".into()));
            }
            if !(spec.orbit_radius.is_finite() && spec.orbit_radius > 0.0) {
                return Err(SceneError::InvalidSettings(format!(
                    "{}: orbit radius must be positive, got {}",
                    spec.name, spec.orbit_radius
                )));
            }
            if !spec.angular_speed.is_finite() {
                return Err(SceneError::InvalidSettings(format!(
                    "{}: angular speed is not finite",
                    spec.name
                )));
            }
        }
        if !(self.sun_radius.is_finite() && self.sun_radius > 0.0) {
            return Err(SceneError::InvalidSettings(format!(
                "sun radius must be positive, got {}",
                self.sun_radius
            )));
        }
        for (field, value) in [
            ("spin_step", self.spin_step),
            ("light_intensity", self.light_intensity),
            ("light_distance", self.light_distance),
            ("rotate_speed", self.rotate_speed),
            ("zoom_speed", self.zoom_speed),
            ("pan_speed", self.pan_speed),
            ("tooltip_offset", self.tooltip_offset),
        ] {
            if !value.is_finite() {
                return Err(SceneError::InvalidSettings(format!(
                    "{field} is not finite"
                )));
            }
        }
        if self.camera_position.iter().any(|c| !c.is_finite()) {
            return Err(SceneError::InvalidSettings("camera position is not finite".into()));
        }
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(SceneError::InvalidSettings(format!(
                "fov must be in (0, 180), got {}",
                self.fov_deg
            )));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(SceneError::InvalidSettings("near/far planes out of order".into()));
        }
        if !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(SceneError::InvalidSettings(format!(
                "damping factor must be in [0, 1], got {}",
                self.damping_factor
            )));
        }
        if !(self.min_distance >= 0.0 && self.max_distance >= self.min_distance) {
            return Err(SceneError::InvalidSettings(format!(
                "zoom range [{}, {}] is invalid",
                self.min_distance, self.max_distance
            )));
        }
        Ok(())
    }
}

/// Split a packed 0xRRGGBB color into sRGB RGBA floats
pub fn color_to_rgba(color: u32) -> [f32; 4] {
    let r = ((color >> 16) & 0xff) as f32 / 255.0;
    let g = ((color >> 8) & 0xff) as f32 / 255.0;
    let b = (color & 0xff) as f32 / 255.0;
    [r, g, b, 1.0]
}
