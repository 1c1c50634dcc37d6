//! Damped orbit controls
//!
//! Pointer drags and wheel steps accumulate into pending deltas; `update()`
//! applies a fraction of them once per frame and decays the rest, which is
//! what gives the camera its inertia after the user lets go.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::perspective::PerspectiveCamera;
use crate::settings::Settings;

/// Keeps the camera off the poles, where the up vector degenerates
const POLAR_EPS: f32 = 1e-6;
/// Movement below this is reported as "not moved"
const MOVE_EPS: f32 = 1e-4;
/// Base per-step dolly factor, raised to `zoom_speed`
const ZOOM_BASE: f32 = 0.95;

/// What an active drag does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Left button: orbit around the target
    Rotate,
    /// Right/middle button: move the target in the view plane
    Pan,
}

impl DragMode {
    /// Map a DOM mouse button index to a drag mode
    pub fn from_button(button: i16) -> Option<Self> {
        match button {
            0 => Some(DragMode::Rotate),
            1 | 2 => Some(DragMode::Pan),
            _ => None,
        }
    }
}

/// Orbit camera around a target with optional inertial damping
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Pending (theta, phi) rotation
    spherical_delta: Vec2,
    /// Pending dolly factor (1 = none)
    scale: f32,
    /// Pending target translation
    pan_offset: Vec3,

    drag: Option<DragMode>,
    last_pointer: Vec2,
}

impl OrbitControls {
    pub fn new(settings: &Settings) -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: settings.enable_damping,
            damping_factor: settings.damping_factor,
            rotate_speed: settings.rotate_speed,
            zoom_speed: settings.zoom_speed,
            pan_speed: settings.pan_speed,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            spherical_delta: Vec2::ZERO,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            drag: None,
            last_pointer: Vec2::ZERO,
        }
    }

    /// Current drag, if a button is held
    pub fn drag(&self) -> Option<DragMode> {
        self.drag
    }

    pub fn pointer_down(&mut self, mode: DragMode, x: f32, y: f32) {
        self.drag = Some(mode);
        self.last_pointer = Vec2::new(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Feed a pointer move while dragging.
    ///
    /// `viewport_height` is in the same units as `x`/`y`; a drag across the
    /// full height rotates by one full turn.
    pub fn pointer_move(&mut self, x: f32, y: f32, camera: &PerspectiveCamera, viewport_height: f32) {
        let Some(mode) = self.drag else {
            return;
        };
        let pos = Vec2::new(x, y);
        let delta = pos - self.last_pointer;
        self.last_pointer = pos;
        let height = viewport_height.max(1.0);

        match mode {
            DragMode::Rotate => {
                let delta = delta * self.rotate_speed;
                self.rotate_left(TAU * delta.x / height);
                self.rotate_up(TAU * delta.y / height);
            }
            DragMode::Pan => {
                let delta = delta * self.pan_speed;
                self.pan(delta, camera, height);
            }
        }
    }

    /// Wheel step; negative `delta_y` zooms in
    pub fn wheel(&mut self, delta_y: f32) {
        let zoom_scale = ZOOM_BASE.powf(self.zoom_speed);
        if delta_y < 0.0 {
            self.scale *= zoom_scale;
        } else if delta_y > 0.0 {
            self.scale /= zoom_scale;
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.x -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.y -= angle;
    }

    /// Screen-space pan, scaled so the point under the target tracks the pointer
    fn pan(&mut self, delta: Vec2, camera: &PerspectiveCamera, height: f32) {
        let target_distance =
            (camera.eye - self.target).length() * (camera.fovy.to_radians() / 2.0).tan();
        let left = -2.0 * delta.x * target_distance / height;
        let up = 2.0 * delta.y * target_distance / height;
        self.pan_offset += camera.right() * left + camera.camera_up() * up;
    }

    /// Whether any input is still waiting to be applied
    pub fn has_pending_motion(&self) -> bool {
        self.spherical_delta.length_squared() > MOVE_EPS * MOVE_EPS
            || (self.scale - 1.0).abs() > MOVE_EPS
            || self.pan_offset.length_squared() > MOVE_EPS * MOVE_EPS
    }

    /// Apply pending input to the camera; returns whether the camera moved
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.eye - self.target;
        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        theta += self.spherical_delta.x * factor;
        phi += self.spherical_delta.y * factor;
        phi = phi.clamp(POLAR_EPS, PI - POLAR_EPS);

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * factor;

        let sin_phi_radius = phi.sin() * radius;
        let offset = Vec3::new(
            sin_phi_radius * theta.sin(),
            phi.cos() * radius,
            sin_phi_radius * theta.cos(),
        );

        let old_eye = camera.eye;
        let old_target = camera.target;
        camera.eye = self.target + offset;
        camera.target = self.target;

        if self.enable_damping {
            self.spherical_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        (camera.eye - old_eye).length_squared() > MOVE_EPS * MOVE_EPS
            || (camera.target - old_target).length_squared() > MOVE_EPS * MOVE_EPS
    }
}
