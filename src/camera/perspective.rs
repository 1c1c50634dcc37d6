//! Perspective camera
//!
//! Right-handed view and projection matrices with wgpu's depth range, plus
//! the unprojection the hover picker uses to turn NDC into a world ray.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::picking::Ray;
use crate::settings::Settings;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl PerspectiveCamera {
    /// Camera from the scene settings, looking at the origin
    pub fn new(settings: &Settings, aspect: f32) -> Self {
        Self {
            eye: Vec3::from_array(settings.camera_position),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: settings.fov_deg,
            znear: settings.near,
            zfar: settings.far,
        }
    }

    /// Update the aspect ratio from a viewport size in pixels
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection with wgpu's [0, 1] depth range
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy.to_radians(), self.aspect, self.znear, self.zfar)
    }

    /// Build the combined view-projection matrix.
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from eye toward target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// Camera-space X axis in world space
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    /// Camera-space Y axis in world space
    pub fn camera_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Ray from the eye through a point in normalized device coordinates.
    ///
    /// The far-plane point is unprojected through the inverse
    /// view-projection; the ray starts at the eye so hit distances are
    /// measured from the camera.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv_view_proj = self.view_proj().inverse();
        let far = inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far = far.truncate() / far.w;
        Ray::new(self.eye, far - self.eye)
    }

    /// Project a world point to NDC (x, y) and depth
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_proj().project_point3(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(&Settings::default(), 16.0 / 9.0)
    }

    #[test]
    fn test_defaults_from_settings() {
        let cam = camera();
        assert_eq!(cam.eye, Vec3::new(0.0, 6.0, 10.0));
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.fovy, 75.0);
        assert_eq!(cam.znear, 0.1);
        assert_eq!(cam.zfar, 1000.0);
    }

    #[test]
    fn test_set_viewport_aspect_exact() {
        let mut cam = camera();
        cam.set_viewport(1280, 720);
        assert_eq!(cam.aspect, 1280.0 / 720.0);
        cam.set_viewport(300, 0);
        assert_eq!(cam.aspect, 300.0);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, cam.eye);
        assert!((ray.direction - cam.forward()).length() < 1e-4);
    }

    #[test]
    fn test_ray_hits_projected_point() {
        let cam = camera();
        let point = Vec3::new(2.0, 0.5, -1.0);
        let ndc = cam.project(point);
        let ray = cam.ray_from_ndc(ndc.truncate());
        let to_point = (point - cam.eye).normalize();
        assert!((ray.direction - to_point).length() < 1e-3);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let cam = camera();
        let (f, r, u) = (cam.forward(), cam.right(), cam.camera_up());
        assert!(f.dot(r).abs() < 1e-6);
        assert!(f.dot(u).abs() < 1e-6);
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!(u.y > 0.0);
    }
}
