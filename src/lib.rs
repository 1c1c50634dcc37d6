//! Wire Orrery - wireframe shapes orbiting a sun, with hover tooltips
//!
//! Core modules:
//! - `sim`: Deterministic orbit motion and the scene store
//! - `picking`: Ray casting from the pointer to the nearest shape
//! - `camera`: Perspective camera and damped orbit controls
//! - `frame`: Controllable per-refresh frame driver
//! - `app`: Scene context tying the pieces together for event handlers
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: In-code scene configuration table

pub mod app;
pub mod camera;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod picking;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tooltip;

pub use app::SceneContext;
pub use error::SceneError;
pub use frame::{FrameDriver, FrameOutcome, FrameState};
pub use settings::{Settings, ShapeKind, ShapeSpec};

/// Scene configuration constants
pub mod consts {
    /// Frames advanced per display refresh
    pub const FRAME_STEP: f32 = 1.0;
    /// Device pixel ratio cap for the render surface
    pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;
}

/// Drawing surface size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport with both sides at least one pixel
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width / height
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Render surface size in device pixels for a device pixel ratio.
    ///
    /// The ratio is capped at `MAX_DEVICE_PIXEL_RATIO`; a missing or bogus
    /// ratio counts as 1. Both sides are at least one pixel.
    pub fn surface_size(&self, device_pixel_ratio: f64) -> (u32, u32) {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(consts::MAX_DEVICE_PIXEL_RATIO)
        } else {
            1.0
        };
        let scale = |side: u32| ((side as f64 * dpr) as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}
