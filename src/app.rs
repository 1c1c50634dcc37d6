//! Scene context
//!
//! Everything the event handlers and the frame driver share, owned in one
//! place and passed explicitly. The web host keeps it behind an
//! `Rc<RefCell<_>>`; tests and the native host own it directly.

use glam::Vec2;

use crate::Viewport;
use crate::camera::{DragMode, OrbitControls, PerspectiveCamera};
use crate::error::SceneError;
use crate::geometry::MeshLibrary;
use crate::picking::{self, HoverResult};
use crate::settings::Settings;
use crate::sim::SceneGraph;
use crate::tooltip::Tooltip;

pub struct SceneContext {
    pub settings: Settings,
    pub scene: SceneGraph,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub meshes: MeshLibrary,
    pub tooltip: Tooltip,
    pub viewport: Viewport,
    /// Index of the shape under the pointer after the last hover
    hovered: Option<usize>,
}

impl SceneContext {
    /// Build the scene from validated settings
    pub fn new(settings: Settings, viewport: Viewport, seed: u64) -> Result<Self, SceneError> {
        settings.validate()?;
        let viewport = Viewport::new(viewport.width, viewport.height);
        let scene = SceneGraph::new(&settings, seed);
        let mut camera = PerspectiveCamera::new(&settings, viewport.aspect());
        let mut controls = OrbitControls::new(&settings);
        // Settle the camera onto the controls' sphere before the first frame
        controls.update(&mut camera);

        log::info!(
            "Scene ready: {} shapes, seed {}, viewport {}x{}",
            scene.shapes.len(),
            seed,
            viewport.width,
            viewport.height
        );

        Ok(Self {
            tooltip: Tooltip::new(settings.tooltip_offset),
            settings,
            scene,
            camera,
            controls,
            meshes: MeshLibrary::new(),
            viewport,
            hovered: None,
        })
    }

    /// Track a new viewport size; the host resizes the render surface
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_viewport(self.viewport.width, self.viewport.height);
        log::debug!("Resized to {}x{}", self.viewport.width, self.viewport.height);
    }

    /// Pick the shape under the pointer and update the tooltip
    pub fn pointer_move(&mut self, pointer: Vec2) -> HoverResult {
        let hit = picking::pick(
            pointer,
            self.viewport,
            &self.camera,
            &self.scene.shapes,
            &self.meshes,
        );

        let index = hit.as_ref().map(|h| h.index);
        if index != self.hovered {
            match &hit {
                Some(h) => log::debug!("Hovering {} at {:.2}", h.name, h.distance),
                None => log::debug!("Hover cleared"),
            }
            self.hovered = index;
        }

        self.tooltip.present(&hit, pointer);
        hit
    }

    /// Start a camera drag for a DOM mouse button; unknown buttons are ignored
    pub fn pointer_down(&mut self, button: i16, pointer: Vec2) {
        if let Some(mode) = DragMode::from_button(button) {
            self.controls.pointer_down(mode, pointer.x, pointer.y);
        }
    }

    pub fn pointer_up(&mut self) {
        self.controls.pointer_up();
    }

    /// Feed a pointer move to an active camera drag
    pub fn drag(&mut self, pointer: Vec2) {
        self.controls.pointer_move(
            pointer.x,
            pointer.y,
            &self.camera,
            self.viewport.height as f32,
        );
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.controls.wheel(delta_y);
    }

    /// One frame of motion: every shape first, then the camera controls.
    ///
    /// Returns whether the camera moved.
    pub fn advance_frame(&mut self, dt_frames: f32) -> bool {
        self.scene.advance(dt_frames);
        self.controls.update(&mut self.camera)
    }
}
