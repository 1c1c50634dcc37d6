//! Perspective camera and damped orbit controls

pub mod controls;
pub mod perspective;

pub use controls::{DragMode, OrbitControls};
pub use perspective::PerspectiveCamera;
