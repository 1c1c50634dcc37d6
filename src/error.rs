//! Crate-level error types.

use std::fmt;

/// Errors produced while setting up or configuring the scene.
///
/// Everything here is a startup failure. Per-frame render errors stay as
/// `wgpu::SurfaceError` and are handled by the host loop.
#[derive(Debug)]
pub enum SceneError {
    /// Missing window, document, canvas or other host element.
    Dom(String),
    /// The canvas could not back a wgpu surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter compatible with the surface.
    Adapter(wgpu::RequestAdapterError),
    /// Device creation failed.
    Device(wgpu::RequestDeviceError),
    /// Settings JSON did not parse.
    Settings(serde_json::Error),
    /// Settings parsed but are unusable.
    InvalidSettings(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dom(msg) => write!(f, "host environment error: {msg}"),
            Self::Surface(e) => write!(f, "failed to create surface: {e}"),
            Self::Adapter(e) => write!(f, "no suitable GPU adapter: {e}"),
            Self::Device(e) => write!(f, "failed to create GPU device: {e}"),
            Self::Settings(e) => write!(f, "settings parse error: {e}"),
            Self::InvalidSettings(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::Adapter(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::Settings(e) => Some(e),
            Self::Dom(_) | Self::InvalidSettings(_) => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for SceneError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        Self::Surface(e)
    }
}

impl From<wgpu::RequestAdapterError> for SceneError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        Self::Adapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for SceneError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Self::Device(e)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        Self::Settings(e)
    }
}
