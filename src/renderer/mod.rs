//! WebGPU rendering module
//!
//! Flat-colored geometry: a filled sun and wireframe shapes, transformed on
//! the CPU each frame and projected by a camera uniform.

pub mod batch;
pub mod pipeline;
pub mod vertex;

pub use batch::{Draw, DrawBatch, Topology};
pub use pipeline::WireRenderState;
