//! Deterministic scene simulation
//!
//! Orbit motion and the scene store live here. This module must be pure and
//! deterministic:
//! - Per-frame steps only (no wall clock)
//! - Seeded RNG only, used once for the initial angles
//! - Stable iteration order (shape table order)
//! - No rendering or platform dependencies

pub mod orbit;
pub mod scene;

pub use orbit::{OrbitingShape, advance_all};
pub use scene::{PointLight, SceneGraph, Sun};
