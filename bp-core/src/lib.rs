//! The core of the Baseplate viewer. This crate contains everything that does not
//! need a window or a GL context: the first person camera and its toy physics, the
//! static scene description, input snapshots, the projection and the viewer
//! configuration.
//!
//! The client crate drives these types once per frame and only forwards the
//! results to the GPU.

pub mod camera;
pub mod config;
pub mod input;
pub mod projection;
pub mod scene;

pub use camera::Camera;
pub use config::ViewerConfig;
pub use input::{FrameTiming, InputSnapshot, Key, KeyboardState, PointerTracker};
pub use scene::{SceneDescription, ShapeMesh, ShapeVertex, SlopeStyle};

/// Float comparison helper shared by the unit tests of this crate.
#[cfg(test)]
pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-4
}
