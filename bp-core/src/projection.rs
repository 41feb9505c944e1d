//! The fixed perspective projection of the viewer.

use glam::Mat4;

/// Vertical field of view in degrees.
pub const FOV_Y: f32 = 45.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Width over height. A zero height (minimized window) is treated as one pixel.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Builds the projection matrix for a viewport of `width` by `height` pixels.
pub fn perspective(width: u32, height: u32) -> Mat4 {
    Mat4::perspective_rh_gl(
        FOV_Y.to_radians(),
        aspect_ratio(width, height),
        NEAR_PLANE,
        FAR_PLANE,
    )
}
