//! Thin wrappers over SDL2 and OpenGL: the window and GL context, shader
//! programs and GPU meshes.

pub mod app;
pub mod mesh;
pub mod shader;

pub use app::*;
pub use mesh::*;
pub use shader::*;
