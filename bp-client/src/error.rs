//! Errors that can happen while setting up the viewer.
//!
//! None of them are recoverable. They travel up to `main`, which reports them and
//! exits with a non-zero status.

use std::path::PathBuf;

use bp_core::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("SDL initialization failed: {0}")]
    Sdl(String),
    #[error("failed to create window: {0}")]
    Window(String),
    #[error("failed to create OpenGL context: {0}")]
    Context(String),
    #[error("missing shader source {path}: {source}")]
    MissingAsset {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{stage} shader failed to compile:\n{log}")]
    ShaderCompile { stage: &'static str, log: String },
    #[error("shader program failed to link:\n{0}")]
    ShaderLink(String),
    #[error("failed to allocate mesh buffers: {0}")]
    Mesh(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
