//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::{path::Path, sync::Arc};

use glam::{Mat4, Vec3};
use glow::HasContext;

use crate::error::SetupError;

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<glow::Context>, shader_type: u32, source: &str) -> Result<Self, SetupError> {
        let stage = match shader_type {
            glow::VERTEX_SHADER => "vertex",
            glow::FRAGMENT_SHADER => "fragment",
            _ => "unknown",
        };
        unsafe {
            let shader = gl
                .create_shader(shader_type)
                .map_err(|log| SetupError::ShaderCompile { stage, log })?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(SetupError::ShaderCompile { stage, log });
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }

    /// Reads the source at `path` and compiles it. A missing file is an error
    /// of its own rather than an empty source.
    pub fn from_file(
        gl: &Arc<glow::Context>,
        shader_type: u32,
        path: &Path,
    ) -> Result<Self, SetupError> {
        let source = read_source(path)?;
        Self::new(gl, shader_type, &source)
    }
}

/// Reads a shader source file. A missing or unreadable file becomes
/// [`SetupError::MissingAsset`].
pub fn read_source(path: &Path) -> Result<String, SetupError> {
    std::fs::read_to_string(path).map_err(|source| SetupError::MissingAsset {
        path: path.to_path_buf(),
        source,
    })
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str);
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_3_f32(Some(&loc), self.x, self.y, self.z);
            }
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, self.as_ref());
            }
        }
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, SetupError> {
        unsafe {
            let program = gl.create_program().map_err(SetupError::ShaderLink)?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(SetupError::ShaderLink(log));
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    /// Compiles and links a vertex and fragment shader read from disk.
    pub fn from_files(
        gl: &Arc<glow::Context>,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<Self, SetupError> {
        let vert = Shader::from_file(gl, glow::VERTEX_SHADER, vertex_path)?;
        let frag = Shader::from_file(gl, glow::FRAGMENT_SHADER, fragment_path)?;
        let program = Self::new(gl, &[&vert, &frag])?;
        log::info!(
            "Linked shader program from {} and {}",
            vertex_path.display(),
            fragment_path.display()
        );
        Ok(program)
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform variable in the shader program.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        value.set_uniform(&self.gl, self.id, name);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
