//! The interface between the frame loop and the graphics API.
//!
//! [`GraphicsBackend`] is everything the frame loop needs from a window and a
//! GPU. [`GlBackend`] implements it on top of SDL2 and OpenGL.

use bp_core::{Key, ShapeMesh, ViewerConfig};
use glam::{Mat4, Vec3};
use glow::HasContext;
use sdl2::{event::Event, keyboard::Keycode};

use crate::{
    abs::{App, Mesh, ShaderProgram},
    error::SetupError,
};

/// Window events after translation from the windowing library.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Quit,
    Resized { width: u32, height: u32 },
    KeyDown(Key),
    KeyUp(Key),
    /// Relative pointer motion in pixels.
    PointerMotion { dx: f32, dy: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Vec3(Vec3),
    Mat4(Mat4),
}

pub trait GraphicsBackend {
    /// A mesh living on the GPU. Dropping it frees the buffers.
    type Mesh;

    /// Drains the pending window events.
    fn poll_events(&mut self) -> Vec<WindowEvent>;

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    fn clear(&mut self, color: [f32; 4]);

    /// Binds the scene's shader program.
    fn use_program(&mut self);

    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn create_mesh(&mut self, shape: &ShapeMesh) -> Result<Self::Mesh, SetupError>;

    fn draw(&mut self, mesh: &Self::Mesh);

    fn swap_buffers(&mut self);

    /// Switches between a captured, hidden pointer and a free cursor.
    fn set_pointer_captured(&mut self, captured: bool);

    fn set_title(&mut self, title: &str);
}

fn map_keycode(keycode: Keycode) -> Option<Key> {
    match keycode {
        Keycode::W => Some(Key::Forward),
        Keycode::S => Some(Key::Back),
        Keycode::A => Some(Key::StrafeLeft),
        Keycode::D => Some(Key::StrafeRight),
        Keycode::Space => Some(Key::Jump),
        Keycode::Escape => Some(Key::Pause),
        _ => None,
    }
}

fn translate_event(event: Event) -> Option<WindowEvent> {
    match event {
        Event::Quit { .. } => Some(WindowEvent::Quit),
        Event::Window {
            win_event: sdl2::event::WindowEvent::SizeChanged(width, height),
            ..
        } => Some(WindowEvent::Resized {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        }),
        Event::KeyDown {
            keycode: Some(keycode),
            repeat: false,
            ..
        } => map_keycode(keycode).map(WindowEvent::KeyDown),
        Event::KeyUp {
            keycode: Some(keycode),
            ..
        } => map_keycode(keycode).map(WindowEvent::KeyUp),
        Event::MouseMotion { xrel, yrel, .. } => Some(WindowEvent::PointerMotion {
            dx: xrel as f32,
            dy: yrel as f32,
        }),
        _ => None,
    }
}

/// SDL2 window with an OpenGL context and the scene's shader program.
pub struct GlBackend {
    // Dropped before `app`, which owns the GL context.
    program: ShaderProgram,
    app: App,
}

impl GlBackend {
    pub fn new(config: &ViewerConfig) -> Result<Self, SetupError> {
        let app = App::new(
            &config.window.title,
            config.window.width,
            config.window.height,
        )?;
        let program =
            ShaderProgram::from_files(&app.gl, &config.vertex_shader, &config.fragment_shader)?;

        unsafe {
            app.gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self { program, app })
    }
}

impl GraphicsBackend for GlBackend {
    type Mesh = Mesh;

    fn poll_events(&mut self) -> Vec<WindowEvent> {
        self.app
            .event_pump
            .poll_iter()
            .filter_map(translate_event)
            .collect()
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        unsafe {
            self.app.gl.viewport(x, y, width as i32, height as i32);
        }
    }

    fn clear(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe {
            self.app.gl.clear_color(r, g, b, a);
            self.app
                .gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn use_program(&mut self) {
        self.program.use_program();
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        match value {
            UniformValue::Vec3(v) => self.program.set_uniform(name, v),
            UniformValue::Mat4(m) => self.program.set_uniform(name, m),
        }
    }

    fn create_mesh(&mut self, shape: &ShapeMesh) -> Result<Mesh, SetupError> {
        let mesh = Mesh::new(&self.app.gl, &shape.vertices, &shape.indices, glow::TRIANGLES)?;
        log::info!(
            "Uploaded {} ({} vertices, {} indices)",
            shape.name,
            shape.vertices.len(),
            mesh.index_count()
        );
        Ok(mesh)
    }

    fn draw(&mut self, mesh: &Mesh) {
        mesh.draw();
    }

    fn swap_buffers(&mut self) {
        self.app.window.gl_swap_window();
    }

    fn set_pointer_captured(&mut self, captured: bool) {
        self.app.sdl.mouse().set_relative_mouse_mode(captured);
    }

    fn set_title(&mut self, title: &str) {
        if let Err(e) = self.app.window.set_title(title) {
            log::warn!("Could not set window title: {e}");
        }
    }
}
