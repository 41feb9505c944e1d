//! The frame loop.
//!
//! Every tick samples input, advances the camera and draws the scene. Pointer
//! motion is forwarded to the camera as each event is dispatched, which happens
//! on the same thread before the camera advances, so mouse look is never seen
//! half applied.

use std::time::Instant;

use bp_core::{
    Camera, FrameTiming, InputSnapshot, Key, KeyboardState, PointerTracker, SceneDescription,
    ViewerConfig, projection,
};
use glam::{Mat4, Vec2, Vec3};

use crate::{
    backend::{GraphicsBackend, UniformValue, WindowEvent},
    error::SetupError,
};

/// A static shape uploaded to the GPU.
struct ShapeDraw<M> {
    mesh: M,
    color: Vec3,
}

/// Frames per second, averaged over about one second.
#[derive(Debug, Default)]
struct FpsCounter {
    frames: u32,
    elapsed: f32,
}

impl FpsCounter {
    /// Returns the average once a full second has been collected.
    fn record(&mut self, delta_time: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta_time;
        if self.elapsed < 1.0 {
            return None;
        }
        let fps = self.frames as f32 / self.elapsed;
        *self = Self::default();
        Some(fps)
    }
}

pub struct FrameLoop<B: GraphicsBackend> {
    // Fields drop in order: the meshes must go before the backend and its
    // GL context.
    shapes: Vec<ShapeDraw<B::Mesh>>,
    backend: B,
    camera: Camera,
    light_position: Vec3,
    light_color: Vec3,
    keyboard: KeyboardState,
    pointer: PointerTracker,
    timing: FrameTiming,
    fps: FpsCounter,
    title: String,
    width: u32,
    height: u32,
    projection: Option<Mat4>,
    clear_color: [f32; 4],
    paused: bool,
    pause_freezes_camera: bool,
    should_close: bool,
}

impl<B: GraphicsBackend> FrameLoop<B> {
    /// Builds the camera and uploads the scene once.
    pub fn new(mut backend: B, config: &ViewerConfig) -> Result<Self, SetupError> {
        let camera_config = &config.camera;
        let camera = Camera::new(
            camera_config.position,
            Vec3::Y,
            camera_config.yaw,
            camera_config.pitch,
            camera_config.move_speed,
            camera_config.sensitivity,
        );

        let scene = SceneDescription::new(config.slope_style);
        let shapes = scene
            .shapes
            .iter()
            .map(|shape| {
                Ok(ShapeDraw {
                    mesh: backend.create_mesh(shape)?,
                    color: shape.color,
                })
            })
            .collect::<Result<Vec<_>, SetupError>>()?;

        let (width, height) = (config.window.width, config.window.height);
        backend.set_viewport(0, 0, width, height);
        backend.set_pointer_captured(true);

        Ok(Self {
            shapes,
            backend,
            camera,
            light_position: scene.light_position,
            light_color: scene.light_color,
            keyboard: KeyboardState::default(),
            pointer: PointerTracker::new(Vec2::new(width as f32 / 2.0, height as f32 / 2.0)),
            timing: FrameTiming::default(),
            fps: FpsCounter::default(),
            title: config.window.title.clone(),
            width,
            height,
            projection: None,
            clear_color: config.clear_color,
            paused: false,
            pause_freezes_camera: config.pause_freezes_camera,
            should_close: false,
        })
    }

    /// Runs until the window is closed.
    pub fn run(mut self) {
        log::info!("Entering frame loop");
        while !self.should_close {
            self.tick(Instant::now());
        }
        log::info!("Window closed, shutting down");
    }

    /// Runs a single frame that started at `now`.
    pub fn tick(&mut self, now: Instant) {
        for event in self.backend.poll_events() {
            self.handle_event(event);
        }

        let delta_time = self.timing.tick(now);
        let input = InputSnapshot::from_keyboard(&self.keyboard);
        if !self.camera_frozen() {
            self.camera.advance(delta_time, &input);
        }

        self.render();
        self.backend.swap_buffers();

        if let Some(fps) = self.fps.record(delta_time) {
            log::trace!("{fps:.1} fps");
            let title = format!("{} - FPS: {:.0}", self.title, fps);
            self.backend.set_title(&title);
        }
    }

    fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Quit => self.should_close = true,
            WindowEvent::Resized { width, height } => {
                log::info!("Resized to {width}x{height}");
                self.width = width;
                self.height = height;
                self.projection = None;
                self.backend.set_viewport(0, 0, width, height);
            }
            WindowEvent::KeyDown(key) => {
                if self.keyboard.key_down(key) && key == Key::Pause {
                    self.toggle_pause();
                }
            }
            WindowEvent::KeyUp(key) => self.keyboard.key_up(key),
            WindowEvent::PointerMotion { dx, dy } => {
                let position = self.pointer.accumulate(dx, dy);
                if !self.camera_frozen() {
                    self.camera.on_mouse_move(position.x, position.y);
                }
            }
        }
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.backend.set_pointer_captured(!self.paused);
        if !self.paused {
            // The pointer jumped around while free.
            self.camera.reset_pointer();
        }
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
    }

    fn camera_frozen(&self) -> bool {
        self.paused && self.pause_freezes_camera
    }

    fn render(&mut self) {
        let (width, height) = (self.width, self.height);
        let projection = *self
            .projection
            .get_or_insert_with(|| projection::perspective(width, height));

        self.backend.clear(self.clear_color);
        self.backend.use_program();
        self.backend
            .set_uniform("lightPos", UniformValue::Vec3(self.light_position));
        self.backend
            .set_uniform("lightColor", UniformValue::Vec3(self.light_color));
        self.backend
            .set_uniform("viewPos", UniformValue::Vec3(self.camera.position()));
        self.backend
            .set_uniform("view", UniformValue::Mat4(self.camera.view_matrix()));
        self.backend
            .set_uniform("projection", UniformValue::Mat4(projection));

        for shape in &self.shapes {
            self.backend
                .set_uniform("objectColor", UniformValue::Vec3(shape.color));
            self.backend.draw(&shape.mesh);
        }
    }
}
