//! Input state shared between the event loop and the camera.
//!
//! The client translates window events into [`Key`]s and pointer motion. Once per
//! frame the keyboard state is reduced to an [`InputSnapshot`], which is all the
//! camera sees of the keyboard.

use std::collections::HashSet;
use std::time::Instant;

use glam::Vec2;

/// The keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Jump,
    Pause,
}

/// The keys currently held down.
#[derive(Debug, Default)]
pub struct KeyboardState {
    pub down: HashSet<Key>,
}

impl KeyboardState {
    /// Marks `key` as held. Returns `true` only if it was not held already, so
    /// key repeat never counts as a second press.
    pub fn key_down(&mut self, key: Key) -> bool {
        self.down.insert(key)
    }

    pub fn key_up(&mut self, key: Key) {
        self.down.remove(&key);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }
}

/// The movement keys as they are held during one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputSnapshot {
    pub fn from_keyboard(keyboard: &KeyboardState) -> Self {
        Self {
            forward: keyboard.is_down(Key::Forward),
            back: keyboard.is_down(Key::Back),
            left: keyboard.is_down(Key::StrafeLeft),
            right: keyboard.is_down(Key::StrafeRight),
            jump: keyboard.is_down(Key::Jump),
        }
    }
}

/// Turns the relative motion reported while the pointer is captured into an
/// absolute pointer position, which is what the camera's mouse look expects.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerTracker {
    position: Vec2,
}

impl PointerTracker {
    pub fn new(start: Vec2) -> Self {
        Self { position: start }
    }

    /// Applies one motion event and returns the new absolute position.
    pub fn accumulate(&mut self, dx: f32, dy: f32) -> Vec2 {
        self.position += Vec2::new(dx, dy);
        self.position
    }
}

/// Measures the time between two frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameTiming {
    last: Option<Instant>,
}

impl FrameTiming {
    /// Records a new frame at `now` and returns the seconds since the previous
    /// one. The first frame has a delta of zero, and a clock that goes
    /// backwards is treated as no time passing.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta_time = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        delta_time
    }
}
