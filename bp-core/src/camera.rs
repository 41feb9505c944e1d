//! The first person camera.
//!
//! The camera owns its position and orientation and runs a small amount of toy
//! physics every frame: walking, gravity, snapping onto the baseplate, a height
//! field for the slope and jumping. Mouse look is handled separately by
//! [`Camera::on_mouse_move`], which may be called any number of times between two
//! calls to [`Camera::advance`].

use glam::{Mat4, Vec2, Vec3};

use crate::{
    input::InputSnapshot,
    scene::{Aabb, BASEPLATE, BASEPLATE_REACH, MAX_WALKABLE_INCLINE, SLOPE},
};

/// Vertical acceleration in units per second squared.
pub const GRAVITY: f32 = -9.8;
/// Vertical velocity given by a jump.
pub const JUMP_IMPULSE: f32 = 5.0;
/// Height of the baseplate surface the camera stands on.
pub const GROUND_LEVEL: f32 = -0.5;
/// Height of the eye above the ground while standing.
pub const EYE_HEIGHT: f32 = 0.5;
/// Pitch is kept within this many degrees of the horizon.
pub const MAX_PITCH: f32 = 89.0;

/// Returns `true` if `position` is within reach of standing on the baseplate.
pub fn collides_with_baseplate(position: Vec3) -> bool {
    let reach = Aabb::new(BASEPLATE.min, BASEPLATE.max + Vec3::Y * BASEPLATE_REACH);
    reach.contains(position)
}

/// Returns `true` if `position` falls in the slope's height field.
pub fn collides_with_slope(position: Vec3) -> bool {
    SLOPE.contains(position)
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    move_speed: f32,
    sensitivity: f32,
    vertical_velocity: f32,
    grounded: bool,
    /// Last pointer sample. `None` until the first sample after capture.
    last_pointer: Option<Vec2>,
}

impl Camera {
    /// Creates a new camera. Angles are in degrees, the pitch is clamped.
    pub fn new(
        position: Vec3,
        world_up: Vec3,
        yaw: f32,
        pitch: f32,
        move_speed: f32,
        sensitivity: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            move_speed,
            sensitivity,
            vertical_velocity: 0.0,
            grounded: false,
            last_pointer: None,
        };
        camera.update_vectors();
        camera
    }

    /// Advances the camera by `delta_time` seconds.
    pub fn advance(&mut self, delta_time: f32, input: &InputSnapshot) {
        // Diagonal movement is intentionally not normalized.
        let velocity = self.move_speed * delta_time;
        if input.forward {
            self.position += self.front * velocity;
        }
        if input.back {
            self.position -= self.front * velocity;
        }
        if input.left {
            self.position -= self.right * velocity;
        }
        if input.right {
            self.position += self.right * velocity;
        }

        if !self.grounded {
            self.vertical_velocity += GRAVITY * delta_time;
            self.position.y += self.vertical_velocity * delta_time;
        }

        let was_grounded = self.grounded;
        if collides_with_baseplate(self.position) && self.position.y <= GROUND_LEVEL + EYE_HEIGHT {
            self.position.y = GROUND_LEVEL + EYE_HEIGHT;
            self.vertical_velocity = 0.0;
            self.grounded = true;
            if !was_grounded {
                log::debug!("Landed on the baseplate at {}", self.position);
            }
        } else {
            self.grounded = false;
        }

        // A pure height snap, the direction of approach does not matter.
        if collides_with_slope(self.position) {
            self.position.y = SLOPE.surface_height(self.position);
        }

        if self.grounded && input.jump {
            self.jump();
        }
    }

    /// Starts a jump. Does nothing while airborne.
    pub fn jump(&mut self) {
        if self.grounded {
            self.vertical_velocity = JUMP_IMPULSE;
            self.grounded = false;
            log::debug!("Jump from {}", self.position);
        }
    }

    /// Feeds an absolute pointer position to the mouse look.
    ///
    /// The first sample after construction or [`Camera::reset_pointer`] only
    /// seeds the reference point.
    pub fn on_mouse_move(&mut self, x: f32, y: f32) {
        let current = Vec2::new(x, y);
        let last = self.last_pointer.replace(current).unwrap_or(current);

        // Screen y grows downward.
        let x_offset = (current.x - last.x) * self.sensitivity;
        let y_offset = (last.y - current.y) * self.sensitivity;
        if x_offset == 0.0 && y_offset == 0.0 {
            return;
        }

        self.yaw += x_offset;
        self.pitch = (self.pitch + y_offset).clamp(-MAX_PITCH, MAX_PITCH);
        self.update_vectors();
    }

    /// Re-arms the first mouse guard, used whenever pointer capture is
    /// acquired again.
    pub fn reset_pointer(&mut self) {
        self.last_pointer = None;
    }

    /// The look-at transform of the camera.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// The player's bounding box: `width` wide and deep, centred on the
    /// position, and `height` tall starting at the position.
    pub fn bounding_box(&self, height: f32, width: f32) -> Aabb {
        Aabb::new(
            self.position + Vec3::new(-width / 2.0, 0.0, -width / 2.0),
            self.position + Vec3::new(width / 2.0, height, width / 2.0),
        )
    }

    pub fn slope_incline_degrees(&self) -> f32 {
        SLOPE.incline_degrees()
    }

    pub fn is_slope_walkable(&self) -> bool {
        self.slope_incline_degrees() < MAX_WALKABLE_INCLINE
    }

    pub fn collides_with_baseplate(&self) -> bool {
        collides_with_baseplate(self.position)
    }

    pub fn collides_with_slope(&self) -> bool {
        collides_with_slope(self.position)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx_eq;

    fn camera_at(position: Vec3) -> Camera {
        Camera::new(position, Vec3::Y, -90.0, 0.0, 5.0, 0.1)
    }

    fn still() -> InputSnapshot {
        InputSnapshot::default()
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut yaw = -180.0;
        while yaw <= 180.0 {
            let mut pitch = -88.5;
            while pitch < 89.0 {
                let camera = Camera::new(Vec3::ZERO, Vec3::Y, yaw, pitch, 5.0, 0.1);
                let (f, r, u) = (camera.front(), camera.right(), camera.up());
                assert!(approx_eq(f.length(), 1.0), "yaw {yaw} pitch {pitch}");
                assert!(approx_eq(r.length(), 1.0), "yaw {yaw} pitch {pitch}");
                assert!(approx_eq(u.length(), 1.0), "yaw {yaw} pitch {pitch}");
                assert!(approx_eq(f.dot(r), 0.0), "yaw {yaw} pitch {pitch}");
                assert!(approx_eq(f.dot(u), 0.0), "yaw {yaw} pitch {pitch}");
                assert!(approx_eq(r.dot(u), 0.0), "yaw {yaw} pitch {pitch}");
                pitch += 7.375;
            }
            yaw += 15.0;
        }
    }

    #[test]
    fn test_initial_front() {
        let camera = camera_at(Vec3::new(0.0, 0.5, 0.0));
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(camera.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(camera.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_pitch_clamp() {
        let mut camera = camera_at(Vec3::ZERO);
        camera.on_mouse_move(0.0, 0.0);
        camera.on_mouse_move(0.0, -10_000.0);
        assert_eq!(camera.pitch(), MAX_PITCH);

        camera.on_mouse_move(0.0, 30_000.0);
        assert_eq!(camera.pitch(), -MAX_PITCH);

        let clamped = Camera::new(Vec3::ZERO, Vec3::Y, 0.0, 120.0, 5.0, 0.1);
        assert_eq!(clamped.pitch(), MAX_PITCH);
    }

    #[test]
    fn test_first_mouse_guard() {
        let mut camera = camera_at(Vec3::ZERO);
        camera.on_mouse_move(1234.0, 987.0);
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);

        camera.on_mouse_move(1244.0, 977.0);
        assert!(approx_eq(camera.yaw(), -89.0));
        assert!(approx_eq(camera.pitch(), 1.0));

        // Capture lost and regained: the jump in position is ignored.
        camera.reset_pointer();
        camera.on_mouse_move(0.0, 0.0);
        assert!(approx_eq(camera.yaw(), -89.0));
        assert!(approx_eq(camera.pitch(), 1.0));
    }

    #[test]
    fn test_batched_mouse_events_accumulate() {
        let mut camera = camera_at(Vec3::ZERO);
        camera.on_mouse_move(0.0, 0.0);
        for i in 1..=5 {
            camera.on_mouse_move(i as f32 * 10.0, 0.0);
        }
        assert!(approx_eq(camera.yaw(), -85.0));
    }

    #[test]
    fn test_gravity_integration() {
        // Outside the baseplate so nothing stops the fall.
        let mut camera = camera_at(Vec3::new(20.0, 100.0, 20.0));
        assert!(!camera.is_grounded());

        let mut expected_v = 0.0;
        let mut expected_y = 100.0;
        for _ in 0..3 {
            let before = camera.position().y;
            camera.advance(1.0, &still());
            expected_v += GRAVITY;
            expected_y += expected_v;
            assert!(approx_eq(camera.vertical_velocity(), expected_v));
            assert!(approx_eq(camera.position().y, expected_y));
            assert!(camera.position().y < before);
        }
        assert!(approx_eq(camera.vertical_velocity(), -29.4));
        assert!(approx_eq(camera.position().y, 100.0 - 9.8 - 19.6 - 29.4));
    }

    #[test]
    fn test_ground_snap() {
        let mut camera = camera_at(Vec3::new(1.0, -0.2, -1.0));
        camera.vertical_velocity = -3.0;
        camera.advance(0.016, &still());
        assert_eq!(camera.position().y, GROUND_LEVEL + EYE_HEIGHT);
        assert_eq!(camera.vertical_velocity(), 0.0);
        assert!(camera.is_grounded());
    }

    #[test]
    fn test_falling_onto_baseplate() {
        let mut camera = camera_at(Vec3::new(-3.0, 1.0, 3.0));
        let mut steps = 0;
        while !camera.is_grounded() {
            camera.advance(1.0 / 60.0, &still());
            steps += 1;
            assert!(steps < 600, "never landed");
        }
        assert_eq!(camera.position().y, 0.0);
        // Standing still keeps it grounded.
        camera.advance(1.0 / 60.0, &still());
        assert!(camera.is_grounded());
        assert_eq!(camera.position().y, 0.0);
    }

    #[test]
    fn test_falls_off_the_edge() {
        let mut camera = camera_at(Vec3::new(5.2, -0.2, 0.0));
        camera.advance(0.1, &still());
        assert!(!camera.is_grounded());
        assert!(camera.position().y < -0.2);
    }

    #[test]
    fn test_jump_gating() {
        let mut camera = camera_at(Vec3::new(20.0, 10.0, 0.0));
        camera.vertical_velocity = -1.0;
        camera.jump();
        assert_eq!(camera.vertical_velocity(), -1.0);
        assert!(!camera.is_grounded());

        camera.grounded = true;
        camera.jump();
        assert_eq!(camera.vertical_velocity(), JUMP_IMPULSE);
        assert!(!camera.is_grounded());

        // A second press while airborne is a no-op.
        camera.jump();
        assert_eq!(camera.vertical_velocity(), JUMP_IMPULSE);
    }

    #[test]
    fn test_jump_from_advance() {
        let mut camera = camera_at(Vec3::new(-3.0, 0.0, 3.0));
        camera.advance(0.0, &still());
        assert!(camera.is_grounded());

        let jump = InputSnapshot {
            jump: true,
            ..Default::default()
        };
        camera.advance(0.016, &jump);
        assert_eq!(camera.vertical_velocity(), JUMP_IMPULSE);
        assert!(!camera.is_grounded());

        camera.advance(0.016, &jump);
        assert!(camera.position().y > 0.0);
        assert!(camera.vertical_velocity() < JUMP_IMPULSE);
    }

    #[test]
    fn test_walk_forward() {
        let mut camera = camera_at(Vec3::new(0.0, 0.5, 0.0));
        camera.grounded = true;
        let input = InputSnapshot {
            forward: true,
            ..Default::default()
        };
        camera.advance(0.1, &input);
        let position = camera.position();
        assert!(approx_eq(position.z, -0.5));
        assert!(approx_eq(position.x, 0.0));
        assert!(approx_eq(position.y, 0.5));
    }

    #[test]
    fn test_diagonal_is_not_normalized() {
        let mut camera = camera_at(Vec3::new(-3.0, 0.0, 3.0));
        camera.grounded = true;
        let input = InputSnapshot {
            forward: true,
            right: true,
            ..Default::default()
        };
        camera.advance(0.1, &input);
        let moved = camera.position() - Vec3::new(-3.0, 0.0, 3.0);
        assert!(approx_eq(moved.length(), 0.5 * 2.0_f32.sqrt()));
    }

    #[test]
    fn test_slope_height_snap() {
        let mut camera = camera_at(Vec3::new(1.0, 0.0, 1.0));
        camera.advance(0.0, &still());
        // On the baseplate at y = 0, then lifted onto the ramp surface.
        assert!(approx_eq(camera.position().y, 1.0));

        // Above the height field nothing happens.
        assert!(!collides_with_slope(Vec3::new(1.0, 1.5, 1.0)));
        assert!(collides_with_slope(Vec3::new(1.5, 1.0, 0.5)));
        assert!(!collides_with_slope(Vec3::new(-0.5, -1.0, 0.5)));
    }

    #[test]
    fn test_baseplate_reach() {
        assert!(collides_with_baseplate(Vec3::new(0.0, -0.5, 0.0)));
        assert!(collides_with_baseplate(Vec3::new(0.0, 2.0, 0.0)));
        assert!(!collides_with_baseplate(Vec3::new(0.0, 2.1, 0.0)));
        assert!(!collides_with_baseplate(Vec3::new(0.0, -0.6, 0.0)));
        assert!(!collides_with_baseplate(Vec3::new(0.0, 0.0, 5.5)));
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, 30.0, 20.0, 5.0, 0.1);
        let view = camera.view_matrix();
        assert!(view.transform_point3(camera.position()).abs_diff_eq(Vec3::ZERO, 1e-5));
        assert!(view.transform_vector3(camera.front()).abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!(view.transform_vector3(camera.up()).abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_bounding_box_and_slope_walkability() {
        let camera = camera_at(Vec3::new(1.0, 0.0, -1.0));
        let aabb = camera.bounding_box(1.8, 0.6);
        assert!(aabb.min.abs_diff_eq(Vec3::new(0.7, 0.0, -1.3), 1e-6));
        assert!(aabb.max.abs_diff_eq(Vec3::new(1.3, 1.8, -0.7), 1e-6));
        assert!(!camera.is_slope_walkable());
    }
}
