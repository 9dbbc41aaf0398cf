//! Player locomotion on top of a motion backend

use glam::Vec3;
use warden_core::heading::forward;
use warden_core::{BodyId, CharacterMotion};

use crate::input::{InputAction, InputState};

use super::MovementConfig;

/// Turns held movement input into moves on the player's body
#[derive(Debug, Clone, Default)]
pub struct PlayerController {
    /// Movement configuration
    pub config: MovementConfig,
    /// Heading movement input is relative to (usually the camera yaw)
    pub yaw: f32,
    /// Horizontal velocity (X, Z only)
    horizontal_velocity: Vec3,
    /// Vertical velocity (jumping/falling)
    vertical_velocity: f32,
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MovementConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn horizontal_velocity(&self) -> Vec3 {
        self.horizontal_velocity
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Update the player (fixed timestep).
    ///
    /// With `input_enabled` false only gravity is integrated, so the player
    /// stays grounded but cannot walk or jump.
    pub fn fixed_update<M: CharacterMotion + ?Sized>(
        &mut self,
        motion: &mut M,
        body: BodyId,
        input: &InputState,
        input_enabled: bool,
        dt: f32,
    ) {
        let grounded = motion.is_grounded(body);
        if grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = self.config.grounded_bias;
        }

        if !input_enabled {
            self.horizontal_velocity = Vec3::ZERO;
            self.vertical_velocity += self.config.gravity * dt;
            motion.move_by(body, Vec3::Y * self.vertical_velocity * dt, dt);
            return;
        }

        let axis = input.move_axis();
        let ahead = forward(self.yaw);
        let right = Vec3::new(-ahead.z, 0.0, ahead.x);
        let mut move_dir = ahead * axis.y + right * axis.x;

        if move_dir.length_squared() > 0.0 {
            move_dir = move_dir.normalize();
            let target_velocity = move_dir * self.config.walk_speed;
            self.horizontal_velocity = Self::move_towards_vec3(
                self.horizontal_velocity,
                target_velocity,
                self.config.acceleration(grounded) * dt,
            );
        } else {
            self.horizontal_velocity = Self::move_towards_vec3(
                self.horizontal_velocity,
                Vec3::ZERO,
                self.config.deceleration(grounded) * dt,
            );
        }

        if grounded && input.is_just_pressed(InputAction::Jump) {
            self.vertical_velocity = self.config.jump_velocity();
        }
        self.vertical_velocity += self.config.gravity * dt;

        let velocity = Vec3::new(
            self.horizontal_velocity.x,
            self.vertical_velocity,
            self.horizontal_velocity.z,
        );
        motion.move_by(body, velocity * dt, dt);
    }

    /// Move a vector towards a target by a maximum delta
    fn move_towards_vec3(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
        let diff = target - current;
        let distance = diff.length();

        if distance <= max_delta || distance == 0.0 {
            target
        } else {
            current + diff / distance * max_delta
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::FlatGround;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_move_towards() {
        let result = PlayerController::move_towards_vec3(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 5.0);
        assert!((result.x - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_walks_forward_along_yaw() {
        let mut ground = FlatGround::default();
        let body = ground.spawn(Vec3::ZERO);
        let mut controller = PlayerController::new();
        let mut input = InputState::new();
        input.press(InputAction::MoveForward);

        for _ in 0..60 {
            controller.fixed_update(&mut ground, body, &input, true, DT);
        }
        let pos = ground.position(body).unwrap();
        // yaw 0 faces +X
        assert!(pos.x > 3.0, "got {pos:?}");
        assert!(pos.z.abs() < 1e-4);
    }

    #[test]
    fn test_strafe_right_is_plus_z_at_zero_yaw() {
        let mut ground = FlatGround::default();
        let body = ground.spawn(Vec3::ZERO);
        let mut controller = PlayerController::new();
        let mut input = InputState::new();
        input.press(InputAction::MoveRight);

        for _ in 0..30 {
            controller.fixed_update(&mut ground, body, &input, true, DT);
        }
        assert!(ground.position(body).unwrap().z > 0.5);
    }

    #[test]
    fn test_disabled_input_only_applies_gravity() {
        let mut ground = FlatGround::default();
        let body = ground.spawn(Vec3::new(0.0, 2.0, 0.0));
        let mut controller = PlayerController::new();
        let mut input = InputState::new();
        input.press(InputAction::MoveForward);
        input.press(InputAction::Jump);

        for _ in 0..120 {
            controller.fixed_update(&mut ground, body, &input, false, DT);
        }
        let pos = ground.position(body).unwrap();
        assert_eq!(pos, Vec3::ZERO);
        assert!(ground.is_grounded(body));
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mut ground = FlatGround::default();
        let body = ground.spawn(Vec3::ZERO);
        let mut controller = PlayerController::new();
        let mut input = InputState::new();

        // Settle on the floor first
        controller.fixed_update(&mut ground, body, &input, true, DT);
        input.press(InputAction::Jump);
        controller.fixed_update(&mut ground, body, &input, true, DT);

        assert!(ground.position(body).unwrap().y > 0.0);
        assert!(!ground.is_grounded(body));
    }
}
