//! Movement configuration and constants

use serde::{Deserialize, Serialize};

/// Movement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walking speed in meters per second
    pub walk_speed: f32,
    /// Ground acceleration (how fast you reach max speed)
    pub ground_acceleration: f32,
    /// Ground deceleration (how fast you stop)
    pub ground_deceleration: f32,
    /// Air acceleration (reduced control in air)
    pub air_acceleration: f32,
    /// Air deceleration
    pub air_deceleration: f32,
    /// Apex height of a jump in meters
    pub jump_height: f32,
    /// Vertical acceleration (negative is down)
    pub gravity: f32,
    /// Vertical velocity while standing on the ground
    pub grounded_bias: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            ground_acceleration: 50.0,
            ground_deceleration: 30.0,
            air_acceleration: 10.0,
            air_deceleration: 5.0,
            jump_height: 1.5,
            gravity: -9.81,
            grounded_bias: -2.0,
        }
    }
}

impl MovementConfig {
    /// Take-off speed that reaches `jump_height`
    pub fn jump_velocity(&self) -> f32 {
        (self.jump_height * -2.0 * self.gravity).max(0.0).sqrt()
    }

    /// Get the current acceleration based on grounded state
    pub fn acceleration(&self, grounded: bool) -> f32 {
        if grounded {
            self.ground_acceleration
        } else {
            self.air_acceleration
        }
    }

    /// Get the current deceleration based on grounded state
    pub fn deceleration(&self, grounded: bool) -> f32 {
        if grounded {
            self.ground_deceleration
        } else {
            self.air_deceleration
        }
    }
}
