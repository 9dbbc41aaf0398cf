//! Capsule characters and the controller settings they are swept with

use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

/// Shape and stepping rules shared by every character in a space
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterConfig {
    /// Capsule height, feet to crown (m)
    pub height: f32,
    /// Capsule radius (m)
    pub radius: f32,
    /// Steepest walkable slope (degrees)
    pub max_slope_degrees: f32,
    /// Tallest ledge climbed without jumping (m)
    pub step_height: f32,
    /// Gap kept between the capsule and whatever it touches (m)
    pub skin_width: f32,
    /// How far a character is pulled down onto the ground when walking off a slope (m)
    pub snap_distance: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.4,
            max_slope_degrees: 45.0,
            step_height: 0.25,
            skin_width: 0.02,
            snap_distance: 0.2,
        }
    }
}

impl CharacterConfig {
    pub(crate) fn controller(&self) -> KinematicCharacterController {
        let slope = self.max_slope_degrees.to_radians();
        KinematicCharacterController {
            max_slope_climb_angle: slope,
            min_slope_slide_angle: slope,
            autostep: Some(CharacterAutostep {
                max_height: CharacterLength::Absolute(self.step_height),
                min_width: CharacterLength::Relative(0.5),
                include_dynamic_bodies: false,
            }),
            snap_to_ground: Some(CharacterLength::Absolute(self.snap_distance)),
            offset: CharacterLength::Absolute(self.skin_width),
            ..Default::default()
        }
    }

    /// Capsule center for a character standing at `feet`
    pub(crate) fn center(&self, feet: Vec3) -> Vector<Real> {
        vector![feet.x, feet.y + self.height * 0.5, feet.z]
    }

    pub(crate) fn collider(&self, feet: Vec3) -> Collider {
        let half_segment = ((self.height - 2.0 * self.radius) * 0.5).max(0.01);
        ColliderBuilder::capsule_y(half_segment, self.radius)
            .translation(self.center(feet))
            .friction(0.0)
            .restitution(0.0)
            .build()
    }
}

/// One body in a [`crate::CharacterSpace`]. Positions are feet positions.
#[derive(Debug, Clone, Copy)]
pub struct Character {
    pub feet: Vec3,
    /// Whether the last sweep ended on walkable ground
    pub grounded: bool,
    pub(crate) collider: ColliderHandle,
}

impl Character {
    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }
}
