//! Character motion interface
//!
//! AI and player code never integrate positions themselves. They build a
//! per-tick translation and hand it to a [`CharacterMotion`] backend, which
//! owns positions and resolves collisions.

use std::collections::HashMap;

use glam::Vec3;

use crate::types::BodyId;

/// Collision-aware movement provided by the physics layer
pub trait CharacterMotion {
    /// Current position of a body (feet), if it exists
    fn position(&self, body: BodyId) -> Option<Vec3>;

    /// Whether the body touched the ground during its last move
    fn is_grounded(&self, body: BodyId) -> bool;

    /// Move a body by a translation, resolving collisions
    fn move_by(&mut self, body: BodyId, translation: Vec3, dt: f32);
}

#[derive(Debug, Clone, Copy)]
struct FlatBody {
    position: Vec3,
    grounded: bool,
}

/// Headless motion backend: an infinite floor and nothing else.
///
/// Bodies never collide with each other. Anything pushed below the floor is
/// snapped back onto it and reported as grounded.
#[derive(Debug, Clone)]
pub struct FlatGround {
    ground_height: f32,
    bodies: HashMap<BodyId, FlatBody>,
    next_id: u32,
}

impl FlatGround {
    /// Create a floor at the given height
    pub fn new(ground_height: f32) -> Self {
        Self {
            ground_height,
            bodies: HashMap::new(),
            next_id: 0,
        }
    }

    /// Height of the floor
    pub fn ground_height(&self) -> f32 {
        self.ground_height
    }

    /// Place a new body
    pub fn spawn(&mut self, position: Vec3) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        let position = Vec3::new(position.x, position.y.max(self.ground_height), position.z);
        self.bodies.insert(
            id,
            FlatBody {
                position,
                grounded: position.y <= self.ground_height,
            },
        );
        id
    }

    /// Move a body without integrating (no effect on unknown bodies)
    pub fn teleport(&mut self, body: BodyId, position: Vec3) {
        let ground = self.ground_height;
        if let Some(b) = self.bodies.get_mut(&body) {
            b.position = Vec3::new(position.x, position.y.max(ground), position.z);
            b.grounded = b.position.y <= ground;
        }
    }

    /// Number of bodies on the floor
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl Default for FlatGround {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl CharacterMotion for FlatGround {
    fn position(&self, body: BodyId) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn is_grounded(&self, body: BodyId) -> bool {
        self.bodies.get(&body).map(|b| b.grounded).unwrap_or(false)
    }

    fn move_by(&mut self, body: BodyId, translation: Vec3, _dt: f32) {
        let ground = self.ground_height;
        let Some(b) = self.bodies.get_mut(&body) else {
            return;
        };
        b.position += translation;
        if b.position.y <= ground {
            b.position.y = ground;
            b.grounded = true;
        } else {
            b.grounded = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_on_floor_is_grounded() {
        let mut floor = FlatGround::new(0.0);
        let body = floor.spawn(Vec3::new(1.0, 0.0, 2.0));
        assert!(floor.is_grounded(body));
        assert_eq!(floor.position(body), Some(Vec3::new(1.0, 0.0, 2.0)));
    }

    #[test]
    fn test_move_clamps_to_floor() {
        let mut floor = FlatGround::new(0.0);
        let body = floor.spawn(Vec3::ZERO);
        floor.move_by(body, Vec3::new(1.0, -5.0, 0.0), 0.016);
        assert_eq!(floor.position(body), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert!(floor.is_grounded(body));
    }

    #[test]
    fn test_airborne_body_not_grounded() {
        let mut floor = FlatGround::new(0.0);
        let body = floor.spawn(Vec3::ZERO);
        floor.move_by(body, Vec3::new(0.0, 1.0, 0.0), 0.016);
        assert!(!floor.is_grounded(body));
    }

    #[test]
    fn test_unknown_body_is_ignored() {
        let mut floor = FlatGround::default();
        floor.move_by(BodyId(99), Vec3::X, 0.016);
        assert!(floor.position(BodyId(99)).is_none());
        assert!(!floor.is_grounded(BodyId(99)));
    }
}
