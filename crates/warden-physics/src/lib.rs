//! Warden Physics - character motion on top of rapier3d
//!
//! A [`Level`] holds the static geometry. A [`CharacterSpace`] puts capsule
//! characters into it, sweeps them with rapier's kinematic character
//! controller, and exposes them to game logic through
//! [`warden_core::CharacterMotion`].

mod character;

pub use character::{Character, CharacterConfig};

use std::collections::HashMap;

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::control::KinematicCharacterController;
use rapier3d::prelude::*;
use tracing::debug;
use warden_core::{BodyId, CharacterMotion};

/// Static colliders and the query structure sweeps run against
pub struct Level {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    islands: IslandManager,
    queries: QueryPipeline,
}

impl Level {
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            islands: IslandManager::new(),
            queries: QueryPipeline::new(),
        }
    }

    /// Make collider changes visible to the next sweep
    pub fn refresh(&mut self) {
        self.queries.update(&self.colliders);
    }

    /// Infinite ground plane at height `y`
    pub fn add_ground(&mut self, y: f32) -> ColliderHandle {
        let up = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(up)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .build();
        self.colliders.insert(ground)
    }

    /// Axis-aligned wall block
    pub fn add_wall(&mut self, half_extents: Vec3, center: Vec3) -> ColliderHandle {
        let wall = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![center.x, center.y, center.z])
            .friction(0.7)
            .build();
        self.colliders.insert(wall)
    }

    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    fn remove(&mut self, handle: ColliderHandle) {
        self.colliders
            .remove(handle, &mut self.islands, &mut self.bodies, false);
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

/// Every character of a scene and the level they move through
pub struct CharacterSpace {
    pub level: Level,
    config: CharacterConfig,
    controller: KinematicCharacterController,
    characters: HashMap<BodyId, Character>,
    next_id: u32,
}

impl CharacterSpace {
    pub fn new(level: Level, config: CharacterConfig) -> Self {
        let controller = config.controller();
        Self {
            level,
            config,
            controller,
            characters: HashMap::new(),
            next_id: 0,
        }
    }

    /// A level with only a ground plane at `y`, default capsules
    pub fn with_ground(y: f32) -> Self {
        let mut level = Level::new();
        level.add_ground(y);
        level.refresh();
        Self::new(level, CharacterConfig::default())
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    /// Put a capsule with its feet at `feet`
    pub fn spawn_character(&mut self, feet: Vec3) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let collider = self.level.colliders.insert(self.config.collider(feet));
        self.characters.insert(
            id,
            Character {
                feet,
                grounded: false,
                collider,
            },
        );
        self.level.refresh();

        debug!("Spawned character {} at {:?}", id, feet);
        id
    }

    /// Remove a character and its capsule
    pub fn despawn_character(&mut self, body: BodyId) {
        if let Some(character) = self.characters.remove(&body) {
            self.level.remove(character.collider);
            self.level.refresh();
        }
    }

    pub fn character(&self, body: BodyId) -> Option<&Character> {
        self.characters.get(&body)
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// Make this tick's moves visible to the next tick's sweeps
    pub fn sync(&mut self) {
        self.level.refresh();
    }

    /// Sweep `body` by `translation`, sliding along whatever it hits
    fn sweep(&mut self, body: BodyId, translation: Vec3, dt: f32) {
        let Some(character) = self.characters.get_mut(&body) else {
            return;
        };
        let Some(capsule) = self.level.colliders.get(character.collider) else {
            return;
        };

        let center = self.config.center(character.feet);
        let start = Isometry::translation(center.x, center.y, center.z);
        let movement = self.controller.move_shape(
            dt,
            &self.level.bodies,
            &self.level.colliders,
            &self.level.queries,
            capsule.shape(),
            &start,
            vector![translation.x, translation.y, translation.z],
            QueryFilter::default().exclude_collider(character.collider),
            |_| {},
        );

        let moved = movement.translation;
        character.feet += Vec3::new(moved.x, moved.y, moved.z);
        character.grounded = movement.grounded;

        let center = self.config.center(character.feet);
        if let Some(capsule) = self.level.colliders.get_mut(character.collider) {
            capsule.set_translation(center);
        }
    }
}

impl CharacterMotion for CharacterSpace {
    fn position(&self, body: BodyId) -> Option<Vec3> {
        self.characters.get(&body).map(|c| c.feet)
    }

    fn is_grounded(&self, body: BodyId) -> bool {
        self.characters.get(&body).is_some_and(|c| c.grounded)
    }

    fn move_by(&mut self, body: BodyId, translation: Vec3, dt: f32) {
        self.sweep(body, translation, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_despawn_character() {
        let mut space = CharacterSpace::with_ground(0.0);
        let body = space.spawn_character(Vec3::new(0.0, 0.1, 0.0));
        assert_eq!(space.character_count(), 1);
        assert_eq!(space.level.collider_count(), 2);
        assert_eq!(space.position(body), Some(Vec3::new(0.0, 0.1, 0.0)));

        space.despawn_character(body);
        assert_eq!(space.character_count(), 0);
        assert_eq!(space.level.collider_count(), 1);
        assert!(space.position(body).is_none());
    }

    #[test]
    fn test_spawned_capsule_is_centered_above_feet() {
        let mut space = CharacterSpace::with_ground(0.0);
        let body = space.spawn_character(Vec3::new(2.0, 0.0, 3.0));
        let handle = space.character(body).map(|c| c.collider()).unwrap();
        let t = space.level.collider(handle).unwrap().translation();
        assert!((t.y - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_character_walks_across_open_ground() {
        let mut space = CharacterSpace::with_ground(0.0);
        let body = space.spawn_character(Vec3::new(0.0, 0.1, 0.0));

        space.move_by(body, Vec3::new(1.0, -0.05, 0.0), 1.0 / 60.0);
        space.sync();

        let pos = space.position(body).unwrap();
        assert!(pos.x > 0.5, "character should advance, got {:?}", pos);
    }

    #[test]
    fn test_wall_stops_character() {
        let mut space = CharacterSpace::with_ground(0.0);
        space.level.add_wall(Vec3::new(0.5, 2.0, 2.0), Vec3::new(2.0, 2.0, 0.0));
        let body = space.spawn_character(Vec3::new(0.0, 0.1, 0.0));

        for _ in 0..10 {
            space.move_by(body, Vec3::new(0.5, 0.0, 0.0), 1.0 / 60.0);
            space.sync();
        }

        let pos = space.position(body).unwrap();
        assert!(pos.x < 1.2, "wall should block at x = 1.1, got {:?}", pos);
    }

    #[test]
    fn test_unknown_body_is_ignored() {
        let mut space = CharacterSpace::with_ground(0.0);
        space.move_by(BodyId(42), Vec3::X, 1.0 / 60.0);
        assert!(!space.is_grounded(BodyId(42)));
        assert!(space.position(BodyId(42)).is_none());
    }
}
