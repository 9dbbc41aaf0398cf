//! Per-tick NPC behavior
//!
//! Each tick an NPC first settles its state from what it can sense, then acts
//! on that state: pick a horizontal intent, add integrated vertical velocity,
//! and hand the result to the motion backend.

use glam::Vec3;
use warden_core::heading::{horizontal, turn_towards, yaw_of};
use warden_core::CharacterMotion;

use super::{BehaviorState, Npc};
use crate::combat::{deal_damage, Health};
use crate::events::{Actor, GameEvent};

/// State after sensing the player at `player_distance` (`None` when there is
/// no player). Interacting and InCombat only change through explicit commands.
pub fn sensed_transition(
    state: BehaviorState,
    player_distance: Option<f32>,
    detection_radius: f32,
) -> BehaviorState {
    match state {
        BehaviorState::Patrolling | BehaviorState::PlayerDetected => match player_distance {
            Some(d) if d <= detection_radius => BehaviorState::PlayerDetected,
            _ => BehaviorState::Patrolling,
        },
        BehaviorState::Interacting | BehaviorState::InCombat => state,
    }
}

impl Npc {
    /// Run one tick of behavior.
    ///
    /// `player_health` is only needed for strikes; without it an in-range NPC
    /// still faces the player but deals no damage.
    pub fn tick<M: CharacterMotion + ?Sized>(
        &mut self,
        motion: &mut M,
        player_pos: Option<Vec3>,
        player_health: Option<&mut Health>,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        self.attack_cooldown.tick(dt);

        let Some(position) = motion.position(self.body) else {
            return;
        };

        let distance = player_pos.map(|p| position.distance(p));
        let next = sensed_transition(self.state, distance, self.config.detection_radius);
        self.set_state(next, events);

        let intent = match self.state {
            BehaviorState::Patrolling => self.patrol_intent(position, dt),
            BehaviorState::PlayerDetected => {
                if let Some(player) = player_pos {
                    self.face(player - position, self.config.detected_turn_rate, dt);
                }
                Vec3::ZERO
            }
            BehaviorState::Interacting => Vec3::ZERO,
            BehaviorState::InCombat => match player_pos {
                Some(player) => self.combat_intent(position, player, player_health, dt, events),
                None => Vec3::ZERO,
            },
        };

        if motion.is_grounded(self.body) && self.vertical_velocity < 0.0 {
            self.vertical_velocity = self.config.grounded_bias;
        }
        self.vertical_velocity += self.config.gravity * dt;

        motion.move_by(
            self.body,
            (intent + Vec3::Y * self.vertical_velocity) * dt,
            dt,
        );
    }

    fn face(&mut self, direction: Vec3, rate: f32, dt: f32) {
        if let Some(target) = yaw_of(direction) {
            self.yaw = turn_towards(self.yaw, target, rate, dt);
        }
    }

    fn patrol_intent(&mut self, position: Vec3, dt: f32) -> Vec3 {
        self.patrol.advance(
            position,
            dt,
            self.config.waypoint_reach_distance,
            self.config.waypoint_interval,
            &mut self.rng,
        );
        let to_waypoint = horizontal(self.patrol.waypoint - position);
        self.face(to_waypoint, self.config.patrol_turn_rate, dt);
        to_waypoint.normalize_or_zero() * self.config.patrol_speed
    }

    fn combat_intent(
        &mut self,
        position: Vec3,
        player: Vec3,
        player_health: Option<&mut Health>,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) -> Vec3 {
        let to_player = player - position;
        self.face(to_player, self.config.combat_turn_rate, dt);

        if !self.config.attack.in_range(to_player.length()) {
            return horizontal(to_player).normalize_or_zero() * self.config.chase_speed;
        }

        if let Some(health) = player_health {
            if health.is_alive() && self.attack_cooldown.try_fire(self.config.attack.cooldown) {
                if let Some(trigger) = self.kind().attack_trigger() {
                    events.push(GameEvent::AnimationTriggered {
                        actor: Actor::Npc(self.id),
                        trigger: trigger.to_string(),
                    });
                }
                deal_damage(Actor::Player, health, self.config.attack.damage, events);
            }
        }
        Vec3::ZERO
    }
}
