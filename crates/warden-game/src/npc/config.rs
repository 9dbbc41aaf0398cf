//! Per-NPC behavior tuning

use serde::{Deserialize, Serialize};

use super::NpcKind;
use crate::combat::AttackProfile;

/// Behavior tuning for one NPC. Every field has a sensible default, so a
/// scene only needs to mention what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Radius of the disc waypoints are drawn from
    pub patrol_radius: f32,
    /// Horizontal speed while patrolling (m/s)
    pub patrol_speed: f32,
    /// Horizontal speed while closing in on the player in combat (m/s)
    pub chase_speed: f32,
    /// A waypoint closer than this counts as reached
    pub waypoint_reach_distance: f32,
    /// Seconds before a fresh waypoint is drawn even if the old one was not reached
    pub waypoint_interval: f32,
    /// Player distance at which patrol gives way to PlayerDetected
    pub detection_radius: f32,
    /// Player distance at which this NPC can be talked to
    pub interaction_radius: f32,
    /// Turn rates (1/s) for the exponential facing interpolation
    pub patrol_turn_rate: f32,
    pub detected_turn_rate: f32,
    pub combat_turn_rate: f32,
    /// Vertical acceleration (m/s², negative is down)
    pub gravity: f32,
    /// Vertical velocity while standing on the ground
    pub grounded_bias: f32,
    pub max_health: f32,
    pub attack: AttackProfile,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            patrol_radius: 10.0,
            patrol_speed: 3.0,
            chase_speed: 3.0,
            waypoint_reach_distance: 1.0,
            waypoint_interval: 3.0,
            detection_radius: 15.0,
            interaction_radius: 2.0,
            patrol_turn_rate: 2.0,
            detected_turn_rate: 3.0,
            combat_turn_rate: 5.0,
            gravity: -9.81,
            grounded_bias: -2.0,
            max_health: 50.0,
            attack: AttackProfile::grunt(),
        }
    }
}

impl BehaviorConfig {
    /// Defaults for a given kind of NPC
    pub fn for_kind(kind: NpcKind) -> Self {
        match kind {
            NpcKind::Grunt => Self::default(),
            NpcKind::Boss => Self {
                max_health: 150.0,
                attack: AttackProfile::boss(),
                ..Self::default()
            },
        }
    }
}

/// Partial tuning from a scene, layered over the defaults for the NPC's kind.
/// Fields left out keep the kind's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BehaviorOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patrol_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patrol_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chase_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waypoint_reach_distance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waypoint_interval: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patrol_turn_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_turn_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combat_turn_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounded_bias: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_health: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack: Option<AttackOverrides>,
}

/// Partial attack tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttackOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<f32>,
}

impl AttackOverrides {
    pub fn apply(&self, base: AttackProfile) -> AttackProfile {
        AttackProfile {
            damage: self.damage.unwrap_or(base.damage),
            range: self.range.unwrap_or(base.range),
            cooldown: self.cooldown.unwrap_or(base.cooldown),
        }
    }
}

impl BehaviorOverrides {
    /// `base` with every field this override sets replaced
    pub fn apply(&self, base: BehaviorConfig) -> BehaviorConfig {
        let attack = match &self.attack {
            Some(attack) => attack.apply(base.attack),
            None => base.attack,
        };
        BehaviorConfig {
            patrol_radius: self.patrol_radius.unwrap_or(base.patrol_radius),
            patrol_speed: self.patrol_speed.unwrap_or(base.patrol_speed),
            chase_speed: self.chase_speed.unwrap_or(base.chase_speed),
            waypoint_reach_distance: self
                .waypoint_reach_distance
                .unwrap_or(base.waypoint_reach_distance),
            waypoint_interval: self.waypoint_interval.unwrap_or(base.waypoint_interval),
            detection_radius: self.detection_radius.unwrap_or(base.detection_radius),
            interaction_radius: self.interaction_radius.unwrap_or(base.interaction_radius),
            patrol_turn_rate: self.patrol_turn_rate.unwrap_or(base.patrol_turn_rate),
            detected_turn_rate: self.detected_turn_rate.unwrap_or(base.detected_turn_rate),
            combat_turn_rate: self.combat_turn_rate.unwrap_or(base.combat_turn_rate),
            gravity: self.gravity.unwrap_or(base.gravity),
            grounded_bias: self.grounded_bias.unwrap_or(base.grounded_bias),
            max_health: self.max_health.unwrap_or(base.max_health),
            attack,
        }
    }
}
