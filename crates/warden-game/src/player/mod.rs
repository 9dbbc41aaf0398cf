//! The player: health, attack, and locomotion

mod controller;
mod movement;

pub use controller::PlayerController;
pub use movement::MovementConfig;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use warden_core::{BodyId, CharacterMotion};

use crate::combat::{deal_damage, AttackProfile, Cooldown, DamageReport, Health};
use crate::events::{Actor, GameEvent};
use crate::npc::{NpcId, NpcManager};

/// Animation trigger fired on every player attack
pub const ATTACK_TRIGGER: &str = "Kick";

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    pub attack: AttackProfile,
    pub movement: MovementConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            attack: AttackProfile::player(),
            movement: MovementConfig::default(),
        }
    }
}

/// What a primary attack did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackOutcome {
    /// Still cooling down; nothing happened
    CoolingDown,
    /// Swung at nothing
    Missed,
    Hit { npc: NpcId, report: DamageReport },
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    /// Handle into the motion backend
    pub body: BodyId,
    pub health: Health,
    pub attack: AttackProfile,
    pub attack_cooldown: Cooldown,
    pub controller: PlayerController,
    input_enabled: bool,
}

impl Player {
    pub fn new(body: BodyId, config: PlayerConfig) -> Self {
        Self {
            body,
            health: Health::new(config.max_health),
            attack: config.attack,
            attack_cooldown: Cooldown::ready(),
            controller: PlayerController::with_config(config.movement),
            input_enabled: true,
        }
    }

    /// Whether locomotion input is accepted
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn set_input_enabled(&mut self, enabled: bool, events: &mut Vec<GameEvent>) {
        if self.input_enabled == enabled {
            return;
        }
        self.input_enabled = enabled;
        debug!("Player input {}", if enabled { "enabled" } else { "disabled" });
        events.push(GameEvent::PlayerInputChanged { enabled });
    }

    /// Restore health and redraw the bar
    pub fn heal(&mut self, amount: f32, events: &mut Vec<GameEvent>) -> f32 {
        let restored = self.health.heal(amount);
        events.push(GameEvent::HealthChanged {
            actor: Actor::Player,
            current: self.health.current(),
            max: self.health.max(),
        });
        restored
    }

    /// Swing at the nearest hostile in range.
    ///
    /// The animation fires for every attack the cooldown lets through, hit or
    /// miss. During the cooldown the call does nothing.
    pub fn primary_attack<M: CharacterMotion + ?Sized>(
        &mut self,
        npcs: &mut NpcManager,
        motion: &M,
        events: &mut Vec<GameEvent>,
    ) -> AttackOutcome {
        if !self.attack_cooldown.try_fire(self.attack.cooldown) {
            return AttackOutcome::CoolingDown;
        }
        events.push(GameEvent::AnimationTriggered {
            actor: Actor::Player,
            trigger: ATTACK_TRIGGER.to_string(),
        });

        let Some(position) = motion.position(self.body) else {
            return AttackOutcome::Missed;
        };
        let target = npcs
            .nearest_hostile_within(position, self.attack.range, motion)
            .and_then(|id| npcs.get_mut(id));
        let Some(npc) = target else {
            debug!("Player attack hit nothing");
            return AttackOutcome::Missed;
        };

        let report = deal_damage(Actor::Npc(npc.id), &mut npc.health, self.attack.damage, events);
        info!("Player hit {} for {:.0} ({})", npc.id, report.dealt, npc.health);
        AttackOutcome::Hit { npc: npc.id, report }
    }
}
