//! NPC system: data, behavior state machine, patrol, and the roster

pub mod behavior;
pub mod config;
pub mod manager;
pub mod patrol;

pub use behavior::sensed_transition;
pub use config::{AttackOverrides, BehaviorConfig, BehaviorOverrides};
pub use manager::NpcManager;
pub use patrol::{random_point_in_disc, PatrolRoute};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use warden_core::BodyId;

use crate::combat::{Cooldown, Health};
use crate::dialogue::DialogueScript;
use crate::error::InteractionError;
use crate::events::GameEvent;

/// Unique identifier for an NPC instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NpcId(pub u64);

impl std::fmt::Display for NpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "npc#{}", self.0)
    }
}

/// Which hostile archetype an NPC is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcKind {
    #[default]
    Grunt,
    Boss,
}

impl NpcKind {
    pub fn name(&self) -> &'static str {
        match self {
            NpcKind::Grunt => "Grunt",
            NpcKind::Boss => "Boss",
        }
    }

    /// Animation trigger fired on each strike, if the rig has one
    pub fn attack_trigger(&self) -> Option<&'static str> {
        match self {
            NpcKind::Grunt => None,
            NpcKind::Boss => Some("Attack"),
        }
    }

    /// Every kind takes part in a combat broadcast
    pub fn is_hostile(&self) -> bool {
        true
    }
}

/// The four mutually exclusive behavior modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    #[default]
    Patrolling,
    PlayerDetected,
    Interacting,
    InCombat,
}

impl BehaviorState {
    pub const ALL: [BehaviorState; 4] = [
        BehaviorState::Patrolling,
        BehaviorState::PlayerDetected,
        BehaviorState::Interacting,
        BehaviorState::InCombat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BehaviorState::Patrolling => "Patrolling",
            BehaviorState::PlayerDetected => "PlayerDetected",
            BehaviorState::Interacting => "Interacting",
            BehaviorState::InCombat => "InCombat",
        }
    }
}

impl std::fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn default_prompt() -> String {
    "Press E to interact".to_string()
}

/// Static definition of an NPC, as read from a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcData {
    pub name: String,
    #[serde(default)]
    pub kind: NpcKind,
    /// Spawn position
    pub position: Vec3,
    /// Center of the patrol disc (defaults to the spawn position)
    #[serde(default)]
    pub patrol_origin: Option<Vec3>,
    /// Text shown on the shared prompt while this NPC holds it
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default)]
    pub script: DialogueScript,
    /// Tuning changes on top of the kind's defaults
    #[serde(default)]
    pub behavior: BehaviorOverrides,
}

impl NpcData {
    pub fn new(name: impl Into<String>, kind: NpcKind, position: Vec3) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
            patrol_origin: None,
            prompt: default_prompt(),
            script: DialogueScript::default(),
            behavior: BehaviorOverrides::default(),
        }
    }

    pub fn with_script(mut self, script: DialogueScript) -> Self {
        self.script = script;
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorOverrides) -> Self {
        self.behavior = behavior;
        self
    }

    /// The tuning this NPC actually runs with: the kind's defaults with the
    /// scene's overrides applied
    pub fn resolved_behavior(&self) -> BehaviorConfig {
        self.behavior.apply(BehaviorConfig::for_kind(self.kind))
    }
}

/// A live NPC
#[derive(Debug, Clone)]
pub struct Npc {
    pub id: NpcId,
    pub data: NpcData,
    pub config: BehaviorConfig,
    /// Handle into the motion backend, which owns the position
    pub body: BodyId,
    /// Facing on the horizontal plane (radians)
    pub yaw: f32,
    pub patrol: PatrolRoute,
    pub vertical_velocity: f32,
    pub attack_cooldown: Cooldown,
    pub health: Health,
    state: BehaviorState,
    dialogue_index: usize,
    rng: StdRng,
}

impl Npc {
    pub fn new(id: NpcId, data: NpcData, body: BodyId, seed: u64) -> Self {
        let config = data.resolved_behavior();
        let mut rng = StdRng::seed_from_u64(seed);
        let origin = data.patrol_origin.unwrap_or(data.position);
        let patrol = PatrolRoute::new(&mut rng, origin, config.patrol_radius);
        let health = Health::new(config.max_health);

        Self {
            id,
            data,
            config,
            body,
            yaw: 0.0,
            patrol,
            vertical_velocity: 0.0,
            attack_cooldown: Cooldown::ready(),
            health,
            state: BehaviorState::Patrolling,
            dialogue_index: 0,
            rng,
        }
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn kind(&self) -> NpcKind {
        self.data.kind
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn script(&self) -> &DialogueScript {
        &self.data.script
    }

    /// Index of the line the dialogue is on. Zero outside a session.
    pub fn dialogue_index(&self) -> usize {
        self.dialogue_index
    }

    pub(crate) fn set_dialogue_index(&mut self, index: usize) {
        self.dialogue_index = index;
    }

    /// Whether the shared prompt may point at this NPC
    pub fn is_prompt_eligible(&self) -> bool {
        !matches!(
            self.state,
            BehaviorState::Interacting | BehaviorState::InCombat
        )
    }

    /// Switch state, announcing the change. Same-state calls are silent.
    pub(crate) fn set_state(&mut self, to: BehaviorState, events: &mut Vec<GameEvent>) {
        if self.state == to {
            return;
        }
        let from = self.state;
        self.state = to;
        debug!("{} ({}) {} -> {}", self.id, self.data.name, from, to);
        events.push(GameEvent::StateChanged {
            npc: self.id,
            from,
            to,
        });
    }

    /// Enter a dialogue session at line 0. Accepted from Patrolling as well
    /// as PlayerDetected, so interact works before the NPC's first
    /// detection tick.
    pub fn begin_interaction(&mut self, events: &mut Vec<GameEvent>) -> Result<(), InteractionError> {
        match self.state {
            BehaviorState::InCombat => return Err(InteractionError::InCombat(self.id)),
            BehaviorState::Interacting => return Err(InteractionError::AlreadyInteracting(self.id)),
            BehaviorState::Patrolling | BehaviorState::PlayerDetected => {}
        }
        if self.data.script.is_empty() {
            return Err(InteractionError::EmptyScript(self.id));
        }
        self.dialogue_index = 0;
        self.set_state(BehaviorState::Interacting, events);
        Ok(())
    }

    /// Leave a dialogue session. Combat is never undone here.
    pub fn end_interaction(&mut self, events: &mut Vec<GameEvent>) {
        self.dialogue_index = 0;
        if self.state == BehaviorState::Interacting {
            self.set_state(BehaviorState::Patrolling, events);
        }
    }

    /// Switch to combat. Sticky: nothing in this crate leaves InCombat.
    pub fn enter_combat(&mut self, events: &mut Vec<GameEvent>) {
        self.set_state(BehaviorState::InCombat, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::DialogueScript;

    fn npc_with_script(lines: &[&str]) -> Npc {
        let data = NpcData::new("Guard", NpcKind::Grunt, Vec3::ZERO)
            .with_script(DialogueScript::from_plain_lines(lines));
        Npc::new(NpcId(1), data, BodyId(0), 42)
    }

    #[test]
    fn test_new_npc_patrols() {
        let npc = npc_with_script(&["Hi"]);
        assert_eq!(npc.state(), BehaviorState::Patrolling);
        assert_eq!(npc.dialogue_index(), 0);
        assert_eq!(npc.health.current(), 50.0);
    }

    #[test]
    fn test_begin_interaction_rejects_busy_npc() {
        let mut events = Vec::new();
        let mut npc = npc_with_script(&["Hi"]);
        npc.begin_interaction(&mut events).unwrap();
        assert_eq!(
            npc.begin_interaction(&mut events),
            Err(InteractionError::AlreadyInteracting(NpcId(1)))
        );

        npc.enter_combat(&mut events);
        assert_eq!(
            npc.begin_interaction(&mut events),
            Err(InteractionError::InCombat(NpcId(1)))
        );
    }

    #[test]
    fn test_empty_script_is_declined() {
        let mut events = Vec::new();
        let mut npc = npc_with_script(&[]);
        assert_eq!(
            npc.begin_interaction(&mut events),
            Err(InteractionError::EmptyScript(NpcId(1)))
        );
        assert_eq!(npc.state(), BehaviorState::Patrolling);
        assert!(events.is_empty());
    }

    #[test]
    fn test_end_interaction_resets_index() {
        let mut events = Vec::new();
        let mut npc = npc_with_script(&["a", "b"]);
        npc.begin_interaction(&mut events).unwrap();
        npc.set_dialogue_index(1);
        npc.end_interaction(&mut events);
        assert_eq!(npc.dialogue_index(), 0);
        assert_eq!(npc.state(), BehaviorState::Patrolling);
    }

    #[test]
    fn test_end_interaction_keeps_combat() {
        let mut events = Vec::new();
        let mut npc = npc_with_script(&["a"]);
        npc.begin_interaction(&mut events).unwrap();
        npc.enter_combat(&mut events);
        npc.end_interaction(&mut events);
        assert_eq!(npc.state(), BehaviorState::InCombat);
    }

    #[test]
    fn test_state_change_emits_once() {
        let mut events = Vec::new();
        let mut npc = npc_with_script(&["a"]);
        npc.set_state(BehaviorState::PlayerDetected, &mut events);
        npc.set_state(BehaviorState::PlayerDetected, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_behavior_override_layers_on_kind_defaults() {
        let data = NpcData::new("Warlord", NpcKind::Boss, Vec3::ZERO);
        assert_eq!(data.prompt, "Press E to interact");
        assert_eq!(data.resolved_behavior().attack.damage, 15.0);

        let data = data.with_behavior(BehaviorOverrides {
            detection_radius: Some(4.0),
            ..Default::default()
        });
        let resolved = data.resolved_behavior();
        assert_eq!(resolved.detection_radius, 4.0);
        assert_eq!(resolved.attack.damage, 15.0);
        assert_eq!(resolved.max_health, 150.0);
    }

    #[test]
    fn test_patrolling_npc_can_be_talked_to() {
        let mut events = Vec::new();
        let mut npc = npc_with_script(&["Hi"]);
        assert_eq!(npc.state(), BehaviorState::Patrolling);
        npc.begin_interaction(&mut events).unwrap();
        assert_eq!(npc.state(), BehaviorState::Interacting);
    }

    #[test]
    fn test_boss_fires_attack_trigger() {
        assert_eq!(NpcKind::Boss.attack_trigger(), Some("Attack"));
        assert_eq!(NpcKind::Grunt.attack_trigger(), None);
    }
}
