//! Warden Game - NPC behavior, interaction, dialogue, and combat
//!
//! Provides the per-NPC behavior state machine, the shared interaction prompt,
//! the dialogue engine, combat resolution, the player, and the
//! [`Simulation`] that runs them together one fixed tick at a time.

pub mod combat;
pub mod dialogue;
pub mod error;
pub mod events;
pub mod input;
pub mod npc;
pub mod player;
pub mod prompt;
pub mod simulation;

pub use combat::{deal_damage, AttackProfile, Cooldown, DamageReport, Health};
pub use dialogue::{
    AdvanceOutcome, DialogueEngine, DialogueLine, DialogueOption, DialogueScript, OptionAction,
    SelectOutcome, SessionEndReason, END_OF_DIALOGUE,
};
pub use error::{InteractionError, ScriptError};
pub use events::{Actor, GameEvent};
pub use input::{InputAction, InputBindings, InputHandler, InputState};
pub use npc::{AttackOverrides, BehaviorConfig, BehaviorOverrides, BehaviorState, Npc, NpcData, NpcId, NpcKind, NpcManager};
pub use player::{AttackOutcome, MovementConfig, Player, PlayerConfig, PlayerController};
pub use prompt::{PromptConfig, PromptCoordinator};
pub use simulation::{Simulation, SimulationConfig};
