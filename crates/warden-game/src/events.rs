//! Outbound notifications for the UI and animation layers
//!
//! The simulation never calls into a renderer. Everything a presenter needs
//! (prompt text, dialogue lines, health bars, animation triggers) is pushed
//! as a [`GameEvent`] during the tick and drained by the host afterwards.

use serde::Serialize;

use crate::dialogue::SessionEndReason;
use crate::npc::{BehaviorState, NpcId};

/// Who an event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Player,
    Npc(NpcId),
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Player => write!(f, "player"),
            Actor::Npc(id) => write!(f, "{}", id),
        }
    }
}

/// Something a presenter may want to show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// The shared interaction prompt now belongs to `npc`
    PromptShown { npc: NpcId, message: String },
    /// The shared interaction prompt is hidden
    PromptHidden,
    /// A dialogue surface should open for `npc`
    DialogueOpened { npc: NpcId },
    /// Show a dialogue line. `index` is zero-based.
    LineRendered {
        npc: NpcId,
        text: String,
        index: usize,
        total: usize,
        is_last: bool,
    },
    /// Show selectable options for the current line
    OptionsRendered { npc: NpcId, options: Vec<String> },
    /// The dialogue surface should close
    DialogueClosed { npc: NpcId, reason: SessionEndReason },
    /// Player locomotion was locked or unlocked
    PlayerInputChanged { enabled: bool },
    /// An NPC changed behavior state
    StateChanged {
        npc: NpcId,
        from: BehaviorState,
        to: BehaviorState,
    },
    /// The hostile population switched to combat
    CombatStarted { hostiles: usize },
    /// A health bar needs redrawing
    HealthChanged { actor: Actor, current: f32, max: f32 },
    /// Health reached zero
    Died { actor: Actor },
    /// Fire an animation trigger (advisory)
    AnimationTriggered { actor: Actor, trigger: String },
}

impl GameEvent {
    /// Short name, handy for logs and filters
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::PromptShown { .. } => "prompt_shown",
            GameEvent::PromptHidden => "prompt_hidden",
            GameEvent::DialogueOpened { .. } => "dialogue_opened",
            GameEvent::LineRendered { .. } => "line_rendered",
            GameEvent::OptionsRendered { .. } => "options_rendered",
            GameEvent::DialogueClosed { .. } => "dialogue_closed",
            GameEvent::PlayerInputChanged { .. } => "player_input_changed",
            GameEvent::StateChanged { .. } => "state_changed",
            GameEvent::CombatStarted { .. } => "combat_started",
            GameEvent::HealthChanged { .. } => "health_changed",
            GameEvent::Died { .. } => "died",
            GameEvent::AnimationTriggered { .. } => "animation_triggered",
        }
    }

    /// Whether this event is part of the prompt protocol
    pub fn is_prompt(&self) -> bool {
        matches!(self, GameEvent::PromptShown { .. } | GameEvent::PromptHidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_events_classified() {
        assert!(GameEvent::PromptHidden.is_prompt());
        assert!(!GameEvent::CombatStarted { hostiles: 2 }.is_prompt());
    }

    #[test]
    fn test_actor_display() {
        assert_eq!(Actor::Player.to_string(), "player");
        assert_eq!(Actor::Npc(NpcId(4)).to_string(), "npc#4");
    }
}
