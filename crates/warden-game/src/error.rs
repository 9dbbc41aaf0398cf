use thiserror::Error;

use crate::npc::NpcId;

/// Reasons an interaction or dialogue request is declined.
///
/// None of these are fatal: the simulation logs them and carries on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteractionError {
    #[error("no player is present")]
    NoPlayer,

    #[error("no NPC is in range to interact with")]
    NoTarget,

    #[error("unknown NPC {0}")]
    UnknownNpc(NpcId),

    #[error("{npc} is out of interaction range ({distance:.1} > {radius:.1})")]
    OutOfRange { npc: NpcId, distance: f32, radius: f32 },

    #[error("a dialogue session with {0} is already active")]
    SessionActive(NpcId),

    #[error("{0} is already interacting")]
    AlreadyInteracting(NpcId),

    #[error("{0} is in combat")]
    InCombat(NpcId),

    #[error("{0} has no dialogue lines")]
    EmptyScript(NpcId),

    #[error("no dialogue session is active")]
    NoSession,

    #[error("the current line has no options")]
    NoOptions,

    #[error("option {index} does not exist ({available} available)")]
    InvalidOption { index: usize, available: usize },
}

/// Problems found when validating a dialogue script
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("line {line} option {option} jumps to line {target}, but the script has {len} lines")]
    DanglingJump {
        line: usize,
        option: usize,
        target: i32,
        len: usize,
    },
}
