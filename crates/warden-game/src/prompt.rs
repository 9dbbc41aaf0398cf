//! The shared interaction prompt
//!
//! One prompt serves every NPC. The coordinator polls the roster on a fixed
//! interval, picks the closest NPC the player could talk to, and only emits an
//! event when that choice changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;
use warden_core::CharacterMotion;

use crate::events::GameEvent;
use crate::npc::{Npc, NpcId, NpcManager};

/// Prompt coordinator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Seconds between proximity scans
    pub poll_interval: f32,
    /// Keep the prompt hidden for the whole of a dialogue session instead of
    /// letting the next closest NPC pick it up
    pub hide_during_dialogue: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            poll_interval: 0.2,
            hide_during_dialogue: false,
        }
    }
}

/// Closest NPC that is within its own interaction radius and free to talk.
/// Ties keep the NPC found first.
pub fn nearest_eligible<M: CharacterMotion + ?Sized>(
    npcs: &NpcManager,
    player_pos: Vec3,
    motion: &M,
) -> Option<NpcId> {
    let mut best: Option<(NpcId, f32)> = None;
    for npc in npcs.iter().filter(|npc| npc.is_prompt_eligible()) {
        let Some(pos) = motion.position(npc.body) else {
            continue;
        };
        let distance = pos.distance(player_pos);
        if distance > npc.config.interaction_radius {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((npc.id, distance));
        }
    }
    best.map(|(id, _)| id)
}

/// Owns the prompt token: at most one NPC holds it at a time
#[derive(Debug, Clone, Default)]
pub struct PromptCoordinator {
    pub config: PromptConfig,
    holder: Option<NpcId>,
    since_poll: f32,
    repoll_requested: bool,
    suppressed: bool,
}

impl PromptCoordinator {
    pub fn new(config: PromptConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// NPC currently named by the prompt
    pub fn holder(&self) -> Option<NpcId> {
        self.holder
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Advance the poll timer and scan when it is due (or a repoll was requested)
    pub fn update<M: CharacterMotion + ?Sized>(
        &mut self,
        dt: f32,
        npcs: &NpcManager,
        player_pos: Option<Vec3>,
        motion: &M,
        events: &mut Vec<GameEvent>,
    ) {
        self.since_poll += dt;
        if self.repoll_requested || self.since_poll >= self.config.poll_interval {
            self.poll(npcs, player_pos, motion, events);
        }
    }

    /// Scan now
    pub fn poll<M: CharacterMotion + ?Sized>(
        &mut self,
        npcs: &NpcManager,
        player_pos: Option<Vec3>,
        motion: &M,
        events: &mut Vec<GameEvent>,
    ) {
        self.since_poll = 0.0;
        self.repoll_requested = false;

        if self.suppressed {
            self.set_holder(None, events);
            return;
        }

        let nearest = player_pos
            .and_then(|pos| nearest_eligible(npcs, pos, motion))
            .and_then(|id| npcs.get(id));
        self.set_holder(nearest, events);
    }

    fn set_holder(&mut self, npc: Option<&Npc>, events: &mut Vec<GameEvent>) {
        let id = npc.map(|npc| npc.id);
        if id == self.holder {
            return;
        }
        self.holder = id;
        match npc {
            Some(npc) => {
                debug!("Prompt now on {} ({})", npc.id, npc.name());
                events.push(GameEvent::PromptShown {
                    npc: npc.id,
                    message: npc.data.prompt.clone(),
                });
            }
            None => {
                debug!("Prompt hidden");
                events.push(GameEvent::PromptHidden);
            }
        }
    }

    /// Ask for a scan on the next update regardless of the interval
    pub fn request_repoll(&mut self) {
        self.repoll_requested = true;
    }

    pub fn repoll_requested(&self) -> bool {
        self.repoll_requested
    }

    /// Hide the prompt now. The next poll may show it again.
    pub fn hide(&mut self, events: &mut Vec<GameEvent>) {
        self.set_holder(None, events);
    }

    /// A dialogue session opened: hide the prompt and either keep it hidden
    /// or rescan right away, which hands it to another NPC in range.
    pub fn session_started(&mut self, events: &mut Vec<GameEvent>) {
        if self.config.hide_during_dialogue {
            self.suppress(events);
        } else {
            self.hide(events);
            self.request_repoll();
        }
    }

    /// Hide the prompt and keep it hidden until released
    pub fn suppress(&mut self, events: &mut Vec<GameEvent>) {
        self.suppressed = true;
        self.set_holder(None, events);
    }

    /// Stop suppressing and scan again as soon as possible
    pub fn release(&mut self) {
        self.suppressed = false;
        self.request_repoll();
    }

    /// Drop the token, hiding the prompt if it was shown
    pub fn clear(&mut self, events: &mut Vec<GameEvent>) {
        self.set_holder(None, events);
        self.suppressed = false;
        self.repoll_requested = false;
        self.since_poll = 0.0;
    }
}
