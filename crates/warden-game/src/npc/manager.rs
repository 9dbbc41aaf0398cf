//! NPC manager: spawn, look up, and update every live NPC

use glam::Vec3;
use tracing::{debug, info};
use warden_core::{BodyId, CharacterMotion};

use super::{BehaviorState, Npc, NpcData, NpcId};
use crate::combat::Health;
use crate::events::GameEvent;

/// Spreads consecutive ids across the seed space
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Owns all NPC instances in discovery order
pub struct NpcManager {
    npcs: Vec<Npc>,
    next_id: u64,
    base_seed: u64,
}

impl NpcManager {
    pub fn new(base_seed: u64) -> Self {
        Self {
            npcs: Vec::new(),
            next_id: 1,
            base_seed,
        }
    }

    fn next_npc_id(&mut self) -> NpcId {
        let id = NpcId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an NPC driving `body`. Each NPC gets its own seeded generator.
    pub fn spawn(&mut self, data: NpcData, body: BodyId) -> NpcId {
        let id = self.next_npc_id();
        let seed = self.base_seed.wrapping_add(id.0.wrapping_mul(SEED_STRIDE));
        info!("Spawned {} '{}' ({})", id, data.name, data.kind.name());
        self.npcs.push(Npc::new(id, data, body, seed));
        id
    }

    pub fn get(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.id == id)
    }

    pub fn get_mut(&mut self, id: NpcId) -> Option<&mut Npc> {
        self.npcs.iter_mut().find(|npc| npc.id == id)
    }

    /// All NPCs in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &Npc> {
        self.npcs.iter()
    }

    pub fn count(&self) -> usize {
        self.npcs.len()
    }

    /// The hostile population
    pub fn hostiles(&self) -> impl Iterator<Item = &Npc> {
        self.npcs.iter().filter(|npc| npc.kind().is_hostile())
    }

    pub fn count_in_state(&self, state: BehaviorState) -> usize {
        self.npcs.iter().filter(|npc| npc.state() == state).count()
    }

    /// Put every hostile NPC into combat in one sweep, wherever it is.
    /// Returns how many hostiles there are.
    pub fn broadcast_combat(&mut self, events: &mut Vec<GameEvent>) -> usize {
        let mut hostiles = 0;
        for npc in self.npcs.iter_mut().filter(|npc| npc.kind().is_hostile()) {
            npc.enter_combat(events);
            hostiles += 1;
        }
        info!("Combat broadcast reached {} hostile NPCs", hostiles);
        events.push(GameEvent::CombatStarted { hostiles });
        hostiles
    }

    /// Tick every NPC against the player's current position
    pub fn update<M: CharacterMotion + ?Sized>(
        &mut self,
        motion: &mut M,
        player_pos: Option<Vec3>,
        mut player_health: Option<&mut Health>,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        for npc in &mut self.npcs {
            npc.tick(motion, player_pos, player_health.as_deref_mut(), dt, events);
        }
    }

    /// Closest hostile within `range` of `position`
    pub fn nearest_hostile_within<M: CharacterMotion + ?Sized>(
        &self,
        position: Vec3,
        range: f32,
        motion: &M,
    ) -> Option<NpcId> {
        let mut best: Option<(NpcId, f32)> = None;
        for npc in self.hostiles() {
            let Some(npc_pos) = motion.position(npc.body) else {
                continue;
            };
            let distance = position.distance(npc_pos);
            if distance > range {
                continue;
            }
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((npc.id, distance));
            }
        }
        if let Some((id, distance)) = best {
            debug!("Nearest hostile in range: {} at {:.2}", id, distance);
        }
        best.map(|(id, _)| id)
    }
}

impl Default for NpcManager {
    fn default() -> Self {
        Self::new(0)
    }
}
