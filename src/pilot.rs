//! Scripted stand-in for a human player in headless runs
//!
//! The pilot walks up to each NPC that has something to say, talks it through
//! (picking a fixed option when offered a choice), and then fights whatever
//! turned hostile.

use std::collections::HashSet;

use glam::Vec3;
use tracing::{debug, info};
use warden_core::heading::yaw_of;
use warden_core::CharacterMotion;
use warden_game::{BehaviorState, InputAction, InputState, NpcId, Simulation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Approach,
    Talking(NpcId),
    Brawl,
}

/// Produces one tick of input at a time
pub struct DemoPilot {
    choice: usize,
    read_ticks: u32,
    phase: Phase,
    visited: HashSet<NpcId>,
    wait: u32,
}

impl DemoPilot {
    pub fn new(choice: usize, read_ticks: u32) -> Self {
        Self {
            choice,
            read_ticks: read_ticks.max(1),
            phase: Phase::Approach,
            visited: HashSet::new(),
            wait: 0,
        }
    }

    /// Decide this tick's input. Option picks go straight to the simulation,
    /// the way a UI button click would.
    pub fn next_input<M: CharacterMotion + ?Sized>(&mut self, sim: &mut Simulation, motion: &M) -> InputState {
        let mut input = InputState::new();
        let Some(player_pos) = sim.player().and_then(|p| motion.position(p.body)) else {
            return input;
        };

        match self.phase {
            Phase::Approach => self.approach(sim, motion, player_pos, &mut input),
            Phase::Talking(npc) => self.talk(sim, npc, &mut input),
            Phase::Brawl => self.brawl(sim, motion, player_pos, &mut input),
        }
        input
    }

    fn approach<M: CharacterMotion + ?Sized>(
        &mut self,
        sim: &mut Simulation,
        motion: &M,
        player_pos: Vec3,
        input: &mut InputState,
    ) {
        if let Some(session) = sim.dialogue().session() {
            info!("Pilot is talking to {}", session.npc);
            self.visited.insert(session.npc);
            self.phase = Phase::Talking(session.npc);
            self.wait = 0;
            return;
        }

        let target = sim
            .npcs()
            .iter()
            .filter(|npc| !npc.script().is_empty() && !self.visited.contains(&npc.id))
            .filter(|npc| npc.is_prompt_eligible())
            .find_map(|npc| motion.position(npc.body).map(|pos| (npc.id, pos)));

        let Some((npc, npc_pos)) = target else {
            info!("Pilot has nobody left to talk to");
            self.phase = Phase::Brawl;
            return;
        };

        if sim.prompt().holder() == Some(npc) {
            input.press(InputAction::Interact);
        } else {
            self.walk_towards(sim, player_pos, npc_pos, input);
        }
    }

    fn talk(&mut self, sim: &mut Simulation, npc: NpcId, input: &mut InputState) {
        if !sim.dialogue().is_active() {
            debug!("Pilot finished with {}", npc);
            self.phase = Phase::Approach;
            return;
        }

        self.wait += 1;
        if self.wait < self.read_ticks {
            return;
        }
        self.wait = 0;

        let options = sim
            .dialogue()
            .current_line(sim.npcs())
            .map(|line| line.options.len())
            .unwrap_or(0);
        if options == 0 {
            input.press(InputAction::AdvanceDialogue);
            return;
        }

        let pick = self.choice.min(options - 1);
        info!("Pilot picks option {}", pick + 1);
        if let Err(e) = sim.select_option(pick) {
            debug!("Pilot option rejected: {}", e);
        }
    }

    fn brawl<M: CharacterMotion + ?Sized>(
        &mut self,
        sim: &mut Simulation,
        motion: &M,
        player_pos: Vec3,
        input: &mut InputState,
    ) {
        let nearest = sim
            .npcs()
            .iter()
            .filter(|npc| npc.state() == BehaviorState::InCombat && npc.health.is_alive())
            .filter_map(|npc| motion.position(npc.body))
            .min_by(|a, b| a.distance(player_pos).total_cmp(&b.distance(player_pos)));

        let Some(enemy_pos) = nearest else {
            return;
        };
        let reach = sim.player().map(|p| p.attack.range).unwrap_or_default();
        if enemy_pos.distance(player_pos) <= reach {
            input.press(InputAction::PrimaryAttack);
        } else {
            self.walk_towards(sim, player_pos, enemy_pos, input);
        }
    }

    fn walk_towards(&self, sim: &mut Simulation, from: Vec3, to: Vec3, input: &mut InputState) {
        if let (Some(player), Some(yaw)) = (sim.player_mut(), yaw_of(to - from)) {
            player.controller.yaw = yaw;
            input.press(InputAction::MoveForward);
        }
    }
}
