//! One fixed-step tick of the whole game
//!
//! [`Simulation`] owns the NPC roster, the prompt coordinator, the dialogue
//! engine, and the player, and runs them in a fixed order each tick. The
//! motion backend is passed in so the same code drives rapier or a flat test
//! floor.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use warden_core::{BodyId, CharacterMotion, TimeConfig};

use crate::dialogue::{AdvanceOutcome, DialogueContext, DialogueEngine, SelectOutcome, SessionEndReason};
use crate::error::InteractionError;
use crate::events::{Actor, GameEvent};
use crate::input::{InputAction, InputState};
use crate::npc::{NpcData, NpcId, NpcManager};
use crate::player::{Player, PlayerConfig};
use crate::prompt::{nearest_eligible, PromptConfig, PromptCoordinator};

/// Everything tunable about a simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Base seed for NPC waypoint generators
    pub seed: u64,
    pub time: TimeConfig,
    pub prompt: PromptConfig,
    pub player: PlayerConfig,
}

/// The game state advanced once per fixed tick
pub struct Simulation {
    pub config: SimulationConfig,
    npcs: NpcManager,
    prompt: PromptCoordinator,
    dialogue: DialogueEngine,
    player: Option<Player>,
    events: Vec<GameEvent>,
    tick: u64,
    warned_missing_player: bool,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let npcs = NpcManager::new(config.seed);
        let prompt = PromptCoordinator::new(config.prompt.clone());
        Self {
            config,
            npcs,
            prompt,
            dialogue: DialogueEngine::new(),
            player: None,
            events: Vec::new(),
            tick: 0,
            warned_missing_player: false,
        }
    }

    /// Put the player on `body`, replacing any previous one
    pub fn spawn_player(&mut self, body: BodyId) {
        let player = Player::new(body, self.config.player.clone());
        self.events.push(GameEvent::HealthChanged {
            actor: Actor::Player,
            current: player.health.current(),
            max: player.health.max(),
        });
        info!("Player spawned on {}", body);
        self.player = Some(player);
        self.warned_missing_player = false;
    }

    pub fn spawn_npc(&mut self, data: NpcData, body: BodyId) -> NpcId {
        self.npcs.spawn(data, body)
    }

    pub fn npcs(&self) -> &NpcManager {
        &self.npcs
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn prompt(&self) -> &PromptCoordinator {
        &self.prompt
    }

    pub fn dialogue(&self) -> &DialogueEngine {
        &self.dialogue
    }

    /// Ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Events produced since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand this tick's events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn split(&mut self) -> (&mut DialogueEngine, DialogueContext<'_>) {
        (
            &mut self.dialogue,
            DialogueContext {
                npcs: &mut self.npcs,
                prompt: &mut self.prompt,
                player: self.player.as_mut(),
                events: &mut self.events,
            },
        )
    }

    fn player_position<M: CharacterMotion + ?Sized>(&self, motion: &M) -> Option<Vec3> {
        self.player.as_ref().and_then(|p| motion.position(p.body))
    }

    /// Run one tick: dialogue input, player attack, player locomotion, NPC
    /// behavior (including strikes on the player), then the prompt poll.
    pub fn fixed_update<M: CharacterMotion + ?Sized>(
        &mut self,
        input: &InputState,
        motion: &mut M,
        dt: f32,
    ) {
        self.tick += 1;

        if self.player.is_none() && !self.warned_missing_player {
            warn!("No player in the scene; interaction and combat against the player are disabled");
            self.warned_missing_player = true;
        }
        if let Some(player) = self.player.as_mut() {
            player.attack_cooldown.tick(dt);
        }

        self.handle_dialogue_input(input, &*motion);

        if input.is_just_pressed(InputAction::PrimaryAttack) {
            if let Some(player) = self.player.as_mut() {
                player.primary_attack(&mut self.npcs, &*motion, &mut self.events);
            }
        }

        if let Some(player) = self.player.as_mut() {
            let body = player.body;
            let enabled = player.input_enabled();
            player.controller.fixed_update(motion, body, input, enabled, dt);
        }

        let player_pos = self.player_position(&*motion);
        let player_health = self.player.as_mut().map(|p| &mut p.health);
        self.npcs
            .update(motion, player_pos, player_health, dt, &mut self.events);

        self.prompt
            .update(dt, &self.npcs, player_pos, &*motion, &mut self.events);
    }

    fn handle_dialogue_input<M: CharacterMotion + ?Sized>(&mut self, input: &InputState, motion: &M) {
        let result = if self.dialogue.is_active() {
            if input.is_just_pressed(InputAction::CancelDialogue) {
                self.cancel_dialogue()
            } else if input.is_just_pressed(InputAction::AdvanceDialogue) {
                self.advance_dialogue().map(|_| ())
            } else {
                Ok(())
            }
        } else if input.is_just_pressed(InputAction::Interact) {
            self.interact(motion).map(|_| ())
        } else {
            Ok(())
        };

        match result {
            Ok(()) => {}
            Err(InteractionError::NoTarget) => debug!("Interact pressed with nobody in range"),
            Err(InteractionError::NoPlayer) => debug!("Interact pressed without a player"),
            Err(error) => warn!("Request declined: {}", error),
        }
    }

    /// Talk to the closest NPC in range
    pub fn interact<M: CharacterMotion + ?Sized>(&mut self, motion: &M) -> Result<NpcId, InteractionError> {
        if let Some(session) = self.dialogue.session() {
            return Err(InteractionError::SessionActive(session.npc));
        }
        let player_pos = self
            .player_position(motion)
            .ok_or(InteractionError::NoPlayer)?;
        let target = nearest_eligible(&self.npcs, player_pos, motion).ok_or(InteractionError::NoTarget)?;
        let (engine, mut ctx) = self.split();
        engine.begin(target, &mut ctx)?;
        Ok(target)
    }

    /// Talk to a specific NPC, if it is within its interaction radius
    pub fn interact_with<M: CharacterMotion + ?Sized>(
        &mut self,
        npc: NpcId,
        motion: &M,
    ) -> Result<(), InteractionError> {
        let player_pos = self
            .player_position(motion)
            .ok_or(InteractionError::NoPlayer)?;
        let target = self.npcs.get(npc).ok_or(InteractionError::UnknownNpc(npc))?;
        let npc_pos = motion
            .position(target.body)
            .ok_or(InteractionError::UnknownNpc(npc))?;
        let distance = npc_pos.distance(player_pos);
        let radius = target.config.interaction_radius;
        if distance > radius {
            return Err(InteractionError::OutOfRange { npc, distance, radius });
        }
        let (engine, mut ctx) = self.split();
        engine.begin(npc, &mut ctx)
    }

    /// Linear "next" on the active dialogue
    pub fn advance_dialogue(&mut self) -> Result<AdvanceOutcome, InteractionError> {
        let (engine, mut ctx) = self.split();
        engine.advance(&mut ctx)
    }

    /// Option click from the dialogue UI
    pub fn select_option(&mut self, index: usize) -> Result<SelectOutcome, InteractionError> {
        let (engine, mut ctx) = self.split();
        engine.select_option(index, &mut ctx)
    }

    pub fn cancel_dialogue(&mut self) -> Result<(), InteractionError> {
        let (engine, mut ctx) = self.split();
        engine.cancel(&mut ctx)
    }

    /// End any session and take the prompt down
    pub fn teardown(&mut self) {
        let (engine, mut ctx) = self.split();
        engine.end(SessionEndReason::Teardown, &mut ctx);
        self.prompt.clear(&mut self.events);
        info!("Simulation torn down after {} ticks", self.tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::{DialogueLine, DialogueOption, DialogueScript, OptionAction};
    use crate::npc::{BehaviorState, NpcKind};
    use warden_core::FlatGround;

    const DT: f32 = 1.0 / 60.0;

    fn pressed(action: InputAction) -> InputState {
        let mut input = InputState::new();
        input.press(action);
        input
    }

    fn fight_script() -> DialogueScript {
        DialogueScript::new(vec![
            DialogueLine::plain("Hello"),
            DialogueLine::with_options(
                "Fight?",
                vec![
                    DialogueOption::new("Yes", -1, OptionAction::StartCombat),
                    DialogueOption::new("No", -1, OptionAction::EndDialogue),
                ],
            ),
        ])
    }

    fn world(npcs: Vec<NpcData>) -> (FlatGround, Simulation) {
        let mut ground = FlatGround::default();
        let mut sim = Simulation::new(SimulationConfig::default());
        let player_body = ground.spawn(Vec3::ZERO);
        sim.spawn_player(player_body);
        for data in npcs {
            let body = ground.spawn(data.position);
            sim.spawn_npc(data, body);
        }
        (ground, sim)
    }

    fn state(sim: &Simulation, id: u64) -> Option<BehaviorState> {
        sim.npcs().get(NpcId(id)).map(|n| n.state())
    }

    #[test]
    fn test_hello_fight_scenario() {
        let (mut ground, mut sim) = world(vec![
            NpcData::new("Sentry", NpcKind::Grunt, Vec3::new(1.0, 0.0, 0.0)).with_script(fight_script()),
            NpcData::new("Scout", NpcKind::Grunt, Vec3::new(60.0, 0.0, 0.0)),
            NpcData::new("Warlord", NpcKind::Boss, Vec3::new(-80.0, 0.0, 0.0)),
        ]);
        sim.fixed_update(&InputState::new(), &mut ground, DT);
        sim.drain_events();

        sim.fixed_update(&pressed(InputAction::Interact), &mut ground, DT);
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::LineRendered {
            npc: NpcId(1),
            text: "Hello".into(),
            index: 0,
            total: 2,
            is_last: false,
        }));
        assert!(events.contains(&GameEvent::PlayerInputChanged { enabled: false }));
        assert_eq!(state(&sim, 1), Some(BehaviorState::Interacting));

        sim.fixed_update(&pressed(InputAction::AdvanceDialogue), &mut ground, DT);
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::LineRendered {
            npc: NpcId(1),
            text: "Fight?".into(),
            index: 1,
            total: 2,
            is_last: true,
        }));
        assert!(events.contains(&GameEvent::OptionsRendered {
            npc: NpcId(1),
            options: vec!["Yes".into(), "No".into()],
        }));

        assert_eq!(sim.advance_dialogue(), Ok(AdvanceOutcome::Blocked));
        assert_eq!(sim.npcs().get(NpcId(1)).map(|n| n.dialogue_index()), Some(1));

        assert_eq!(
            sim.select_option(0),
            Ok(SelectOutcome::Ended(SessionEndReason::CombatStarted))
        );
        for id in 1..=3 {
            assert_eq!(state(&sim, id), Some(BehaviorState::InCombat));
        }
        assert!(!sim.dialogue().is_active());
        assert_eq!(sim.player().map(|p| p.input_enabled()), Some(true));
    }

    #[test]
    fn test_two_npc_prompt_scenario() {
        let (mut ground, mut sim) = world(vec![
            NpcData::new("Far", NpcKind::Grunt, Vec3::new(1.5, 0.0, 0.0)).with_script(fight_script()),
            NpcData::new("Near", NpcKind::Grunt, Vec3::new(0.0, 0.0, 1.0)).with_script(fight_script()),
        ]);
        for _ in 0..15 {
            sim.fixed_update(&InputState::new(), &mut ground, DT);
        }
        assert_eq!(sim.prompt().holder(), Some(NpcId(2)));
        let shown: Vec<_> = sim.drain_events().into_iter().filter(GameEvent::is_prompt).collect();
        assert_eq!(shown.len(), 1, "one show, no flicker: {shown:?}");

        // Talking to the near NPC hands the prompt to the other one within the tick
        sim.fixed_update(&pressed(InputAction::Interact), &mut ground, DT);
        assert_eq!(state(&sim, 2), Some(BehaviorState::Interacting));
        assert_eq!(sim.prompt().holder(), Some(NpcId(1)));
        let prompt_events: Vec<_> = sim.drain_events().into_iter().filter(GameEvent::is_prompt).collect();
        assert_eq!(
            prompt_events,
            vec![
                GameEvent::PromptHidden,
                GameEvent::PromptShown {
                    npc: NpcId(1),
                    message: "Press E to interact".into(),
                },
            ]
        );

        // A second interact while the session runs is declined
        assert_eq!(sim.interact(&ground), Err(InteractionError::SessionActive(NpcId(2))));
    }

    #[test]
    fn test_lone_npc_session_hides_prompt() {
        let (mut ground, mut sim) = world(vec![
            NpcData::new("Only", NpcKind::Grunt, Vec3::new(1.0, 0.0, 0.0)).with_script(fight_script()),
        ]);
        for _ in 0..15 {
            sim.fixed_update(&InputState::new(), &mut ground, DT);
        }
        assert_eq!(sim.prompt().holder(), Some(NpcId(1)));

        sim.fixed_update(&pressed(InputAction::Interact), &mut ground, DT);
        assert_eq!(sim.prompt().holder(), None);

        // Cancel brings the prompt back on the same tick
        sim.drain_events();
        sim.fixed_update(&pressed(InputAction::CancelDialogue), &mut ground, DT);
        assert_eq!(sim.prompt().holder(), Some(NpcId(1)));
        assert_eq!(state(&sim, 1), Some(BehaviorState::PlayerDetected));
    }

    #[test]
    fn test_interact_with_nobody_in_range() {
        let (mut ground, mut sim) = world(vec![
            NpcData::new("Distant", NpcKind::Grunt, Vec3::new(30.0, 0.0, 0.0)).with_script(fight_script()),
        ]);
        assert_eq!(sim.interact(&ground), Err(InteractionError::NoTarget));
        sim.fixed_update(&pressed(InputAction::Interact), &mut ground, DT);
        assert!(!sim.dialogue().is_active());
    }

    #[test]
    fn test_interact_with_checks_range() {
        let (ground, mut sim) = world(vec![
            NpcData::new("Distant", NpcKind::Grunt, Vec3::new(3.0, 0.0, 0.0)).with_script(fight_script()),
        ]);
        assert!(matches!(
            sim.interact_with(NpcId(1), &ground),
            Err(InteractionError::OutOfRange { npc: NpcId(1), .. })
        ));
        assert_eq!(
            sim.interact_with(NpcId(9), &ground),
            Err(InteractionError::UnknownNpc(NpcId(9)))
        );
    }

    #[test]
    fn test_missing_player_degrades_to_noop() {
        let mut ground = FlatGround::default();
        let mut sim = Simulation::new(SimulationConfig::default());
        let body = ground.spawn(Vec3::new(1.0, 0.0, 0.0));
        sim.spawn_npc(
            NpcData::new("Lonely", NpcKind::Grunt, Vec3::new(1.0, 0.0, 0.0)).with_script(fight_script()),
            body,
        );

        for _ in 0..30 {
            sim.fixed_update(&pressed(InputAction::Interact), &mut ground, DT);
        }
        assert_eq!(sim.interact(&ground), Err(InteractionError::NoPlayer));
        assert_eq!(state(&sim, 1), Some(BehaviorState::Patrolling));
        assert_eq!(sim.prompt().holder(), None);
        assert_eq!(sim.tick_count(), 30);
    }

    #[test]
    fn test_npcs_in_combat_wear_the_player_down() {
        let (mut ground, mut sim) = world(vec![
            NpcData::new("Sentry", NpcKind::Grunt, Vec3::new(1.0, 0.0, 0.0)).with_script(fight_script()),
        ]);
        sim.interact(&ground).unwrap();
        sim.advance_dialogue().unwrap();
        sim.select_option(0).unwrap();

        // Three seconds next to a grunt: a strike per second
        for _ in 0..180 {
            sim.fixed_update(&InputState::new(), &mut ground, DT);
        }
        let health = sim.player().map(|p| p.health.current()).unwrap_or_default();
        assert!((60.0..=80.0).contains(&health), "health {health}");
        assert!(sim.prompt().holder().is_none(), "NPCs in combat are not talkable");
    }

    #[test]
    fn test_player_attack_hits_npc_in_range() {
        let (mut ground, mut sim) = world(vec![
            NpcData::new("Sentry", NpcKind::Grunt, Vec3::new(1.0, 0.0, 0.0)).with_script(fight_script()),
        ]);
        sim.fixed_update(&pressed(InputAction::PrimaryAttack), &mut ground, DT);
        assert_eq!(sim.npcs().get(NpcId(1)).map(|n| n.health.current()), Some(40.0));
    }

    #[test]
    fn test_teardown_closes_everything() {
        let (mut ground, mut sim) = world(vec![
            NpcData::new("Sentry", NpcKind::Grunt, Vec3::new(1.0, 0.0, 0.0)).with_script(fight_script()),
            NpcData::new("Other", NpcKind::Grunt, Vec3::new(0.0, 0.0, 1.5)).with_script(fight_script()),
        ]);
        sim.fixed_update(&pressed(InputAction::Interact), &mut ground, DT);
        assert!(sim.dialogue().is_active());
        sim.drain_events();

        sim.teardown();
        let events = sim.drain_events();
        assert!(!sim.dialogue().is_active());
        assert_eq!(sim.prompt().holder(), None);
        assert!(events.contains(&GameEvent::DialogueClosed {
            npc: NpcId(1),
            reason: SessionEndReason::Teardown,
        }));
        assert!(events.contains(&GameEvent::PromptHidden));
    }
}
