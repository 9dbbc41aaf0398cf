//! Session lifecycle and line traversal

use serde::Serialize;
use tracing::{debug, info, warn};

use super::DialogueLine;
use crate::error::InteractionError;
use crate::events::GameEvent;
use crate::npc::{NpcId, NpcManager};
use crate::player::Player;
use crate::prompt::PromptCoordinator;

/// Why a session closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndReason {
    /// Advanced past the last line
    Exhausted,
    /// An option with no jump target was picked
    OptionEnded,
    /// An option carried the EndDialogue action
    EndDialogueAction,
    /// An option carried the StartCombat action
    CombatStarted,
    /// The player backed out
    Cancelled,
    /// An option pointed past the end of the script
    InvalidJump,
    /// The simulation shut down
    Teardown,
}

/// The one dialogue currently bound to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionSession {
    pub npc: NpcId,
}

/// Result of a linear advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to this line
    Rendered(usize),
    /// The current line has options; nothing changed
    Blocked,
    /// The script ran out and the session closed
    Ended,
}

/// Result of picking an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Jumped(usize),
    Ended(SessionEndReason),
}

/// Everything a session touches besides itself
pub struct DialogueContext<'a> {
    pub npcs: &'a mut NpcManager,
    pub prompt: &'a mut PromptCoordinator,
    pub player: Option<&'a mut Player>,
    pub events: &'a mut Vec<GameEvent>,
}

impl DialogueContext<'_> {
    fn set_player_input(&mut self, enabled: bool) {
        match self.player.as_deref_mut() {
            Some(player) => player.set_input_enabled(enabled, self.events),
            None => debug!("No player to {} input for", if enabled { "enable" } else { "disable" }),
        }
    }
}

/// Runs at most one dialogue session at a time
#[derive(Debug, Clone, Default)]
pub struct DialogueEngine {
    session: Option<InteractionSession>,
}

impl DialogueEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<InteractionSession> {
        self.session
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The line the session is on
    pub fn current_line<'n>(&self, npcs: &'n NpcManager) -> Option<&'n DialogueLine> {
        let session = self.session?;
        let npc = npcs.get(session.npc)?;
        npc.script().line(npc.dialogue_index())
    }

    /// Open a session with `npc` and show its first line
    pub fn begin(&mut self, npc: NpcId, ctx: &mut DialogueContext<'_>) -> Result<(), InteractionError> {
        if let Some(session) = self.session {
            return Err(InteractionError::SessionActive(session.npc));
        }
        let target = ctx
            .npcs
            .get_mut(npc)
            .ok_or(InteractionError::UnknownNpc(npc))?;
        target.begin_interaction(ctx.events)?;
        info!("Dialogue started with {} ({})", npc, target.name());

        self.session = Some(InteractionSession { npc });
        ctx.prompt.session_started(ctx.events);
        ctx.set_player_input(false);
        ctx.events.push(GameEvent::DialogueOpened { npc });
        self.render(ctx);
        Ok(())
    }

    /// Linear "next". Blocked on lines with options.
    pub fn advance(&mut self, ctx: &mut DialogueContext<'_>) -> Result<AdvanceOutcome, InteractionError> {
        let session = self.session.ok_or(InteractionError::NoSession)?;
        let npc = ctx
            .npcs
            .get_mut(session.npc)
            .ok_or(InteractionError::UnknownNpc(session.npc))?;

        let index = npc.dialogue_index();
        if npc.script().line(index).is_some_and(DialogueLine::has_options) {
            debug!("Line {} of {} waits for an option", index, session.npc);
            return Ok(AdvanceOutcome::Blocked);
        }

        let next = index + 1;
        if next >= npc.script().len() {
            self.end(SessionEndReason::Exhausted, ctx);
            return Ok(AdvanceOutcome::Ended);
        }
        npc.set_dialogue_index(next);
        self.render(ctx);
        Ok(AdvanceOutcome::Rendered(next))
    }

    /// Pick option `index` on the current line
    pub fn select_option(
        &mut self,
        index: usize,
        ctx: &mut DialogueContext<'_>,
    ) -> Result<SelectOutcome, InteractionError> {
        let session = self.session.ok_or(InteractionError::NoSession)?;
        let npc = ctx
            .npcs
            .get(session.npc)
            .ok_or(InteractionError::UnknownNpc(session.npc))?;
        let line_index = npc.dialogue_index();
        let script_len = npc.script().len();
        let line = npc
            .script()
            .line(line_index)
            .ok_or(InteractionError::NoOptions)?;
        if !line.has_options() {
            return Err(InteractionError::NoOptions);
        }
        let option = line
            .options
            .get(index)
            .cloned()
            .ok_or(InteractionError::InvalidOption {
                index,
                available: line.options.len(),
            })?;
        info!(
            "Option '{}' chosen on {} (action {:?}, next {})",
            option.text, session.npc, option.action, option.next
        );

        match option.action {
            super::OptionAction::StartCombat => {
                ctx.npcs.broadcast_combat(ctx.events);
                self.end(SessionEndReason::CombatStarted, ctx);
                return Ok(SelectOutcome::Ended(SessionEndReason::CombatStarted));
            }
            super::OptionAction::EndDialogue => {
                self.end(SessionEndReason::EndDialogueAction, ctx);
                return Ok(SelectOutcome::Ended(SessionEndReason::EndDialogueAction));
            }
            super::OptionAction::None => {}
        }

        match option.jump_target() {
            Some(target) if target < script_len => {
                if let Some(npc) = ctx.npcs.get_mut(session.npc) {
                    npc.set_dialogue_index(target);
                }
                self.render(ctx);
                Ok(SelectOutcome::Jumped(target))
            }
            Some(target) => {
                warn!(
                    "Option '{}' on {} jumps to line {} of {}; closing dialogue",
                    option.text, session.npc, target, script_len
                );
                self.end(SessionEndReason::InvalidJump, ctx);
                Ok(SelectOutcome::Ended(SessionEndReason::InvalidJump))
            }
            None => {
                self.end(SessionEndReason::OptionEnded, ctx);
                Ok(SelectOutcome::Ended(SessionEndReason::OptionEnded))
            }
        }
    }

    /// Close the session no matter where it is
    pub fn cancel(&mut self, ctx: &mut DialogueContext<'_>) -> Result<(), InteractionError> {
        if self.session.is_none() {
            return Err(InteractionError::NoSession);
        }
        self.end(SessionEndReason::Cancelled, ctx);
        Ok(())
    }

    /// Tear the session down. Returns false when there was none.
    pub fn end(&mut self, reason: SessionEndReason, ctx: &mut DialogueContext<'_>) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        if let Some(npc) = ctx.npcs.get_mut(session.npc) {
            npc.end_interaction(ctx.events);
        }
        ctx.set_player_input(true);
        ctx.events.push(GameEvent::DialogueClosed {
            npc: session.npc,
            reason,
        });
        ctx.prompt.release();
        info!("Dialogue with {} ended ({:?})", session.npc, reason);
        true
    }

    fn render(&self, ctx: &mut DialogueContext<'_>) {
        let Some(session) = self.session else {
            return;
        };
        let Some(npc) = ctx.npcs.get(session.npc) else {
            return;
        };
        let index = npc.dialogue_index();
        let total = npc.script().len();
        let Some(line) = npc.script().line(index) else {
            return;
        };

        ctx.events.push(GameEvent::LineRendered {
            npc: session.npc,
            text: line.text.clone(),
            index,
            total,
            is_last: index + 1 == total,
        });
        if line.has_options() {
            ctx.events.push(GameEvent::OptionsRendered {
                npc: session.npc,
                options: line.options.iter().map(|o| o.text.clone()).collect(),
            });
        }
    }
}
