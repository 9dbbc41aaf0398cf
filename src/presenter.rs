//! Stand-in UI: turns simulation events into log lines or JSON lines

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tracing::info;
use warden_game::dialogue::line_counter;
use warden_game::GameEvent;

/// How events are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterMode {
    /// Human-readable lines through `tracing`
    Log,
    /// One JSON object per event on the writer
    Json,
}

#[derive(Serialize)]
struct Record<'a> {
    tick: u64,
    #[serde(flatten)]
    event: &'a GameEvent,
}

/// Forwards each tick's events to the chosen output
pub struct Presenter<W: Write> {
    mode: PresenterMode,
    out: W,
}

impl<W: Write> Presenter<W> {
    pub fn new(mode: PresenterMode, out: W) -> Self {
        Self { mode, out }
    }

    pub fn present(&mut self, tick: u64, events: &[GameEvent]) -> Result<()> {
        for event in events {
            match self.mode {
                PresenterMode::Log => info!("[tick {:>5}] {}", tick, describe(event)),
                PresenterMode::Json => {
                    serde_json::to_writer(&mut self.out, &Record { tick, event })?;
                    writeln!(self.out)?;
                }
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// What a player would see or hear for an event
pub fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::PromptShown { message, .. } => format!("prompt: {}", message),
        GameEvent::PromptHidden => "prompt hidden".to_string(),
        GameEvent::DialogueOpened { npc } => format!("dialogue opened with {}", npc),
        GameEvent::LineRendered {
            text,
            index,
            total,
            is_last,
            ..
        } => {
            let button = if *is_last { "Close" } else { "Next" };
            format!("[{}] {} ({})", line_counter(*index, *total), text, button)
        }
        GameEvent::OptionsRendered { options, .. } => {
            let listed: Vec<String> = options
                .iter()
                .enumerate()
                .map(|(i, text)| format!("{}) {}", i + 1, text))
                .collect();
            format!("options: {}", listed.join("  "))
        }
        GameEvent::DialogueClosed { npc, reason } => {
            format!("dialogue with {} closed ({:?})", npc, reason)
        }
        GameEvent::PlayerInputChanged { enabled } => {
            format!("player input {}", if *enabled { "enabled" } else { "disabled" })
        }
        GameEvent::StateChanged { npc, from, to } => format!("{} {} -> {}", npc, from, to),
        GameEvent::CombatStarted { hostiles } => format!("combat! {} hostiles engage", hostiles),
        GameEvent::HealthChanged { actor, current, max } => {
            format!("{} health {:.0}/{:.0}", actor, current, max)
        }
        GameEvent::Died { actor } => format!("{} died", actor),
        GameEvent::AnimationTriggered { actor, trigger } => format!("{} plays '{}'", actor, trigger),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_game::{Actor, NpcId};

    #[test]
    fn test_describe_line_uses_counter_and_close_label() {
        let event = GameEvent::LineRendered {
            npc: NpcId(1),
            text: "Fight?".into(),
            index: 1,
            total: 2,
            is_last: true,
        };
        assert_eq!(describe(&event), "[2/2] Fight? (Close)");
    }

    #[test]
    fn test_describe_health() {
        let event = GameEvent::HealthChanged {
            actor: Actor::Player,
            current: 75.0,
            max: 100.0,
        };
        assert_eq!(describe(&event), "player health 75/100");
    }

    #[test]
    fn test_json_lines() {
        let mut presenter = Presenter::new(PresenterMode::Json, Vec::new());
        presenter
            .present(
                7,
                &[
                    GameEvent::PromptShown {
                        npc: NpcId(2),
                        message: "Press E to interact".into(),
                    },
                    GameEvent::PromptHidden,
                ],
            )
            .unwrap();

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["tick"], 7);
        assert_eq!(first["event"], "prompt_shown");
        assert_eq!(first["npc"], 2);
        assert_eq!(first["message"], "Press E to interact");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "prompt_hidden");
    }
}
