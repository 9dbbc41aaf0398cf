//! Dialogue scripts and the engine that walks them
//!
//! A script is a list of lines. Lines without options are advanced one by one;
//! lines with options wait for a selection, which may run an action and jump.

pub mod engine;

pub use engine::{
    AdvanceOutcome, DialogueContext, DialogueEngine, InteractionSession, SelectOutcome,
    SessionEndReason,
};

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// Jump target meaning "end the dialogue after this option"
pub const END_OF_DIALOGUE: i32 = -1;

fn end_of_dialogue() -> i32 {
    END_OF_DIALOGUE
}

/// Side effect of picking an option. Applied before any jump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionAction {
    #[default]
    None,
    /// Every hostile NPC enters combat and the session ends
    StartCombat,
    /// The session ends
    EndDialogue,
}

/// A selectable answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueOption {
    pub text: String,
    /// Line to jump to; negative ends the dialogue
    #[serde(default = "end_of_dialogue")]
    pub next: i32,
    #[serde(default)]
    pub action: OptionAction,
}

impl DialogueOption {
    pub fn new(text: impl Into<String>, next: i32, action: OptionAction) -> Self {
        Self {
            text: text.into(),
            next,
            action,
        }
    }

    /// The line this option leads to, if any
    pub fn jump_target(&self) -> Option<usize> {
        usize::try_from(self.next).ok()
    }
}

/// One line of text and its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub text: String,
    #[serde(default)]
    pub options: Vec<DialogueOption>,
}

impl DialogueLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(text: impl Into<String>, options: Vec<DialogueOption>) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }

    /// Lines with options block linear advance
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// An NPC's dialogue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueScript {
    lines: Vec<DialogueLine>,
}

impl DialogueScript {
    pub fn new(lines: Vec<DialogueLine>) -> Self {
        Self { lines }
    }

    /// A script that is read straight through, no choices
    pub fn from_plain_lines(lines: &[&str]) -> Self {
        Self::new(lines.iter().map(|text| DialogueLine::plain(*text)).collect())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&DialogueLine> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> &[DialogueLine] {
        &self.lines
    }

    /// Check that every non-negative jump lands on a real line
    pub fn validate(&self) -> Result<(), ScriptError> {
        let len = self.lines.len();
        for (line, entry) in self.lines.iter().enumerate() {
            for (option, choice) in entry.options.iter().enumerate() {
                if let Some(target) = choice.jump_target() {
                    if target >= len {
                        return Err(ScriptError::DanglingJump {
                            line,
                            option,
                            target: choice.next,
                            len,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// "index of total" counter text, 1-based
pub fn line_counter(index: usize, total: usize) -> String {
    format!("{}/{}", index + 1, total)
}
