//! Attack tuning and cooldown timers

use serde::{Deserialize, Serialize};

/// How hard, how far, and how often something hits.
///
/// Fields missing from a config file fall back to the grunt profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackProfile {
    /// Health removed per hit
    pub damage: f32,
    /// Maximum attacker-to-target distance for a hit
    pub range: f32,
    /// Seconds between attacks
    pub cooldown: f32,
}

impl AttackProfile {
    pub fn grunt() -> Self {
        Self {
            damage: 10.0,
            range: 2.0,
            cooldown: 1.0,
        }
    }

    pub fn boss() -> Self {
        Self {
            damage: 15.0,
            range: 2.0,
            cooldown: 1.0,
        }
    }

    pub fn player() -> Self {
        Self {
            damage: 10.0,
            range: 2.0,
            cooldown: 0.5,
        }
    }

    /// Whether a target at `distance` can be hit
    pub fn in_range(&self, distance: f32) -> bool {
        distance <= self.range
    }
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self::grunt()
    }
}

/// Counts down to the next allowed attack
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    /// A cooldown that is ready to fire
    pub fn ready() -> Self {
        Self::default()
    }

    /// Seconds until the next attack is allowed
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Advance the timer
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    /// Start a new cooldown if ready. Returns false (and changes nothing) otherwise.
    pub fn try_fire(&mut self, duration: f32) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.remaining = duration.max(0.0);
        true
    }
}
