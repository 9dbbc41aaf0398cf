//! Combat resolution
//!
//! Health pools, attack profiles, and cooldown-gated damage between the
//! player and NPCs.

pub mod attack;
pub mod health;

pub use attack::{AttackProfile, Cooldown};
pub use health::Health;

use tracing::{debug, info};

use crate::events::{Actor, GameEvent};

/// What a single hit did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    /// Health actually removed (after clamping)
    pub dealt: f32,
    /// Whether this hit took the target from alive to dead
    pub killed: bool,
}

/// Apply damage to a target and announce the new health.
///
/// Emits `HealthChanged` always and `Died` only on the killing blow.
pub fn deal_damage(
    target: Actor,
    health: &mut Health,
    amount: f32,
    events: &mut Vec<GameEvent>,
) -> DamageReport {
    let was_alive = health.is_alive();
    let dealt = health.take_damage(amount);
    let killed = was_alive && !health.is_alive();

    debug!("{} took {:.1} damage ({})", target, dealt, health);
    events.push(GameEvent::HealthChanged {
        actor: target,
        current: health.current(),
        max: health.max(),
    });

    if killed {
        info!("{} died", target);
        events.push(GameEvent::Died { actor: target });
    }

    DamageReport { dealt, killed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deal_damage_reports_death_once() {
        let mut health = Health::new(10.0);
        let mut events = Vec::new();

        let first = deal_damage(Actor::Player, &mut health, 1000.0, &mut events);
        assert_eq!(first.dealt, 10.0);
        assert!(first.killed);
        assert!(events.contains(&GameEvent::Died { actor: Actor::Player }));

        events.clear();
        let second = deal_damage(Actor::Player, &mut health, 5.0, &mut events);
        assert_eq!(second.dealt, 0.0);
        assert!(!second.killed);
        assert_eq!(events.len(), 1, "only a health redraw on an already dead target");
    }
}
