//! Trigger events handed to game code, and delayed actions run by the level clock.

use glam::Vec2;

use crate::api::types::EntityId;

/// A game-defined hook that fired this frame. `id` is the number the game
/// registered; entity ids say who was involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    HeroCollide { id: u32, hero: EntityId, obstacle: EntityId },
    EnemyCollide { id: u32, enemy: EntityId, obstacle: EntityId },
    ProjectileCollide { id: u32, projectile: EntityId, obstacle: EntityId },
    EnemyDefeated { id: u32, enemy: EntityId },
    Touch { id: u32, entity: EntityId },
    Timer { id: u32 },
    EntityTimer { id: u32, entity: EntityId },
}

impl TriggerEvent {
    pub fn id(&self) -> u32 {
        match *self {
            TriggerEvent::HeroCollide { id, .. }
            | TriggerEvent::EnemyCollide { id, .. }
            | TriggerEvent::ProjectileCollide { id, .. }
            | TriggerEvent::EnemyDefeated { id, .. }
            | TriggerEvent::Touch { id, .. }
            | TriggerEvent::Timer { id }
            | TriggerEvent::EntityTimer { id, .. } => id,
        }
    }
}

/// Work queued on the level's timer queue.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TimedAction {
    Fire(TriggerEvent),
    Appear(EntityId),
    Remove { entity: EntityId, quiet: bool },
    EndSpeedBoost { hero: EntityId, boost: Vec2 },
    /// Shrink by `rate` units per second, re-queued every tick interval.
    Shrink { entity: EntityId, rate: Vec2, keep_centered: bool },
    Win,
    Lose,
}
