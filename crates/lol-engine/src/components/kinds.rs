//! Per-kind state carried by entities.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::animation::Animation;

/// A trigger id guarded by a minimum collected-goodie count per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerGate {
    pub id: u32,
    pub activation: [i32; 4],
}

impl TriggerGate {
    pub fn new(id: u32, activation: [i32; 4]) -> Self {
        Self { id, activation }
    }

    /// An ungated trigger.
    pub fn always(id: u32) -> Self {
        Self::new(id, [0; 4])
    }

    pub fn is_open(&self, collected: &[i32; 4]) -> bool {
        meets_threshold(collected, &self.activation)
    }
}

/// True when every slot of `collected` is at least the matching threshold.
pub fn meets_threshold(collected: &[i32; 4], threshold: &[i32; 4]) -> bool {
    collected.iter().zip(threshold).all(|(have, need)| have >= need)
}

/// Optional hero animations, switched in by hero actions.
#[derive(Debug, Clone, Default)]
pub struct HeroAnimations {
    pub jump: Option<Animation>,
    pub crawl: Option<Animation>,
    pub throw: Option<Animation>,
    pub invincible: Option<Animation>,
}

#[derive(Debug, Clone)]
pub struct Hero {
    /// Collision health. Enemy damage is subtracted from it.
    pub strength: i32,
    /// Seconds of invincibility left.
    pub invincible_remaining: f32,
    pub in_air: bool,
    pub crawling: bool,
    pub jump_impulse: Vec2,
    pub multi_jump: bool,
    /// Rotation added by `increase_rotation`, cleared on landing.
    pub extra_rotation: f32,
    pub jump_sound: Option<String>,
    pub animations: HeroAnimations,
    /// Show the cell matching the collected count of this goodie slot.
    pub(crate) goodie_count_slot: Option<usize>,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            strength: 1,
            invincible_remaining: 0.0,
            in_air: false,
            crawling: false,
            jump_impulse: Vec2::ZERO,
            multi_jump: false,
            extra_rotation: 0.0,
            jump_sound: None,
            animations: HeroAnimations::default(),
            goodie_count_slot: None,
        }
    }
}

impl Hero {
    pub fn is_invincible(&self) -> bool {
        self.invincible_remaining > 0.0
    }
}

/// Steer toward the first visible hero at a fixed speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chase {
    pub speed: f32,
    pub along_x: bool,
    pub along_y: bool,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    /// Subtracted from hero strength on contact; reduced by projectile hits.
    pub damage: i32,
    /// Fired as an enemy-defeated trigger when this enemy is defeated.
    pub defeat_trigger: Option<u32>,
    pub defeat_by_crawl: bool,
    pub immune_to_invincibility: bool,
    pub always_does_damage: bool,
    pub disappear_on_touch: bool,
    pub chase: Option<Chase>,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            damage: 2,
            defeat_trigger: None,
            defeat_by_crawl: false,
            immune_to_invincibility: false,
            always_does_damage: false,
            disappear_on_touch: false,
            chase: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Goodie {
    pub score: [i32; 4],
    pub strength_boost: i32,
    /// Seconds of invincibility granted, added to any remaining.
    pub invincibility: f32,
}

impl Default for Goodie {
    fn default() -> Self {
        Self {
            score: [1, 0, 0, 0],
            strength_boost: 0,
            invincibility: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub capacity: u32,
    pub holding: u32,
    /// Collected goodies required before a hero may arrive.
    pub activation: [i32; 4],
    pub arrival_sound: Option<String>,
}

impl Default for Destination {
    fn default() -> Self {
        Self {
            capacity: 1,
            holding: 0,
            activation: [0; 4],
            arrival_sound: None,
        }
    }
}

impl Destination {
    pub fn accepts(&self, collected: &[i32; 4]) -> bool {
        self.holding < self.capacity && meets_threshold(collected, &self.activation)
    }
}

/// What an obstacle does to a hero that touches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeroCollision {
    /// Scale the hero's velocity.
    Damp(f32),
    /// Add to the hero's velocity; taken back after `duration` seconds when positive.
    SpeedBoost { boost: Vec2, duration: f32 },
    Trigger(TriggerGate),
}

/// Fired when an enemy touches the obstacle, optionally after a delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyTrigger {
    pub gate: TriggerGate,
    pub delay: f32,
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub hero_collision: Option<HeroCollision>,
    pub enemy_trigger: Option<EnemyTrigger>,
    /// When set, projectiles fire this trigger instead of being removed.
    pub projectile_trigger: Option<TriggerGate>,
    /// Added to an enemy's velocity on contact.
    pub enemy_jump: Option<Vec2>,
    pub collide_sound: Option<String>,
    /// Minimum seconds between two collide sounds.
    pub sound_delay: f32,
    pub last_sound_at: f32,
    /// Landing on this obstacle does not re-enable jumping.
    pub no_jump_reenable: bool,
    pub peer: Option<EntityId>,
}

impl Default for Obstacle {
    fn default() -> Self {
        Self {
            hero_collision: None,
            enemy_trigger: None,
            projectile_trigger: None,
            enemy_jump: None,
            collide_sound: None,
            sound_delay: 0.0,
            last_sound_at: f32::NEG_INFINITY,
            no_jump_reenable: false,
            peer: None,
        }
    }
}

impl Obstacle {
    /// The collide sound, if one may play at time `now`. Records the play.
    pub fn take_collide_sound(&mut self, now: f32) -> Option<&str> {
        let sound = self.collide_sound.as_deref()?;
        if now - self.last_sound_at < self.sound_delay {
            return None;
        }
        self.last_sound_at = now;
        Some(sound)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Subtracted from an enemy's damage on hit.
    pub strength: i32,
    /// Where the last throw started, for range culling.
    pub origin: Vec2,
    pub pool_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_opens_when_every_slot_meets_threshold() {
        let gate = TriggerGate::new(4, [2, 0, 1, 0]);
        assert!(!gate.is_open(&[1, 0, 1, 0]));
        assert!(!gate.is_open(&[2, 0, 0, 0]));
        assert!(gate.is_open(&[2, 0, 1, 0]));
        assert!(gate.is_open(&[5, 3, 2, 1]));
        assert!(TriggerGate::always(1).is_open(&[0; 4]));
    }

    #[test]
    fn destination_respects_capacity_and_threshold() {
        let mut dest = Destination {
            capacity: 2,
            activation: [1, 0, 0, 0],
            ..Default::default()
        };
        assert!(!dest.accepts(&[0, 0, 0, 0]));
        assert!(dest.accepts(&[1, 0, 0, 0]));
        dest.holding = 2;
        assert!(!dest.accepts(&[9, 9, 9, 9]));
    }

    #[test]
    fn collide_sound_is_rate_limited() {
        let mut obstacle = Obstacle {
            collide_sound: Some("thud".into()),
            sound_delay: 1.0,
            ..Default::default()
        };
        assert_eq!(obstacle.take_collide_sound(0.0), Some("thud"));
        assert_eq!(obstacle.take_collide_sound(0.5), None);
        assert_eq!(obstacle.take_collide_sound(1.2), Some("thud"));
    }

    #[test]
    fn defaults_match_game_conventions() {
        assert_eq!(Hero::default().strength, 1);
        assert_eq!(Enemy::default().damage, 2);
        assert_eq!(Goodie::default().score, [1, 0, 0, 0]);
        assert_eq!(Destination::default().capacity, 1);
    }
}
