//! A fixed pool of projectiles thrown by heroes.
//!
//! Projectiles are made once, parked off-screen with their bodies disabled,
//! and reused round-robin. A throw whose slot is still in flight is dropped.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::animation::Animator;
use crate::components::entity::EntityKind;
use crate::components::kinds::Projectile;
use crate::core::level::{Level, PARKING};
use crate::core::physics::{BodyDesc, ColliderDesc};

/// How `throw_at` turns a target into a velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimMode {
    /// Unit vector toward the target, times this speed.
    Unit(f32),
    /// Raw hero-to-target offset, times this factor.
    Scaled(f32),
}

#[derive(Debug, Clone)]
pub struct ProjectileConfig {
    pub size: Vec2,
    pub circle: bool,
    /// Subtracted from an enemy's damage on hit.
    pub strength: i32,
    /// Spawn point relative to the hero's centre.
    pub offset: Vec2,
    /// Velocity given by `throw_fixed`.
    pub fixed_velocity: Vec2,
    /// Projectiles farther than this from where they were thrown disappear.
    pub range: f32,
    /// Throws left; `None` is unlimited.
    pub budget: Option<u32>,
    /// Projectiles hitting each other are not removed.
    pub collision_ok: bool,
    pub gravity_affects: bool,
    pub sensor: bool,
    pub throw_sound: Option<String>,
    pub aim: AimMode,
    /// Rotate to face the direction of a `throw_at`.
    pub rotate_to_velocity: bool,
    /// Atlas cells; each throw shows a random one.
    pub image: Option<String>,
    pub cells: Vec<(f32, f32)>,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            size: Vec2::splat(0.5),
            circle: true,
            strength: 1,
            offset: Vec2::ZERO,
            fixed_velocity: Vec2::new(10.0, 0.0),
            range: 40.0,
            budget: None,
            collision_ok: false,
            gravity_affects: false,
            sensor: true,
            throw_sound: None,
            aim: AimMode::Unit(10.0),
            rotate_to_velocity: false,
            image: None,
            cells: Vec::new(),
        }
    }
}

pub struct ProjectilePool {
    ids: Vec<EntityId>,
    next: usize,
    remaining: Option<u32>,
    config: ProjectileConfig,
}

impl ProjectilePool {
    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// Throws left, `None` when unlimited.
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn next_slot(&self) -> usize {
        self.next
    }
}

impl Level {
    /// Build the pool: `count` hidden projectiles. Replaces any earlier pool
    /// (its projectiles stay hidden).
    pub fn configure_projectiles(&mut self, count: usize, config: ProjectileConfig) {
        assert!(count > 0, "projectile pool needs at least one projectile");

        let mut ids = Vec::with_capacity(count);
        for pool_index in 0..count {
            let collider = if config.circle {
                ColliderDesc::ball(config.size.x, config.size.y)
            } else {
                ColliderDesc::cuboid(config.size.x, config.size.y)
            };
            let desc = BodyDesc::dynamic(collider)
                .with_position(PARKING)
                .with_sensor(config.sensor)
                .with_gravity_scale(if config.gravity_affects { 1.0 } else { 0.0 })
                .with_ccd(true);
            let kind = EntityKind::Projectile(Projectile {
                strength: config.strength,
                origin: PARKING,
                pool_index,
            });
            let id = self.spawn(kind, desc, config.size, config.image.as_deref());

            if let Some(entity) = self.scene.get_mut(id) {
                entity.visible = false;
                if !config.cells.is_empty() {
                    entity.animator = Some(Animator::with_cells(config.cells.clone()));
                }
                if let Some(body) = entity.body {
                    self.physics.set_enabled(&body, false);
                }
            }
            ids.push(id);
        }

        self.projectiles = Some(ProjectilePool {
            ids,
            next: 0,
            remaining: config.budget,
            config,
        });
    }

    /// Throw with the configured fixed velocity.
    pub fn throw_fixed(&mut self, hero: EntityId) -> Option<EntityId> {
        let velocity = self.projectiles.as_ref()?.config.fixed_velocity;
        self.throw(hero, |_| (velocity, None))
    }

    /// Throw toward a world point.
    pub fn throw_at(&mut self, hero: EntityId, target: Vec2) -> Option<EntityId> {
        let pool = self.projectiles.as_ref()?;
        let (aim, rotate) = (pool.config.aim, pool.config.rotate_to_velocity);
        self.throw(hero, |from| {
            let offset = target - from;
            let velocity = match aim {
                AimMode::Unit(speed) => offset.normalize_or_zero() * speed,
                AimMode::Scaled(factor) => offset * factor,
            };
            let rotation = rotate.then(|| velocity.y.atan2(velocity.x) - std::f32::consts::FRAC_PI_2);
            (velocity, rotation)
        })
    }

    /// Shared admission and launch. `aim` maps the spawn point to a velocity
    /// and optional rotation. Returns the thrown projectile.
    fn throw(&mut self, hero: EntityId, aim: impl FnOnce(Vec2) -> (Vec2, Option<f32>)) -> Option<EntityId> {
        let hero_pos = self.scene.get(hero).filter(|e| e.visible)?.pos;
        let pool = self.projectiles.as_mut()?;

        if pool.remaining == Some(0) {
            return None;
        }
        // The budget is spent even when the throw is dropped below.
        if let Some(remaining) = pool.remaining.as_mut() {
            *remaining -= 1;
        }
        let id = pool.ids[pool.next];
        if self.scene.get(id).is_some_and(|e| e.visible) {
            return None;
        }
        pool.next = (pool.next + 1) % pool.ids.len();
        let throw_sound = pool.config.throw_sound.clone();

        let from = hero_pos + pool.config.offset;
        let (velocity, rotation) = aim(from);
        let rotation = rotation.unwrap_or(0.0);

        let entity = self.scene.get_mut(id)?;
        entity.visible = true;
        entity.pos = from;
        entity.rotation = rotation;
        entity.velocity = velocity;
        if let Some(p) = entity.projectile_mut() {
            p.origin = from;
        }
        if let Some(animator) = entity.animator.as_mut() {
            animator.set_random_index(&mut self.rng);
        }
        if let Some(body) = entity.body {
            self.physics.set_enabled(&body, true);
            self.physics.set_transform(&body, from, rotation);
            self.physics.set_velocity(&body, velocity);
        }

        if let Some(sound) = throw_sound {
            self.play_sound(&sound);
        }
        if let Some(hero) = self.scene.get_mut(hero) {
            let throw = hero.hero().and_then(|h| h.animations.throw.clone());
            hero.play(throw);
        }
        Some(id)
    }

    /// Quietly remove projectiles that flew out of range.
    pub(crate) fn cull_projectiles(&mut self) {
        let Some(pool) = self.projectiles.as_ref() else { return };
        let range_sq = pool.config.range * pool.config.range;
        let out_of_range: Vec<EntityId> = pool
            .ids
            .iter()
            .filter_map(|id| self.scene.get(*id))
            .filter(|e| e.visible)
            .filter(|e| {
                e.projectile()
                    .is_some_and(|p| e.pos.distance_squared(p.origin) > range_sq)
            })
            .map(|e| e.id)
            .collect();
        for id in out_of_range {
            self.remove(id, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::GameConfig;
    use crate::assets::registry::MediaRegistry;

    fn level_with_hero() -> (Level, EntityId) {
        let mut level = Level::new(&GameConfig::default(), MediaRegistry::new());
        level.physics.set_gravity(Vec2::ZERO);
        let hero = level.make_hero_as_box(0.0, 0.0, 1.0, 1.0, None);
        (level, hero)
    }

    fn visible_projectiles(level: &Level) -> usize {
        level
            .projectiles
            .as_ref()
            .map(|p| p.ids().iter().filter(|id| level.entity(**id).unwrap().visible).count())
            .unwrap_or(0)
    }

    #[test]
    fn pool_starts_hidden() {
        let (mut level, _) = level_with_hero();
        level.configure_projectiles(3, ProjectileConfig::default());
        assert_eq!(visible_projectiles(&level), 0);
        assert_eq!(level.scene.len(), 4);
    }

    #[test]
    fn throw_fixed_launches_from_offset() {
        let (mut level, hero) = level_with_hero();
        level.configure_projectiles(
            2,
            ProjectileConfig {
                offset: Vec2::new(1.0, 0.5),
                fixed_velocity: Vec2::new(6.0, 0.0),
                ..Default::default()
            },
        );
        let id = level.throw_fixed(hero).unwrap();
        let entity = level.entity(id).unwrap();
        assert!(entity.visible);
        assert_eq!(entity.pos, Vec2::new(1.0, 0.5));
        assert_eq!(level.velocity(id), Vec2::new(6.0, 0.0));
        assert_eq!(level.projectiles.as_ref().unwrap().next_slot(), 1);
    }

    #[test]
    fn empty_budget_is_a_no_op() {
        let (mut level, hero) = level_with_hero();
        level.configure_projectiles(
            2,
            ProjectileConfig {
                budget: Some(1),
                ..Default::default()
            },
        );
        assert!(level.throw_fixed(hero).is_some());
        assert_eq!(level.projectiles.as_ref().unwrap().remaining(), Some(0));
        assert!(level.throw_fixed(hero).is_none());
        assert_eq!(level.projectiles.as_ref().unwrap().remaining(), Some(0));
        assert_eq!(visible_projectiles(&level), 1);
    }

    #[test]
    fn busy_slot_drops_throw_but_spends_budget() {
        let (mut level, hero) = level_with_hero();
        level.configure_projectiles(
            1,
            ProjectileConfig {
                budget: Some(5),
                ..Default::default()
            },
        );
        assert!(level.throw_fixed(hero).is_some());
        assert_eq!(level.projectiles.as_ref().unwrap().remaining(), Some(4));

        // The only slot is still in flight.
        assert!(level.throw_fixed(hero).is_none());
        assert_eq!(level.projectiles.as_ref().unwrap().remaining(), Some(3));
        assert_eq!(visible_projectiles(&level), 1);
    }

    #[test]
    fn throw_at_aims_and_rotates() {
        let (mut level, hero) = level_with_hero();
        level.configure_projectiles(
            2,
            ProjectileConfig {
                aim: AimMode::Unit(5.0),
                rotate_to_velocity: true,
                ..Default::default()
            },
        );
        let id = level.throw_at(hero, Vec2::new(0.0, 10.0)).unwrap();
        assert!((level.velocity(id) - Vec2::new(0.0, 5.0)).length() < 1e-5);
        assert!(level.entity(id).unwrap().rotation.abs() < 1e-5);

        let id = level.throw_at(hero, Vec2::new(10.0, 0.0)).unwrap();
        let rotation = level.entity(id).unwrap().rotation;
        assert!((rotation + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn scaled_aim_keeps_distance() {
        let (mut level, hero) = level_with_hero();
        level.configure_projectiles(
            1,
            ProjectileConfig {
                aim: AimMode::Scaled(0.5),
                ..Default::default()
            },
        );
        let id = level.throw_at(hero, Vec2::new(4.0, 2.0)).unwrap();
        assert!((level.velocity(id) - Vec2::new(2.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn out_of_range_projectiles_vanish() {
        let (mut level, hero) = level_with_hero();
        level.configure_projectiles(
            1,
            ProjectileConfig {
                range: 3.0,
                fixed_velocity: Vec2::new(10.0, 0.0),
                ..Default::default()
            },
        );
        let id = level.throw_fixed(hero).unwrap();
        for _ in 0..30 {
            level.tick(1.0 / 45.0);
        }
        assert!(!level.entity(id).unwrap().visible);
        // The slot is free again.
        assert!(level.throw_fixed(hero).is_some());
    }

    #[test]
    fn projectile_hits_enemy() {
        let (mut level, hero) = level_with_hero();
        level.configure_projectiles(
            1,
            ProjectileConfig {
                strength: 2,
                fixed_velocity: Vec2::new(8.0, 0.0),
                offset: Vec2::new(1.0, 0.0),
                ..Default::default()
            },
        );
        let enemy = level.make_enemy_as_box(5.0, 0.0, 1.0, 1.0, None);
        let id = level.throw_fixed(hero).unwrap();
        for _ in 0..45 {
            level.tick(1.0 / 45.0);
        }
        assert!(!level.entity(enemy).unwrap().visible);
        assert!(!level.entity(id).unwrap().visible);
        assert_eq!(level.score.enemies_defeated, 1);
    }

    #[test]
    fn projectile_trigger_keeps_projectile() {
        let (mut level, hero) = level_with_hero();
        level.configure_projectiles(
            1,
            ProjectileConfig {
                sensor: false,
                fixed_velocity: Vec2::new(8.0, 0.0),
                offset: Vec2::new(1.0, 0.0),
                ..Default::default()
            },
        );
        let wall = level.make_obstacle_as_box(5.0, 0.0, 1.0, 4.0, None);
        level.entity_mut(wall).and_then(|e| e.obstacle_mut()).unwrap().projectile_trigger =
            Some(crate::components::kinds::TriggerGate::always(3));
        let id = level.throw_fixed(hero).unwrap();
        for _ in 0..45 {
            level.tick(1.0 / 45.0);
        }
        assert!(level.entity(id).unwrap().visible);
        let expected = crate::systems::triggers::TriggerEvent::ProjectileCollide { id: 3, projectile: id, obstacle: wall };
        let triggers = level.take_triggers();
        assert!(!triggers.is_empty());
        assert!(triggers.iter().all(|t| *t == expected));
    }

    #[test]
    #[should_panic]
    fn empty_pool_panics() {
        let (mut level, _) = level_with_hero();
        level.configure_projectiles(0, ProjectileConfig::default());
    }
}
