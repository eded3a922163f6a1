//! Per-frame entity behaviours run on the frame delta after timers.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::entity::EntityType;
use crate::components::kinds::Chase;
use crate::components::route::RouteStep;
use crate::core::level::Level;

/// Invincibility countdown, routes, chase, orientation and projectile range.
pub fn run_repeat_actions(level: &mut Level, dt: f32) {
    count_down_invincibility(level, dt);
    drive_routes(level);
    chase_heroes(level);
    orient(level);
    level.cull_projectiles();
}

fn count_down_invincibility(level: &mut Level, dt: f32) {
    for entity in level.scene.iter_mut().filter(|e| e.visible) {
        let Some(hero) = entity.hero_mut() else { continue };
        if hero.invincible_remaining <= 0.0 {
            continue;
        }
        hero.invincible_remaining = (hero.invincible_remaining - dt).max(0.0);
        if hero.invincible_remaining == 0.0 && hero.animations.invincible.is_some() {
            if let Some(animator) = entity.animator.as_mut() {
                animator.reset_to_default();
            }
        }
    }
}

fn drive_routes(level: &mut Level) {
    let routed: Vec<EntityId> = level
        .scene
        .iter()
        .filter(|e| e.visible && e.route.is_some())
        .map(|e| e.id)
        .collect();

    for id in routed {
        let Some(entity) = level.scene.get_mut(id) else { continue };
        let pos = entity.pos;
        let Some(step) = entity.route.as_mut().map(|r| r.drive(pos)) else {
            continue;
        };
        match step {
            RouteStep::Idle => {}
            RouteStep::SetVelocity(velocity) => level.update_velocity(id, velocity),
            RouteStep::Stop => level.update_velocity(id, Vec2::ZERO),
            RouteStep::Restart { position, velocity } => {
                entity.pos = position;
                if let Some(body) = entity.body {
                    level.physics.set_transform(&body, position, entity.rotation);
                }
                level.update_velocity(id, velocity);
            }
        }
    }
}

fn chase_heroes(level: &mut Level) {
    let Some(target) = level.scene.first_visible(EntityType::Hero).map(|e| e.pos) else {
        return;
    };
    let chasers: Vec<(EntityId, Vec2, Chase)> = level
        .scene
        .iter()
        .filter(|e| e.visible)
        .filter_map(|e| e.enemy().and_then(|en| en.chase).map(|c| (e.id, e.pos, c)))
        .collect();

    for (id, pos, chase) in chasers {
        let toward = (target - pos).normalize_or_zero() * chase.speed;
        let mut velocity = level.velocity(id);
        if chase.along_x {
            velocity.x = toward.x;
        }
        if chase.along_y {
            velocity.y = toward.y;
        }
        level.update_velocity(id, velocity);
    }
}

fn orient(level: &mut Level) {
    for entity in level.scene.iter_mut().filter(|e| e.visible) {
        let velocity = entity.velocity;
        if entity.face_forward && velocity.x != 0.0 {
            if let Some(sprite) = entity.sprite.as_mut() {
                sprite.flip_x = velocity.x < 0.0;
            }
        }
        if entity.rotate_by_direction && velocity != Vec2::ZERO {
            entity.rotation = velocity.y.atan2(velocity.x) - FRAC_PI_2;
            if let Some(body) = entity.body {
                level.physics.set_transform(&body, entity.pos, entity.rotation);
            }
        }
    }
}
