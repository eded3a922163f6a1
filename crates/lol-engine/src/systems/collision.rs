//! Collision dispatch.
//!
//! Contacts are queued while the physics world steps and resolved here after
//! the step. For each pair only the dominant side (lower kind priority) runs
//! its handler, so each kind only answers to kinds below it.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::entity::{Entity, EntityType, StickyFaces};
use crate::components::kinds::HeroCollision;
use crate::core::level::Level;
use crate::core::physics::{BodyType, CollisionPair};
use crate::systems::triggers::{TimedAction, TriggerEvent};

/// Slack when deciding which sticky face a body landed on.
const STICKY_TOLERANCE: f32 = 0.25;

/// Resolve the contact pairs of one physics step, oldest first.
pub fn dispatch_collisions(level: &mut Level, pairs: &[CollisionPair]) {
    for pair in pairs {
        let (a, b) = (pair.entity_a, pair.entity_b);
        let (Some(ea), Some(eb)) = (level.scene.get(a), level.scene.get(b)) else {
            continue;
        };
        // Removed earlier in this drain.
        if !ea.visible || !eb.visible {
            continue;
        }

        let (dominant, other) = if eb.entity_type().priority() < ea.entity_type().priority() {
            (b, a)
        } else {
            (a, b)
        };
        on_collide(level, dominant, other);

        try_stick(level, a, b);
        try_stick(level, b, a);
    }
}

/// Run the dominant entity's response to touching `other`.
pub fn on_collide(level: &mut Level, dominant: EntityId, other: EntityId) {
    let (Some(d), Some(o)) = (level.scene.get(dominant), level.scene.get(other)) else {
        return;
    };
    match (d.entity_type(), o.entity_type()) {
        (EntityType::Hero, EntityType::Enemy) => hero_hits_enemy(level, dominant, other),
        (EntityType::Hero, EntityType::Destination) => hero_reaches_destination(level, dominant, other),
        (EntityType::Hero, EntityType::Obstacle) => hero_hits_obstacle(level, dominant, other),
        (EntityType::Hero, EntityType::SvgLine) => land(level, dominant),
        (EntityType::Hero, EntityType::Goodie) => hero_collects_goodie(level, dominant, other),
        (EntityType::Enemy, EntityType::Obstacle) => enemy_hits_obstacle(level, dominant, other),
        (EntityType::Enemy, EntityType::Projectile) => enemy_hit_by_projectile(level, dominant, other),
        (
            EntityType::Projectile,
            EntityType::Obstacle | EntityType::SvgLine | EntityType::Projectile | EntityType::Destination,
        ) => projectile_hits(level, dominant, other),
        _ => {}
    }
}

fn is_sensor(level: &Level, id: EntityId) -> bool {
    level
        .scene
        .get(id)
        .and_then(|e| e.body)
        .is_some_and(|body| level.physics.is_sensor(&body))
}

fn hero_hits_enemy(level: &mut Level, hero: EntityId, enemy: EntityId) {
    let Some(h) = level.scene.get(hero).and_then(|e| e.hero()) else { return };
    let (invincible, crawling, strength) = (h.is_invincible(), h.crawling, h.strength);
    let Some(e) = level.scene.get(enemy).and_then(|e| e.enemy()) else { return };
    let (damage, immune, by_crawl) = (e.damage, e.immune_to_invincibility, e.defeat_by_crawl);

    if e.always_does_damage {
        level.defeat_hero(hero);
    } else if invincible {
        if !immune {
            level.defeat_enemy(enemy);
        }
    } else if crawling && by_crawl {
        level.defeat_enemy(enemy);
    } else if damage >= strength {
        level.defeat_hero(hero);
    } else {
        if let Some(h) = level.scene.get_mut(hero).and_then(|e| e.hero_mut()) {
            h.strength -= damage;
        }
        level.defeat_enemy(enemy);
    }
}

fn hero_reaches_destination(level: &mut Level, hero: EntityId, destination: EntityId) {
    let collected = level.score.goodies_collected;
    let Some(dest) = level.scene.get_mut(destination).and_then(|e| e.destination_mut()) else {
        return;
    };
    if !dest.accepts(&collected) {
        return;
    }
    dest.holding += 1;
    let sound = dest.arrival_sound.clone();

    level.remove(hero, true);
    if let Some(sound) = sound {
        level.play_sound(&sound);
    }
    level.score.on_arrival();
}

fn hero_hits_obstacle(level: &mut Level, hero: EntityId, obstacle: EntityId) {
    let now = level.clock();
    let sensor = is_sensor(level, obstacle);

    let Some(o) = level.scene.get_mut(obstacle).and_then(|e| e.obstacle_mut()) else {
        return;
    };
    let sound = o.take_collide_sound(now).map(str::to_owned);
    let (collision, no_jump_reenable) = (o.hero_collision, o.no_jump_reenable);
    if let Some(sound) = sound {
        level.play_sound(&sound);
    }

    if !sensor {
        clear_extra_rotation(level, hero);
    }

    match collision {
        Some(HeroCollision::Damp(factor)) => {
            let velocity = level.velocity(hero);
            level.update_velocity(hero, velocity * factor);
        }
        Some(HeroCollision::SpeedBoost { boost, duration }) => {
            let velocity = level.velocity(hero);
            level.update_velocity(hero, velocity + boost);
            if duration > 0.0 {
                level
                    .timers
                    .schedule(now + duration, TimedAction::EndSpeedBoost { hero, boost });
            }
        }
        Some(HeroCollision::Trigger(gate)) => {
            if gate.is_open(&level.score.goodies_collected) {
                level.fire_trigger(TriggerEvent::HeroCollide { id: gate.id, hero, obstacle });
            }
        }
        None => {}
    }

    if !sensor && !no_jump_reenable {
        land(level, hero);
    }
}

fn clear_extra_rotation(level: &mut Level, hero: EntityId) {
    let Some(entity) = level.scene.get_mut(hero) else { return };
    let Some(extra) = entity.hero_mut().map(|h| std::mem::take(&mut h.extra_rotation)) else {
        return;
    };
    if extra == 0.0 {
        return;
    }
    entity.rotation -= extra;
    if let Some(body) = entity.body {
        level.physics.set_transform(&body, entity.pos, entity.rotation);
    }
}

/// Touch down on solid ground: jumping is possible again.
fn land(level: &mut Level, hero: EntityId) {
    let Some(entity) = level.scene.get_mut(hero) else { return };
    let was_in_air = entity
        .hero_mut()
        .map(|h| std::mem::replace(&mut h.in_air, false))
        .unwrap_or(false);
    if was_in_air {
        if let Some(animator) = entity.animator.as_mut() {
            animator.reset_to_default();
        }
    }
}

fn hero_collects_goodie(level: &mut Level, hero: EntityId, goodie: EntityId) {
    let Some(g) = level.scene.get(goodie).and_then(|e| e.goodie()).cloned() else {
        return;
    };
    level.remove(goodie, false);
    level.score.on_goodie_collected(&g.score);
    let collected = level.score.goodies_collected;

    let Some(entity) = level.scene.get_mut(hero) else { return };
    let Some(h) = entity.hero_mut() else { return };
    h.strength += g.strength_boost;
    let invincible_animation = if g.invincibility > 0.0 {
        h.invincible_remaining += g.invincibility;
        h.animations.invincible.clone()
    } else {
        None
    };
    let slot = h.goodie_count_slot;

    entity.play(invincible_animation);
    let count = slot.and_then(|slot| collected.get(slot)).copied();
    if let (Some(count), Some(animator)) = (count, entity.animator.as_mut()) {
        animator.set_index(count.max(0) as usize);
    }
}

fn enemy_hits_obstacle(level: &mut Level, enemy: EntityId, obstacle: EntityId) {
    let Some(o) = level.scene.get(obstacle).and_then(|e| e.obstacle()) else {
        return;
    };
    let (trigger, jump) = (o.enemy_trigger, o.enemy_jump);

    if let Some(trigger) = trigger {
        if trigger.gate.is_open(&level.score.goodies_collected) {
            let event = TriggerEvent::EnemyCollide { id: trigger.gate.id, enemy, obstacle };
            if trigger.delay <= 0.0 {
                level.fire_trigger(event);
            } else {
                let due = level.clock() + trigger.delay;
                level.timers.schedule(due, TimedAction::Fire(event));
            }
        }
    }
    if let Some(jump) = jump {
        let velocity = level.velocity(enemy);
        level.update_velocity(enemy, velocity + jump);
    }
}

fn enemy_hit_by_projectile(level: &mut Level, enemy: EntityId, projectile: EntityId) {
    let Some(strength) = level.scene.get(projectile).and_then(|e| e.projectile()).map(|p| p.strength) else {
        return;
    };
    let Some(e) = level.scene.get_mut(enemy).and_then(|e| e.enemy_mut()) else {
        return;
    };
    e.damage -= strength;
    if e.damage <= 0 {
        level.remove(projectile, true);
        level.defeat_enemy(enemy);
    } else {
        level.remove(projectile, false);
    }
}

fn projectile_hits(level: &mut Level, projectile: EntityId, other: EntityId) {
    let Some(o) = level.scene.get(other) else { return };
    let other_type = o.entity_type();

    if let Some(gate) = o.obstacle().and_then(|o| o.projectile_trigger) {
        if gate.is_open(&level.score.goodies_collected) {
            level.fire_trigger(TriggerEvent::ProjectileCollide { id: gate.id, projectile, obstacle: other });
        }
        return;
    }

    let collision_ok = level
        .projectiles
        .as_ref()
        .is_some_and(|pool| pool.config().collision_ok);
    if other_type == EntityType::Projectile && collision_ok {
        return;
    }
    if is_sensor(level, other) {
        return;
    }
    level.remove(projectile, false);
}

// -- Sticky faces --

fn sticks_to(faces: StickyFaces, host: &Entity, guest: &Entity) -> bool {
    let host_half = host.size / 2.0;
    let guest_half = guest.size / 2.0;
    let gap_above = (guest.pos.y - guest_half.y) - (host.pos.y + host_half.y);
    let gap_below = (host.pos.y - host_half.y) - (guest.pos.y + guest_half.y);
    let gap_right = (guest.pos.x - guest_half.x) - (host.pos.x + host_half.x);
    let gap_left = (host.pos.x - host_half.x) - (guest.pos.x + guest_half.x);

    (faces.top && gap_above >= -STICKY_TOLERANCE)
        || (faces.bottom && gap_below >= -STICKY_TOLERANCE)
        || (faces.right && gap_right >= -STICKY_TOLERANCE)
        || (faces.left && gap_left >= -STICKY_TOLERANCE)
}

/// Weld `guest` to `host` if it touched one of the host's sticky faces.
fn try_stick(level: &mut Level, host: EntityId, guest: EntityId) {
    let (Some(h), Some(g)) = (level.scene.get(host), level.scene.get(guest)) else {
        return;
    };
    if !h.sticky.any() || !h.visible || !g.visible || g.sticky_joint.is_some() {
        return;
    }
    let (Some(host_body), Some(guest_body)) = (h.body, g.body) else {
        return;
    };
    if level.physics.body_type(&guest_body) != BodyType::Dynamic || !sticks_to(h.sticky, h, g) {
        return;
    }

    let anchor = Vec2::from_angle(-h.rotation).rotate(g.pos - h.pos);
    let joint = level.physics.weld(&host_body, &guest_body, anchor, Vec2::ZERO);
    if let Some(g) = level.scene.get_mut(guest) {
        g.sticky_joint = Some(joint);
    }
}
