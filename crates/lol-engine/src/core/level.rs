//! Everything that lives for one play of one level.

use glam::Vec2;

use crate::api::game::GameConfig;
use crate::api::types::{EntityId, SoundEvent};
use crate::assets::registry::MediaRegistry;
use crate::components::animation::Animator;
use crate::components::entity::{DisappearAnimation, Entity, EntityKind, Side, StickyFaces, TouchResponse};
use crate::components::kinds::{Obstacle, TriggerGate};
use crate::components::route::{Route, RouteDriver};
use crate::core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, CollisionPair, PhysicsBody, PhysicsWorld,
};
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::core::score::{Score, VictoryCondition};
use crate::core::time::{FixedTimestep, TimerQueue};
use crate::renderer::camera::Camera2D;
use crate::systems::projectiles::ProjectilePool;
use crate::systems::triggers::{TimedAction, TriggerEvent};
use crate::systems::{animation, behaviors, collision};

/// Seconds between two steps of a shrink-over-time.
const SHRINK_INTERVAL: f32 = 0.05;

/// Where hidden bodies are parked.
pub(crate) const PARKING: Vec2 = Vec2::new(-1000.0, -1000.0);

/// One running level: entities and their bodies, score, timers, outboxes.
/// Dropping it cancels every pending timer.
pub struct Level {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub score: Score,
    pub camera: Camera2D,
    pub media: MediaRegistry,
    pub projectiles: Option<ProjectilePool>,
    pub rng: Rng,
    pub(crate) timers: TimerQueue<TimedAction>,
    sounds: Vec<SoundEvent>,
    triggers: Vec<TriggerEvent>,
    collisions: Vec<CollisionPair>,
    timestep: FixedTimestep,
    clock: f32,
    next_id: u32,
    camera_target: Option<EntityId>,
}

impl Level {
    pub fn new(config: &GameConfig, media: MediaRegistry) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.physics_dt);
        Self {
            scene: Scene::new(),
            physics,
            score: Score::default(),
            camera: Camera2D::new(config.world_width, config.world_height),
            media,
            projectiles: None,
            rng: Rng::new(config.seed),
            timers: TimerQueue::new(),
            sounds: Vec::new(),
            triggers: Vec::new(),
            collisions: Vec::new(),
            timestep: FixedTimestep::new(config.physics_dt),
            clock: 0.0,
            next_id: 1,
            camera_target: None,
        }
    }

    /// Seconds of frame time since the level started.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.scene.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.scene.get_mut(id)
    }

    pub fn set_victory(&mut self, victory: VictoryCondition) {
        self.score.victory = victory;
    }

    // -- Frame loop --

    /// Advance one frame: fixed physics sub-steps with collision dispatch,
    /// then timers, per-frame behaviours and animations on the frame delta.
    pub fn tick(&mut self, frame_dt: f32) {
        if self.score.is_over() {
            return;
        }

        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.step();
        }

        self.clock += frame_dt;
        self.run_timers();
        behaviors::run_repeat_actions(self, frame_dt);
        animation::tick_animations(&mut self.scene, frame_dt);
        self.follow_camera(frame_dt);
    }

    /// One physics sub-step. Contacts are queued during the step and handled
    /// after it, in the order they began.
    pub fn step(&mut self) {
        self.physics.step_into(&mut self.collisions);
        self.sync_from_physics();

        let pairs = std::mem::take(&mut self.collisions);
        collision::dispatch_collisions(self, &pairs);
        self.collisions = pairs;
        self.collisions.clear();
    }

    fn sync_from_physics(&mut self) {
        for entity in self.scene.iter_mut() {
            let Some(body) = entity.body else { continue };
            if !self.physics.is_enabled(&body) {
                continue;
            }
            let (pos, rot) = self.physics.body_position(&body);
            entity.pos = pos;
            entity.rotation = rot;
            entity.velocity = self.physics.velocity(&body);
        }
    }

    fn run_timers(&mut self) {
        while let Some(action) = self.timers.pop_due(self.clock) {
            self.run_timed(action);
        }
    }

    fn run_timed(&mut self, action: TimedAction) {
        match action {
            TimedAction::Fire(trigger) => self.fire_trigger(trigger),
            TimedAction::Appear(id) => self.show(id),
            TimedAction::Remove { entity, quiet } => self.remove(entity, quiet),
            TimedAction::EndSpeedBoost { hero, boost } => {
                if self.scene.get(hero).is_some_and(|e| e.visible) {
                    self.update_velocity(hero, self.velocity(hero) - boost);
                }
            }
            TimedAction::Shrink { entity, rate, keep_centered } => {
                self.shrink_step(entity, rate, keep_centered)
            }
            TimedAction::Win => self.score.win(),
            TimedAction::Lose => self.score.lose(),
        }
    }

    pub fn set_camera_target(&mut self, id: EntityId) {
        self.camera_target = Some(id);
    }

    fn follow_camera(&mut self, dt: f32) {
        let target = self.camera_target.and_then(|id| self.scene.get(id));
        if let Some(pos) = target.filter(|e| e.visible).map(|e| e.pos) {
            self.camera.follow(pos, dt);
        }
    }

    // -- Outboxes --

    /// Sounds emitted since the last call.
    pub fn take_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    /// Triggers fired since the last call.
    pub fn take_triggers(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.triggers)
    }

    /// Queue a named sound. Unknown names are logged and skipped.
    pub fn play_sound(&mut self, name: &str) {
        if let Some(sound) = self.media.sound(name) {
            self.sounds.push(sound);
        }
    }

    pub(crate) fn fire_trigger(&mut self, trigger: TriggerEvent) {
        log::debug!("trigger {:?}", trigger);
        self.triggers.push(trigger);
    }

    // -- Spawning --

    pub(crate) fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create an entity and bind its body. `desc.position` is the centre.
    pub(crate) fn spawn(&mut self, kind: EntityKind, desc: BodyDesc, size: Vec2, image: Option<&str>) -> EntityId {
        let id = self.next_id();
        let body = self.physics.create_body(id, &desc, ColliderMaterial::default());
        let mut entity = Entity::new(id, kind)
            .with_pos(desc.position)
            .with_size(size)
            .with_body(body);
        entity.rotation = desc.rotation;
        entity.velocity = desc.velocity;
        if let Some(sprite) = image.and_then(|name| self.media.image(name)) {
            entity = entity.with_sprite(sprite);
        }
        self.scene.spawn(entity);
        id
    }

    fn spawn_disappear_animation(&mut self, entity: &Entity, effect: DisappearAnimation) {
        let pos = entity.pos + effect.offset;
        let desc = BodyDesc::fixed(ColliderDesc::cuboid(effect.size.x, effect.size.y))
            .with_position(pos)
            .with_sensor(true);
        let id = self.spawn(EntityKind::Obstacle(Obstacle::default()), desc, effect.size, None);
        let atlas = entity.sprite.as_ref().map(|s| s.atlas).unwrap_or_default();
        let z_index = entity.z_index;

        let Some(spawned) = self.scene.get_mut(id) else { return };
        let mut sprite = crate::components::sprite::SpriteComponent::default();
        sprite.atlas = atlas;
        spawned.sprite = Some(sprite);
        spawned.animator = Some(Animator::playing(effect.animation));
        spawned.hide_when_animation_ends = true;
        spawned.z_index = z_index;
        if let Some(body) = spawned.body {
            self.physics.set_enabled(&body, false);
        }
    }

    // -- Entity operations --

    fn body(&self, id: EntityId) -> Option<PhysicsBody> {
        self.scene.get(id).and_then(|e| e.body)
    }

    /// Hide an entity and take its body out of the simulation. Non-quiet
    /// removal plays the disappear sound and animation.
    pub fn remove(&mut self, id: EntityId, quiet: bool) {
        let Some(entity) = self.scene.get_mut(id) else { return };
        if !entity.visible {
            return;
        }
        entity.visible = false;
        let joint = entity.sticky_joint.take();
        let body = entity.body;
        let removed = entity.clone();

        if let Some(body) = body {
            self.physics.set_enabled(&body, false);
        }
        if let Some(joint) = joint {
            self.physics.remove_joint(joint);
        }
        if quiet {
            return;
        }
        if let Some(sound) = &removed.disappear_sound {
            self.play_sound(sound);
        }
        if let Some(effect) = removed.disappear_animation.clone() {
            self.spawn_disappear_animation(&removed, effect);
        }
    }

    fn show(&mut self, id: EntityId) {
        let Some(entity) = self.scene.get_mut(id) else { return };
        entity.visible = true;
        if let Some(body) = entity.body {
            self.physics.set_enabled(&body, true);
        }
    }

    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.body(id)
            .map(|body| self.physics.velocity(&body))
            .unwrap_or(Vec2::ZERO)
    }

    /// Set the velocity without touching the body type.
    pub fn update_velocity(&mut self, id: EntityId, velocity: Vec2) {
        let Some(body) = self.body(id) else { return };
        self.physics.set_velocity(&body, velocity);
        if let Some(entity) = self.scene.get_mut(id) {
            entity.velocity = velocity;
        }
    }

    fn make_movable(&mut self, body: &PhysicsBody, immune_to_physics: bool) {
        if self.physics.body_type(body) == BodyType::Static {
            let body_type = if immune_to_physics {
                BodyType::Kinematic
            } else {
                BodyType::Dynamic
            };
            self.physics.set_body_type(body, body_type);
        }
    }

    /// Set the velocity, promoting a static body first: to kinematic when
    /// `immune_to_physics`, else to dynamic.
    pub fn set_absolute_velocity(&mut self, id: EntityId, velocity: Vec2, immune_to_physics: bool) {
        let Some(body) = self.body(id) else { return };
        self.make_movable(&body, immune_to_physics);
        self.update_velocity(id, velocity);
    }

    /// Add to the velocity, promoting a static body like `set_absolute_velocity`.
    pub fn add_velocity(&mut self, id: EntityId, delta: Vec2, immune_to_physics: bool) {
        let Some(body) = self.body(id) else { return };
        self.make_movable(&body, immune_to_physics);
        let velocity = self.physics.velocity(&body) + delta;
        self.update_velocity(id, velocity);
    }

    pub fn set_physics(&mut self, id: EntityId, density: f32, elasticity: f32, friction: f32) {
        if let Some(body) = self.body(id) {
            let material = ColliderMaterial {
                restitution: elasticity,
                friction,
                density,
            };
            self.physics.set_material(&body, material);
        }
    }

    /// Linear damping: the body loses speed in flight. Kept across `resize`.
    pub fn set_damping(&mut self, id: EntityId, damping: f32) {
        if let Some(body) = self.body(id) {
            self.physics.set_linear_damping(&body, damping);
        }
    }

    /// How strongly world gravity pulls this body; zero makes it float.
    pub fn set_gravity_scale(&mut self, id: EntityId, scale: f32) {
        if let Some(body) = self.body(id) {
            self.physics.set_gravity_scale(&body, scale);
        }
    }

    /// Move to a new centre and size. The collider is rebuilt; velocity,
    /// rotation and damping carry over.
    pub fn resize(&mut self, id: EntityId, center: Vec2, size: Vec2) {
        let Some(entity) = self.scene.get_mut(id) else { return };
        let Some(mut body) = entity.body else { return };
        let rotation = entity.rotation;
        let shape = self
            .physics
            .collider_shape(&body)
            .unwrap_or(ColliderDesc::cuboid(size.x, size.y))
            .resized(size.x, size.y);

        self.physics.replace_collider(&mut body, shape);
        self.physics.set_transform(&body, center, rotation);
        entity.body = Some(body);
        entity.pos = center;
        entity.size = size;
    }

    /// Shrink by `rate` (units per second on each axis) until a dimension
    /// reaches zero, then remove the entity. Without `keep_centered` the
    /// bottom-left corner stays put.
    pub fn set_shrink_over_time(&mut self, id: EntityId, rate: Vec2, keep_centered: bool) {
        self.timers.schedule(
            self.clock + SHRINK_INTERVAL,
            TimedAction::Shrink {
                entity: id,
                rate,
                keep_centered,
            },
        );
    }

    fn shrink_step(&mut self, id: EntityId, rate: Vec2, keep_centered: bool) {
        let Some(entity) = self.scene.get(id) else { return };
        if !entity.visible {
            return;
        }
        let delta = rate * SHRINK_INTERVAL;
        let size = entity.size - delta;
        if size.x <= 0.0 || size.y <= 0.0 {
            self.remove(id, false);
            return;
        }
        let center = if keep_centered {
            entity.pos
        } else {
            entity.pos - delta / 2.0
        };
        self.resize(id, center, size);
        self.timers.schedule(
            self.clock + SHRINK_INTERVAL,
            TimedAction::Shrink {
                entity: id,
                rate,
                keep_centered,
            },
        );
    }

    /// Drive the entity along `route`. It jumps to the first waypoint now.
    pub fn set_route(&mut self, id: EntityId, route: Route, speed: f32, looping: bool) {
        let Some(body) = self.body(id) else { return };
        if self.physics.body_type(&body) == BodyType::Static {
            self.physics.set_body_type(&body, BodyType::Kinematic);
        }
        let mut driver = RouteDriver::new(route, speed, looping);
        let (start, velocity) = driver.start();
        let Some(entity) = self.scene.get_mut(id) else { return };
        self.physics.set_transform(&body, start, entity.rotation);
        self.physics.set_velocity(&body, velocity);
        entity.pos = start;
        entity.velocity = velocity;
        entity.route = Some(driver);
    }

    pub fn set_z_index(&mut self, id: EntityId, z_index: i8) {
        assert!((-2..=2).contains(&z_index), "z index {} outside [-2, 2]", z_index);
        if let Some(entity) = self.scene.get_mut(id) {
            entity.z_index = z_index;
        }
    }

    /// Entities sharing a nonzero group never collide. Zero clears it.
    pub fn set_pass_through(&mut self, id: EntityId, group: u32) {
        let mut rules = self.physics.contact_rules(id);
        rules.pass_through = group;
        self.physics.set_contact_rules(id, rules);
    }

    pub fn set_one_sided(&mut self, id: EntityId, side: Option<Side>) {
        let mut rules = self.physics.contact_rules(id);
        rules.one_sided = side;
        self.physics.set_contact_rules(id, rules);
    }

    pub fn set_sticky(&mut self, id: EntityId, faces: StickyFaces) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.sticky = faces;
        }
    }

    pub fn set_touch(&mut self, id: EntityId, response: TouchResponse) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.touch = Some(response);
        }
    }

    /// Touching the entity fires `Touch` once the gate is open.
    pub fn set_touch_trigger(&mut self, id: EntityId, gate: TriggerGate) {
        self.set_touch(id, TouchResponse::Trigger(gate));
    }

    /// Touching this enemy defeats it.
    pub fn set_disappear_on_touch(&mut self, id: EntityId) {
        let Some(entity) = self.scene.get_mut(id) else { return };
        if let Some(enemy) = entity.enemy_mut() {
            enemy.disappear_on_touch = true;
            entity.touch = Some(TouchResponse::Defeat);
        }
    }

    /// Hide now, appear after `delay` seconds.
    pub fn appear_after(&mut self, id: EntityId, delay: f32) {
        let Some(entity) = self.scene.get_mut(id) else { return };
        entity.visible = false;
        if let Some(body) = entity.body {
            self.physics.set_enabled(&body, false);
        }
        self.timers.schedule(self.clock + delay, TimedAction::Appear(id));
    }

    pub fn disappear_after(&mut self, id: EntityId, delay: f32, quiet: bool) {
        self.timers
            .schedule(self.clock + delay, TimedAction::Remove { entity: id, quiet });
    }

    /// With collision effect off the entity becomes a sensor: it still
    /// reports contacts but nothing bumps into it.
    pub fn set_collision_effect(&mut self, id: EntityId, enabled: bool) {
        if let Some(body) = self.body(id) {
            self.physics.set_sensor(&body, !enabled);
        }
    }

    pub fn set_face_forward(&mut self, id: EntityId, enabled: bool) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.face_forward = enabled;
        }
    }

    pub fn set_rotation_by_direction(&mut self, id: EntityId, enabled: bool) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.rotate_by_direction = enabled;
        }
    }

    pub fn set_disappear_sound(&mut self, id: EntityId, sound: impl Into<String>) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.disappear_sound = Some(sound.into());
        }
    }

    pub fn set_disappear_animation(&mut self, id: EntityId, effect: DisappearAnimation) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.disappear_animation = Some(effect);
        }
    }

    /// Visible entities under a world point, as of the last physics step.
    pub fn entities_at(&self, point: Vec2) -> Vec<EntityId> {
        self.physics
            .entities_at(point)
            .into_iter()
            .filter(|id| self.scene.get(*id).is_some_and(|e| e.visible))
            .collect()
    }

    // -- Defeats --

    /// Remove a hero and count the defeat.
    pub fn defeat_hero(&mut self, id: EntityId) {
        self.remove(id, false);
        self.score.on_hero_defeated();
    }

    /// Remove an enemy, credit the score and fire its defeat trigger.
    pub fn defeat_enemy(&mut self, id: EntityId) {
        let Some(enemy) = self.scene.get(id).and_then(|e| e.enemy()) else {
            return;
        };
        let trigger = enemy.defeat_trigger;
        self.remove(id, false);
        self.score.on_enemy_defeated();
        if let Some(trigger) = trigger {
            self.fire_trigger(TriggerEvent::EnemyDefeated { id: trigger, enemy: id });
        }
    }

    /// A pointer went down at a world point.
    pub fn touch_down(&mut self, point: Vec2) {
        for id in self.entities_at(point) {
            let Some(entity) = self.scene.get(id) else { continue };
            match entity.touch {
                Some(TouchResponse::Trigger(gate)) => {
                    if gate.is_open(&self.score.goodies_collected) {
                        self.fire_trigger(TriggerEvent::Touch { id: gate.id, entity: id });
                    }
                }
                Some(TouchResponse::Defeat) => {
                    if entity.enemy().is_some() {
                        self.defeat_enemy(id);
                    } else {
                        self.remove(id, false);
                    }
                }
                Some(TouchResponse::Jump) => self.jump(id),
                None => {}
            }
        }
    }

    // -- Timers --

    /// Fire `Timer { id }` after `delay` seconds.
    pub fn set_timer_trigger(&mut self, id: u32, delay: f32) {
        self.timers
            .schedule(self.clock + delay, TimedAction::Fire(TriggerEvent::Timer { id }));
    }

    /// Fire `EntityTimer { id, entity }` after `delay` seconds.
    pub fn set_entity_timer_trigger(&mut self, id: u32, delay: f32, entity: EntityId) {
        self.timers.schedule(
            self.clock + delay,
            TimedAction::Fire(TriggerEvent::EntityTimer { id, entity }),
        );
    }

    pub fn set_win_countdown(&mut self, seconds: f32) {
        self.timers.schedule(self.clock + seconds, TimedAction::Win);
    }

    pub fn set_lose_countdown(&mut self, seconds: f32) {
        self.timers.schedule(self.clock + seconds, TimedAction::Lose);
    }

    pub fn cancel_timers(&mut self) {
        self.timers.clear();
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::score::Outcome;

    fn level() -> Level {
        Level::new(&GameConfig::default(), MediaRegistry::new())
    }

    #[test]
    fn remove_hides_and_disables_body() {
        let mut level = level();
        let id = level.make_obstacle_as_box(0.0, 0.0, 2.0, 2.0, None);
        level.remove(id, true);

        let entity = level.entity(id).unwrap();
        assert!(!entity.visible);
        assert!(!level.physics.is_enabled(&entity.body.unwrap()));
    }

    #[test]
    fn non_quiet_removal_plays_sound_and_spawns_animation() {
        let mut media = MediaRegistry::new();
        media.register_sound("pop", SoundEvent(9));
        let mut level = Level::new(&GameConfig::default(), media);
        let id = level.make_goodie_as_circle(1.0, 1.0, 1.0, 1.0, None);
        level.set_disappear_sound(id, "pop");
        level.set_disappear_animation(
            id,
            DisappearAnimation {
                animation: crate::components::animation::Animation::horizontal_strip(0.0, 0.0, 2, 0.1, false),
                size: Vec2::splat(2.0),
                offset: Vec2::ZERO,
            },
        );
        let before = level.scene.len();
        level.remove(id, false);

        assert_eq!(level.take_sounds(), vec![SoundEvent(9)]);
        assert_eq!(level.scene.len(), before + 1);

        // The effect hides itself once its animation has run out.
        for _ in 0..20 {
            level.tick(1.0 / 45.0);
        }
        assert!(level.scene.iter().all(|e| !e.visible));
    }

    #[test]
    fn quiet_removal_is_silent() {
        let mut media = MediaRegistry::new();
        media.register_sound("pop", SoundEvent(9));
        let mut level = Level::new(&GameConfig::default(), media);
        let id = level.make_goodie_as_box(1.0, 1.0, 1.0, 1.0, None);
        level.set_disappear_sound(id, "pop");
        level.remove(id, true);
        assert!(level.take_sounds().is_empty());
    }

    #[test]
    fn absolute_velocity_promotes_static_bodies() {
        let mut level = level();
        let kinematic = level.make_obstacle_as_box(0.0, 0.0, 1.0, 1.0, None);
        let dynamic = level.make_obstacle_as_box(5.0, 0.0, 1.0, 1.0, None);
        level.set_absolute_velocity(kinematic, Vec2::new(1.0, 0.0), true);
        level.add_velocity(dynamic, Vec2::new(0.0, 2.0), false);

        let body = |l: &Level, id| l.entity(id).and_then(|e| e.body).unwrap();
        assert_eq!(level.physics.body_type(&body(&level, kinematic)), BodyType::Kinematic);
        assert_eq!(level.physics.body_type(&body(&level, dynamic)), BodyType::Dynamic);
        assert_eq!(level.velocity(kinematic), Vec2::new(1.0, 0.0));
        assert_eq!(level.velocity(dynamic), Vec2::new(0.0, 2.0));
    }

    #[test]
    fn damping_slows_hero_and_survives_resize() {
        let config = GameConfig {
            gravity: Vec2::ZERO,
            ..Default::default()
        };
        let mut level = Level::new(&config, MediaRegistry::new());
        let hero = level.make_hero_as_box(0.0, 0.0, 1.0, 1.0, None);
        level.update_velocity(hero, Vec2::new(10.0, 0.0));
        level.set_damping(hero, 5.0);

        for _ in 0..10 {
            level.step();
        }
        let slowed = level.velocity(hero).x;
        assert!(slowed < 10.0 && slowed > 0.0, "{}", slowed);

        let pos = level.entity(hero).unwrap().pos;
        level.resize(hero, pos, Vec2::new(0.5, 0.5));
        for _ in 0..10 {
            level.step();
        }
        assert!(level.velocity(hero).x < slowed, "damping lost on resize");
    }

    #[test]
    fn zero_gravity_scale_floats() {
        let mut level = level();
        let floating = level.make_hero_as_box(0.0, 10.0, 1.0, 1.0, None);
        let falling = level.make_hero_as_box(5.0, 10.0, 1.0, 1.0, None);
        level.set_gravity_scale(floating, 0.0);

        for _ in 0..20 {
            level.step();
        }
        assert!((level.entity(floating).unwrap().pos.y - 10.0).abs() < 1e-3);
        assert!(level.entity(falling).unwrap().pos.y < 9.0);
    }

    #[test]
    fn resize_keeps_velocity() {
        let mut level = level();
        let id = level.make_enemy_as_box(0.0, 0.0, 2.0, 2.0, None);
        level.set_absolute_velocity(id, Vec2::new(3.0, 0.0), true);
        level.resize(id, Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.5));

        let entity = level.entity(id).unwrap();
        assert_eq!(entity.size, Vec2::new(1.0, 0.5));
        assert_eq!(entity.pos, Vec2::new(1.0, 1.0));
        assert_eq!(level.velocity(id), Vec2::new(3.0, 0.0));
    }

    #[test]
    fn shrink_over_time_ends_in_removal() {
        let mut level = level();
        let id = level.make_obstacle_as_box(0.0, 0.0, 1.0, 1.0, None);
        level.set_shrink_over_time(id, Vec2::new(2.0, 1.0), true);

        for _ in 0..3 {
            level.tick(SHRINK_INTERVAL);
        }
        let entity = level.entity(id).unwrap();
        assert!(entity.visible);
        assert!(entity.size.x < 1.0 && entity.size.y < 1.0);
        assert_eq!(entity.pos, Vec2::ZERO);

        for _ in 0..20 {
            level.tick(SHRINK_INTERVAL);
        }
        assert!(!level.entity(id).unwrap().visible);
    }

    #[test]
    fn shrink_without_centering_keeps_corner() {
        let mut level = level();
        let id = level.make_obstacle_as_box(0.0, 0.0, 2.0, 2.0, None);
        level.set_shrink_over_time(id, Vec2::new(2.0, 2.0), false);
        level.tick(SHRINK_INTERVAL);

        let entity = level.entity(id).unwrap();
        let corner = entity.pos - entity.size / 2.0;
        assert!((corner - Vec2::new(-1.0, -1.0)).length() < 1e-4);
    }

    #[test]
    fn route_teleports_to_first_waypoint() {
        let mut level = level();
        let id = level.make_obstacle_as_box(5.0, 5.0, 1.0, 1.0, None);
        level.set_route(id, Route::new(vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 4.0)]), 2.0, false);

        let entity = level.entity(id).unwrap();
        assert_eq!(entity.pos, Vec2::ZERO);
        assert_eq!(level.physics.body_type(&entity.body.unwrap()), BodyType::Kinematic);
        assert!((level.velocity(id) - Vec2::new(0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn timers_fire_triggers_in_order() {
        let mut level = level();
        let hero = level.make_hero_as_box(0.0, 0.0, 1.0, 1.0, None);
        level.set_timer_trigger(2, 0.1);
        level.set_entity_timer_trigger(1, 0.05, hero);

        level.tick(0.06);
        assert_eq!(level.take_triggers(), vec![TriggerEvent::EntityTimer { id: 1, entity: hero }]);
        level.tick(0.06);
        assert_eq!(level.take_triggers(), vec![TriggerEvent::Timer { id: 2 }]);
    }

    #[test]
    fn cancel_timers_drops_pending_work() {
        let mut level = level();
        level.set_timer_trigger(1, 0.1);
        level.set_lose_countdown(0.2);
        level.cancel_timers();
        level.tick(0.5);
        assert!(level.take_triggers().is_empty());
        assert_eq!(level.score.outcome(), None);
    }

    #[test]
    fn countdowns_decide_the_level() {
        let mut level = level();
        level.set_victory(VictoryCondition::Survive);
        level.set_win_countdown(1.0);
        level.set_lose_countdown(2.0);
        for _ in 0..100 {
            level.tick(0.05);
        }
        assert_eq!(level.score.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn appear_after_hides_then_shows() {
        let mut level = level();
        let id = level.make_goodie_as_box(0.0, 0.0, 1.0, 1.0, None);
        level.appear_after(id, 0.5);
        assert!(!level.entity(id).unwrap().visible);
        level.tick(0.6);
        let entity = level.entity(id).unwrap();
        assert!(entity.visible);
        assert!(level.physics.is_enabled(&entity.body.unwrap()));
    }

    #[test]
    fn disappear_after_removes() {
        let mut level = level();
        let id = level.make_goodie_as_box(0.0, 0.0, 1.0, 1.0, None);
        level.disappear_after(id, 0.2, true);
        level.tick(0.1);
        assert!(level.entity(id).unwrap().visible);
        level.tick(0.15);
        assert!(!level.entity(id).unwrap().visible);
    }

    #[test]
    fn contact_rule_setters_merge() {
        let mut level = level();
        let id = level.make_obstacle_as_box(0.0, 0.0, 1.0, 1.0, None);
        level.set_pass_through(id, 3);
        level.set_one_sided(id, Some(Side::Top));
        let rules = level.physics.contact_rules(id);
        assert_eq!(rules.pass_through, 3);
        assert_eq!(rules.one_sided, Some(Side::Top));
    }

    #[test]
    fn collision_effect_toggles_sensor() {
        let mut level = level();
        let id = level.make_obstacle_as_box(0.0, 0.0, 1.0, 1.0, None);
        level.set_collision_effect(id, false);
        let body = level.entity(id).unwrap().body.unwrap();
        assert!(level.physics.is_sensor(&body));
        level.set_collision_effect(id, true);
        assert!(!level.physics.is_sensor(&body));
    }

    #[test]
    fn touch_trigger_respects_gate() {
        let mut level = level();
        let id = level.make_obstacle_as_box(0.0, 0.0, 2.0, 2.0, None);
        level.set_touch_trigger(id, TriggerGate::new(8, [1, 0, 0, 0]));
        level.step();

        level.touch_down(Vec2::ZERO);
        assert!(level.take_triggers().is_empty());

        level.score.goodies_collected[0] = 1;
        level.touch_down(Vec2::ZERO);
        assert_eq!(level.take_triggers(), vec![TriggerEvent::Touch { id: 8, entity: id }]);
    }

    #[test]
    fn touching_disappear_on_touch_enemy_defeats_it() {
        let mut level = level();
        let enemy = level.make_enemy_as_box(0.0, 0.0, 2.0, 2.0, None);
        level.set_disappear_on_touch(enemy);
        level.step();
        level.touch_down(Vec2::new(0.5, 0.5));
        assert!(!level.entity(enemy).unwrap().visible);
        assert_eq!(level.score.enemies_defeated, 1);
    }

    #[test]
    #[should_panic]
    fn bad_z_index_panics() {
        let mut level = level();
        let id = level.make_obstacle_as_box(0.0, 0.0, 1.0, 1.0, None);
        level.set_z_index(id, -3);
    }
}
