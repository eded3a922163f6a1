//! Hero actions driven by game input.

use std::f32::consts::FRAC_PI_2;

use crate::api::types::EntityId;
use crate::core::level::Level;

impl Level {
    /// Add the jump impulse to the hero's velocity. Ignored while airborne
    /// unless multi-jump is on. Breaks any sticky weld.
    pub fn jump(&mut self, hero: EntityId) {
        let Some(entity) = self.scene.get_mut(hero) else { return };
        let Some(h) = entity.hero_mut() else { return };
        if h.in_air && !h.multi_jump {
            return;
        }
        h.in_air = true;
        let impulse = h.jump_impulse;
        let sound = h.jump_sound.clone();
        let animation = h.animations.jump.clone();
        let joint = entity.sticky_joint.take();
        entity.play(animation);

        if let Some(joint) = joint {
            self.physics.remove_joint(joint);
        }
        let velocity = self.velocity(hero) + impulse;
        self.update_velocity(hero, velocity);
        if let Some(sound) = sound {
            self.play_sound(&sound);
        }
    }

    /// Lie down: rotate a quarter turn clockwise and play the crawl animation.
    pub fn crawl_on(&mut self, hero: EntityId) {
        self.set_crawling(hero, true);
    }

    pub fn crawl_off(&mut self, hero: EntityId) {
        self.set_crawling(hero, false);
    }

    fn set_crawling(&mut self, hero: EntityId, crawling: bool) {
        let Some(entity) = self.scene.get_mut(hero) else { return };
        let Some(h) = entity.hero_mut() else { return };
        if h.crawling == crawling {
            return;
        }
        h.crawling = crawling;
        let crawl = h.animations.crawl.clone();

        entity.rotation = if crawling { -FRAC_PI_2 } else { 0.0 };
        if let Some(body) = entity.body {
            self.physics.set_transform(&body, entity.pos, entity.rotation);
        }
        if crawling {
            entity.play(crawl);
        } else if let Some(animator) = entity.animator.as_mut() {
            animator.reset_to_default();
        }
    }

    /// Show the animation cell matching how many goodies of `slot` (0..4)
    /// have been collected.
    pub fn set_animate_by_goodie_count(&mut self, hero: EntityId, slot: usize) {
        assert!(slot < 4, "goodie slot {} out of range", slot);
        if let Some(h) = self.scene.get_mut(hero).and_then(|e| e.hero_mut()) {
            h.goodie_count_slot = Some(slot);
        }
    }

    /// Turn the hero by `delta` radians. Landing on solid ground undoes it.
    pub fn increase_rotation(&mut self, hero: EntityId, delta: f32) {
        let Some(entity) = self.scene.get_mut(hero) else { return };
        let Some(h) = entity.hero_mut() else { return };
        h.extra_rotation += delta;
        entity.rotation += delta;
        if let Some(body) = entity.body {
            self.physics.set_transform(&body, entity.pos, entity.rotation);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::api::game::GameConfig;
    use crate::api::types::{EntityId, SoundEvent};
    use crate::assets::registry::MediaRegistry;
    use crate::components::animation::{Animation, Animator};
    use crate::core::level::Level;

    fn level_with_hero() -> (Level, EntityId) {
        let mut media = MediaRegistry::new();
        media.register_sound("boing", SoundEvent(4));
        let mut level = Level::new(&GameConfig::default(), media);
        let hero = level.make_hero_as_box(0.0, 0.0, 1.0, 2.0, None);
        {
            let h = level.entity_mut(hero).and_then(|e| e.hero_mut()).unwrap();
            h.jump_impulse = Vec2::new(0.0, 8.0);
            h.jump_sound = Some("boing".into());
        }
        (level, hero)
    }

    #[test]
    fn jump_only_from_the_ground() {
        let (mut level, hero) = level_with_hero();
        level.jump(hero);
        assert_eq!(level.velocity(hero), Vec2::new(0.0, 8.0));
        assert_eq!(level.take_sounds(), vec![SoundEvent(4)]);
        assert!(level.entity(hero).and_then(|e| e.hero()).unwrap().in_air);

        level.jump(hero);
        assert_eq!(level.velocity(hero), Vec2::new(0.0, 8.0));
        assert!(level.take_sounds().is_empty());
    }

    #[test]
    fn multi_jump_stacks() {
        let (mut level, hero) = level_with_hero();
        level.entity_mut(hero).and_then(|e| e.hero_mut()).unwrap().multi_jump = true;
        level.jump(hero);
        level.jump(hero);
        assert_eq!(level.velocity(hero), Vec2::new(0.0, 16.0));
    }

    #[test]
    fn jump_plays_animation() {
        let (mut level, hero) = level_with_hero();
        let jump = Animation::horizontal_strip(2.0, 0.0, 3, 0.1, false);
        {
            let entity = level.entity_mut(hero).unwrap();
            entity.animator = Some(Animator::playing(Animation::horizontal_strip(0.0, 0.0, 2, 0.1, true)));
            entity.hero_mut().unwrap().animations.jump = Some(jump.clone());
        }
        level.jump(hero);
        let animator = level.entity(hero).and_then(|e| e.animator.as_ref()).unwrap();
        assert_eq!(animator.current(), Some(&jump));
    }

    #[test]
    fn goodie_count_slot_is_stored() {
        let (mut level, hero) = level_with_hero();
        level.set_animate_by_goodie_count(hero, 3);
        assert_eq!(level.entity(hero).and_then(|e| e.hero()).unwrap().goodie_count_slot, Some(3));
    }

    #[test]
    #[should_panic(expected = "goodie slot 4 out of range")]
    fn goodie_count_slot_rejects_fifth() {
        let (mut level, hero) = level_with_hero();
        level.set_animate_by_goodie_count(hero, 4);
    }

    #[test]
    fn crawl_rotates_and_back() {
        let (mut level, hero) = level_with_hero();
        level.crawl_on(hero);
        let entity = level.entity(hero).unwrap();
        assert!(entity.hero().unwrap().crawling);
        assert!((entity.rotation + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        let (_, rot) = level.physics.body_position(&entity.body.unwrap());
        assert!((rot + std::f32::consts::FRAC_PI_2).abs() < 1e-5);

        level.crawl_off(hero);
        let entity = level.entity(hero).unwrap();
        assert!(!entity.hero().unwrap().crawling);
        assert_eq!(entity.rotation, 0.0);
    }

    #[test]
    fn extra_rotation_is_tracked() {
        let (mut level, hero) = level_with_hero();
        level.increase_rotation(hero, 0.25);
        level.increase_rotation(hero, 0.25);
        let entity = level.entity(hero).unwrap();
        assert!((entity.hero().unwrap().extra_rotation - 0.5).abs() < 1e-6);
        assert!((entity.rotation - 0.5).abs() < 1e-6);
    }
}
