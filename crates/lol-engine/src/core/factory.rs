//! Named constructors for every entity kind.
//!
//! Coordinates are the entity's centre; `w` and `h` its size in world units.
//! Box variants get a cuboid collider, circle variants a ball inscribed in
//! the same size.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::entity::EntityKind;
use crate::components::kinds::{Destination, Enemy, Goodie, Hero, Obstacle};
use crate::core::level::Level;
use crate::core::physics::{BodyDesc, ColliderDesc};

impl Level {
    fn make(&mut self, kind: EntityKind, desc: BodyDesc, w: f32, h: f32, image: Option<&str>) -> EntityId {
        self.spawn(kind, desc, Vec2::new(w, h), image)
    }

    fn make_hero(&mut self, collider: ColliderDesc, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        let desc = BodyDesc::dynamic(collider)
            .with_position(Vec2::new(x, y))
            .with_fixed_rotation(true);
        let id = self.make(EntityKind::Hero(Hero::default()), desc, w, h, image);
        self.score.on_hero_created();
        id
    }

    pub fn make_hero_as_box(&mut self, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        self.make_hero(ColliderDesc::cuboid(w, h), x, y, w, h, image)
    }

    pub fn make_hero_as_circle(&mut self, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        self.make_hero(ColliderDesc::ball(w, h), x, y, w, h, image)
    }

    fn make_enemy(&mut self, collider: ColliderDesc, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        let desc = BodyDesc::fixed(collider).with_position(Vec2::new(x, y));
        let id = self.make(EntityKind::Enemy(Enemy::default()), desc, w, h, image);
        self.score.on_enemy_created();
        id
    }

    pub fn make_enemy_as_box(&mut self, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        self.make_enemy(ColliderDesc::cuboid(w, h), x, y, w, h, image)
    }

    pub fn make_enemy_as_circle(&mut self, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        self.make_enemy(ColliderDesc::ball(w, h), x, y, w, h, image)
    }

    pub fn make_obstacle_as_box(&mut self, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        let desc = BodyDesc::fixed(ColliderDesc::cuboid(w, h)).with_position(Vec2::new(x, y));
        self.make(EntityKind::Obstacle(Obstacle::default()), desc, w, h, image)
    }

    pub fn make_obstacle_as_circle(&mut self, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        let desc = BodyDesc::fixed(ColliderDesc::ball(w, h)).with_position(Vec2::new(x, y));
        self.make(EntityKind::Obstacle(Obstacle::default()), desc, w, h, image)
    }

    pub fn make_goodie_as_box(&mut self, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        let desc = BodyDesc::fixed(ColliderDesc::cuboid(w, h))
            .with_position(Vec2::new(x, y))
            .with_sensor(true);
        self.make(EntityKind::Goodie(Goodie::default()), desc, w, h, image)
    }

    pub fn make_goodie_as_circle(&mut self, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        let desc = BodyDesc::fixed(ColliderDesc::ball(w, h))
            .with_position(Vec2::new(x, y))
            .with_sensor(true);
        self.make(EntityKind::Goodie(Goodie::default()), desc, w, h, image)
    }

    pub fn make_destination_as_box(&mut self, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        let desc = BodyDesc::fixed(ColliderDesc::cuboid(w, h))
            .with_position(Vec2::new(x, y))
            .with_sensor(true);
        self.make(EntityKind::Destination(Destination::default()), desc, w, h, image)
    }

    pub fn make_destination_as_circle(&mut self, x: f32, y: f32, w: f32, h: f32, image: Option<&str>) -> EntityId {
        let desc = BodyDesc::fixed(ColliderDesc::ball(w, h))
            .with_position(Vec2::new(x, y))
            .with_sensor(true);
        self.make(EntityKind::Destination(Destination::default()), desc, w, h, image)
    }

    /// A fixed line from `a` to `b`. Heroes can land on it.
    pub fn make_svg_line(&mut self, a: Vec2, b: Vec2) -> EntityId {
        let mid = (a + b) / 2.0;
        let collider = ColliderDesc::Segment { a: a - mid, b: b - mid };
        let desc = BodyDesc::fixed(collider).with_position(mid);
        self.spawn(EntityKind::SvgLine, desc, Vec2::new(a.distance(b), 0.0), None)
    }
}
