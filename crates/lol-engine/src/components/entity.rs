use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::animation::{Animation, Animator};
use crate::components::kinds::{Destination, Enemy, Goodie, Hero, Obstacle, Projectile, TriggerGate};
use crate::components::route::RouteDriver;
use crate::components::sprite::SpriteComponent;
use crate::core::physics::{JointHandle, PhysicsBody};

/// Kind tag of an entity. The numeric priority decides which side of a
/// collision handles it: the lower value is dominant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Hero,
    Enemy,
    Goodie,
    Projectile,
    Obstacle,
    SvgLine,
    Destination,
}

impl EntityType {
    pub fn priority(self) -> u8 {
        match self {
            EntityType::Hero => 0,
            EntityType::Enemy => 1,
            EntityType::Goodie => 2,
            EntityType::Projectile => 3,
            EntityType::Obstacle => 4,
            EntityType::SvgLine => 5,
            EntityType::Destination => 6,
        }
    }
}

/// The face of a one-sided entity that still registers contacts.
/// The world is Y-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Bottom = 0,
    Right = 1,
    Top = 2,
    Left = 3,
}

impl Side {
    pub fn from_index(index: u8) -> Option<Side> {
        match index {
            0 => Some(Side::Bottom),
            1 => Some(Side::Right),
            2 => Some(Side::Top),
            3 => Some(Side::Left),
            _ => None,
        }
    }

    /// Whether a body moving at `velocity` (at the contact point) comes from
    /// the wrong side and must pass through.
    pub fn disables_contact(self, velocity: Vec2) -> bool {
        match self {
            Side::Bottom => velocity.y < 0.0,
            Side::Right => velocity.x > 0.0,
            Side::Top => velocity.y > 0.0,
            Side::Left => velocity.x < 0.0,
        }
    }
}

/// Faces that weld a touching dynamic body in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickyFaces {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl StickyFaces {
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }
}

/// What a pointer-down on an entity does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchResponse {
    Trigger(TriggerGate),
    /// Defeat the touched enemy.
    Defeat,
    /// Make the touched hero jump.
    Jump,
}

/// Spawned in place of an entity removed non-quietly.
#[derive(Debug, Clone)]
pub struct DisappearAnimation {
    pub animation: Animation,
    pub size: Vec2,
    pub offset: Vec2,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Hero(Hero),
    Enemy(Enemy),
    Goodie(Goodie),
    Projectile(Projectile),
    Obstacle(Obstacle),
    SvgLine,
    Destination(Destination),
}

impl EntityKind {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKind::Hero(_) => EntityType::Hero,
            EntityKind::Enemy(_) => EntityType::Enemy,
            EntityKind::Goodie(_) => EntityType::Goodie,
            EntityKind::Projectile(_) => EntityType::Projectile,
            EntityKind::Obstacle(_) => EntityType::Obstacle,
            EntityKind::SvgLine => EntityType::SvgLine,
            EntityKind::Destination(_) => EntityType::Destination,
        }
    }
}

/// Fat Entity: one struct for every kind, a physics body bound for life.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// Removed entities are hidden with their body disabled, never freed.
    pub visible: bool,
    /// Centre in world space, synced from the body after every step.
    pub pos: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    /// Width and height in world units.
    pub size: Vec2,
    pub kind: EntityKind,
    pub body: Option<PhysicsBody>,
    pub sprite: Option<SpriteComponent>,
    pub animator: Option<Animator>,
    pub route: Option<RouteDriver>,
    pub touch: Option<TouchResponse>,
    /// Draw order in [-2, 2]; lower draws first.
    pub z_index: i8,
    pub sticky: StickyFaces,
    pub(crate) sticky_joint: Option<JointHandle>,
    /// Flip the sprite to face the direction of travel.
    pub face_forward: bool,
    /// Rotate to point along the velocity every frame.
    pub rotate_by_direction: bool,
    pub disappear_sound: Option<String>,
    pub disappear_animation: Option<DisappearAnimation>,
    /// Hide once a non-looping animation ends.
    pub hide_when_animation_ends: bool,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            visible: true,
            pos: Vec2::ZERO,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            size: Vec2::ONE,
            kind,
            body: None,
            sprite: None,
            animator: None,
            route: None,
            touch: None,
            z_index: 0,
            sticky: StickyFaces::default(),
            sticky_joint: None,
            face_forward: false,
            rotate_by_direction: false,
            disappear_sound: None,
            disappear_animation: None,
            hide_when_animation_ends: false,
        }
    }

    // -- Builder pattern --

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteComponent) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_animator(mut self, animator: Animator) -> Self {
        self.animator = Some(animator);
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_z_index(mut self, z_index: i8) -> Self {
        assert!((-2..=2).contains(&z_index), "z index {} outside [-2, 2]", z_index);
        self.z_index = z_index;
        self
    }

    // -- Kind access --

    pub fn entity_type(&self) -> EntityType {
        self.kind.entity_type()
    }

    pub fn hero(&self) -> Option<&Hero> {
        match &self.kind {
            EntityKind::Hero(h) => Some(h),
            _ => None,
        }
    }

    pub fn hero_mut(&mut self) -> Option<&mut Hero> {
        match &mut self.kind {
            EntityKind::Hero(h) => Some(h),
            _ => None,
        }
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            EntityKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn enemy_mut(&mut self) -> Option<&mut Enemy> {
        match &mut self.kind {
            EntityKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn obstacle(&self) -> Option<&Obstacle> {
        match &self.kind {
            EntityKind::Obstacle(o) => Some(o),
            _ => None,
        }
    }

    pub fn obstacle_mut(&mut self) -> Option<&mut Obstacle> {
        match &mut self.kind {
            EntityKind::Obstacle(o) => Some(o),
            _ => None,
        }
    }

    pub fn goodie(&self) -> Option<&Goodie> {
        match &self.kind {
            EntityKind::Goodie(g) => Some(g),
            _ => None,
        }
    }

    pub fn destination(&self) -> Option<&Destination> {
        match &self.kind {
            EntityKind::Destination(d) => Some(d),
            _ => None,
        }
    }

    pub fn destination_mut(&mut self) -> Option<&mut Destination> {
        match &mut self.kind {
            EntityKind::Destination(d) => Some(d),
            _ => None,
        }
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            EntityKind::Projectile(p) => Some(p),
            _ => None,
        }
    }

    pub fn projectile_mut(&mut self) -> Option<&mut Projectile> {
        match &mut self.kind {
            EntityKind::Projectile(p) => Some(p),
            _ => None,
        }
    }

    /// Switch to a new animation, if the entity animates.
    pub fn play(&mut self, animation: Option<Animation>) {
        if let (Some(animator), Some(animation)) = (self.animator.as_mut(), animation) {
            animator.set_animation(animation);
        }
    }
}
