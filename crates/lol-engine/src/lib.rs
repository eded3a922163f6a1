pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig};
pub use api::types::{EntityId, GameEvent, SoundEvent};
pub use assets::manifest::AssetManifest;
pub use assets::registry::MediaRegistry;
pub use components::animation::{Animation, Animator};
pub use components::entity::{DisappearAnimation, Entity, EntityKind, EntityType, Side, StickyFaces, TouchResponse};
pub use components::kinds::{
    Chase, Destination, Enemy, EnemyTrigger, Goodie, Hero, HeroAnimations, HeroCollision, Obstacle, Projectile,
    TriggerGate,
};
pub use components::route::{Route, RouteDriver, RouteStep};
pub use components::sprite::{AtlasId, SpriteComponent};
pub use core::level::Level;
pub use core::physics::{BodyDesc, BodyType, ColliderDesc, ColliderMaterial, CollisionPair, PhysicsBody, PhysicsWorld};
pub use core::scene::Scene;
pub use core::score::{Outcome, Score, VictoryCondition};
pub use core::screen::{Overlay, Screen, ScreenMachine};
pub use core::time::FixedTimestep;
pub use input::poll::{InputEvent, InputPoller, InputSnapshot, PointerState};
pub use renderer::camera::Camera2D;
pub use renderer::instance::{RenderBuffer, RenderInstance};
pub use systems::projectiles::{AimMode, ProjectileConfig};
pub use systems::render::build_render_buffer;
pub use systems::triggers::TriggerEvent;

#[cfg(feature = "vectors")]
pub use systems::svg::SvgPlacement;
