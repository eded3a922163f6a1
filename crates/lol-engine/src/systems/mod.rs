pub mod animation;
pub mod behaviors;
pub mod collision;
pub mod hero;
pub mod projectiles;
pub mod render;
#[cfg(feature = "vectors")]
pub mod svg;
pub mod triggers;
