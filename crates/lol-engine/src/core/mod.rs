pub mod factory;
pub mod level;
pub mod physics;
pub mod rng;
pub mod scene;
pub mod score;
pub mod screen;
pub mod time;
