pub mod animation;
pub mod entity;
pub mod kinds;
pub mod route;
pub mod sprite;
