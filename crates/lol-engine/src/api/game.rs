use glam::Vec2;

use crate::core::level::Level;
use crate::systems::triggers::TriggerEvent;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Physics sub-step in seconds (default: 1/45).
    pub physics_dt: f32,
    /// Gravity in a Y-up world. Default: (0, -10).
    pub gravity: Vec2,
    /// Visible width in world units.
    pub world_width: f32,
    /// Visible height in world units.
    pub world_height: f32,
    /// Number of playable levels, numbered from 1.
    pub level_count: u32,
    /// Number of help pages reachable from the splash screen.
    pub help_pages: u32,
    /// Show the pre-level overlay whenever a level starts.
    pub show_pre_overlay: bool,
    /// Seed for each level's random generator.
    pub seed: u64,
    /// Maximum number of render instances (default: 512).
    pub max_instances: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics_dt: 1.0 / 45.0,
            gravity: Vec2::new(0.0, -10.0),
            world_width: 48.0,
            world_height: 32.0,
            level_count: 1,
            help_pages: 0,
            show_pre_overlay: false,
            seed: 42,
            max_instances: 512,
            max_sounds: 32,
            max_events: 32,
        }
    }
}

/// The contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once at startup.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Populate a freshly reset level: entities, victory condition, timers.
    fn configure_level(&mut self, level: &mut Level, index: u32);

    /// A trigger fired inside `level`. Runs after the frame's simulation.
    fn on_trigger(&mut self, _level: &mut Level, _index: u32, _trigger: TriggerEvent) {}
}
