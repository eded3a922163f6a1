use bytemuck::{Pod, Zeroable};

/// Unique identifier for an entity in a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// A sound the host should play this frame.
/// The numeric value is the `event_id` of a sound in the asset manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

/// A game event handed from the engine to the host.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    /// A level was won. `a` = level number.
    pub const LEVEL_WON: f32 = 1.0;
    /// A level was lost. `a` = level number.
    pub const LEVEL_LOST: f32 = 2.0;
    /// The visible screen changed. `a` = screen code, `b` = level or page.
    pub const SCREEN_CHANGED: f32 = 3.0;
    /// Hero strength changed. `a` = entity id, `b` = new strength.
    pub const HERO_STRENGTH: f32 = 4.0;

    pub fn new(kind: f32, a: f32, b: f32) -> Self {
        Self { kind, a, b, c: 0.0 }
    }
}
