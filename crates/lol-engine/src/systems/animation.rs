//! Animation system: ticks animators and copies the current cell to sprites.

use crate::core::scene::Scene;

/// Tick every visible animator by `dt` and update its sprite's cell.
/// Entities flagged to vanish with their animation are hidden once it ends.
pub fn tick_animations(scene: &mut Scene, dt: f32) {
    for entity in scene.iter_mut().filter(|e| e.visible) {
        let Some(animator) = entity.animator.as_mut() else {
            continue;
        };
        animator.tick(dt);

        if let (Some(cell), Some(sprite)) = (animator.current_cell(), entity.sprite.as_mut()) {
            sprite.set_cell(cell);
        }
        if entity.hide_when_animation_ends && animator.is_finished() {
            entity.visible = false;
        }
    }
}
