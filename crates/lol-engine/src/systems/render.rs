use crate::components::entity::Entity;
use crate::renderer::camera::Camera2D;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from a set of entities.
/// Visible entities with a sprite and inside the camera view are emitted,
/// lowest z-index first; ties keep scene order.
pub fn build_render_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    camera: &Camera2D,
    buffer: &mut RenderBuffer,
) {
    buffer.clear();

    let mut drawn: Vec<(i8, RenderInstance)> = entities
        .filter(|e| e.visible)
        .filter(|e| camera.is_rect_visible(e.pos, e.size / 2.0))
        .filter_map(|entity| {
            let sprite = entity.sprite.as_ref()?;
            let instance = RenderInstance {
                x: entity.pos.x,
                y: entity.pos.y,
                rotation: entity.rotation,
                width: entity.size.x,
                height: entity.size.y,
                sprite_col: sprite.col,
                atlas_row: sprite.row,
                atlas: sprite.atlas.0 as f32,
                alpha: sprite.alpha,
                flip_x: if sprite.flip_x { 1.0 } else { 0.0 },
            };
            Some((entity.z_index, instance))
        })
        .collect();

    drawn.sort_by_key(|(z, _)| *z);
    for (_, instance) in drawn {
        buffer.push(instance);
    }
}
