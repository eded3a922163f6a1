use std::collections::HashMap;

use crate::api::types::SoundEvent;
use crate::assets::manifest::AssetManifest;
use crate::components::sprite::{AtlasId, SpriteComponent};

/// Named images and sounds for the running game.
/// Missing names are logged and resolve to `None`: nothing is drawn or played.
#[derive(Debug, Clone, Default)]
pub struct MediaRegistry {
    images: HashMap<String, SpriteComponent>,
    sounds: HashMap<String, SoundEvent>,
}

impl MediaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let images = manifest
            .images
            .iter()
            .map(|(name, desc)| {
                let sprite = SpriteComponent::new(AtlasId(desc.atlas), desc.col as f32, desc.row as f32);
                (name.clone(), sprite)
            })
            .collect();

        let mut sounds = HashMap::with_capacity(manifest.sounds.len());
        let mut next_id = manifest
            .sounds
            .values()
            .filter_map(|s| s.event_id)
            .max()
            .map_or(1, |max| max + 1);
        let mut names: Vec<&String> = manifest.sounds.keys().collect();
        names.sort();
        for name in names {
            let id = match manifest.sounds[name].event_id {
                Some(id) => id,
                None => {
                    next_id += 1;
                    next_id - 1
                }
            };
            sounds.insert(name.clone(), SoundEvent(id));
        }

        Self { images, sounds }
    }

    pub fn register_image(&mut self, name: impl Into<String>, sprite: SpriteComponent) {
        self.images.insert(name.into(), sprite);
    }

    pub fn register_sound(&mut self, name: impl Into<String>, sound: SoundEvent) {
        self.sounds.insert(name.into(), sound);
    }

    pub fn image(&self, name: &str) -> Option<SpriteComponent> {
        let image = self.images.get(name).cloned();
        if image.is_none() {
            log::warn!("no image registered as '{}'", name);
        }
        image
    }

    pub fn sound(&self, name: &str) -> Option<SoundEvent> {
        let sound = self.sounds.get(name).copied();
        if sound.is_none() {
            log::warn!("no sound registered as '{}'", name);
        }
        sound
    }
}
