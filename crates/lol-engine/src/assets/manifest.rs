use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Every atlas, named image cell and named sound a game uses.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    pub atlases: Vec<AtlasDescriptor>,
    /// Named image lookup: name to atlas index and cell.
    #[serde(default)]
    pub images: HashMap<String, ImageDescriptor>,
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// A texture atlas laid out as a grid of equal cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasDescriptor {
    pub name: String,
    pub cols: u32,
    pub rows: u32,
    /// Relative path to the image file.
    pub path: String,
}

/// One cell of an atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub atlas: u32,
    pub col: u32,
    pub row: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    pub path: String,
    /// Id the host plays when the engine emits this sound.
    /// Sounds without one get an id assigned at registration.
    #[serde(default)]
    pub event_id: Option<u32>,
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let json = r#"{
            "atlases": [
                { "name": "sprites", "cols": 8, "rows": 4, "path": "sprites.png" }
            ],
            "images": {
                "greenball": { "atlas": 0, "col": 2, "row": 1 }
            },
            "sounds": {
                "hipitch": { "path": "hipitch.ogg", "event_id": 3 },
                "lowpitch": { "path": "lowpitch.ogg" }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.atlases[0].cols, 8);
        assert_eq!(manifest.images["greenball"].col, 2);
        assert_eq!(manifest.sounds["hipitch"].event_id, Some(3));
        assert_eq!(manifest.sounds["lowpitch"].event_id, None);
    }

    #[test]
    fn images_and_sounds_are_optional() {
        let manifest = AssetManifest::from_json(r#"{ "atlases": [] }"#).unwrap();
        assert!(manifest.images.is_empty());
        assert!(manifest.sounds.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(AssetManifest::from_json(r#"{ "atlases": 7 }"#).is_err());
    }
}
