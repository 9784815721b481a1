//! Asset manifest and store
//!
//! The scene is only built once every named asset has resolved. The store
//! guards that with a readiness flag that flips exactly once; lookups by
//! name after that point either succeed or fail hard with `MissingAsset`,
//! never with a silent placeholder.

use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;

use crate::error::GameError;

/// Default manifest shipped with the game
pub const MANIFEST_JSON: &str = include_str!("../assets/manifest.json");

/// A named texture entry with its logical pixel size
#[derive(Debug, Clone, Deserialize)]
pub struct TextureSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Bitmap font entry
#[derive(Debug, Clone, Deserialize)]
pub struct FontSpec {
    pub family: String,
}

/// Everything the game needs resolved before the scene can exist
#[derive(Debug, Clone, Deserialize)]
pub struct AssetManifest {
    pub textures: Vec<TextureSpec>,
    pub font: FontSpec,
}

impl AssetManifest {
    /// Parse a manifest from JSON, rejecting structurally invalid entries
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let manifest: AssetManifest = serde_json::from_str(json)
            .map_err(|e| GameError::asset_load("manifest", e.to_string()))?;

        for tex in &manifest.textures {
            if tex.name.is_empty() {
                return Err(GameError::asset_load("manifest", "texture with empty name"));
            }
            if tex.width == 0 || tex.height == 0 {
                return Err(GameError::asset_load(&tex.name, "zero-sized texture"));
            }
        }
        if manifest.font.family.is_empty() {
            return Err(GameError::asset_load("manifest", "font with empty family"));
        }

        Ok(manifest)
    }
}

/// A resolved texture
#[derive(Debug, Clone, Copy)]
pub struct TextureAsset {
    pub size: Vec2,
}

impl TextureAsset {
    /// Half extents, convenient for center-anchored sprites
    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }
}

/// Resolved assets, keyed by manifest name
#[derive(Debug, Default)]
pub struct AssetStore {
    textures: HashMap<String, TextureAsset>,
    font_family: String,
    ready: bool,
}

impl AssetStore {
    /// Resolve every manifest entry into the store. The store is not ready
    /// until `finish` is called.
    pub fn resolve(manifest: &AssetManifest) -> Result<Self, GameError> {
        let mut textures = HashMap::new();
        for tex in &manifest.textures {
            let size = Vec2::new(tex.width as f32, tex.height as f32);
            if textures.insert(tex.name.clone(), TextureAsset { size }).is_some() {
                return Err(GameError::asset_load(&tex.name, "duplicate texture name"));
            }
            log::info!("Resolved texture '{}' ({}x{})", tex.name, tex.width, tex.height);
        }

        Ok(Self {
            textures,
            font_family: manifest.font.family.clone(),
            ready: false,
        })
    }

    /// Mark the store ready. Returns true on the first call only, so the
    /// completion callback cannot fire twice.
    pub fn finish(&mut self) -> bool {
        if self.ready {
            return false;
        }
        self.ready = true;
        log::info!("Assets ready ({} textures, font '{}')", self.textures.len(), self.font_family);
        true
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Look up a texture by manifest name. A miss is fatal.
    pub fn texture(&self, name: &str) -> Result<&TextureAsset, GameError> {
        self.textures
            .get(name)
            .ok_or_else(|| GameError::MissingAsset(name.to_string()))
    }

    /// Bitmap font family for text nodes
    pub fn font_family(&self) -> &str {
        &self.font_family
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_parses() {
        let manifest = AssetManifest::from_json(MANIFEST_JSON).unwrap();
        assert_eq!(manifest.textures.len(), 2);
        assert_eq!(manifest.font.family, "Desyrel");
    }

    #[test]
    fn test_resolve_and_lookup() {
        let manifest = AssetManifest::from_json(MANIFEST_JSON).unwrap();
        let mut store = AssetStore::resolve(&manifest).unwrap();
        assert!(!store.is_ready());

        assert!(store.finish());
        assert!(store.is_ready());
        // Readiness flips exactly once
        assert!(!store.finish());

        let wheel = store.texture("wheel").unwrap();
        assert_eq!(wheel.size, Vec2::new(569.0, 566.0));
        assert_eq!(wheel.half_size(), Vec2::new(284.5, 283.0));
    }

    #[test]
    fn test_missing_asset_is_fatal() {
        let manifest = AssetManifest::from_json(MANIFEST_JSON).unwrap();
        let store = AssetStore::resolve(&manifest).unwrap();
        let err = store.texture("banner").unwrap_err();
        assert!(matches!(err, GameError::MissingAsset(name) if name == "banner"));
    }

    #[test]
    fn test_bad_manifest_rejected() {
        assert!(matches!(
            AssetManifest::from_json("not json"),
            Err(GameError::AssetLoad { .. })
        ));

        let zero_size = r#"{"textures":[{"name":"wheel","width":0,"height":5}],"font":{"family":"Desyrel"}}"#;
        assert!(AssetManifest::from_json(zero_size).is_err());

        let empty_font = r#"{"textures":[],"font":{"family":""}}"#;
        assert!(AssetManifest::from_json(empty_font).is_err());
    }
}
