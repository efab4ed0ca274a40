//! Importer manifests on disk.
//!
//! Each texture importer is described by one `*.import.json` file:
//!
//! ```json
//! {
//!   "texture": "Sprites/hero.png",
//!   "packing_tag": "[TIGHT] Heroes",
//!   "mesh_type": "tight",
//!   "filter_mode": "Point",
//!   "settings": { "format": "RGBA32", "compression_quality": 50 },
//!   "platforms": { "android": { "format": "ETC2_RGBA8" } },
//!   "sprites": ["hero_idle", "hero_run"]
//! }
//! ```
//!
//! Sprite handles are `{texture}#{sprite}`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{AttributeResolver, BuildTarget, ImportSettings, ImportedTexture};
use crate::models::{ColorSpace, MeshType, RawFilterMode, SpriteId, TextureFormat, UsageMode};

/// File suffix of importer manifests.
pub const MANIFEST_SUFFIX: &str = ".import.json";

/// Error loading an importer manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-platform texture settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSettings {
    #[serde(default = "default_format")]
    pub format: TextureFormat,
    #[serde(default)]
    pub usage_mode: UsageMode,
    #[serde(default)]
    pub color_space: ColorSpace,
    #[serde(default = "default_compression_quality")]
    pub compression_quality: u32,
}

fn default_format() -> TextureFormat {
    TextureFormat::new("RGBA32")
}

fn default_compression_quality() -> u32 {
    50
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            format: default_format(),
            usage_mode: UsageMode::default(),
            color_space: ColorSpace::default(),
            compression_quality: default_compression_quality(),
        }
    }
}

/// Settings overridden for one platform; unset fields use the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<TextureFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_mode: Option<UsageMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_space: Option<ColorSpace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_quality: Option<u32>,
}

impl PlatformOverride {
    fn apply(&self, base: &PlatformSettings) -> PlatformSettings {
        PlatformSettings {
            format: self.format.clone().unwrap_or_else(|| base.format.clone()),
            usage_mode: self.usage_mode.clone().unwrap_or_else(|| base.usage_mode.clone()),
            color_space: self.color_space.unwrap_or(base.color_space),
            compression_quality: self.compression_quality.unwrap_or(base.compression_quality),
        }
    }
}

/// Contents of one `*.import.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImporterRecord {
    /// Source texture path
    pub texture: String,
    #[serde(default)]
    pub packing_tag: String,
    #[serde(default)]
    pub mesh_type: MeshType,
    #[serde(default)]
    pub filter_mode: RawFilterMode,
    #[serde(default)]
    pub settings: PlatformSettings,
    #[serde(default)]
    pub platforms: HashMap<String, PlatformOverride>,
    /// Sprite names sliced from the texture
    #[serde(default)]
    pub sprites: Vec<String>,
}

impl ImporterRecord {
    /// Settings for `target`, with any platform override applied.
    pub fn platform_settings(&self, target: &BuildTarget) -> PlatformSettings {
        match self.platforms.get(target.as_str()) {
            Some(over) => over.apply(&self.settings),
            None => self.settings.clone(),
        }
    }
}

impl ImportedTexture for ImporterRecord {
    fn import_settings(&self, target: &BuildTarget) -> ImportSettings {
        let platform = self.platform_settings(target);
        ImportSettings {
            format: platform.format,
            usage_mode: platform.usage_mode,
            color_space: platform.color_space,
            compression_quality: platform.compression_quality,
            filter_mode: self.filter_mode.clone(),
            mesh_type: self.mesh_type,
            packing_tag: self.packing_tag.clone(),
        }
    }

    fn sprites(&self) -> Vec<SpriteId> {
        self.sprites.iter().map(|s| SpriteId::new(format!("{}#{}", self.texture, s))).collect()
    }
}

/// Resolver reading importer manifests from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestResolver;

impl ManifestResolver {
    pub fn new() -> Self {
        Self
    }
}

impl AttributeResolver for ManifestResolver {
    type Importer = Path;
    type Texture = ImporterRecord;
    type Error = ManifestError;

    fn load(&self, importer: &Path) -> Result<ImporterRecord, ManifestError> {
        let contents = fs::read_to_string(importer)
            .map_err(|source| ManifestError::Io { path: importer.to_path_buf(), source })?;
        serde_json::from_str(&contents)
            .map_err(|source| ManifestError::Parse { path: importer.to_path_buf(), source })
    }
}
