//! Import attribute resolution
//!
//! The policy does not read import settings itself. An [`AttributeResolver`]
//! loads each texture importer and exposes its settings for a build target,
//! its packing tag, its mesh type and the sprites it produced.

pub mod manifest;

pub use manifest::{
    ImporterRecord, ManifestError, ManifestResolver, PlatformOverride, PlatformSettings,
    MANIFEST_SUFFIX,
};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ColorSpace, MeshType, RawFilterMode, SpriteId, TextureFormat, UsageMode};

/// Platform that import settings are resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildTarget(pub String);

impl BuildTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BuildTarget {
    fn default() -> Self {
        Self("standalone".to_string())
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Import attributes of one texture, resolved for a build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub format: TextureFormat,
    pub usage_mode: UsageMode,
    pub color_space: ColorSpace,
    pub compression_quality: u32,
    /// Unvalidated; the policy falls back to `Bilinear` for unknown values
    pub filter_mode: RawFilterMode,
    pub mesh_type: MeshType,
    pub packing_tag: String,
}

/// A loaded texture importer.
///
/// Held only while its attributes are read; dropping it releases whatever the
/// resolver loaded.
pub trait ImportedTexture {
    /// Import settings for `target`.
    fn import_settings(&self, target: &BuildTarget) -> ImportSettings;

    /// Sprites produced by this importer, in import order.
    fn sprites(&self) -> Vec<SpriteId>;
}

/// Loads texture importers for the policy.
pub trait AttributeResolver {
    /// Key identifying an importer (a path, an asset id, ...)
    type Importer: ?Sized;
    type Texture: ImportedTexture;
    type Error: std::error::Error;

    fn load(&self, importer: &Self::Importer) -> Result<Self::Texture, Self::Error>;
}
