//! Sprite handles and per-sprite packing decisions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::AtlasSettings;

/// Opaque handle identifying a sprite for the atlas builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteId(pub String);

impl SpriteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpriteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Mesh generated for a sprite at import time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeshType {
    /// Full bounding rectangle only; never tight-packed
    #[serde(alias = "rectangle")]
    FullRect,
    /// Polygon outline fitted to the sprite's pixels
    #[default]
    Tight,
}

impl MeshType {
    /// Whether sprites with this mesh can be packed by their outline.
    pub fn is_tight_capable(&self) -> bool {
        matches!(self, MeshType::Tight)
    }
}

impl fmt::Display for MeshType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshType::FullRect => f.pad("full_rect"),
            MeshType::Tight => f.pad("tight"),
        }
    }
}

/// How a sprite is placed on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingMode {
    /// Packed by its mesh outline
    Tight,
    /// Packed by its bounding rectangle
    Rectangle,
}

impl fmt::Display for PackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackingMode::Tight => write!(f, "tight"),
            PackingMode::Rectangle => write!(f, "rectangle"),
        }
    }
}

/// Rotation the builder may apply when placing a sprite.
///
/// This policy never allows rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PackingRotation {
    #[default]
    None,
}

/// One sprite of a batch, with everything the grouping pass needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteEntry {
    pub sprite: SpriteId,
    pub settings: AtlasSettings,
    pub atlas_name: String,
    pub packing_mode: PackingMode,
}
