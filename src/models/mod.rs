//! Data models for sprite atlas grouping (settings, sprites, packing modes)

mod settings;
mod sprite;

pub use settings::{
    AtlasSettings, ColorSpace, FilterMode, RawFilterMode, TextureFormat, UsageMode,
    DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_PADDING_POWER, GENERATE_MIP_MAPS,
};
pub use sprite::{MeshType, PackingMode, PackingRotation, SpriteEntry, SpriteId};
