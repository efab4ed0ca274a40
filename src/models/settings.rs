//! Shared texture settings for an atlas page.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mip maps are always generated for packed pages.
pub const GENERATE_MIP_MAPS: bool = true;
/// Padding between packed sprites, as a power of two.
pub const DEFAULT_PADDING_POWER: u32 = 4;
/// Maximum page width in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 2048;
/// Maximum page height in pixels.
pub const DEFAULT_MAX_HEIGHT: u32 = 2048;

/// Desired pixel format, as named by the importer (e.g. `"RGBA32"`, `"ETC2_RGBA8"`).
///
/// Opaque to the policy: only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureFormat(pub String);

impl TextureFormat {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Texture usage mode (default, lightmap encodings, normal maps, ...).
///
/// Opaque to the policy: only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageMode(pub String);

impl UsageMode {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UsageMode {
    fn default() -> Self {
        Self("Default".to_string())
    }
}

impl fmt::Display for UsageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Color space the texture is sampled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColorSpace {
    /// Not yet decided by the importer
    Uninitialized,
    /// sRGB gamma space
    #[default]
    Gamma,
    /// Linear space
    Linear,
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorSpace::Uninitialized => "Uninitialized",
            ColorSpace::Gamma => "Gamma",
            ColorSpace::Linear => "Linear",
        };
        f.write_str(name)
    }
}

/// Texture filter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FilterMode {
    /// Nearest-neighbor
    Point,
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Trilinear interpolation across mip levels
    Trilinear,
}

impl FilterMode {
    /// Look up a filter mode by its numeric code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(FilterMode::Point),
            1 => Some(FilterMode::Bilinear),
            2 => Some(FilterMode::Trilinear),
            _ => None,
        }
    }

    /// Look up a filter mode by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        [FilterMode::Point, FilterMode::Bilinear, FilterMode::Trilinear]
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterMode::Point => "Point",
            FilterMode::Bilinear => "Bilinear",
            FilterMode::Trilinear => "Trilinear",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A filter mode as supplied by an importer, before validation.
///
/// Importers may report either the numeric code or the name. Use
/// [`RawFilterMode::validate`] to turn it into a [`FilterMode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFilterMode {
    Code(i64),
    Name(String),
}

impl RawFilterMode {
    /// The recognized filter mode, if any.
    pub fn recognize(&self) -> Option<FilterMode> {
        match self {
            RawFilterMode::Code(code) => FilterMode::from_code(*code),
            RawFilterMode::Name(name) => FilterMode::from_name(name),
        }
    }

    /// The recognized filter mode, or `Bilinear` when the value is not one.
    pub fn validate(&self) -> FilterMode {
        match self.recognize() {
            Some(mode) => mode,
            None => {
                log::warn!("unrecognized filter mode {}, using Bilinear", self);
                FilterMode::Bilinear
            }
        }
    }
}

impl Default for RawFilterMode {
    fn default() -> Self {
        RawFilterMode::Code(1)
    }
}

impl From<FilterMode> for RawFilterMode {
    fn from(mode: FilterMode) -> Self {
        RawFilterMode::Name(mode.name().to_string())
    }
}

impl fmt::Display for RawFilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawFilterMode::Code(code) => write!(f, "{}", code),
            RawFilterMode::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Settings shared by every sprite on one atlas page.
///
/// Compared by full structural equality: two sprites of the same atlas share a
/// page if and only if every field matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasSettings {
    pub format: TextureFormat,
    pub usage_mode: UsageMode,
    pub color_space: ColorSpace,
    pub compression_quality: u32,
    pub filter_mode: FilterMode,
    pub generate_mip_maps: bool,
    pub padding_power: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl fmt::Display for AtlasSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "format={} usage={} color={} quality={} filter={} mips={} padding=2^{} max={}x{}",
            self.format,
            self.usage_mode,
            self.color_space,
            self.compression_quality,
            self.filter_mode,
            self.generate_mip_maps,
            self.padding_power,
            self.max_width,
            self.max_height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_mode_codes() {
        assert_eq!(FilterMode::from_code(0), Some(FilterMode::Point));
        assert_eq!(FilterMode::from_code(1), Some(FilterMode::Bilinear));
        assert_eq!(FilterMode::from_code(2), Some(FilterMode::Trilinear));
        assert_eq!(FilterMode::from_code(3), None);
        assert_eq!(FilterMode::from_code(-1), None);
    }

    #[test]
    fn test_filter_mode_names_ignore_case() {
        assert_eq!(FilterMode::from_name("point"), Some(FilterMode::Point));
        assert_eq!(FilterMode::from_name("TRILINEAR"), Some(FilterMode::Trilinear));
        assert_eq!(FilterMode::from_name(" Bilinear "), Some(FilterMode::Bilinear));
        assert_eq!(FilterMode::from_name("anisotropic"), None);
    }

    #[test]
    fn test_unrecognized_filter_mode_falls_back_to_bilinear() {
        assert_eq!(RawFilterMode::Code(0).validate(), FilterMode::Point);
        assert_eq!(RawFilterMode::Code(7).validate(), FilterMode::Bilinear);
        assert_eq!(RawFilterMode::Name("nearest".into()).validate(), FilterMode::Bilinear);
        assert_eq!(RawFilterMode::Name("trilinear".into()).validate(), FilterMode::Trilinear);
    }

    #[test]
    fn test_raw_filter_mode_deserializes_code_or_name() {
        let code: RawFilterMode = serde_json::from_str("2").unwrap();
        let name: RawFilterMode = serde_json::from_str("\"Point\"").unwrap();
        assert_eq!(code, RawFilterMode::Code(2));
        assert_eq!(name, RawFilterMode::Name("Point".to_string()));
    }
}
