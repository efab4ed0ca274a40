//! Configuration schema types for `spritegroup.toml`
//!
//! Defines the structure and validation rules for the packer policy configuration.

use serde::{Deserialize, Serialize};

use crate::models::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_PADDING_POWER};

/// Prefix that marks a packing tag as requesting tight packing.
pub const DEFAULT_TAG_PREFIX: &str = "[TIGHT]";

/// Largest accepted padding power (2^8 = 256 pixels).
const MAX_PADDING_POWER: u32 = 8;

/// Tag parsing and packing mode policy.
///
/// Passed to [`TagParser`](crate::tag::TagParser) and
/// [`PackingModeResolver`](crate::packing::PackingModeResolver) at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Token a packing tag must start with to request tight packing
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
    /// Match the prefix exactly (true) or ignoring case (false)
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    /// Tight-capable sprites are packed tight when the prefix match equals this flag
    #[serde(default = "default_true")]
    pub allow_tight_when_tagged: bool,
}

fn default_tag_prefix() -> String {
    DEFAULT_TAG_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            tag_prefix: default_tag_prefix(),
            case_sensitive: true,
            allow_tight_when_tagged: true,
        }
    }
}

/// Fixed page constants stamped onto every sprite's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Padding between sprites, as a power of two
    #[serde(default = "default_padding_power")]
    pub padding_power: u32,
    /// Maximum page width in pixels
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    /// Maximum page height in pixels
    #[serde(default = "default_max_height")]
    pub max_height: u32,
}

fn default_padding_power() -> u32 {
    DEFAULT_PADDING_POWER
}

fn default_max_width() -> u32 {
    DEFAULT_MAX_WIDTH
}

fn default_max_height() -> u32 {
    DEFAULT_MAX_HEIGHT
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            padding_power: DEFAULT_PADDING_POWER,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

/// Build settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Build target (platform) import settings are resolved for
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_target() -> String {
    "standalone".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { target: default_target() }
    }
}

/// Complete spritegroup.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpritegroupConfig {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "page.max_width")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "spritegroup.toml: '{}' {}", self.field, self.message)
    }
}

impl SpritegroupConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.policy.tag_prefix.is_empty() {
            errors.push(ConfigValidationError {
                field: "policy.tag_prefix".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        } else if self.policy.tag_prefix.starts_with(char::is_whitespace) {
            // Tags are trimmed before matching, so this prefix could never match
            errors.push(ConfigValidationError {
                field: "policy.tag_prefix".to_string(),
                message: "must not start with whitespace".to_string(),
            });
        }

        if self.page.padding_power > MAX_PADDING_POWER {
            errors.push(ConfigValidationError {
                field: "page.padding_power".to_string(),
                message: format!("must be at most {}", MAX_PADDING_POWER),
            });
        }

        let dimensions =
            [("page.max_width", self.page.max_width), ("page.max_height", self.page.max_height)];
        for (field, value) in dimensions {
            if !value.is_power_of_two() {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a positive power of two".to_string(),
                });
            }
        }

        if self.build.target.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "build.target".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
