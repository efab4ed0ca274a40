//! Packing tag parsing
//!
//! A packing tag names the atlas a sprite goes into and may carry a prefix
//! token (by default `[TIGHT]`) requesting tight packing:
//!
//! ```
//! use spritegroup::config::PolicyConfig;
//! use spritegroup::tag::TagParser;
//!
//! let parser = TagParser::new(&PolicyConfig::default());
//! let tag = parser.parse(" [TIGHT] Enemies ");
//! assert_eq!(tag.atlas_name, "Enemies");
//! assert!(tag.prefixed);
//! ```

use crate::config::PolicyConfig;

/// Atlas name used when a tag names no atlas.
pub const UNNAMED_ATLAS: &str = "(unnamed)";

/// Result of parsing a packing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    /// Atlas name; never empty
    pub atlas_name: String,
    /// Whether the trimmed tag started with the prefix token
    pub prefixed: bool,
}

/// Parses packing tags according to a [`PolicyConfig`].
#[derive(Debug, Clone)]
pub struct TagParser {
    prefix: String,
    case_sensitive: bool,
}

impl TagParser {
    pub fn new(policy: &PolicyConfig) -> Self {
        Self { prefix: policy.tag_prefix.clone(), case_sensitive: policy.case_sensitive }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parse a raw tag into an atlas name and prefix flag.
    pub fn parse(&self, tag: &str) -> ParsedTag {
        let trimmed = tag.trim();
        let (candidate, prefixed) = match self.strip_prefix(trimmed) {
            Some(rest) => (rest.trim(), true),
            None => (trimmed, false),
        };

        let atlas_name =
            if candidate.is_empty() { UNNAMED_ATLAS.to_string() } else { candidate.to_string() };

        ParsedTag { atlas_name, prefixed }
    }

    /// Whether the trimmed tag starts with the prefix token.
    pub fn is_prefixed(&self, tag: &str) -> bool {
        self.strip_prefix(tag.trim()).is_some()
    }

    /// Remainder of `tag` after the prefix, or `None` if it does not start with it.
    ///
    /// Tags shorter than the prefix never match.
    fn strip_prefix<'a>(&self, tag: &'a str) -> Option<&'a str> {
        if self.case_sensitive {
            return tag.strip_prefix(self.prefix.as_str());
        }

        let mut chars = tag.char_indices();
        let mut end = 0;
        for expected in self.prefix.chars() {
            let (index, actual) = chars.next()?;
            if !expected.to_lowercase().eq(actual.to_lowercase()) {
                return None;
            }
            end = index + actual.len_utf8();
        }
        Some(&tag[end..])
    }
}

impl Default for TagParser {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}
