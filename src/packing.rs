//! Tight vs. rectangle packing decision

use crate::config::PolicyConfig;
use crate::models::{MeshType, PackingMode};

/// Decides each sprite's packing mode from its mesh type and tag prefix flag.
#[derive(Debug, Clone, Copy)]
pub struct PackingModeResolver {
    allow_tight_when_tagged: bool,
}

impl PackingModeResolver {
    pub fn new(policy: &PolicyConfig) -> Self {
        Self { allow_tight_when_tagged: policy.allow_tight_when_tagged }
    }

    /// Sprites without a tight mesh are always packed as rectangles. Tight-capable
    /// sprites are packed tight when `prefixed` equals the policy flag, so a policy
    /// with the flag off packs tight by default and the prefix opts out.
    pub fn resolve(&self, mesh_type: MeshType, prefixed: bool) -> PackingMode {
        if mesh_type.is_tight_capable() && prefixed == self.allow_tight_when_tagged {
            PackingMode::Tight
        } else {
            PackingMode::Rectangle
        }
    }
}

impl Default for PackingModeResolver {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inverted() -> PackingModeResolver {
        PackingModeResolver::new(&PolicyConfig {
            allow_tight_when_tagged: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_full_rect_is_always_rectangle() {
        for resolver in [PackingModeResolver::default(), inverted()] {
            assert_eq!(resolver.resolve(MeshType::FullRect, true), PackingMode::Rectangle);
            assert_eq!(resolver.resolve(MeshType::FullRect, false), PackingMode::Rectangle);
        }
    }

    #[test]
    fn test_default_policy_tight_only_when_tagged() {
        let resolver = PackingModeResolver::default();
        assert_eq!(resolver.resolve(MeshType::Tight, true), PackingMode::Tight);
        assert_eq!(resolver.resolve(MeshType::Tight, false), PackingMode::Rectangle);
    }

    #[test]
    fn test_inverted_policy_tight_unless_tagged() {
        let resolver = inverted();
        assert_eq!(resolver.resolve(MeshType::Tight, false), PackingMode::Tight);
        assert_eq!(resolver.resolve(MeshType::Tight, true), PackingMode::Rectangle);
    }
}
