//! The packer policy: from texture importers to atlas pages.
//!
//! One run of [`PackerPolicy::group_atlases`] processes one batch:
//!
//! 1. Load every importer through the [`AttributeResolver`], turning each of
//!    its sprites into a [`SpriteEntry`] (atlas name from the packing tag,
//!    packing mode from mesh type and tag, settings from the import settings
//!    plus the fixed page constants).
//! 2. Group the entries into pages.
//! 3. Declare each page on the [`AtlasBuilder`] and assign its sprites.
//!
//! A resolver failure aborts the run before anything reaches the builder.
//! Errors from either collaborator are returned unchanged.

use serde::Serialize;
use thiserror::Error;

use crate::config::{PageConfig, PolicyConfig, SpritegroupConfig};
use crate::grouping::{group_entries, Page};
use crate::job::{submit_pages, AtlasBuilder};
use crate::models::{AtlasSettings, PackingMode, SpriteEntry, GENERATE_MIP_MAPS};
use crate::packing::PackingModeResolver;
use crate::resolver::{AttributeResolver, BuildTarget, ImportSettings, ImportedTexture};
use crate::tag::TagParser;

/// Version of the grouping rules. Cached builder output keyed on an older
/// version must be rebuilt.
pub const POLICY_VERSION: u32 = 1;

/// Failure of a policy run, carrying the collaborator's error as is.
#[derive(Debug, Error)]
pub enum PolicyError<R, B>
where
    R: std::error::Error + 'static,
    B: std::error::Error + 'static,
{
    /// The attribute resolver failed; nothing was handed to the builder
    #[error(transparent)]
    Resolve(R),
    /// The atlas builder rejected a page or an assignment
    #[error(transparent)]
    Build(B),
}

/// Counts describing one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupingSummary {
    pub atlases: usize,
    pub pages: usize,
    pub sprites: usize,
    pub tight_sprites: usize,
}

impl GroupingSummary {
    pub fn from_pages(pages: &[Page]) -> Self {
        let mut summary = GroupingSummary { pages: pages.len(), ..Default::default() };
        for page in pages {
            if page.group_index.unwrap_or(0) == 0 {
                summary.atlases += 1;
            }
            summary.sprites += page.assignments.len();
            summary.tight_sprites +=
                page.assignments.iter().filter(|a| a.mode == PackingMode::Tight).count();
        }
        summary
    }
}

impl std::fmt::Display for GroupingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} sprite(s) in {} atlas(es), {} page(s), {} tight",
            self.sprites, self.atlases, self.pages, self.tight_sprites
        )
    }
}

/// Groups sprites into atlas pages.
#[derive(Debug, Clone)]
pub struct PackerPolicy {
    tags: TagParser,
    modes: PackingModeResolver,
    page: PageConfig,
}

impl PackerPolicy {
    pub fn new(policy: &PolicyConfig, page: PageConfig) -> Self {
        Self { tags: TagParser::new(policy), modes: PackingModeResolver::new(policy), page }
    }

    pub fn from_config(config: &SpritegroupConfig) -> Self {
        Self::new(&config.policy, config.page)
    }

    pub fn version(&self) -> u32 {
        POLICY_VERSION
    }

    pub fn tag_parser(&self) -> &TagParser {
        &self.tags
    }

    pub fn packing_modes(&self) -> &PackingModeResolver {
        &self.modes
    }

    /// Page settings for a texture: its import settings plus the fixed page constants.
    pub fn atlas_settings(&self, import: &ImportSettings) -> AtlasSettings {
        AtlasSettings {
            format: import.format.clone(),
            usage_mode: import.usage_mode.clone(),
            color_space: import.color_space,
            compression_quality: import.compression_quality,
            filter_mode: import.filter_mode.validate(),
            generate_mip_maps: GENERATE_MIP_MAPS,
            padding_power: self.page.padding_power,
            max_width: self.page.max_width,
            max_height: self.page.max_height,
        }
    }

    /// Entries for every sprite of one loaded texture.
    pub fn texture_entries<T: ImportedTexture>(
        &self,
        texture: &T,
        target: &BuildTarget,
    ) -> Vec<SpriteEntry> {
        let import = texture.import_settings(target);
        let settings = self.atlas_settings(&import);
        let tag = self.tags.parse(&import.packing_tag);
        let packing_mode = self.modes.resolve(import.mesh_type, tag.prefixed);

        texture
            .sprites()
            .into_iter()
            .map(|sprite| SpriteEntry {
                sprite,
                settings: settings.clone(),
                atlas_name: tag.atlas_name.clone(),
                packing_mode,
            })
            .collect()
    }

    /// Load each importer in order and collect its sprite entries.
    ///
    /// Each loaded texture is released before the next importer is loaded.
    pub fn collect_entries<R, I>(
        &self,
        target: &BuildTarget,
        resolver: &R,
        importers: I,
    ) -> Result<Vec<SpriteEntry>, R::Error>
    where
        R: AttributeResolver,
        I: IntoIterator,
        I::Item: AsRef<R::Importer>,
    {
        let mut entries = Vec::new();
        for importer in importers {
            let texture = resolver.load(importer.as_ref())?;
            entries.extend(self.texture_entries(&texture, target));
            drop(texture);
        }
        Ok(entries)
    }

    /// Resolve and group a batch without handing it to a builder.
    pub fn plan_pages<R, I>(
        &self,
        target: &BuildTarget,
        resolver: &R,
        importers: I,
    ) -> Result<Vec<Page>, R::Error>
    where
        R: AttributeResolver,
        I: IntoIterator,
        I::Item: AsRef<R::Importer>,
    {
        let entries = self.collect_entries(target, resolver, importers)?;
        Ok(group_entries(&entries))
    }

    /// Run the policy over one batch of importers.
    pub fn group_atlases<R, B, I>(
        &self,
        target: &BuildTarget,
        builder: &mut B,
        resolver: &R,
        importers: I,
    ) -> Result<GroupingSummary, PolicyError<R::Error, B::Error>>
    where
        R: AttributeResolver,
        R::Error: 'static,
        B: AtlasBuilder + ?Sized,
        B::Error: 'static,
        I: IntoIterator,
        I::Item: AsRef<R::Importer>,
    {
        let pages =
            self.plan_pages(target, resolver, importers).map_err(PolicyError::Resolve)?;
        submit_pages(&pages, builder).map_err(PolicyError::Build)?;

        let summary = GroupingSummary::from_pages(&pages);
        log::info!("target '{}': {}", target, summary);
        Ok(summary)
    }
}

impl Default for PackerPolicy {
    fn default() -> Self {
        Self::from_config(&SpritegroupConfig::default())
    }
}
