//! Grouping sprites into atlas pages.
//!
//! Sprites are split into atlases by atlas name, then each atlas is split into
//! pages by identical [`AtlasSettings`]. Both passes are stable: groups appear
//! in first-encounter order and members keep their input order. When an atlas
//! needs more than one page, page names get a ` (Group N)` suffix.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{AtlasSettings, PackingMode, PackingRotation, SpriteEntry, SpriteId};

/// One sprite placed on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageAssignment {
    pub sprite: SpriteId,
    pub mode: PackingMode,
    pub rotation: PackingRotation,
}

/// One physical packing unit: sprites of one atlas sharing identical settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Page name handed to the builder
    pub name: String,
    /// Atlas the page belongs to
    pub atlas_name: String,
    /// Index among the atlas's pages; `None` when the atlas has a single page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_index: Option<usize>,
    pub settings: AtlasSettings,
    pub assignments: Vec<PageAssignment>,
}

/// Format the name of the `index`-th page of a multi-page atlas.
pub fn group_page_name(atlas_name: &str, index: usize) -> String {
    format!("{} (Group {})", atlas_name, index)
}

/// Partition `items` by key, keeping first-encounter order of keys and input
/// order within each bucket.
pub fn stable_group_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Vec<(K, Vec<T>)>
where
    K: Hash + Eq + Clone,
    F: FnMut(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let k = key(&item);
        match index.get(&k) {
            Some(&slot) => buckets[slot].1.push(item),
            None => {
                index.insert(k.clone(), buckets.len());
                buckets.push((k, vec![item]));
            }
        }
    }

    buckets
}

/// Group entries into pages.
///
/// Every entry lands on exactly one page. Pages of the same atlas are adjacent
/// and ordered by first encounter of their settings.
pub fn group_entries(entries: &[SpriteEntry]) -> Vec<Page> {
    let mut pages = Vec::new();

    for (atlas_name, members) in stable_group_by(entries, |e| e.atlas_name.as_str()) {
        let settings_groups = stable_group_by(members, |e| &e.settings);
        let paged = settings_groups.len() > 1;

        for (index, (settings, members)) in settings_groups.into_iter().enumerate() {
            let (name, group_index) = if paged {
                (group_page_name(atlas_name, index), Some(index))
            } else {
                (atlas_name.to_string(), None)
            };

            let assignments = members
                .into_iter()
                .map(|e| PageAssignment {
                    sprite: e.sprite.clone(),
                    mode: e.packing_mode,
                    rotation: PackingRotation::None,
                })
                .collect();

            pages.push(Page {
                name,
                atlas_name: atlas_name.to_string(),
                group_index,
                settings: settings.clone(),
                assignments,
            });
        }
    }

    pages
}
