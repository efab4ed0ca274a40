//! Handing pages to the atlas builder.
//!
//! The builder that rasterizes and packs pages lives outside this crate; it is
//! reached through the [`AtlasBuilder`] trait. [`PageRecorder`] is a builder
//! that only records what it is asked to build.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::grouping::{Page, PageAssignment};
use crate::models::{AtlasSettings, PackingMode, PackingRotation, SpriteId};

/// Receiver of page declarations and sprite assignments.
///
/// A page is always declared before any sprite is assigned to it.
pub trait AtlasBuilder {
    type Error: std::error::Error;

    /// Declare a page with the settings shared by all its sprites.
    fn declare_page(&mut self, name: &str, settings: &AtlasSettings) -> Result<(), Self::Error>;

    /// Assign a sprite to a previously declared page.
    fn assign(
        &mut self,
        page_name: &str,
        sprite: &SpriteId,
        mode: PackingMode,
        rotation: PackingRotation,
    ) -> Result<(), Self::Error>;
}

/// Declare each page and assign its sprites, in page order.
///
/// Stops at the first builder error and returns it unchanged.
pub fn submit_pages<B>(pages: &[Page], builder: &mut B) -> Result<(), B::Error>
where
    B: AtlasBuilder + ?Sized,
{
    for page in pages {
        log::debug!(
            "page '{}': {} sprite(s), {}",
            page.name,
            page.assignments.len(),
            page.settings
        );
        builder.declare_page(&page.name, &page.settings)?;
        for assignment in &page.assignments {
            builder.assign(&page.name, &assignment.sprite, assignment.mode, assignment.rotation)?;
        }
    }
    Ok(())
}

/// Rejection from [`PageRecorder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// A page with this name was already declared with other settings
    #[error("page '{0}' is already declared with different settings")]
    ConflictingPage(String),
    /// Sprite assigned to a page that was never declared
    #[error("cannot assign sprite '{sprite}' to undeclared page '{page}'")]
    UndeclaredPage { page: String, sprite: SpriteId },
}

/// A recorded page, as the builder would receive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSpec {
    pub name: String,
    pub settings: AtlasSettings,
    pub sprites: Vec<PageAssignment>,
}

/// Builder that records declarations and assignments in call order.
///
/// Declaring a page name again with equal settings continues the existing
/// page, so an atlas literally tagged like another atlas's group page shares
/// that page.
#[derive(Debug, Default)]
pub struct PageRecorder {
    pages: Vec<PageSpec>,
    index: HashMap<String, usize>,
}

impl PageRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded pages in declaration order.
    pub fn pages(&self) -> &[PageSpec] {
        &self.pages
    }

    pub fn page(&self, name: &str) -> Option<&PageSpec> {
        self.index.get(name).map(|&i| &self.pages[i])
    }

    pub fn into_pages(self) -> Vec<PageSpec> {
        self.pages
    }
}

impl AtlasBuilder for PageRecorder {
    type Error = JobError;

    fn declare_page(&mut self, name: &str, settings: &AtlasSettings) -> Result<(), JobError> {
        if let Some(&slot) = self.index.get(name) {
            if self.pages[slot].settings != *settings {
                return Err(JobError::ConflictingPage(name.to_string()));
            }
            log::debug!("page '{}' declared again, appending", name);
            return Ok(());
        }
        self.index.insert(name.to_string(), self.pages.len());
        self.pages.push(PageSpec {
            name: name.to_string(),
            settings: settings.clone(),
            sprites: Vec::new(),
        });
        Ok(())
    }

    fn assign(
        &mut self,
        page_name: &str,
        sprite: &SpriteId,
        mode: PackingMode,
        rotation: PackingRotation,
    ) -> Result<(), JobError> {
        let slot = self.index.get(page_name).copied().ok_or_else(|| JobError::UndeclaredPage {
            page: page_name.to_string(),
            sprite: sprite.clone(),
        })?;
        self.pages[slot].sprites.push(PageAssignment { sprite: sprite.clone(), mode, rotation });
        Ok(())
    }
}
