//! URL source for Landing-Monitor
//!
//! Targets list their candidate entries (ads or keywords) in the configuration.
//! This module decides which of those entries are checked and exposes the
//! final-destination URL of each one.

mod filter;

pub use filter::{select_entries, Entity, StatusFilter};

use serde::Deserialize;

/// Anything that can point at a final destination URL
///
/// Entries without a URL are skipped during ingestion.
pub trait SourceEntry {
    fn final_url(&self) -> Option<&str>;
}

impl SourceEntry for String {
    fn final_url(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl SourceEntry for str {
    fn final_url(&self) -> Option<&str> {
        Some(self)
    }
}

impl<T: SourceEntry + ?Sized> SourceEntry for &T {
    fn final_url(&self) -> Option<&str> {
        (**self).final_url()
    }
}

/// Kind of an entry within a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Ad,
    Keyword,
}

/// Serving status of an entry, its ad group or its campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    #[default]
    Enabled,
    Paused,
    Removed,
}

/// A single ad or keyword with its destination and statuses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetEntry {
    #[serde(default)]
    pub final_url: Option<String>,

    #[serde(default)]
    pub kind: EntryKind,

    #[serde(default)]
    pub status: EntityStatus,

    #[serde(default)]
    pub ad_group_status: EntityStatus,

    #[serde(default)]
    pub campaign_status: EntityStatus,
}

impl TargetEntry {
    /// Creates an enabled ad pointing at `url`
    pub fn ad(url: impl Into<String>) -> Self {
        Self {
            final_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Creates an enabled keyword pointing at `url`
    pub fn keyword(url: impl Into<String>) -> Self {
        Self {
            final_url: Some(url.into()),
            kind: EntryKind::Keyword,
            ..Self::default()
        }
    }

    /// Returns a copy with all three statuses set to `status`
    pub fn with_status(mut self, status: EntityStatus) -> Self {
        self.status = status;
        self.ad_group_status = status;
        self.campaign_status = status;
        self
    }
}

impl SourceEntry for TargetEntry {
    fn final_url(&self) -> Option<&str> {
        self.final_url.as_deref()
    }
}
