use crate::source::{EntityStatus, EntryKind, TargetEntry};
use crate::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Entity type a run reads its URLs from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Ads,
    Keywords,
}

impl Entity {
    fn kind(&self) -> EntryKind {
        match self {
            Self::Ads => EntryKind::Ad,
            Self::Keywords => EntryKind::Keyword,
        }
    }
}

impl FromStr for Entity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ads" => Ok(Self::Ads),
            "keywords" => Ok(Self::Keywords),
            other => Err(ConfigError::InvalidEntity(other.to_string())),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ads => f.write_str("ads"),
            Self::Keywords => f.write_str("keywords"),
        }
    }
}

/// Status condition applied when selecting entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Entry, ad group and campaign are all enabled
    Enabled,
    /// Any of entry, ad group or campaign is paused
    Paused,
    /// No status condition
    EnabledOrPaused,
}

impl StatusFilter {
    /// Returns true if the entry satisfies this filter
    pub fn matches(&self, entry: &TargetEntry) -> bool {
        let statuses = [entry.status, entry.ad_group_status, entry.campaign_status];
        match self {
            Self::Enabled => statuses.iter().all(|s| *s == EntityStatus::Enabled),
            Self::Paused => statuses.iter().any(|s| *s == EntityStatus::Paused),
            Self::EnabledOrPaused => true,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ENABLED" => Ok(Self::Enabled),
            "PAUSED" => Ok(Self::Paused),
            "ENABLED_OR_PAUSED" | "ENABLED PAUSED" => Ok(Self::EnabledOrPaused),
            other => Err(ConfigError::InvalidStatusFilter(other.to_string())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("ENABLED"),
            Self::Paused => f.write_str("PAUSED"),
            Self::EnabledOrPaused => f.write_str("ENABLED_OR_PAUSED"),
        }
    }
}

/// Selects the entries of a target that should be checked
///
/// The returned iterator is lazy and single-pass.
pub fn select_entries<'a>(
    entries: &'a [TargetEntry],
    entity: Entity,
    filter: StatusFilter,
) -> impl Iterator<Item = &'a TargetEntry> + 'a {
    let kind = entity.kind();
    entries
        .iter()
        .filter(move |entry| entry.kind == kind && filter.matches(entry))
}
