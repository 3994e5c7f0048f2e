//! Cross-target aggregation
//!
//! Combines finalized result sets into totals, picks the report title by
//! severity and decides whether a notification is due.

use crate::checker::ResultSet;
use crate::ConfigError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub const ERRORS_TITLE_PREFIX: &str = "Errors found!";
pub const CONTENT_ERRORS_TITLE_PREFIX: &str = "Content errors found!";
pub const WARNINGS_TITLE_PREFIX: &str = "Warning!";
pub const ALL_CLEAR_TITLE: &str = "Everything looks good! No errors found.";

/// Anything that can report bucket sizes for aggregation
pub trait FindingCounts {
    fn error_count(&self) -> usize;
    fn warning_count(&self) -> usize;
    fn content_error_count(&self) -> usize;
}

impl FindingCounts for ResultSet {
    fn error_count(&self) -> usize {
        self.bad_urls().len()
    }

    fn warning_count(&self) -> usize {
        self.warn_urls().len()
    }

    fn content_error_count(&self) -> usize {
        self.on_page_errors().len()
    }
}

impl<T: FindingCounts + ?Sized> FindingCounts for &T {
    fn error_count(&self) -> usize {
        (**self).error_count()
    }

    fn warning_count(&self) -> usize {
        (**self).warning_count()
    }

    fn content_error_count(&self) -> usize {
        (**self).content_error_count()
    }
}

/// Serialized counts of one target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSummary {
    pub name: String,
    pub urls_checked: usize,
    pub errors: usize,
    pub warnings: usize,
    pub content_errors: usize,
}

impl TargetSummary {
    pub fn from_result_set(name: impl Into<String>, results: &ResultSet) -> Self {
        Self {
            name: name.into(),
            urls_checked: results.url_count(),
            errors: results.error_count(),
            warnings: results.warning_count(),
            content_errors: results.content_error_count(),
        }
    }
}

impl FindingCounts for TargetSummary {
    fn error_count(&self) -> usize {
        self.errors
    }

    fn warning_count(&self) -> usize {
        self.warnings
    }

    fn content_error_count(&self) -> usize {
        self.content_errors
    }
}

/// When an all-clear notification is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReassurancePolicy {
    enabled: bool,
    day: Weekday,
}

impl ReassurancePolicy {
    pub fn new(enabled: bool, day: Weekday) -> Self {
        Self { enabled, day }
    }

    pub fn disabled() -> Self {
        Self::new(false, Weekday::Mon)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    /// Returns true if `date` falls on the configured weekday
    pub fn is_reassurance_day(&self, date: NaiveDate) -> bool {
        date.weekday() == self.day
    }

    /// Returns true if the all-clear message is due on `date`
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.enabled && self.is_reassurance_day(date)
    }
}

impl Default for ReassurancePolicy {
    /// Enabled on Mondays
    fn default() -> Self {
        Self::new(true, Weekday::Mon)
    }
}

/// Parses a weekday name such as "Monday" or "mon"
pub fn parse_weekday(s: &str) -> Result<Weekday, ConfigError> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| ConfigError::InvalidWeekday(s.to_string()))
}

/// Totals across all targets with the derived title and notification gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_content_errors: usize,
    pub should_notify: bool,
    pub title: String,
}

impl GlobalSummary {
    /// Aggregates finalized results
    ///
    /// # Arguments
    ///
    /// * `results` - Per-target result sets or their serialized summaries
    /// * `reassurance_enabled` - Whether all-clear messages are configured
    /// * `is_reassurance_day` - Whether today is the designated day
    pub fn compute<I>(results: I, reassurance_enabled: bool, is_reassurance_day: bool) -> Self
    where
        I: IntoIterator,
        I::Item: FindingCounts,
    {
        let (total_errors, total_warnings, total_content_errors) =
            results.into_iter().fold((0, 0, 0), |(e, w, c), r| {
                (
                    e + r.error_count(),
                    w + r.warning_count(),
                    c + r.content_error_count(),
                )
            });

        let has_findings = total_errors > 0 || total_warnings > 0 || total_content_errors > 0;

        Self {
            total_errors,
            total_warnings,
            total_content_errors,
            should_notify: has_findings || (is_reassurance_day && reassurance_enabled),
            title: summary_title(total_errors, total_warnings, total_content_errors),
        }
    }

    /// Aggregates finalized results against a reassurance policy on `today`
    pub fn with_policy<I>(results: I, policy: &ReassurancePolicy, today: NaiveDate) -> Self
    where
        I: IntoIterator,
        I::Item: FindingCounts,
    {
        Self::compute(results, policy.enabled(), policy.is_reassurance_day(today))
    }

    pub fn has_findings(&self) -> bool {
        self.total_errors > 0 || self.total_warnings > 0 || self.total_content_errors > 0
    }
}

/// Picks the title by severity: errors, then content errors, then warnings
pub fn summary_title(errors: usize, warnings: usize, content_errors: usize) -> String {
    if errors > 0 {
        format!(
            "{} {} url(s) have errors - please check ASAP.",
            ERRORS_TITLE_PREFIX, errors
        )
    } else if content_errors > 0 {
        format!(
            "{} {} url(s) have warning signs.",
            CONTENT_ERRORS_TITLE_PREFIX, content_errors
        )
    } else if warnings > 0 {
        format!("{} {} url(s) have warning signs.", WARNINGS_TITLE_PREFIX, warnings)
    } else {
        ALL_CLEAR_TITLE.to_string()
    }
}
