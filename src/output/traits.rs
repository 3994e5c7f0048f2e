//! Reporter traits and shared report text
//!
//! This module defines the trait interface for reporters and the pieces of
//! report text every format shares.

use crate::checker::{Finding, ResultSet};
use thiserror::Error;

/// Line shown for a target that has URLs but no findings
pub const NO_FINDINGS_TEXT: &str = "No errors or warnings to report for this account.";

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Unknown report format: {0}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for report formatters
///
/// Reporters only format. They are handed finalized result sets and never
/// mutate them.
pub trait Reporter: Send + Sync {
    /// Renders the fragment for one target
    ///
    /// Returns an empty string for a target that had no URLs to check.
    fn render_target(&self, target_name: &str, results: &ResultSet) -> String;

    /// Wraps the concatenated target fragments into a full document
    fn render_document(&self, body: &str, title: &str) -> String;

    /// File extension for documents produced by this reporter
    fn extension(&self) -> &'static str;
}

/// One-sentence summary of a target's buckets
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use landing_monitor::checker::{ResultSet, RuleSet};
/// use landing_monitor::output::summary_sentence;
///
/// let mut results = ResultSet::new(Arc::new(RuleSet::default()));
/// results.add_url(Some("https://example.com/"));
/// assert_eq!(
///     summary_sentence(&results),
///     "Of the 1 urls checked, 0 contain errors, 0 have warning signs, and 0 have content errors."
/// );
/// ```
pub fn summary_sentence(results: &ResultSet) -> String {
    format!(
        "Of the {} urls checked, {} contain errors, {} have warning signs, and {} have content errors.",
        results.url_count(),
        results.bad_urls().len(),
        results.warn_urls().len(),
        results.on_page_errors().len()
    )
}

/// Findings in report order: errors, then content issues, then warnings
pub fn ordered_findings(results: &ResultSet) -> impl Iterator<Item = &Finding> {
    results
        .bad_urls()
        .iter()
        .chain(results.on_page_errors().iter())
        .chain(results.warn_urls().iter())
}
