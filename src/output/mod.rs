//! Output module for aggregating results and generating reports
//!
//! This module handles:
//! - Aggregating per-target results into global totals
//! - Choosing the report title and the notification decision
//! - Rendering HTML and markdown reports
//! - Writing rendered reports to disk

mod html;
mod markdown;
pub mod summary;
mod traits;

pub use html::{escape_html, HtmlReporter};
pub use markdown::MarkdownReporter;
pub use summary::{
    parse_weekday, summary_title, FindingCounts, GlobalSummary, ReassurancePolicy, TargetSummary,
};
pub use traits::{
    ordered_findings, summary_sentence, OutputError, OutputResult, Reporter, NO_FINDINGS_TEXT,
};

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Builds the reporter for a configured format name
///
/// # Arguments
///
/// * `format` - "html" or "markdown"
/// * `footer` - Optional footer line added to each document
pub fn reporter_for(format: &str, footer: Option<String>) -> OutputResult<Box<dyn Reporter>> {
    match format {
        "html" => {
            let mut reporter = HtmlReporter::new();
            if let Some(footer) = footer {
                reporter = reporter.with_footer(footer);
            }
            Ok(Box::new(reporter))
        }
        "markdown" => {
            let mut reporter = MarkdownReporter::new();
            if let Some(footer) = footer {
                reporter = reporter.with_footer(footer);
            }
            Ok(Box::new(reporter))
        }
        other => Err(OutputError::UnknownFormat(other.to_string())),
    }
}

/// Writes a rendered document to `output_path`, creating parent directories
pub fn write_report(document: &str, output_path: &Path) -> OutputResult<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(document.as_bytes())?;

    Ok(())
}
