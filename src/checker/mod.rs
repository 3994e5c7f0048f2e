//! Checker module for landing page evaluation
//!
//! This module contains the core checking logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Status code and content classification
//! - Per-target result sets with deduplicated URLs
//! - Multi-target orchestration

mod classifier;
mod fetcher;
mod results;
mod runner;

pub use classifier::{
    check_content, check_http_errors, check_http_warnings, classify, Classification, CodePattern,
    RuleSet,
};
pub use fetcher::{build_http_client, FetchOutcome, Fetcher, HttpFetcher};
pub use results::{ErrorCategory, Finding, ResultSet, TargetReport, FETCH_FAILURE_MESSAGE};
pub use runner::{run_monitor, Monitor, MonitorReport};
