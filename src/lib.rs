//! Landing-Monitor: a batch landing-page health checker
//!
//! This crate fetches the destination URLs of each configured target, classifies
//! the responses against configurable rule sets, and aggregates the findings into
//! a report and a notification decision.

pub mod checker;
pub mod config;
pub mod notify;
pub mod output;
pub mod source;
pub mod url;

use thiserror::Error;

/// Main error type for Landing-Monitor operations
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Notification error: {0}")]
    Notify(#[from] notify::NotifyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid status code pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Unrecognized status filter: {0}")]
    InvalidStatusFilter(String),

    #[error("Unrecognized entity type '{0}': must be 'ads' or 'keywords'")]
    InvalidEntity(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),
}

/// Result type alias for Landing-Monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use checker::{
    ErrorCategory, FetchOutcome, Fetcher, Finding, HttpFetcher, ResultSet, RuleSet, TargetReport,
};
pub use config::Config;
pub use output::{GlobalSummary, ReassurancePolicy};
pub use crate::url::normalize_url;
