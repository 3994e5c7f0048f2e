//! Configuration module for Landing-Monitor
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use landing_monitor::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("monitor.toml")).unwrap();
//! println!("Status filter: {}", config.selection.status_filter);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetcherConfig, NotificationConfig, OutputConfig, RulesConfig, SelectionConfig,
    TargetConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
