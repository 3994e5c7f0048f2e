use crate::checker::CodePattern;
use crate::config::types::{
    Config, FetcherConfig, NotificationConfig, OutputConfig, RulesConfig, SelectionConfig,
    TargetConfig,
};
use crate::output::parse_weekday;
use crate::source::{Entity, StatusFilter};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_rules(&config.rules)?;
    validate_selection(&config.selection)?;
    validate_fetcher(&config.fetcher)?;
    validate_notification(&config.notification)?;
    validate_output(&config.output)?;
    validate_targets(&config.targets)?;
    Ok(())
}

/// Validates that every code pattern compiles and phrases are usable
fn validate_rules(config: &RulesConfig) -> Result<(), ConfigError> {
    for pattern in config
        .error_code_patterns
        .iter()
        .chain(config.warning_code_patterns.iter())
    {
        CodePattern::parse(pattern)?;
    }

    if config.content_error_phrases.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "content_error_phrases cannot contain an empty phrase".to_string(),
        ));
    }

    Ok(())
}

/// Validates entity type and status filter
fn validate_selection(config: &SelectionConfig) -> Result<(), ConfigError> {
    config.entity.parse::<Entity>()?;
    config.status_filter.parse::<StatusFilter>()?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 64 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 64, got {}",
            config.concurrency
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates notification configuration
fn validate_notification(config: &NotificationConfig) -> Result<(), ConfigError> {
    parse_weekday(&config.reassurance_day)?;

    if config.subject.trim().is_empty() {
        return Err(ConfigError::Validation(
            "subject cannot be empty".to_string(),
        ));
    }

    for recipient in &config.recipients {
        validate_email(recipient)?;
    }

    if let Some(reply_to) = &config.reply_to {
        validate_email(reply_to)?;
    }

    if config.outbox_dir.is_some() && config.recipients.is_empty() {
        return Err(ConfigError::Validation(
            "outbox_dir is set but no recipients are configured".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output(config: &OutputConfig) -> Result<(), ConfigError> {
    if !matches!(config.format.as_str(), "html" | "markdown") {
        return Err(ConfigError::Validation(format!(
            "format must be 'html' or 'markdown', got '{}'",
            config.format
        )));
    }

    if matches!(&config.report_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates target entries
fn validate_targets(targets: &[TargetConfig]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[target]] must be configured".to_string(),
        ));
    }

    for target in targets {
        if target.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "target name cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "email address cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
