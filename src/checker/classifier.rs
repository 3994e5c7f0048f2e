//! Response classification
//!
//! Pure functions that map a status code and a page body against a [`RuleSet`]
//! to zero or more [`Finding`]s. The three checks are independent: a page can
//! produce an HTTP error and a content error at the same time.

use crate::checker::results::{ErrorCategory, Finding};
use crate::config::RulesConfig;
use crate::ConfigError;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// A predicate over the textual status code
///
/// Patterns are tested in order and all of them are tested, so overlapping
/// patterns each produce their own finding.
#[derive(Clone)]
pub enum CodePattern {
    /// Status class such as `4xx`: matches any three-digit code with that first digit
    Class(char),
    /// Unanchored regular expression search, e.g. `4[0-9]{2}`
    Regex(Regex),
    /// Arbitrary predicate supplied in code
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl CodePattern {
    /// Parses a configured pattern string
    ///
    /// `Nxx` (case-insensitive `x`) becomes a class matcher, anything else is
    /// compiled as a regular expression.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let chars: Vec<char> = pattern.chars().collect();
        if chars.len() == 3
            && chars[0].is_ascii_digit()
            && chars[1..].iter().all(|c| c.eq_ignore_ascii_case(&'x'))
        {
            return Ok(Self::Class(chars[0]));
        }

        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    /// Wraps a closure as a pattern
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// Tests the pattern against a status code string
    pub fn matches(&self, code: &str) -> bool {
        match self {
            Self::Class(first) => {
                code.len() == 3
                    && code.starts_with(*first)
                    && code.chars().all(|c| c.is_ascii_digit())
            }
            Self::Regex(re) => re.is_match(code),
            Self::Predicate(f) => f(code),
        }
    }
}

impl fmt::Debug for CodePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(c) => write!(f, "Class({}xx)", c),
            Self::Regex(re) => write!(f, "Regex({})", re.as_str()),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Classification rules, read-only for the duration of a run
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub error_code_patterns: Vec<CodePattern>,
    pub warning_code_patterns: Vec<CodePattern>,
    pub content_error_phrases: Vec<String>,
    pub strip_query_parameters: bool,
}

impl RuleSet {
    /// Compiles the configured rules
    pub fn from_config(config: &RulesConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            error_code_patterns: compile_patterns(&config.error_code_patterns)?,
            warning_code_patterns: compile_patterns(&config.warning_code_patterns)?,
            content_error_phrases: config.content_error_phrases.clone(),
            strip_query_parameters: config.strip_query_parameters,
        })
    }
}

impl Default for RuleSet {
    /// 4xx and 5xx are errors, 3xx are warnings, with the stock content phrases
    fn default() -> Self {
        Self {
            error_code_patterns: vec![CodePattern::Class('4'), CodePattern::Class('5')],
            warning_code_patterns: vec![CodePattern::Class('3')],
            content_error_phrases: RulesConfig::default().content_error_phrases,
            strip_query_parameters: true,
        }
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<CodePattern>, ConfigError> {
    patterns.iter().map(|p| CodePattern::parse(p)).collect()
}

/// Findings produced for one successfully fetched URL
#[derive(Debug, Default)]
pub struct Classification {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub content: Option<Finding>,
}

impl Classification {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.content.is_none()
    }
}

/// Runs all three checks against a response
pub fn classify(rules: &RuleSet, url: &str, status_code: u16, body: &str) -> Classification {
    Classification {
        errors: check_http_errors(rules, url, status_code),
        warnings: check_http_warnings(rules, url, status_code),
        content: check_content(rules, url, body),
    }
}

/// One `HttpError` finding per matching error pattern
pub fn check_http_errors(rules: &RuleSet, url: &str, status_code: u16) -> Vec<Finding> {
    let code = status_code.to_string();
    rules
        .error_code_patterns
        .iter()
        .filter(|pattern| pattern.matches(&code))
        .map(|_| {
            Finding::new(
                url,
                format!("HTTP Error Code - {}", code),
                ErrorCategory::HttpError,
            )
        })
        .collect()
}

/// One `HttpWarning` finding per matching warning pattern
pub fn check_http_warnings(rules: &RuleSet, url: &str, status_code: u16) -> Vec<Finding> {
    let code = status_code.to_string();
    rules
        .warning_code_patterns
        .iter()
        .filter(|pattern| pattern.matches(&code))
        .map(|_| {
            Finding::new(
                url,
                format!("HTTP Code - {}", code),
                ErrorCategory::HttpWarning,
            )
        })
        .collect()
}

/// At most one `ContentError` finding listing every phrase found in the body
pub fn check_content(rules: &RuleSet, url: &str, body: &str) -> Option<Finding> {
    let matched: Vec<String> = rules
        .content_error_phrases
        .iter()
        .filter(|phrase| body.contains(phrase.as_str()))
        .map(|phrase| format!("\"{}\"", phrase))
        .collect();

    if matched.is_empty() {
        return None;
    }

    Some(Finding::new(
        url,
        format!("Page contains: {}", matched.join(", ")),
        ErrorCategory::ContentError,
    ))
}
