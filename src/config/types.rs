use serde::Deserialize;

/// Main configuration structure for Landing-Monitor
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetConfig>,
}

/// Classification rules applied to every fetched URL
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RulesConfig {
    /// Patterns matched against the status code that flag an error
    #[serde(default = "default_error_code_patterns")]
    pub error_code_patterns: Vec<String>,

    /// Patterns matched against the status code that flag a warning
    #[serde(default = "default_warning_code_patterns")]
    pub warning_code_patterns: Vec<String>,

    /// Literal phrases that flag a content error when found in a page body
    #[serde(default = "default_content_error_phrases")]
    pub content_error_phrases: Vec<String>,

    /// Drop everything from the first '?' before deduplicating
    #[serde(default = "default_true")]
    pub strip_query_parameters: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            error_code_patterns: default_error_code_patterns(),
            warning_code_patterns: default_warning_code_patterns(),
            content_error_phrases: default_content_error_phrases(),
            strip_query_parameters: true,
        }
    }
}

/// Which entries of each target are checked
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SelectionConfig {
    /// Entity type to read URLs from ("ads" or "keywords")
    #[serde(default = "default_entity")]
    pub entity: String,

    /// "ENABLED", "PAUSED" or "ENABLED_OR_PAUSED"
    #[serde(default = "default_status_filter")]
    pub status_filter: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            entity: default_entity(),
            status_filter: default_status_filter(),
        }
    }
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User agent sent with each request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum in-flight fetches within one target
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Follow redirects instead of reporting 3xx codes
    #[serde(default)]
    pub follow_redirects: bool,

    /// Request timeout in seconds; the transport default applies when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            concurrency: default_concurrency(),
            follow_redirects: false,
            timeout_secs: None,
        }
    }
}

/// Notification settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NotificationConfig {
    /// Addresses that receive the report
    #[serde(default)]
    pub recipients: Vec<String>,

    /// Send an all-clear message on the reassurance day even without findings
    #[serde(default = "default_true")]
    pub send_reassurance_email: bool,

    /// Day of the week for the all-clear message (e.g. "Monday")
    #[serde(default = "default_reassurance_day")]
    pub reassurance_day: String,

    /// Message subject line
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Reply-to address for the message
    #[serde(default)]
    pub reply_to: Option<String>,

    /// Display name of the sender
    #[serde(default)]
    pub sender_name: Option<String>,

    /// Directory where outgoing messages are written; log only when absent
    #[serde(default)]
    pub outbox_dir: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            recipients: Vec::new(),
            send_reassurance_email: true,
            reassurance_day: default_reassurance_day(),
            subject: default_subject(),
            reply_to: None,
            sender_name: None,
            outbox_dir: None,
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the rendered report file
    #[serde(default)]
    pub report_path: Option<String>,

    /// "html" or "markdown"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: None,
            format: default_format(),
        }
    }
}

/// One logical unit of work (e.g. an account) with its candidate entries
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Display name used in the report
    pub name: String,

    #[serde(default)]
    pub entries: Vec<crate::source::TargetEntry>,
}

fn default_error_code_patterns() -> Vec<String> {
    vec!["4[0-9]{2}".to_string(), "5[0-9]{2}".to_string()]
}

fn default_warning_code_patterns() -> Vec<String> {
    vec!["3[0-9]{2}".to_string()]
}

fn default_content_error_phrases() -> Vec<String> {
    vec![
        "Liquid error:".to_string(),
        " liquid error ".to_string(),
        " err ".to_string(),
    ]
}

fn default_entity() -> String {
    "ads".to_string()
}

fn default_status_filter() -> String {
    "ENABLED".to_string()
}

fn default_user_agent() -> String {
    format!("landing-monitor/{}", env!("CARGO_PKG_VERSION"))
}

fn default_concurrency() -> usize {
    1
}

fn default_reassurance_day() -> String {
    "Monday".to_string()
}

fn default_subject() -> String {
    "Landing Page Monitor".to_string()
}

fn default_format() -> String {
    "html".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Compiles the classification rules into a [`RuleSet`](crate::checker::RuleSet)
    pub fn rule_set(&self) -> crate::ConfigResult<crate::checker::RuleSet> {
        crate::checker::RuleSet::from_config(&self.rules)
    }

    /// Parsed entity type to read URLs from
    pub fn entity(&self) -> crate::ConfigResult<crate::source::Entity> {
        self.selection.entity.parse()
    }

    /// Parsed status filter for entry selection
    pub fn status_filter(&self) -> crate::ConfigResult<crate::source::StatusFilter> {
        self.selection.status_filter.parse()
    }

    /// Reassurance settings used by the notification gate
    pub fn reassurance_policy(&self) -> crate::ConfigResult<crate::output::ReassurancePolicy> {
        Ok(crate::output::ReassurancePolicy::new(
            self.notification.send_reassurance_email,
            crate::output::parse_weekday(&self.notification.reassurance_day)?,
        ))
    }
}
