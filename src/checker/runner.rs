//! Monitor runner - multi-target orchestration
//!
//! This module runs one worker per target, joins them, and then hands the
//! finalized results to the aggregator, the reporter and the notifier:
//! - Selecting each target's entries and deduplicating their URLs
//! - Fetching and classifying each target's URLs on its own task
//! - Joining in configuration order
//! - Rendering the report and notifying when due

use crate::checker::{Fetcher, HttpFetcher, ResultSet, RuleSet, TargetReport};
use crate::config::{Config, TargetConfig};
use crate::notify::{notifier_for, Notification, Notifier};
use crate::output::{reporter_for, GlobalSummary, ReassurancePolicy, Reporter, TargetSummary};
use crate::source::{select_entries, Entity, StatusFilter};
use crate::MonitorError;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// Everything produced by one run
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub targets: Vec<TargetReport>,
    pub summary: GlobalSummary,
    #[serde(skip)]
    pub document: String,
    pub notified: bool,
}

impl MonitorReport {
    /// Per-target counts in configuration order
    pub fn target_summaries(&self) -> Vec<TargetSummary> {
        self.targets
            .iter()
            .map(|t| TargetSummary::from_result_set(&t.name, &t.data))
            .collect()
    }
}

/// Main monitor structure
pub struct Monitor {
    config: Arc<Config>,
    rules: Arc<RuleSet>,
    entity: Entity,
    status_filter: StatusFilter,
    policy: ReassurancePolicy,
    fetcher: Arc<dyn Fetcher>,
    reporter: Box<dyn Reporter>,
    notifier: Box<dyn Notifier>,
}

impl Monitor {
    /// Creates a monitor from a validated configuration
    ///
    /// Configuration problems (unknown status filter or entity, bad patterns)
    /// are reported here, before any URL is fetched.
    pub fn new(config: Config) -> Result<Self, MonitorError> {
        Self::with_config_hash(config, None)
    }

    /// Creates a monitor whose reports carry the given configuration hash
    pub fn with_config_hash(config: Config, config_hash: Option<&str>) -> Result<Self, MonitorError> {
        let rules = Arc::new(config.rule_set()?);
        let entity = config.entity()?;
        let status_filter = config.status_filter()?;
        let policy = config.reassurance_policy()?;

        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.fetcher)?);
        let footer = config_hash.map(|hash| format!("Config hash: {}", hash));
        let reporter = reporter_for(&config.output.format, footer)?;
        let notifier = notifier_for(&config.notification);

        Ok(Self {
            config: Arc::new(config),
            rules,
            entity,
            status_filter,
            policy,
            fetcher,
            reporter,
            notifier,
        })
    }

    /// Replaces the fetch capability
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Replaces the notification channel
    pub fn notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replaces the report formatter
    pub fn reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the unprocessed result set of a target
    pub fn prepare_target(&self, target: &TargetConfig) -> ResultSet {
        let mut results = ResultSet::new(Arc::clone(&self.rules))
            .with_concurrency(self.config.fetcher.concurrency);
        results.ingest(select_entries(&target.entries, self.entity, self.status_filter));
        results
    }

    /// Processes every target on its own task and joins in configuration order
    pub async fn evaluate_targets(&self) -> Vec<TargetReport> {
        let mut handles = Vec::with_capacity(self.config.targets.len());

        for target in &self.config.targets {
            let mut results = self.prepare_target(target);
            let fetcher = Arc::clone(&self.fetcher);
            let name = target.name.clone();
            let urls: Vec<String> = results.urls().map(String::from).collect();

            tracing::debug!("Target '{}': {} unique URLs", name, urls.len());

            let handle = tokio::spawn(async move {
                results.process_all(fetcher.as_ref()).await;
                results
            });
            handles.push((name, urls, handle));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (name, urls, handle) in handles {
            let data = match handle.await {
                Ok(results) => results,
                Err(e) => {
                    tracing::error!("Worker for target '{}' failed: {}", name, e);
                    let mut results = ResultSet::new(Arc::clone(&self.rules))
                        .with_concurrency(self.config.fetcher.concurrency);
                    results.ingest(&urls);
                    results.mark_all_failed();
                    results
                }
            };

            tracing::info!(
                "Processed {}: {} urls, {} errors, {} warnings, {} content errors",
                name,
                data.url_count(),
                data.bad_urls().len(),
                data.warn_urls().len(),
                data.on_page_errors().len()
            );

            let text = self.reporter.render_target(&name, &data);
            reports.push(TargetReport { name, text, data });
        }

        reports
    }

    /// Runs a complete pass
    ///
    /// # Arguments
    ///
    /// * `today` - Date used for the reassurance-day check
    /// * `notify` - Whether the notifier may be invoked at all
    pub async fn run(&self, today: NaiveDate, notify: bool) -> Result<MonitorReport, MonitorError> {
        let targets = self.evaluate_targets().await;
        tracing::info!("All targets processed.");

        let summary =
            GlobalSummary::with_policy(targets.iter().map(|t| &t.data), &self.policy, today);

        let body: String = targets.iter().map(|t| t.text.as_str()).collect();
        let document = self.reporter.render_document(&body, &summary.title);

        let mut notified = false;
        if summary.should_notify {
            if notify {
                let notification = Notification::from_config(&self.config.notification, document.clone());
                self.notifier.send(&notification)?;
                notified = true;
                tracing::info!("Notification sent: {}", summary.title);
            } else {
                tracing::info!("Notification due but disabled for this run: {}", summary.title);
            }
        } else {
            tracing::info!("Nothing to report, no notification sent.");
        }

        Ok(MonitorReport {
            targets,
            summary,
            document,
            notified,
        })
    }
}

/// Runs the monitor for today's date with notifications enabled
///
/// # Example
///
/// ```no_run
/// use landing_monitor::config::load_config;
/// use landing_monitor::checker::run_monitor;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("monitor.toml"))?;
/// let report = run_monitor(config).await?;
/// println!("{}", report.summary.title);
/// # Ok(())
/// # }
/// ```
pub async fn run_monitor(config: Config) -> Result<MonitorReport, MonitorError> {
    let monitor = Monitor::new(config)?;
    monitor.run(chrono::Local::now().date_naive(), true).await
}
