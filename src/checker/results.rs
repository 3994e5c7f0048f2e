//! Per-target result sets
//!
//! A [`ResultSet`] owns the deduplicated URLs of one target and the findings
//! recorded for them. It is populated by a single pass of
//! [`ResultSet::process_all`] and only read afterwards.

use crate::checker::classifier::{classify, Classification, RuleSet};
use crate::checker::fetcher::{FetchOutcome, Fetcher};
use crate::source::SourceEntry;
use crate::url::normalize_url;
use futures::stream::{self, StreamExt};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Message recorded when a URL could not be fetched at all
pub const FETCH_FAILURE_MESSAGE: &str = "Error - url fetch failed.";

/// Kind of issue a finding records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Status code matched an error pattern
    HttpError,
    /// Status code matched a warning pattern
    HttpWarning,
    /// Body contained one or more error phrases
    ContentError,
    /// No response could be obtained
    FetchFailure,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::HttpError => "Error",
            Self::HttpWarning => "Warning",
            Self::ContentError => "Content issue",
            Self::FetchFailure => "Fetch failure",
        };
        f.write_str(label)
    }
}

/// A single recorded issue tied to one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    url: String,
    message: String,
    category: ErrorCategory,
}

impl Finding {
    pub fn new(url: impl Into<String>, message: impl Into<String>, category: ErrorCategory) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
            category,
        }
    }

    /// Finding recorded when the fetch itself failed
    pub fn fetch_failure(url: impl Into<String>) -> Self {
        Self::new(url, FETCH_FAILURE_MESSAGE, ErrorCategory::FetchFailure)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }
}

/// Outcome of one URL within a pass
enum UrlOutcome {
    Failed { url: String, reason: String },
    Classified(Classification),
}

/// Deduplicated URLs of one target and the findings recorded for them
#[derive(Debug, Clone, Serialize)]
pub struct ResultSet {
    urls: IndexSet<String>,
    bad_urls: Vec<Finding>,
    warn_urls: Vec<Finding>,
    on_page_errors: Vec<Finding>,

    #[serde(skip)]
    rules: Arc<RuleSet>,

    #[serde(skip)]
    concurrency: usize,

    #[serde(skip)]
    processed: bool,
}

impl ResultSet {
    /// Creates an empty result set that checks one URL at a time
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            urls: IndexSet::new(),
            bad_urls: Vec::new(),
            warn_urls: Vec::new(),
            on_page_errors: Vec::new(),
            rules,
            concurrency: 1,
            processed: false,
        }
    }

    /// Allows up to `concurrency` fetches in flight during [`process_all`](Self::process_all)
    ///
    /// Findings are still recorded in URL insertion order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Normalizes and inserts a URL
    ///
    /// Returns `true` if the URL was new. Absent or empty URLs are ignored.
    pub fn add_url(&mut self, raw: Option<&str>) -> bool {
        match normalize_url(raw, self.rules.strip_query_parameters) {
            Some(url) => self.urls.insert(url),
            None => false,
        }
    }

    /// Consumes a source of entries, inserting each entry's final URL
    ///
    /// Returns the number of new URLs added.
    pub fn ingest<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator,
        I::Item: SourceEntry,
    {
        let mut added = 0;
        for entry in entries {
            if self.add_url(entry.final_url()) {
                added += 1;
            }
        }
        added
    }

    /// Fetches and classifies every URL, in insertion order
    ///
    /// A failing fetch records a `FetchFailure` finding for that URL and the
    /// pass continues with the next one. Calling this a second time does nothing.
    pub async fn process_all<F>(&mut self, fetcher: &F)
    where
        F: Fetcher + ?Sized,
    {
        if self.processed {
            tracing::warn!("Result set already processed, skipping second pass");
            return;
        }

        let rules = Arc::clone(&self.rules);
        let urls: Vec<String> = self.urls.iter().cloned().collect();
        let outcomes: Vec<UrlOutcome> = stream::iter(urls)
            .map(|url| {
                let rules = Arc::clone(&rules);
                async move {
                    tracing::debug!("Checking {}", url);
                    let outcome = fetcher.fetch(&url).await;
                    match outcome {
                        FetchOutcome::Success { status_code, body } => {
                            UrlOutcome::Classified(classify(&rules, &url, status_code, &body))
                        }
                        FetchOutcome::Failure { reason } => UrlOutcome::Failed { url, reason },
                    }
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            self.record(outcome);
        }
        self.processed = true;
    }

    /// Records a fetch failure for every URL when the whole pass was lost
    ///
    /// Any findings from a partial pass are discarded.
    pub(crate) fn mark_all_failed(&mut self) {
        self.bad_urls = self
            .urls
            .iter()
            .map(|url| Finding::fetch_failure(url.as_str()))
            .collect();
        self.warn_urls.clear();
        self.on_page_errors.clear();
        self.processed = true;
    }

    fn record(&mut self, outcome: UrlOutcome) {
        match outcome {
            UrlOutcome::Failed { url, reason } => {
                tracing::warn!("Fetch failed for {}: {}", url, reason);
                self.bad_urls.push(Finding::fetch_failure(url));
            }
            UrlOutcome::Classified(classification) => {
                self.bad_urls.extend(classification.errors);
                self.warn_urls.extend(classification.warnings);
                self.on_page_errors.extend(classification.content);
            }
        }
    }

    /// Deduplicated URLs in first-seen order
    pub fn urls(&self) -> impl ExactSizeIterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    /// HTTP errors and fetch failures
    pub fn bad_urls(&self) -> &[Finding] {
        &self.bad_urls
    }

    /// HTTP warnings
    pub fn warn_urls(&self) -> &[Finding] {
        &self.warn_urls
    }

    /// Content errors
    pub fn on_page_errors(&self) -> &[Finding] {
        &self.on_page_errors
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    /// Returns true if no bucket holds a finding
    pub fn is_clean(&self) -> bool {
        self.bad_urls.is_empty() && self.warn_urls.is_empty() && self.on_page_errors.is_empty()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

/// Rendered fragment and results of one target, as handed to the join step
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub name: String,
    pub text: String,
    pub data: ResultSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves canned outcomes and records the order of requests
    struct StubFetcher {
        responses: HashMap<String, FetchOutcome>,
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn new(responses: Vec<(&str, FetchOutcome)>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|(url, outcome)| (url.to_string(), outcome))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> FetchOutcome {
            self.calls.lock().unwrap().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .unwrap_or_else(|| FetchOutcome::Failure {
                    reason: "no stub".to_string(),
                })
        }
    }

    fn ok(status_code: u16, body: &str) -> FetchOutcome {
        FetchOutcome::Success {
            status_code,
            body: body.to_string(),
        }
    }

    fn new_set() -> ResultSet {
        ResultSet::new(Arc::new(RuleSet::default()))
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let mut set = new_set();
        let added = set.ingest(vec![
            "https://b.com/",
            "https://a.com/x?p=1",
            "https://b.com/",
            "https://a.com/x?p=2",
            "https://c.com/",
        ]);

        assert_eq!(added, 3);
        let urls: Vec<&str> = set.urls().collect();
        assert_eq!(urls, vec!["https://b.com/", "https://a.com/x", "https://c.com/"]);
    }

    #[test]
    fn test_dedup_without_stripping() {
        let mut rules = RuleSet::default();
        rules.strip_query_parameters = false;
        let mut set = ResultSet::new(Arc::new(rules));
        set.ingest(vec!["https://a.com/x?p=1", "https://a.com/x?p=2"]);
        assert_eq!(set.url_count(), 2);
    }

    #[test]
    fn test_entries_without_url_are_skipped() {
        use crate::source::TargetEntry;

        let mut set = new_set();
        let entries = vec![
            TargetEntry::ad("https://a.com/"),
            TargetEntry::default(),
            TargetEntry::ad(""),
        ];
        assert_eq!(set.ingest(&entries), 1);
    }

    #[tokio::test]
    async fn test_classification_into_buckets() {
        let fetcher = StubFetcher::new(vec![
            ("https://a.com/404", ok(404, "")),
            ("https://a.com/301", ok(301, "")),
            ("https://a.com/200", ok(200, "all good")),
        ]);

        let mut set = new_set();
        set.ingest(vec!["https://a.com/404", "https://a.com/301", "https://a.com/200"]);
        set.process_all(&fetcher).await;

        assert_eq!(set.bad_urls().len(), 1);
        assert_eq!(set.bad_urls()[0].message(), "HTTP Error Code - 404");
        assert_eq!(set.bad_urls()[0].url(), "https://a.com/404");
        assert_eq!(set.warn_urls().len(), 1);
        assert_eq!(set.warn_urls()[0].message(), "HTTP Code - 301");
        assert!(set.on_page_errors().is_empty());
    }

    #[tokio::test]
    async fn test_http_error_and_content_error_on_same_url() {
        let fetcher = StubFetcher::new(vec![("https://a.com/", ok(500, "Liquid error: x"))]);

        let mut set = new_set();
        set.add_url(Some("https://a.com/"));
        set.process_all(&fetcher).await;

        assert_eq!(set.bad_urls().len(), 1);
        assert_eq!(set.on_page_errors().len(), 1);
        assert_eq!(set.url_count(), 1);
    }

    #[tokio::test]
    async fn test_content_aggregation() {
        let fetcher = StubFetcher::new(vec![(
            "https://a.com/",
            ok(200, "Liquid error: bad and an err too"),
        )]);

        let mut set = new_set();
        set.add_url(Some("https://a.com/"));
        set.process_all(&fetcher).await;

        assert_eq!(set.on_page_errors().len(), 1);
        let message = set.on_page_errors()[0].message();
        assert!(message.contains("\"Liquid error:\""));
        assert!(message.contains("\" err \""));
        assert!(message.contains("\", \""));
    }

    #[tokio::test]
    async fn test_fetch_failure_isolation() {
        let fetcher = StubFetcher::new(vec![
            ("https://a.com/1", ok(404, "")),
            (
                "https://a.com/2",
                FetchOutcome::Failure {
                    reason: "dns".to_string(),
                },
            ),
            ("https://a.com/3", ok(302, "")),
        ]);

        let mut set = new_set();
        set.ingest(vec!["https://a.com/1", "https://a.com/2", "https://a.com/3"]);
        set.process_all(&fetcher).await;

        assert_eq!(set.bad_urls().len(), 2);
        assert_eq!(set.bad_urls()[0].category(), ErrorCategory::HttpError);
        assert_eq!(set.bad_urls()[1].category(), ErrorCategory::FetchFailure);
        assert_eq!(set.bad_urls()[1].url(), "https://a.com/2");
        assert_eq!(set.bad_urls()[1].message(), FETCH_FAILURE_MESSAGE);
        assert_eq!(set.warn_urls().len(), 1);
        assert_eq!(set.warn_urls()[0].url(), "https://a.com/3");
    }

    /// Answers later URLs sooner, so completion order is the reverse of submission
    #[derive(Default)]
    struct StaggeredFetcher {
        completed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Fetcher for StaggeredFetcher {
        async fn fetch(&self, url: &str) -> FetchOutcome {
            let index: u64 = url
                .rsplit('/')
                .next()
                .and_then(|i| i.parse().ok())
                .unwrap_or(0);
            tokio::time::sleep(Duration::from_millis((10 - index) * 5)).await;
            self.completed.lock().unwrap().push(url.to_string());
            ok(404, "")
        }
    }

    #[tokio::test]
    async fn test_concurrent_pass_keeps_insertion_order() {
        let urls: Vec<String> = (0..10).map(|i| format!("https://a.com/{}", i)).collect();
        let fetcher = StaggeredFetcher::default();

        let mut set = new_set().with_concurrency(4);
        set.ingest(urls.iter());
        set.process_all(&fetcher).await;

        let completed = fetcher.completed.lock().unwrap().clone();
        assert_eq!(completed.len(), 10);
        assert_ne!(completed, urls);

        let reported: Vec<&str> = set.bad_urls().iter().map(Finding::url).collect();
        assert_eq!(reported, urls.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_mark_all_failed_records_each_url() {
        let mut set = new_set();
        set.ingest(vec!["https://a.com/1", "https://a.com/2?x=1"]);
        set.mark_all_failed();

        assert!(set.is_processed());
        let failed: Vec<&str> = set.bad_urls().iter().map(Finding::url).collect();
        assert_eq!(failed, vec!["https://a.com/1", "https://a.com/2"]);
        assert!(set
            .bad_urls()
            .iter()
            .all(|f| f.category() == ErrorCategory::FetchFailure));
    }

    #[tokio::test]
    async fn test_second_pass_is_noop() {
        let fetcher = StubFetcher::new(vec![("https://a.com/", ok(404, ""))]);

        let mut set = new_set();
        set.add_url(Some("https://a.com/"));
        set.process_all(&fetcher).await;
        set.process_all(&fetcher).await;

        assert!(set.is_processed());
        assert_eq!(set.bad_urls().len(), 1);
        assert_eq!(fetcher.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_serializes_buckets() {
        let mut set = new_set();
        set.add_url(Some("https://a.com/"));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["urls"][0], "https://a.com/");
        assert!(json["bad_urls"].as_array().unwrap().is_empty());
        assert!(json.get("rules").is_none());
    }
}
