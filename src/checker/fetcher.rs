//! HTTP fetcher implementation
//!
//! This module wraps the HTTP transport behind the [`Fetcher`] trait. A fetch
//! makes a single attempt and never fails across the trait boundary: every
//! transport problem is folded into [`FetchOutcome::Failure`].

use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered, whatever the status code
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// No usable response (invalid URL, DNS, connect, TLS, timeout, body decode)
    Failure {
        /// Error description
        reason: String,
    },
}

impl FetchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// Fetch capability used by result sets
///
/// Implementations must not panic and must map every problem to
/// [`FetchOutcome::Failure`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// [`Fetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher from the fetcher configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use landing_monitor::config::FetcherConfig;
    /// use landing_monitor::checker::HttpFetcher;
    ///
    /// let fetcher = HttpFetcher::new(&FetcherConfig::default()).unwrap();
    /// ```
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are not followed unless `follow_redirects` is set, so that 3xx
/// responses reach the warning check. No timeout is applied unless
/// `timeout_secs` is configured.
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let redirect = if config.follow_redirects {
        Policy::default()
    } else {
        Policy::none()
    };

    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .redirect(redirect)
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(e) => {
                return FetchOutcome::Failure {
                    reason: format!("Invalid URL: {}", e),
                }
            }
        };

        let response = match self.client.get(parsed).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failure { reason: describe_error(&e) },
        };

        let status_code = response.status().as_u16();

        match response.text().await {
            Ok(body) => FetchOutcome::Success { status_code, body },
            Err(e) => FetchOutcome::Failure {
                reason: format!("Failed to read body: {}", describe_error(&e)),
            },
        }
    }
}

/// Classifies a reqwest error into a short description
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_redirect() {
        format!("Redirect error: {}", e)
    } else {
        e.to_string()
    }
}
