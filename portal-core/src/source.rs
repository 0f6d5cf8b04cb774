//! Remote catalog source: the paginated, read-only character API.
//!
//! Defines the `CatalogSource` trait so storage never talks HTTP directly,
//! an HTTP implementation backed by `reqwest`, and a queue-driven mock for
//! tests.

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::types::RemoteRecord;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

/// A paginated source of raw character records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch exactly one page. Pages are never accumulated.
    async fn fetch_page(&self, page: u32) -> Result<Vec<RemoteRecord>, SourceError>;

    /// Short label for logs and diagnostics.
    fn describe(&self) -> String;
}

/// Body of one remote page.
#[derive(Debug, Deserialize)]
struct RemotePage {
    #[serde(default)]
    results: Vec<RemoteRecord>,
}

/// Decode a page body into its records.
pub fn parse_page(body: &str) -> Result<Vec<RemoteRecord>, SourceError> {
    serde_json::from_str::<RemotePage>(body)
        .map(|page| page.results)
        .map_err(|e| SourceError::Decode {
            message: e.to_string(),
        })
}

/// HTTP client for the remote character API.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpCatalogSource {
    /// Build the client. A client that cannot be constructed is reported
    /// as `PortalError::Source`.
    pub fn new(config: &SourceConfig) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Request {
                message: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            SourceError::Request {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_page(&self, page: u32) -> Result<Vec<RemoteRecord>, SourceError> {
        debug!(url = %self.base_url, page, "Fetching remote page");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("page", page)])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        parse_page(&body)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// A scripted source for tests. Each call pops the next queued outcome;
/// an empty queue yields an empty page.
pub struct MockCatalogSource {
    outcomes: std::sync::Mutex<VecDeque<Result<Vec<RemoteRecord>, SourceError>>>,
    requested: std::sync::Mutex<Vec<u32>>,
}

impl MockCatalogSource {
    pub fn new() -> Self {
        Self {
            outcomes: std::sync::Mutex::new(VecDeque::new()),
            requested: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that returns `records` on the first call.
    pub fn with_page(records: Vec<RemoteRecord>) -> Self {
        let source = Self::new();
        source.queue_page(records);
        source
    }

    pub fn queue_page(&self, records: Vec<RemoteRecord>) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push_back(Ok(records));
        }
    }

    pub fn queue_failure(&self, error: SourceError) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push_back(Err(error));
        }
    }

    /// Pages requested so far, in call order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested
            .lock()
            .map(|pages| pages.clone())
            .unwrap_or_default()
    }
}

impl Default for MockCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn fetch_page(&self, page: u32) -> Result<Vec<RemoteRecord>, SourceError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(page);
        }
        self.outcomes
            .lock()
            .ok()
            .and_then(|mut outcomes| outcomes.pop_front())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
