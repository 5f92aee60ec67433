//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Issuing a single GET per URL
//! - Classifying everything other than `200 OK` as a failure
//!
//! There are no retries. A failed URL is logged and treated as unreachable
//! for the rest of the crawl.

use crate::config::FetcherConfig;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::fmt;
use std::time::Duration;

/// Why a page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailureReason {
    /// The server answered with something other than 200
    Status(u16),

    /// Connection refused, DNS failure, TLS error, timeout...
    Transport(String),

    /// The response body could not be read as text
    Body(String),
}

impl fmt::Display for FetchFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP status {}", code),
            Self::Transport(error) => write!(f, "transport error: {}", error),
            Self::Body(error) => write!(f, "unreadable body: {}", error),
        }
    }
}

/// A page that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub url: String,
    pub reason: FetchFailureReason,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.url, self.reason)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_ingest::config::FetcherConfig;
/// use site_ingest::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Single-request page fetcher
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Fetches a URL and returns its body
    ///
    /// # Response Handling
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 200 | `Ok(body)` |
    /// | Any other status (including other 2xx) | `Status(code)` |
    /// | Timeout, connection or TLS error | `Transport` |
    /// | Body read error | `Body` |
    ///
    /// Failures are logged here; callers only decide what to do with them.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
        let result = self.try_fetch(url).await;
        if let Err(reason) = &result {
            tracing::warn!("Request failed for {}: {}", url, reason);
        }
        result.map_err(|reason| FetchFailure {
            url: url.to_string(),
            reason,
        })
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchFailureReason> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchFailureReason::Transport("request timeout".to_string())
            } else if e.is_connect() {
                FetchFailureReason::Transport("connection failed".to_string())
            } else {
                FetchFailureReason::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchFailureReason::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchFailureReason::Body(e.to_string()))
    }
}
