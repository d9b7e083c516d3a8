//! Page fetch contract and the anonymous HTTP strategy
//!
//! This module handles:
//! - The `PageFetcher` contract every strategy implements
//! - Classifying failed fetches as `FetchFailure`
//! - Building HTTP clients with a descriptive user agent
//! - Plain, unauthenticated retrieval

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a page produced no markup
///
/// A failure never aborts a crawl; the coordinator records it on the page as
/// a `fetch_error` status and keeps the message for diagnostics.
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// Connection refused, DNS failure, timeout, TLS error, redirect loop
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),

    /// The response body could not be read as text
    #[error("failed to read body: {0}")]
    Body(String),

    /// Navigation or page capture failed in the browser
    #[error("browser error: {0}")]
    Browser(String),
}

impl FetchFailure {
    fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Transport("request timeout".to_string())
        } else if e.is_connect() {
            Self::Transport(format!("connection failed: {}", e))
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Retrieves the markup of one page
///
/// Implementations are constructed once per crawl and reused for every page.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetches `url`, returning its markup or the reason there is none
    async fn fetch(&self, url: &Url) -> Result<String, FetchFailure>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout
/// * `cookies` - Whether to keep a cookie jar across requests
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
    cookies: bool,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .cookie_store(cookies)
        .gzip(true)
        .brotli(true)
        .build()
}

/// GETs `url` and returns the body of a 2xx response
///
/// Shared by the anonymous and session strategies; only the client differs.
pub(crate) async fn get_markup(client: &Client, url: &Url) -> Result<String, FetchFailure> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(FetchFailure::from_send)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchFailure::Status(status.as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| FetchFailure::Body(e.to_string()))
}

/// Plain retrieval with no credentials
#[derive(Debug, Clone)]
pub struct AnonymousFetcher {
    client: Client,
}

impl AnonymousFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with its own cookie-less client
    pub fn from_config(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout, false)?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl PageFetcher for AnonymousFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchFailure> {
        get_markup(&self.client, url).await
    }
}
