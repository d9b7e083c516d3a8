//! Fetch strategy selection
//!
//! The strategy is chosen once per run from the configured mode. It owns the
//! underlying session or browser, and must be shut down when the crawl ends.

use crate::config::{Config, FetchMode};
use crate::crawler::browser::BrowserFetcher;
use crate::crawler::fetcher::{build_http_client, AnonymousFetcher, FetchFailure, PageFetcher};
use crate::crawler::session::SessionFetcher;
use crate::ConfigError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// The closed set of page retrieval backends
#[derive(Debug, Clone)]
pub enum FetchStrategy {
    Anonymous(AnonymousFetcher),
    Session(SessionFetcher),
    Browser(BrowserFetcher),
}

impl FetchStrategy {
    /// Builds the strategy for `config.fetch.mode`, running any login first
    ///
    /// Login failures never surface here; only failing to create the HTTP
    /// client or to reach the WebDriver server is an error.
    pub async fn connect(config: &Config) -> crate::Result<Self> {
        let timeout = Duration::from_secs(config.fetch.timeout_seconds);

        match config.fetch.mode {
            FetchMode::Anonymous => {
                tracing::info!("Using anonymous fetch strategy");
                Ok(Self::Anonymous(AnonymousFetcher::from_config(&config.user_agent, timeout)?))
            }
            FetchMode::SessionAuth => {
                let session = config.fetch.session.as_ref().ok_or_else(|| {
                    ConfigError::Validation("mode \"session-auth\" requires a [fetch.session] section".to_string())
                })?;
                tracing::info!("Using session-authenticated fetch strategy");
                let fetcher = SessionFetcher::login(session, &config.user_agent, timeout).await?;
                Ok(Self::Session(fetcher))
            }
            FetchMode::Browser => {
                let browser = config.fetch.browser.clone().unwrap_or_default();
                tracing::info!("Using browser-rendered fetch strategy");
                let fetcher = BrowserFetcher::start(&browser).await?;
                if let Some(login) = &browser.login {
                    fetcher.login(login).await;
                }
                Ok(Self::Browser(fetcher))
            }
        }
    }

    pub fn mode(&self) -> FetchMode {
        match self {
            Self::Anonymous(_) => FetchMode::Anonymous,
            Self::Session(_) => FetchMode::SessionAuth,
            Self::Browser(_) => FetchMode::Browser,
        }
    }

    /// HTTP client used to load robots.txt
    ///
    /// HTTP strategies reuse their own client; the browser strategy gets a
    /// fresh anonymous one.
    pub fn robots_client(&self, config: &Config) -> Result<Client, reqwest::Error> {
        match self {
            Self::Anonymous(fetcher) => Ok(fetcher.client().clone()),
            Self::Session(fetcher) => Ok(fetcher.client().clone()),
            Self::Browser(_) => build_http_client(
                &config.user_agent,
                Duration::from_secs(config.fetch.timeout_seconds),
                false,
            ),
        }
    }

    /// Releases the browser session; HTTP clients need no teardown
    pub async fn shutdown(self) {
        match self {
            Self::Browser(fetcher) => fetcher.shutdown().await,
            Self::Anonymous(_) | Self::Session(_) => tracing::debug!("Fetch strategy released"),
        }
    }
}

impl PageFetcher for FetchStrategy {
    async fn fetch(&self, url: &Url) -> Result<String, FetchFailure> {
        match self {
            Self::Anonymous(fetcher) => fetcher.fetch(url).await,
            Self::Session(fetcher) => fetcher.fetch(url).await,
            Self::Browser(fetcher) => fetcher.fetch(url).await,
        }
    }
}
