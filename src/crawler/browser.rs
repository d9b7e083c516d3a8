//! Browser-rendered fetching over WebDriver
//!
//! One WebDriver session serves the whole crawl, so cookies set by the
//! scripted login stay in effect for every later navigation. Each page is
//! rendered in a fresh tab that is closed again before the fetch returns.

use crate::config::{BrowserConfig, BrowserLoginConfig};
use crate::crawler::fetcher::{FetchFailure, PageFetcher};
use crate::{ConfigError, CrawlError};
use fantoccini::error::CmdError;
use fantoccini::wd::{Capabilities, WindowHandle};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Renders pages in a long-lived WebDriver session
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    client: Client,
    render_wait: Duration,
    wait_selector: Option<String>,
}

impl BrowserFetcher {
    /// Opens the WebDriver session
    ///
    /// # Returns
    ///
    /// * `Ok(BrowserFetcher)` - Session established
    /// * `Err(CrawlError::BrowserStart)` - The WebDriver server refused or is unreachable
    pub async fn start(config: &BrowserConfig) -> crate::Result<Self> {
        let render_wait = Duration::try_from_secs_f64(config.render_wait_seconds).map_err(|e| {
            ConfigError::Validation(format!(
                "render-wait-seconds {} is not a usable duration: {}",
                config.render_wait_seconds, e
            ))
        })?;

        tracing::info!("Connecting to WebDriver at {}", config.webdriver_url);

        let mut builder = ClientBuilder::native();
        builder.capabilities(browser_capabilities(config.headless));

        let client = builder
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| CrawlError::BrowserStart {
                webdriver_url: config.webdriver_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            render_wait,
            wait_selector: config.wait_selector.clone(),
        })
    }

    /// Runs the scripted login in its own tab
    ///
    /// Any failing step is logged and the crawl carries on unauthenticated.
    pub async fn login(&self, login: &BrowserLoginConfig) {
        let result = match self.open_tab().await {
            Ok(main) => {
                let filled = self.fill_login_form(login).await;
                self.close_tab(main).await;
                filled
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => tracing::info!("Scripted login submitted at {}", login.login_url),
            Err(e) => tracing::warn!(
                "Scripted login at {} failed ({}), continuing without authentication",
                login.login_url,
                e
            ),
        }
    }

    async fn fill_login_form(&self, login: &BrowserLoginConfig) -> Result<(), CmdError> {
        self.client.goto(&login.login_url).await?;

        self.client
            .find(Locator::Css(&login.username_selector))
            .await?
            .send_keys(&login.username)
            .await?;

        self.client
            .find(Locator::Css(&login.password_selector))
            .await?
            .send_keys(login.password.as_deref().unwrap_or_default())
            .await?;

        self.client
            .find(Locator::Css(&login.submit_selector))
            .await?
            .click()
            .await?;

        match Duration::try_from_secs_f64(login.wait_after_seconds) {
            Ok(settle) => tokio::time::sleep(settle).await,
            Err(e) => tracing::warn!(
                "Skipping login settle wait of {}s: {}",
                login.wait_after_seconds,
                e
            ),
        }
        Ok(())
    }

    /// Navigates the current tab and captures the rendered DOM
    async fn render_current_tab(&self, url: &Url) -> Result<String, CmdError> {
        self.client.goto(url.as_str()).await?;

        match &self.wait_selector {
            Some(selector) => {
                let waited = self
                    .client
                    .wait()
                    .at_most(self.render_wait)
                    .for_element(Locator::Css(selector))
                    .await;
                // Expiry is not an error; take whatever has rendered so far
                if let Err(e) = waited {
                    tracing::debug!("Selector '{}' not found on {}: {}", selector, url, e);
                }
            }
            None => tokio::time::sleep(self.render_wait).await,
        }

        self.client.source().await
    }

    /// Opens a new tab and switches to it, returning the previous window
    async fn open_tab(&self) -> Result<WindowHandle, CmdError> {
        let main = self.client.window().await?;
        let tab = self.client.new_window(true).await?;
        self.client.switch_to_window(tab.handle).await?;
        Ok(main)
    }

    /// Closes the current tab and returns to `main`
    async fn close_tab(&self, main: WindowHandle) {
        if let Err(e) = self.client.close_window().await {
            tracing::warn!("Failed to close browser tab: {}", e);
        }
        if let Err(e) = self.client.switch_to_window(main).await {
            tracing::warn!("Failed to switch back to main browser window: {}", e);
        }
    }

    /// Ends the WebDriver session
    pub async fn shutdown(self) {
        match self.client.close().await {
            Ok(()) => tracing::debug!("WebDriver session closed"),
            Err(e) => tracing::warn!("Failed to close WebDriver session: {}", e),
        }
    }
}

impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchFailure> {
        let main = self
            .open_tab()
            .await
            .map_err(|e| FetchFailure::Browser(e.to_string()))?;

        let rendered = self.render_current_tab(url).await;
        self.close_tab(main).await;

        rendered.map_err(|e| FetchFailure::Browser(e.to_string()))
    }
}

/// Session capabilities understood by both chromedriver and geckodriver
fn browser_capabilities(headless: bool) -> Capabilities {
    let mut capabilities = Capabilities::new();
    if headless {
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": ["--headless=new", "--disable-gpu", "--no-sandbox"] }),
        );
        capabilities.insert("moz:firefoxOptions".to_string(), json!({ "args": ["-headless"] }));
    }
    capabilities
}
