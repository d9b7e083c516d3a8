//! Crawlscope: a single-site crawler and content auditor
//!
//! This crate crawls one website breadth-first from a seed URL, extracts the
//! structural content of every page, and runs post-crawl checks (duplicate
//! content, broken internal links, missing titles and meta descriptions).

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Crawlscope operations
///
/// Nothing that happens while visiting an individual page ends up here; per-page
/// failures are recorded on the page itself. These are setup failures.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to start browser session at {webdriver_url}: {message}")]
    BrowserStart {
        webdriver_url: String,
        message: String,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Environment variable {0} is not set")]
    MissingEnv(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Crawlscope operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use analysis::{analyze, CrawlReport};
pub use config::Config;
pub use crawler::{run_crawl, FetchFailure, FetchStrategy, PageFetcher};
pub use state::{ContentBlock, PageRecord, PageStatus, RecordSet};
pub use url::{domain_of, is_internal, normalize};
