//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The fetch contract and its three strategies (anonymous, session, browser)
//! - HTML content and link extraction
//! - The BFS frontier
//! - Overall crawl coordination

mod browser;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod session;
mod strategy;

pub use browser::BrowserFetcher;
pub use coordinator::{run_crawl, Coordinator, CrawlLimits, DEFAULT_DELAY};
pub use fetcher::{build_http_client, AnonymousFetcher, FetchFailure, PageFetcher};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{extract, extract_links, parse_page, Extraction, ParsedPage};
pub use session::{LoginOutcome, SessionFetcher};
pub use strategy::FetchStrategy;
