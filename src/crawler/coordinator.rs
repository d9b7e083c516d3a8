//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop. For each dequeued URL it:
//! - Skips repeats and entries beyond the depth limit
//! - Consults the robots.txt policy
//! - Fetches markup through the configured strategy
//! - Extracts content and enqueues in-scope links
//! - Waits the inter-request delay
//!
//! Processing is strictly sequential. Exactly one record is produced for each
//! URL that passes the repeat and depth checks.

use crate::config::{Config, CrawlConfig};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::parse_page;
use crate::crawler::strategy::FetchStrategy;
use crate::robots::RobotsPolicy;
use crate::state::{PageRecord, PageStatus, RecordSet};
use crate::url::{is_internal, parse_seed};
use std::time::{Duration, Instant};
use url::Url;

/// Delay used when neither the config nor robots.txt sets one
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Traversal bounds for one crawl
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrawlLimits {
    /// Maximum number of URLs dequeued and marked visited
    pub max_pages: usize,

    pub max_depth: u32,

    /// Pause after every fetched page, successful or not
    pub delay: Duration,
}

impl CrawlLimits {
    /// Resolves limits from config and the robots policy
    ///
    /// An explicit `delay-seconds` wins, then a respected robots.txt
    /// `Crawl-delay`, then [`DEFAULT_DELAY`].
    pub fn resolve(config: &CrawlConfig, robots: &RobotsPolicy) -> Self {
        let explicit = config.delay_seconds.and_then(|seconds| {
            Duration::try_from_secs_f64(seconds)
                .map_err(|e| tracing::warn!("Ignoring unusable delay-seconds {}: {}", seconds, e))
                .ok()
        });

        let delay = match (explicit, robots.crawl_delay()) {
            (Some(delay), _) => delay,
            (None, Some(crawl_delay)) => crawl_delay,
            (None, None) => DEFAULT_DELAY,
        };

        Self {
            max_pages: config.max_pages,
            max_depth: config.max_depth,
            delay,
        }
    }
}

/// Main crawler coordinator structure
///
/// Owns all crawl state; nothing is shared between coordinators.
pub struct Coordinator<'a, F: PageFetcher> {
    fetcher: &'a F,
    robots: RobotsPolicy,
    seed: Url,
    limits: CrawlLimits,
    frontier: Frontier,
    records: RecordSet,
}

impl<'a, F: PageFetcher> Coordinator<'a, F> {
    /// Creates a coordinator whose frontier holds only the seed
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Strategy used for every page
    /// * `seed` - Start URL; its domain bounds the crawl
    /// * `limits` - Page, depth and delay settings
    /// * `robots` - Policy consulted before each fetch
    pub fn new(fetcher: &'a F, seed: Url, limits: CrawlLimits, robots: RobotsPolicy) -> Self {
        Self {
            fetcher,
            robots,
            frontier: Frontier::with_seed(seed.clone()),
            seed,
            limits,
            records: RecordSet::new(),
        }
    }

    /// Runs the BFS until the frontier empties or the page cap is reached
    pub async fn run(mut self) -> RecordSet {
        tracing::info!(
            "Starting crawl at {} (max {} pages, depth {}, delay {:?})",
            self.seed,
            self.limits.max_pages,
            self.limits.max_depth,
            self.limits.delay
        );
        let start_time = Instant::now();

        while self.frontier.visited_count() < self.limits.max_pages {
            let Some(entry) = self.frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if !self.frontier.mark_visited(&entry.url) {
                tracing::debug!("Skipping already visited {}", entry.url);
                continue;
            }

            if entry.depth > self.limits.max_depth {
                tracing::debug!(
                    "Skipping {} at depth {} (max {})",
                    entry.url,
                    entry.depth,
                    self.limits.max_depth
                );
                continue;
            }

            self.process_url(entry).await;
        }

        if !self.frontier.is_empty() {
            tracing::info!(
                "Page limit of {} reached with {} entries left in the frontier",
                self.limits.max_pages,
                self.frontier.len()
            );
        }

        tracing::info!(
            "Crawl finished: {} records ({} ok, {} errors, {} disallowed) in {:.1}s",
            self.records.len(),
            self.records.count_by_status(PageStatus::Ok),
            self.records.count_by_status(PageStatus::FetchError),
            self.records.count_by_status(PageStatus::RobotsDisallowed),
            start_time.elapsed().as_secs_f64()
        );

        self.records
    }

    /// Produces the record for one URL and enqueues its children
    async fn process_url(&mut self, entry: FrontierEntry) {
        let FrontierEntry { url, depth } = entry;

        if !self.robots.can_fetch(&url) {
            tracing::info!("URL {} disallowed by robots.txt", url);
            self.records.insert(PageRecord::robots_disallowed(url.as_str(), depth));
            return;
        }

        match self.fetcher.fetch(&url).await {
            Ok(markup) => {
                let parsed = parse_page(&markup, &url);
                let queued = self.enqueue_links(&parsed.links, depth + 1);

                tracing::info!(
                    "Crawled {} (depth {}, {} links, {} queued)",
                    url,
                    depth,
                    parsed.links.len(),
                    queued
                );

                self.records.insert(PageRecord::ok(
                    url.as_str(),
                    depth,
                    parsed.content.title,
                    parsed.content.meta_description,
                    parsed.content.blocks,
                    parsed.links,
                ));
            }
            Err(failure) => {
                tracing::warn!("Failed to fetch {}: {}", url, failure);
                self.records
                    .insert(PageRecord::fetch_error(url.as_str(), depth, failure.to_string()));
            }
        }

        self.pause().await;
    }

    /// Queues internal, not yet visited links; returns how many were queued
    ///
    /// Links already waiting in the frontier are queued again.
    fn enqueue_links(&mut self, links: &[String], depth: u32) -> usize {
        let mut queued = 0;
        for link in links {
            let Ok(link_url) = Url::parse(link) else {
                continue;
            };
            if !is_internal(&self.seed, &link_url) || self.frontier.is_visited(&link_url) {
                continue;
            }
            tracing::debug!("Queueing {} at depth {}", link_url, depth);
            self.frontier.push(link_url, depth);
            queued += 1;
        }
        queued
    }

    async fn pause(&self) {
        if !self.limits.delay.is_zero() {
            tokio::time::sleep(self.limits.delay).await;
        }
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point. It will:
/// 1. Normalize and parse the seed URL
/// 2. Build the fetch strategy (performing any login)
/// 3. Load robots.txt when compliance is enabled
/// 4. Traverse the site breadth-first
/// 5. Shut the strategy down, whatever happened during traversal
///
/// # Returns
///
/// * `Ok(RecordSet)` - One record per processed URL, in crawl order
/// * `Err(CrawlError)` - Setup failed before any page was visited
///
/// # Example
///
/// ```no_run
/// use crawlscope::config::load_config;
/// use crawlscope::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawl.toml"))?;
/// let records = run_crawl(&config).await?;
/// println!("{} pages", records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> crate::Result<RecordSet> {
    let seed = parse_seed(config.crawl.seed_url.trim())?;
    let strategy = FetchStrategy::connect(config).await?;

    let robots = load_robots(&strategy, config, &seed).await;
    let limits = CrawlLimits::resolve(&config.crawl, &robots);

    let records = Coordinator::new(&strategy, seed, limits, robots).run().await;

    strategy.shutdown().await;
    Ok(records)
}

async fn load_robots(strategy: &FetchStrategy, config: &Config, seed: &Url) -> RobotsPolicy {
    if !config.crawl.respect_robots {
        tracing::debug!("robots.txt compliance disabled");
        return RobotsPolicy::permissive();
    }

    match strategy.robots_client(config) {
        Ok(client) => RobotsPolicy::load(&client, seed, &config.user_agent.crawler_name).await,
        Err(e) => {
            tracing::warn!("Cannot build client for robots.txt ({}), allowing all", e);
            RobotsPolicy::permissive()
        }
    }
}
