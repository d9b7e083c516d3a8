//! Robots.txt policy gate
//!
//! The gate is built once per crawl from the seed's domain. Loading never
//! fails: an unreachable or unreadable robots.txt yields a permissive policy.

mod parser;

pub use parser::RobotsRules;

use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Crawl policy for a single site
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    rules: RobotsRules,
    user_agent: String,
    enforce: bool,
}

impl RobotsPolicy {
    /// A policy that permits every URL and declares no delay
    pub fn permissive() -> Self {
        Self {
            rules: RobotsRules::allow_all(),
            user_agent: String::new(),
            enforce: false,
        }
    }

    /// Builds an enforcing policy from raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The robots.txt body
    /// * `user_agent` - Product token matched against `User-agent` groups
    pub fn from_content(content: &str, user_agent: &str) -> Self {
        Self {
            rules: RobotsRules::from_content(content),
            user_agent: user_agent.to_string(),
            enforce: true,
        }
    }

    /// Fetches `/robots.txt` at the root of `seed`'s domain
    ///
    /// Transport failures, non-success responses and unreadable bodies are
    /// logged and leave the policy with no rules, so every URL is allowed.
    pub async fn load(client: &Client, seed: &Url, user_agent: &str) -> Self {
        let Some(robots_url) = robots_url(seed) else {
            tracing::warn!("Cannot derive robots.txt location from {}, allowing all", seed);
            return Self::from_content("", user_agent);
        };

        tracing::debug!("Fetching robots.txt from {}", robots_url);

        let content = match client.get(robots_url.clone()).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}, allowing all", robots_url, e);
                    String::new()
                }
            },
            Ok(response) => {
                tracing::info!(
                    "robots.txt at {} returned {}, allowing all",
                    robots_url,
                    response.status()
                );
                String::new()
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}, allowing all", robots_url, e);
                String::new()
            }
        };

        Self::from_content(&content, user_agent)
    }

    /// Turns enforcement on or off
    ///
    /// A non-enforcing policy permits every URL and reports no crawl delay.
    pub fn with_compliance(mut self, enforce: bool) -> Self {
        self.enforce = enforce;
        self
    }

    pub fn is_enforced(&self) -> bool {
        self.enforce
    }

    /// Checks whether `url` may be crawled
    pub fn can_fetch(&self, url: &Url) -> bool {
        if !self.enforce {
            return true;
        }
        self.rules.is_allowed(url.as_str(), &self.user_agent)
    }

    /// The site-declared `Crawl-delay`, only while enforcing
    pub fn crawl_delay(&self) -> Option<Duration> {
        if !self.enforce {
            return None;
        }
        let seconds = self.rules.crawl_delay(&self.user_agent)?;
        match Duration::try_from_secs_f64(seconds) {
            Ok(delay) => Some(delay),
            Err(e) => {
                tracing::warn!("Ignoring unusable Crawl-delay {}: {}", seconds, e);
                None
            }
        }
    }
}

/// Location of robots.txt for the domain of `url`
pub fn robots_url(url: &Url) -> Option<Url> {
    url.join("/robots.txt").ok()
}
