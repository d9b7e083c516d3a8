//! Robots.txt rule evaluation
//!
//! Allow/Disallow matching is delegated to the robotstxt crate (a port of
//! Google's matcher). `Crawl-delay` is not part of that matcher, so it is
//! read here directly.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    /// Raw robots.txt content; empty means allow all
    content: String,
}

impl RobotsRules {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Rules that allow everything and declare no delay
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Checks if `url` may be fetched by `user_agent`
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL to check
    /// * `user_agent` - Product token of the crawler (e.g. "crawlscope")
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Gets the crawl delay in seconds declared for `user_agent`
    ///
    /// A group naming the agent wins over the `*` group. Consecutive
    /// `User-agent` lines form one group; any other directive closes the
    /// agent list so the next `User-agent` line starts a new group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let agent = user_agent.to_lowercase();

        let mut group: Vec<String> = Vec::new();
        let mut collecting_agents = false;
        let mut for_agent: Option<f64> = None;
        let mut for_wildcard: Option<f64> = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if key == "user-agent" {
                if !collecting_agents {
                    group.clear();
                    collecting_agents = true;
                }
                group.push(value.to_lowercase());
                continue;
            }
            collecting_agents = false;

            if key != "crawl-delay" {
                continue;
            }
            let Ok(delay) = value.parse::<f64>() else {
                continue;
            };
            if !delay.is_finite() || delay < 0.0 {
                continue;
            }

            if group.iter().any(|ua| ua != "*" && !ua.is_empty() && agent.contains(ua.as_str())) {
                for_agent.get_or_insert(delay);
            } else if group.iter().any(|ua| ua == "*") {
                for_wildcard.get_or_insert(delay);
            }
        }

        for_agent.or(for_wildcard)
    }
}
