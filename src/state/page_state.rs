//! Terminal status definitions for crawled pages
//!
//! Every dequeued URL that produces a record ends in exactly one of these.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of processing a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// Markup was retrieved and extracted
    Ok,

    /// Retrieval failed (transport error, non-success response, browser failure)
    FetchError,

    /// The site's robots.txt forbids this URL
    RobotsDisallowed,
}

impl PageStatus {
    /// Returns true if the page was fetched and extracted
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Returns true if the page could not be fetched
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Self::FetchError)
    }

    /// Stable string form used by the exporters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::FetchError => "fetch_error",
            Self::RobotsDisallowed => "robots_disallowed",
        }
    }

    /// All statuses, in report order
    pub fn all() -> [PageStatus; 3] {
        [Self::Ok, Self::FetchError, Self::RobotsDisallowed]
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "OK",
            Self::FetchError => "Fetch Error",
            Self::RobotsDisallowed => "Disallowed by robots.txt",
        };
        write!(f, "{}", s)
    }
}
