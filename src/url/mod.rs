//! URL scoping for Crawlscope
//!
//! This module turns user input into absolute URLs and decides which
//! discovered links belong to the crawled site.

mod domain;
mod normalize;

pub use domain::{domain_of, is_internal};
pub use normalize::{normalize, parse_seed, DEFAULT_SCHEME};

use url::Url;

/// Resolves an `href` against the URL of the page it appeared on
///
/// Relative, protocol-relative and fragment-only references all resolve the
/// way a browser would. Returns `None` only when the result is not a valid URL.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use crawlscope::url::resolve_href;
///
/// let page = Url::parse("https://example.com/docs/intro").unwrap();
/// assert_eq!(resolve_href(&page, "setup").unwrap().as_str(), "https://example.com/docs/setup");
/// assert_eq!(resolve_href(&page, "//cdn.example.com/x").unwrap().as_str(), "https://cdn.example.com/x");
/// assert_eq!(resolve_href(&page, "#top").unwrap().as_str(), "https://example.com/docs/intro#top");
/// ```
pub fn resolve_href(page_url: &Url, href: &str) -> Option<Url> {
    match page_url.join(href.trim()) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            tracing::debug!("Failed to resolve href '{}' against {}: {}", href, page_url, e);
            None
        }
    }
}
