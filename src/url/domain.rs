use url::Url;

/// Returns the site boundary of a URL: `scheme://host[:port]`
///
/// The port only appears when it differs from the scheme's default, so
/// `http://example.com:80/` and `http://example.com/` share a domain.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use crawlscope::url::domain_of;
///
/// let url = Url::parse("https://Example.COM:8443/a/b?c").unwrap();
/// assert_eq!(domain_of(&url), "https://example.com:8443");
/// ```
pub fn domain_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}

/// Checks whether `candidate` belongs to the same site as `seed`
///
/// Scheme, host and port must all match. Sub-domains and scheme changes
/// count as external.
pub fn is_internal(seed: &Url, candidate: &Url) -> bool {
    domain_of(seed) == domain_of(candidate)
}
