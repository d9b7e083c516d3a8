use crate::UrlError;
use url::Url;

/// Scheme prepended to inputs that carry none
pub const DEFAULT_SCHEME: &str = "http://";

/// Normalizes a user-supplied URL string
///
/// If the input does not start with `http://` or `https://`, the default
/// scheme is prepended. Nothing else about the string is changed: no
/// trailing-slash, fragment, case or query normalization happens here.
///
/// # Examples
///
/// ```
/// use crawlscope::url::normalize;
///
/// assert_eq!(normalize("example.com"), "http://example.com");
/// assert_eq!(normalize("https://example.com/a/"), "https://example.com/a/");
/// ```
pub fn normalize(url_str: &str) -> String {
    if has_http_scheme(url_str) {
        url_str.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, url_str)
    }
}

/// Normalizes and parses a seed URL
///
/// # Returns
///
/// * `Ok(Url)` - The parsed absolute URL
/// * `Err(UrlError)` - The input cannot be parsed or has no host
pub fn parse_seed(url_str: &str) -> Result<Url, UrlError> {
    let normalized = normalize(url_str);
    let url = Url::parse(&normalized).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(normalized));
    }

    Ok(url)
}

fn has_http_scheme(url_str: &str) -> bool {
    url_str.starts_with("http://") || url_str.starts_with("https://")
}
