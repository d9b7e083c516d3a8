use crate::config::types::{
    BrowserConfig, BrowserLoginConfig, Config, CrawlConfig, FetchConfig, FetchMode,
    SessionAuthConfig, UserAgentConfig,
};
use crate::url::parse_seed;
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_fetch_config(&config.fetch)?;
    Ok(())
}

/// Validates traversal bounds, seed and delay
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.seed_url.trim().is_empty() {
        return Err(ConfigError::Validation("seed-url cannot be empty".to_string()));
    }

    parse_seed(config.seed_url.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed-url '{}': {}", config.seed_url, e)))?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if let Some(delay) = config.delay_seconds {
        validate_duration("delay-seconds", delay)?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation("crawler-name cannot be empty".to_string()));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation("crawler-version cannot be empty".to_string()));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates the selected fetch mode and the section it needs
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    match config.mode {
        FetchMode::Anonymous => Ok(()),
        FetchMode::SessionAuth => match &config.session {
            Some(session) => validate_session_config(session),
            None => Err(ConfigError::Validation(
                "mode \"session-auth\" requires a [fetch.session] section".to_string(),
            )),
        },
        // The browser section is optional; its defaults describe a local WebDriver
        FetchMode::Browser => match &config.browser {
            Some(browser) => validate_browser_config(browser),
            None => Ok(()),
        },
    }
}

fn validate_session_config(config: &SessionAuthConfig) -> Result<(), ConfigError> {
    validate_login_url(&config.login_url)?;
    validate_credentials(&config.username, config.password.as_deref())?;

    for (name, field) in [
        ("username-field", &config.username_field),
        ("password-field", &config.password_field),
    ] {
        if field.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    Url::parse(&config.webdriver_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid webdriver-url '{}': {}", config.webdriver_url, e))
    })?;

    validate_duration("render-wait-seconds", config.render_wait_seconds)?;

    if let Some(selector) = &config.wait_selector {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation("wait-selector cannot be empty".to_string()));
        }
    }

    if let Some(login) = &config.login {
        validate_browser_login(login)?;
    }

    Ok(())
}

fn validate_browser_login(config: &BrowserLoginConfig) -> Result<(), ConfigError> {
    validate_login_url(&config.login_url)?;
    validate_credentials(&config.username, config.password.as_deref())?;
    validate_duration("wait-after-seconds", config.wait_after_seconds)?;

    for (name, selector) in [
        ("username-selector", &config.username_selector),
        ("password-selector", &config.password_selector),
        ("submit-selector", &config.submit_selector),
    ] {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Login pages must be absolute http(s) URLs
fn validate_login_url(login_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(login_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid login-url '{}': {}", login_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "login-url '{}' must use http or https",
            login_url
        )));
    }

    Ok(())
}

fn validate_credentials(username: &str, password: Option<&str>) -> Result<(), ConfigError> {
    if username.is_empty() {
        return Err(ConfigError::Validation("username cannot be empty".to_string()));
    }
    if password.is_none() {
        return Err(ConfigError::Validation(
            "a password or password-env is required".to_string(),
        ));
    }
    Ok(())
}

/// Accepts only values that convert to a `Duration`: finite, non-negative, in range
fn validate_duration(name: &str, seconds: f64) -> Result<(), ConfigError> {
    if let Err(e) = Duration::try_from_secs_f64(seconds) {
        return Err(ConfigError::Validation(format!(
            "{} must be a usable number of seconds, got {} ({})",
            name, seconds, e
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn base(extra: &str) -> String {
        format!("[crawl]\nseed-url = \"https://example.com\"\n{}", extra)
    }

    #[test]
    fn test_validate_duration() {
        assert!(validate_duration("d", 0.0).is_ok());
        assert!(validate_duration("d", 2.5).is_ok());

        assert!(validate_duration("d", -0.1).is_err());
        assert!(validate_duration("d", f64::NAN).is_err());
        assert!(validate_duration("d", f64::INFINITY).is_err());
        assert!(validate_duration("d", 1e20).is_err());
    }

    #[test]
    fn test_oversized_durations_rejected() {
        for extra in [
            "delay-seconds = 1e20\n",
            "[fetch]\nmode = \"browser\"\n[fetch.browser]\nrender-wait-seconds = 1e20\n",
            "[fetch]\nmode = \"browser\"\n[fetch.browser.login]\nlogin-url = \"https://example.com/login\"\nusername = \"a\"\npassword = \"b\"\nwait-after-seconds = 1e20\n",
        ] {
            let result = parse_config(&base(extra));
            assert!(matches!(result, Err(ConfigError::Validation(_))), "accepted: {}", extra);
        }
    }

    #[test]
    fn test_validate_login_url() {
        assert!(validate_login_url("https://example.com/login").is_ok());
        assert!(validate_login_url("http://localhost:8080/login").is_ok());

        assert!(matches!(validate_login_url("not a url"), Err(ConfigError::InvalidUrl(_))));
        assert!(matches!(validate_login_url("ftp://example.com/login"), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_empty_seed_rejected() {
        let result = parse_config("[crawl]\nseed-url = \"  \"\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_unparseable_seed_rejected() {
        let result = parse_config("[crawl]\nseed-url = \"http://\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let result = parse_config("[crawl]\nseed-url = \"example.com\"\ndelay-seconds = -1.0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_crawler_name_characters() {
        let ok = parse_config(&base("[user-agent]\ncrawler-name = \"my_bot-2\"\n"));
        assert!(ok.is_ok());

        let bad = parse_config(&base("[user-agent]\ncrawler-name = \"my bot\"\n"));
        assert!(matches!(bad, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = parse_config(&base("[fetch]\ntimeout-seconds = 0\n"));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_session_mode_requires_section() {
        let result = parse_config(&base("[fetch]\nmode = \"session-auth\"\n"));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_session_requires_password() {
        let result = parse_config(&base(
            "[fetch]\nmode = \"session-auth\"\n[fetch.session]\nlogin-url = \"https://example.com/login\"\nusername = \"alice\"\n",
        ));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_browser_mode_without_section_is_valid() {
        let config = parse_config(&base("[fetch]\nmode = \"browser\"\n")).unwrap();
        assert_eq!(config.fetch.mode, FetchMode::Browser);
        assert!(config.fetch.browser.is_none());
    }

    #[test]
    fn test_browser_login_selectors_non_empty() {
        let result = parse_config(&base(
            r#"
[fetch]
mode = "browser"

[fetch.browser.login]
login-url = "https://example.com/login"
username = "alice"
password = "secret"
submit-selector = ""
"#,
        ));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_unused_sections_not_validated() {
        // A session section is ignored unless its mode is selected
        let result = parse_config(&base(
            "[fetch.session]\nlogin-url = \"nonsense\"\nusername = \"\"\n",
        ));
        assert!(result.is_ok());
    }
}
