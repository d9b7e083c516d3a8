//! Config files on disk and setup failures

use crawlscope::config::{load_config_with_hash, FetchMode};
use crawlscope::{run_crawl, ConfigError, CrawlError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_file_with_hash() {
    let file = write_config(
        r#"
[crawl]
seed-url = "example.com"
max-pages = 10

[fetch]
mode = "browser"

[fetch.browser]
wait-selector = "main"

[output]
csv-path = "out/crawl.csv"
"#,
    );

    let (config, hash) = load_config_with_hash(file.path()).unwrap();
    assert_eq!(config.crawl.max_pages, 10);
    assert_eq!(config.crawl.max_depth, 3);
    assert_eq!(config.fetch.mode, FetchMode::Browser);
    assert_eq!(
        config.fetch.browser.as_ref().unwrap().wait_selector.as_deref(),
        Some("main")
    );
    assert_eq!(config.output.csv_path.as_deref(), Some("out/crawl.csv"));
    assert!(config.output.json_path.is_none());
    assert_eq!(hash.len(), 64);

    // Same content, same hash
    let again = write_config(&std::fs::read_to_string(file.path()).unwrap());
    assert_eq!(load_config_with_hash(again.path()).unwrap().1, hash);
}

#[test]
fn test_session_password_from_env() {
    std::env::set_var("CRAWLSCOPE_IT_PASSWORD", "from-env");
    let file = write_config(
        r#"
[crawl]
seed-url = "https://example.com"

[fetch]
mode = "session-auth"

[fetch.session]
login-url = "https://example.com/login"
username = "alice"
password-env = "CRAWLSCOPE_IT_PASSWORD"
"#,
    );

    let (config, _) = load_config_with_hash(file.path()).unwrap();
    let session = config.fetch.session.unwrap();
    assert_eq!(session.password.as_deref(), Some("from-env"));
    assert_eq!(session.username_field, "username");
}

#[test]
fn test_invalid_config_file() {
    let file = write_config("[crawl]\nseed-url = \"https://example.com\"\nmax-pages = 0\n");
    let result = load_config_with_hash(file.path());
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[tokio::test]
async fn test_browser_mode_without_webdriver_fails_setup() {
    let file = write_config(
        r#"
[crawl]
seed-url = "https://example.com"

[fetch]
mode = "browser"

[fetch.browser]
webdriver-url = "http://127.0.0.1:9"
"#,
    );
    let (config, _) = load_config_with_hash(file.path()).unwrap();

    let result = run_crawl(&config).await;
    assert!(matches!(result, Err(CrawlError::BrowserStart { .. })));
}
