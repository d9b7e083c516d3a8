//! Integration tests for Crawlscope
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! fetch strategies, robots.txt handling and full crawls end-to-end.

mod config_tests;
mod crawl_tests;
mod fetch_tests;

use crawlscope::config::{parse_config, Config};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config crawling `base_url` with no delay
pub fn create_test_config(base_url: &str, respect_robots: bool, extra: &str) -> Config {
    parse_config(&format!(
        r#"
[crawl]
seed-url = "{}/"
max-pages = 20
max-depth = 3
delay-seconds = 0.0
respect-robots = {}

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0.0"
contact-url = "https://example.com/contact"

{}
"#,
        base_url, respect_robots, extra
    ))
    .expect("test config should be valid")
}

/// Mounts an HTML page at `page_path`
pub async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}
