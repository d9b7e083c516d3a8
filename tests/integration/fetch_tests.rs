//! Fetch strategies and robots.txt loading against mock servers

use crate::{create_test_config, mount_page};
use crawlscope::config::{FetchMode, UserAgentConfig};
use crawlscope::crawler::{AnonymousFetcher, LoginOutcome, SessionFetcher};
use crawlscope::robots::RobotsPolicy;
use crawlscope::{run_crawl, FetchFailure, PageFetcher, PageStatus};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: None,
    }
}

fn session_section(base_url: &str) -> String {
    format!(
        r#"
[fetch]
mode = "session-auth"
timeout-seconds = 5

[fetch.session]
login-url = "{}/login"
username = "alice"
password = "secret"
"#,
        base_url
    )
}

#[tokio::test]
async fn test_anonymous_fetch() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/ok", "<p>hello</p>").await;

    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let fetcher = AnonymousFetcher::from_config(&test_user_agent(), Duration::from_secs(5)).unwrap();
    let base = Url::parse(&mock_server.uri()).unwrap();

    let body = fetcher.fetch(&base.join("/ok").unwrap()).await.unwrap();
    assert_eq!(body, "<p>hello</p>");

    let err = fetcher.fetch(&base.join("/boom").unwrap()).await.unwrap_err();
    assert!(matches!(err, FetchFailure::Status(500)));
    assert_eq!(err.to_string(), "HTTP 500");
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0 (+https://example.com/contact)"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>Seen</title>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), false, "");
    let records = run_crawl(&config).await.unwrap();

    assert_eq!(records.iter().next().unwrap().title, "Seen");
}

#[tokio::test]
async fn test_session_login_cookies_reused() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "csrf=token1; Path=/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header_regex("cookie", "csrf=token1"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "session=abc; Path=/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Only answers when the session cookie comes along
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_regex("cookie", "session=abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<title>Members</title><a href=\"/inside\">in</a>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/inside"))
        .and(header_regex("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>Inside</title>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, false, &session_section(&base_url));
    assert_eq!(config.fetch.mode, FetchMode::SessionAuth);

    let records = run_crawl(&config).await.unwrap_or_else(|e| panic!("crawl failed: {}", e));
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.status == PageStatus::Ok));
    assert_eq!(records.get(&format!("{}/inside", base_url)).unwrap().title, "Inside");
}

#[tokio::test]
async fn test_session_login_page_unavailable() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/", "<title>Public</title>").await;

    let config = create_test_config(&base_url, false, &session_section(&base_url));
    let session = config.fetch.session.as_ref().unwrap();
    let fetcher = SessionFetcher::login(session, &config.user_agent, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(
        fetcher.login_outcome(),
        &LoginOutcome::LoginPageUnavailable("HTTP 503".to_string())
    );

    // The crawl still runs, unauthenticated
    let records = run_crawl(&config).await.unwrap();
    assert_eq!(records.iter().next().unwrap().title, "Public");
}

#[tokio::test]
async fn test_robots_load() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "User-agent: TestBot\nDisallow: /admin\nCrawl-delay: 2\n\nUser-agent: *\nDisallow: /\n",
        ))
        .mount(&mock_server)
        .await;

    let fetcher = AnonymousFetcher::from_config(&test_user_agent(), Duration::from_secs(5)).unwrap();
    let seed = Url::parse(&format!("{}/start", mock_server.uri())).unwrap();
    let policy = RobotsPolicy::load(fetcher.client(), &seed, "TestBot").await;

    assert!(policy.can_fetch(&seed));
    assert!(!policy.can_fetch(&seed.join("/admin/users").unwrap()));
    assert_eq!(policy.crawl_delay(), Some(Duration::from_secs(2)));

    let ignored = policy.with_compliance(false);
    assert!(ignored.can_fetch(&seed.join("/admin/users").unwrap()));
    assert_eq!(ignored.crawl_delay(), None);
}

#[tokio::test]
async fn test_robots_unavailable_allows_all() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let fetcher = AnonymousFetcher::from_config(&test_user_agent(), Duration::from_secs(5)).unwrap();
    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let policy = RobotsPolicy::load(fetcher.client(), &seed, "TestBot").await;

    assert!(policy.can_fetch(&seed.join("/anything").unwrap()));
    assert_eq!(policy.crawl_delay(), None);
}
