//! End-to-end crawls against a mock site

use crate::{create_test_config, mount_page};
use crawlscope::analysis::analyze;
use crawlscope::output::{CsvExporter, DocumentExporter, JsonExporter, RecordExporter};
use crawlscope::{run_crawl, PageStatus};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a small site:
///
/// ```text
/// /        -> /page1, /page2, /private, https://external.test/
/// /page1   -> /, /page3, /gone
/// /page2   -> duplicate of /page1's text
/// /page3   -> leaf
/// /gone    -> 404
/// ```
async fn mount_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><head><title>Home</title><meta name="description" content="Start here"></head>
        <body>
            <h1>Welcome</h1>
            <a href="/page1">Page 1</a>
            <a href="page2">Page 2</a>
            <a href="/private">Private</a>
            <a href="https://external.test/">Elsewhere</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/page1",
        r#"<html><head><title>Page 1</title></head><body>
            <h2>Shared</h2><p>Same words</p>
            <a href="/">Home</a><a href="/page3">Page 3</a><a href="/gone">Gone</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/page2",
        r#"<html><head><title>Page 2</title></head><body>
            <div class="wrapper"><h2>Shared</h2><p>Same words</p></div>
            <ul><li>Only here</li></ul>
        </body></html>"#,
    )
    .await;

    mount_page(server, "/page3", "<html><body><p>Leaf</p></body></html>").await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;
    mount_page(&mock_server, "/private", "<p>Private</p>").await;

    let config = create_test_config(&base_url, false, "");
    let records = run_crawl(&config).await.expect("crawl should succeed");

    let url = |p: &str| format!("{}{}", base_url, p);

    assert_eq!(records.len(), 6);
    assert_eq!(records.get(&url("/")).unwrap().depth, 0);
    assert_eq!(records.get(&url("/page1")).unwrap().depth, 1);
    assert_eq!(records.get(&url("/page2")).unwrap().depth, 1);
    assert_eq!(records.get(&url("/private")).unwrap().depth, 1);
    assert_eq!(records.get(&url("/page3")).unwrap().depth, 2);
    assert_eq!(records.get(&url("/gone")).unwrap().depth, 2);

    let home = records.get(&url("/")).unwrap();
    assert_eq!(home.title, "Home");
    assert_eq!(home.meta_description, "Start here");
    assert_eq!(home.outbound_links.len(), 4);

    let gone = records.get(&url("/gone")).unwrap();
    assert_eq!(gone.status, PageStatus::FetchError);
    assert_eq!(gone.fetch_error.as_deref(), Some("HTTP 404"));

    // BFS order
    let order: Vec<String> = records.urls().map(String::from).collect();
    assert_eq!(
        order,
        vec![
            url("/"),
            url("/page1"),
            url("/page2"),
            url("/private"),
            url("/page3"),
            url("/gone")
        ]
    );

    let report = analyze(&records);
    assert_eq!(report.duplicate_clusters, vec![vec![url("/page1"), url("/page2")]]);
    assert_eq!(report.broken_links, vec![(url("/page1"), url("/gone"))]);
    assert!(report.seo_issues.missing_titles.contains(&url("/page3")));
    assert!(!report.seo_issues.missing_titles.contains(&url("/gone")));
}

#[tokio::test]
async fn test_crawl_respects_robots() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<a href=\"/secret\">x</a>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, true, "");
    let records = run_crawl(&config).await.expect("crawl should succeed");

    let private = records.get(&format!("{}/private", base_url)).unwrap();
    assert_eq!(private.status, PageStatus::RobotsDisallowed);
    assert!(private.blocks.is_empty());
    assert!(private.outbound_links.is_empty());
    assert_eq!(private.content_hash, "");
    assert!(!records.contains(&format!("{}/secret", base_url)));
}

#[tokio::test]
async fn test_missing_robots_allows_all() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;
    mount_page(&mock_server, "/private", "<p>Private</p>").await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, true, "");
    let records = run_crawl(&config).await.expect("crawl should succeed");

    assert_eq!(records.count_by_status(PageStatus::RobotsDisallowed), 0);
    assert_eq!(
        records.get(&format!("{}/private", base_url)).unwrap().status,
        PageStatus::Ok
    );
}

#[tokio::test]
async fn test_crawl_limits() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;
    mount_page(&mock_server, "/private", "<p>Private</p>").await;

    let mut config = create_test_config(&base_url, false, "");
    config.crawl.max_pages = 3;
    let records = run_crawl(&config).await.expect("crawl should succeed");
    assert_eq!(records.len(), 3);

    let mut config = create_test_config(&base_url, false, "");
    config.crawl.max_depth = 1;
    let records = run_crawl(&config).await.expect("crawl should succeed");
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.depth <= 1));
}

#[tokio::test]
async fn test_unreachable_seed_records_error() {
    // Nothing listens on the discard port
    let config = create_test_config("http://127.0.0.1:9", false, "[fetch]\ntimeout-seconds = 2\n");
    let records = run_crawl(&config).await.expect("crawl should not fail");

    assert_eq!(records.len(), 1);
    let seed = records.iter().next().unwrap();
    assert_eq!(seed.status, PageStatus::FetchError);
    assert_eq!(seed.depth, 0);
}

#[tokio::test]
async fn test_exports_after_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server).await;
    mount_page(&mock_server, "/private", "<p>Private</p>").await;

    let config = create_test_config(&base_url, false, "");
    let records = run_crawl(&config).await.expect("crawl should succeed");

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("crawl.csv");
    let json_path = dir.path().join("crawl.json");
    let doc_path = dir.path().join("crawl.md");

    CsvExporter.export_to_path(&records, &csv_path).unwrap();
    JsonExporter.export_to_path(&records, &json_path).unwrap();
    DocumentExporter.export_to_path(&records, &doc_path).unwrap();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), records.len() + 1);
    assert!(csv.contains(&format!("{}/gone,,,fetch_error,2,,0", base_url)));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json.as_object().unwrap().len(), records.len());
    assert_eq!(json[format!("{}/", base_url)]["title"], "Home");

    let doc = std::fs::read_to_string(&doc_path).unwrap();
    assert!(doc.starts_with("# Home\n"));
    assert!(doc.contains("\n## Welcome\n"));
    assert!(doc.contains("\n- Only here\n"));
}
