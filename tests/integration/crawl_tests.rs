//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, writing pages to a temp directory.

use listing_crawler::config::Config;
use listing_crawler::crawler::{run_crawl, StopReason};
use listing_crawler::CrawlerError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, max_pages: u32, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.start_url = format!("{}/search?size=30&page=1", base_url);
    config.crawler.max_pages = max_pages;
    config.crawler.delay_ms = 0;
    config.network.timeout_secs = 5;
    config.network.connect_timeout_secs = 5;
    config.output.output_dir = output_dir.display().to_string();
    // Accept link-style pager controls as well as buttons
    config.extractor.next_page_selector = r#"[aria-label="Next page"]"#.to_string();
    config
}

/// Listing markup with detail links and a pager
fn listing_html(current: u32, references: &[(&str, &str, &str)], next_href: Option<&str>) -> String {
    let links: String = references
        .iter()
        .map(|(make, model, reference)| {
            format!(
                r#"<article><a href="/used-cars/{make}/{model}/fpa/{reference}">{make} {model}</a></article>"#
            )
        })
        .collect();

    let next = match next_href {
        Some(href) => format!(r#"<a aria-label="Next page" href="{}">Next</a>"#, href),
        None => r#"<button aria-label="Next page" class="czds-m-pagination__disabled">Next</button>"#
            .to_string(),
    };

    format!(
        r#"<html><body>{links}<nav><span class="czds-m-pagination__current">{current}</span>{next}</nav></body></html>"#
    )
}

async fn mount_listing(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, make: &str, model: &str, reference: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/used-cars/{}/{}/fpa/{}", make, model, reference)))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!("<html>detail {}</html>", reference)),
        )
        .mount(server)
        .await;
}

fn saved_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_crawl_follows_pagination_in_order() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // The next control carries no href on page 1, so the page parameter is derived
    let page_one = listing_html(1, &[("ford", "focus", "101"), ("audi", "a4", "102")], None)
        .replace(
            r#"<button aria-label="Next page" class="czds-m-pagination__disabled">Next</button>"#,
            r#"<button aria-label="Next page">Next</button>"#,
        );
    mount_listing(&mock_server, 1, page_one).await;
    mount_listing(
        &mock_server,
        2,
        listing_html(2, &[("audi", "a4", "102"), ("bmw", "x5", "103")], None),
    )
    .await;
    mount_detail(&mock_server, "ford", "focus", "101").await;
    mount_detail(&mock_server, "audi", "a4", "102").await;
    mount_detail(&mock_server, "bmw", "x5", "103").await;

    let config = create_test_config(&mock_server.uri(), 200, output.path());
    let report = run_crawl(config).await.unwrap();

    assert!(matches!(report.stop, StopReason::Exhausted));
    assert_eq!(report.saved, 3);
    assert_eq!(report.listing_pages, 2);
    assert_eq!(
        saved_files(output.path()),
        vec![
            "page_001_ford_focus_101.html",
            "page_002_audi_a4_102.html",
            "page_003_bmw_x5_103.html",
        ]
    );

    let content =
        std::fs::read_to_string(output.path().join("page_003_bmw_x5_103.html")).unwrap();
    assert_eq!(content, "<html>detail 103</html>");

    // Item 102 appeared on both listing pages but was fetched once
    let requests = mock_server.received_requests().await.unwrap();
    let detail_102 = requests
        .iter()
        .filter(|r| r.url.path() == "/used-cars/audi/a4/fpa/102")
        .count();
    assert_eq!(detail_102, 1);
}

#[tokio::test]
async fn test_blocked_item_is_skipped() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_listing(
        &mock_server,
        1,
        listing_html(
            1,
            &[("ford", "focus", "201"), ("ford", "kuga", "202"), ("ford", "puma", "203")],
            None,
        ),
    )
    .await;
    mount_detail(&mock_server, "ford", "focus", "201").await;
    Mock::given(method("GET"))
        .and(path("/used-cars/ford/kuga/fpa/202"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_detail(&mock_server, "ford", "puma", "203").await;

    let config = create_test_config(&mock_server.uri(), 200, output.path());
    let report = run_crawl(config).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.saved, 2);
    assert_eq!(report.failed_items, 1);
    assert_eq!(
        saved_files(output.path()),
        vec!["page_001_ford_focus_201.html", "page_002_ford_puma_203.html"]
    );
}

#[tokio::test]
async fn test_quota_stops_before_next_item() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_listing(
        &mock_server,
        1,
        listing_html(
            1,
            &[("kia", "ceed", "301"), ("kia", "sportage", "302")],
            Some("/search?size=30&page=2"),
        ),
    )
    .await;
    mount_detail(&mock_server, "kia", "ceed", "301").await;
    Mock::given(method("GET"))
        .and(path("/used-cars/kia/sportage/fpa/302"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1, output.path());
    let report = run_crawl(config).await.unwrap();

    assert!(matches!(report.stop, StopReason::QuotaReached));
    assert_eq!(report.saved, 1);
    assert_eq!(saved_files(output.path()), vec!["page_001_kia_ceed_301.html"]);
}

#[tokio::test]
async fn test_throttled_listing_aborts_and_keeps_saved_pages() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_listing(
        &mock_server,
        1,
        listing_html(1, &[("vw", "golf", "401")], Some("/search?size=30&page=2")),
    )
    .await;
    mount_detail(&mock_server, "vw", "golf", "401").await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 200, output.path());
    let report = run_crawl(config).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.saved, 1);
    match report.error() {
        Some(CrawlerError::ListingFetch { source, .. }) => assert_eq!(source.status(), Some(429)),
        other => panic!("expected listing fetch error, got {:?}", other),
    }
    assert_eq!(saved_files(output.path()), vec!["page_001_vw_golf_401.html"]);
}

#[tokio::test]
async fn test_empty_listing_creates_output_and_exits() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("pages");

    mount_listing(&mock_server, 1, listing_html(1, &[], None)).await;

    let config = create_test_config(&mock_server.uri(), 200, &output);
    let report = run_crawl(config).await.unwrap();

    assert!(matches!(report.stop, StopReason::Exhausted));
    assert_eq!(report.saved, 0);
    assert_eq!(report.listing_pages, 1);
    assert!(output.is_dir());
    assert!(saved_files(&output).is_empty());
}

#[tokio::test]
async fn test_pager_pointing_back_ends_crawl() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_listing(
        &mock_server,
        1,
        listing_html(1, &[("seat", "leon", "501")], Some("/search?size=30&page=1")),
    )
    .await;
    mount_detail(&mock_server, "seat", "leon", "501").await;

    let config = create_test_config(&mock_server.uri(), 200, output.path());
    let report = run_crawl(config).await.unwrap();

    assert!(matches!(report.stop, StopReason::PaginationLoop { .. }));
    assert!(report.is_success());
    assert_eq!(report.saved, 1);
    assert_eq!(report.listing_pages, 1);
}
