//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end through the real `HttpFetcher`.

use site_mapper::config::{Config, HttpConfig, UserAgentConfig};
use site_mapper::crawler::{Fetcher, HttpFetcher};
use site_mapper::output::write_report;
use site_mapper::{CrawlResults, Crawler, FetchError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Returns the crawl domain of a mock server, e.g. "127.0.0.1:12345"
fn domain_of(server: &MockServer) -> String {
    let uri = url::Url::parse(&server.uri()).expect("Failed to parse base URL");
    format!(
        "{}:{}",
        uri.host_str().expect("Failed to extract host"),
        uri.port().expect("Mock server has no port")
    )
}

fn create_test_config(domain: &str, workers: usize) -> Config {
    let mut config = Config::for_domain(domain, workers);
    config.crawler.dequeue_timeout_ms = 50;
    config.crawler.idle_backoff_ms = 10;
    config.user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
    };
    config.http = HttpConfig {
        request_timeout_secs: Some(5),
        connect_timeout_secs: Some(2),
    };
    config
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("HEAD"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn crawl(server: &MockServer, workers: usize) -> CrawlResults {
    Crawler::with_http(create_test_config(&domain_of(server), workers))
        .expect("Failed to create crawler")
        .run()
        .await
        .expect("Crawl failed")
}

/// Serves a small site: a cycle between two pages, a dead link and a JSON asset
async fn start_test_site() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><head><link rel="stylesheet" href="/style.css"></head><body>
            <a href="/page1">Page 1</a>
            <a href="/page2/">Page 2</a>
            <a href="/missing">Gone</a>
            <a href="/data.json">Data</a>
            <a href="mailto:admin@test.com">Mail</a>
            <img src="/logo.png">
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/page1",
        r#"<a href="page2">Page 2</a><a href="/missing#again">Gone</a>"#.to_string(),
    )
    .await;
    mount_page(
        &server,
        "/page2",
        r#"<a href="/">Home</a><a href="/page1?ref=2">Page 1</a>"#.to_string(),
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/json"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = start_test_site().await;
    let base = server.uri();

    let results = crawl(&server, 4).await;

    let page = |p: &str| format!("{}{}", base, p);
    let root = base.clone();

    let pages: Vec<_> = results.sitemap.keys().map(|p| p.to_string()).collect();
    assert_eq!(pages, vec![root.clone(), page("/page1"), page("/page2")]);

    let root_links: Vec<_> = results.sitemap[root.as_str()]
        .iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(root_links, vec![page("/page1"), page("/page2")]);

    let page2_links: Vec<_> = results.sitemap[page("/page2").as_str()]
        .iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(page2_links, vec![root.clone(), page("/page1")]);

    let root_assets = &results.assets[root.as_str()];
    for expected in ["/page1", "/page2", "/data.json", "/style.css", "/logo.png"] {
        assert!(
            root_assets.contains(&page(expected)),
            "root assets missing {}",
            expected
        );
    }
    assert!(!root_assets.contains(&page("/missing")));
    assert!(!root_assets.iter().any(|a| a.starts_with("mailto:")));

    let invalid: Vec<_> = results.invalid_urls.iter().map(|u| u.to_string()).collect();
    assert_eq!(invalid, vec![page("/missing")]);
    assert_eq!(results.statistics.pages_crawled, 3);
}

#[tokio::test]
async fn test_single_worker_crawl_matches_pool() {
    let server = start_test_site().await;
    let single = crawl(&server, 1).await;

    let server = start_test_site().await;
    let pool = crawl(&server, 8).await;

    assert_eq!(single.sitemap.len(), pool.sitemap.len());
    assert_eq!(single.statistics.pages_crawled, pool.statistics.pages_crawled);
    assert_eq!(single.statistics.probe_failures, 1);
    assert_eq!(pool.statistics.probe_failures, 1);
}

#[tokio::test]
async fn test_failed_root_yields_empty_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let results = crawl(&server, 2).await;

    assert!(results.sitemap.is_empty());
    assert!(results.assets.is_empty());
    assert_eq!(results.statistics.fetch_failures, 1);

    let mut report = Vec::new();
    write_report(&results.sitemap, &results.assets, &mut report).unwrap();
    assert_eq!(String::from_utf8(report).unwrap(), "Sitemap\n\nAssets\n");
}

#[tokio::test]
async fn test_probe_without_content_type_is_crawled() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/plain">x</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/plain"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("no links here"))
        .expect(1)
        .mount(&server)
        .await;

    let results = crawl(&server, 2).await;

    let plain = format!("{}/plain", base);
    assert!(results.sitemap[base.as_str()].contains(plain.as_str()));
    assert!(results.sitemap.contains_key(plain.as_str()));
}

#[tokio::test]
async fn test_http_fetcher_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&domain_of(&server), 1);
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.http).unwrap();

    let response = fetcher.fetch(&server.uri()).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_http_fetcher_reports_transport_failure() {
    // Nothing listens on a port once its listener is gone
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let fetcher =
        HttpFetcher::from_config(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();

    let result = fetcher.probe(&uri).await;
    assert!(matches!(result, Err(FetchError::Transport { .. })));
}
