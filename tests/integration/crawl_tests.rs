//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small site and run the full crawl loop
//! against it end-to-end.

use site_ingest::config::{CrawlConfig, FetcherConfig, DEFAULT_PROGRESS_LABEL};
use site_ingest::crawler::{aggregate, Crawler, FetchFailureReason};
use site_ingest::state::Termination;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn crawler() -> Crawler {
    let fetcher = FetcherConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..FetcherConfig::default()
    };
    Crawler::new(&fetcher, CrawlConfig::default()).unwrap()
}

/// Builds a page whose body is a marker paragraph followed by the given anchors
fn page(marker: &str, hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>{}</p>{}</body></html>",
        marker, marker, anchors
    )
}

async fn serve(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_origin_without_links() {
    let server = MockServer::start().await;
    serve(&server, "/", page("lonely home", &[])).await;

    let mut fractions = Vec::new();
    let mut labels = Vec::new();
    let mut sink = |fraction: f64, label: &str| {
        fractions.push(fraction);
        labels.push(label.to_string());
    };
    let report = crawler().crawl(&server.uri(), &mut sink).await;

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.home_links, 0);
    assert_eq!(report.pages[0].url, server.uri());
    assert!(report.failures.is_empty());
    assert_eq!(report.termination, Termination::FrontierExhausted);
    assert_eq!(report.progress, 1.0);

    // One step of the minimum size, then the closing 1.0
    assert_eq!(fractions, vec![0.01, 1.0]);
    assert!(labels.iter().all(|l| l == DEFAULT_PROGRESS_LABEL));
}

#[tokio::test]
async fn test_home_links_are_each_visited() {
    let server = MockServer::start().await;
    serve(&server, "/", page("home", &["/a", "/b", "/c"])).await;
    serve(&server, "/a", page("page a", &[])).await;
    serve(&server, "/b", page("page b", &[])).await;
    serve(&server, "/c", page("page c", &[])).await;

    let mut fractions = Vec::new();
    let mut sink = |fraction: f64, _: &str| fractions.push(fraction);
    let report = crawler().crawl(&server.uri(), &mut sink).await;

    let visited: Vec<String> = report.pages.iter().map(|p| p.url.clone()).collect();
    let base = server.uri();
    assert_eq!(
        visited,
        vec![
            base.clone(),
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base)
        ]
    );
    assert_eq!(report.termination, Termination::FrontierExhausted);
    assert_eq!(report.home_links, 3);

    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    assert!(fractions.iter().all(|f| (0.0..=1.0).contains(f)));
    assert!((fractions[0] - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(fractions.last().copied(), Some(1.0));

    let text = aggregate(&report.pages);
    for marker in ["home", "page a", "page b", "page c"] {
        assert!(text.contains(marker), "missing {marker}");
    }
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let server = MockServer::start().await;
    // /a and /b link to each other; `.expect(1)` checks each is fetched once
    serve(&server, "/", page("home", &["/a", "/b"])).await;
    serve(&server, "/a", page("page a", &["/b"])).await;
    serve(&server, "/b", page("page b", &["/a"])).await;

    let report = crawler().crawl(&server.uri(), &mut |_: f64, _: &str| {}).await;

    assert_eq!(report.pages.len(), 3);
    assert!(report.failures.is_empty());
    assert_eq!(report.termination, Termination::FrontierExhausted);
}

#[tokio::test]
async fn test_failed_page_consumes_a_step() {
    let server = MockServer::start().await;
    serve(&server, "/", page("home", &["/a", "/gone"])).await;
    serve(&server, "/a", page("page a", &[])).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .expect(1)
        .mount(&server)
        .await;

    let mut fractions = Vec::new();
    let mut sink = |fraction: f64, _: &str| fractions.push(fraction);
    let report = crawler().crawl(&server.uri(), &mut sink).await;

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, format!("{}/gone", server.uri()));
    assert_eq!(report.failures[0].reason, FetchFailureReason::Status(404));
    assert_eq!(report.attempts(), 3);

    assert_eq!(fractions, vec![0.5, 1.0, 1.0]);
    assert!(!aggregate(&report.pages).contains("not here"));
}

#[tokio::test]
async fn test_unreachable_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut fractions = Vec::new();
    let mut sink = |fraction: f64, _: &str| fractions.push(fraction);
    let report = crawler().crawl(&server.uri(), &mut sink).await;

    assert!(report.pages.is_empty());
    assert_eq!(report.home_links, 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.termination, Termination::FrontierExhausted);
    assert_eq!(fractions, vec![0.0, 1.0]);
    assert_eq!(aggregate(&report.pages), "");
}

#[tokio::test]
async fn test_deep_link_stops_the_crawl() {
    let server = MockServer::start().await;
    serve(&server, "/", page("home", &["/x", "/y"])).await;
    serve(&server, "/x", page("page x", &["/z"])).await;
    serve(&server, "/y", page("page y", &[])).await;
    Mock::given(method("GET"))
        .and(path("/z"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("page z", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawler().crawl(&server.uri(), &mut |_: f64, _: &str| {}).await;

    assert_eq!(report.pages.len(), 3);
    assert_eq!(
        report.termination,
        Termination::OutOfBound {
            url: format!("{}/z", server.uri())
        }
    );
    assert!(report.termination.is_out_of_bound());
    assert!(!aggregate(&report.pages).contains("page z"));
}

#[tokio::test]
async fn test_foreign_links_are_ignored() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/",
        page("home", &["https://elsewhere.invalid/", "mailto:hi@a.test", "/a"]),
    )
    .await;
    serve(&server, "/a", page("page a", &[])).await;

    let report = crawler().crawl(&server.uri(), &mut |_: f64, _: &str| {}).await;

    assert_eq!(report.pages.len(), 2);
    assert!(report.failures.is_empty());
}
