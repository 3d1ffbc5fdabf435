//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and test the real
//! fetcher and the full scrape cycle end-to-end.

use ebay_scraper::config::{HttpSettings, Settings};
use ebay_scraper::crawler::{
    scrape, CrawlOptions, HttpFetcher, PageSource, RetryPolicy, SearchCrawler,
};
use ebay_scraper::output::{export_all, ExportFormat};
use ebay_scraper::{FetchError, SeedOutcome};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Retry policy with the production budget but near-zero delays
fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1),
    }
}

fn test_http_settings() -> HttpSettings {
    HttpSettings {
        user_agent: "TestBot/1.0".to_string(),
        timeout_seconds: 5,
    }
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(test_http_settings()).with_retry_policy(fast_retry())
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into().into_bytes(), "text/html; charset=utf-8")
}

fn results_page(base_url: &str, items: &[(&str, &str, Option<&str>)]) -> String {
    let cards: String = items
        .iter()
        .map(|(item, title, price)| {
            let price = price
                .map(|p| format!(r#"<span class="s-item__price">{}</span>"#, p))
                .unwrap_or_default();
            format!(
                r#"<li class="s-item">
                     <a class="s-item__link" href="{}/itm/{}"><h3 class="s-item__title">{}</h3></a>
                     {}
                   </li>"#,
                base_url, item, title, price
            )
        })
        .collect();

    format!(
        r#"<html><body><ul class="srp-results">{}</ul></body></html>"#,
        cards
    )
}

#[tokio::test]
async fn test_retry_503_then_200() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(html("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/sch/i.html?_nkw=lamp", mock_server.uri());
    let body = fetcher().fetch_page(&url, None).await.unwrap();

    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn test_four_503s_fail_with_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&mock_server)
        .await;

    let url = format!("{}/sch/i.html", mock_server.uri());
    let err = fetcher().fetch_page(&url, None).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 503, .. }));
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_404_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/itm/123456789"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/itm/123456789", mock_server.uri());
    let err = fetcher().fetch_page(&url, None).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(html("ua ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = fetcher()
        .fetch_page(&format!("{}/", mock_server.uri()), None)
        .await
        .unwrap();
    assert_eq!(body, "ua ok");
}

#[tokio::test]
async fn test_declared_charset_is_decoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<p>Caf\xe9 M\xfcnchen</p>".to_vec(), "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let body = fetcher()
        .fetch_page(&format!("{}/", mock_server.uri()), None)
        .await
        .unwrap();
    assert_eq!(body, "<p>Café München</p>");
}

#[tokio::test]
async fn test_full_scrape_with_enrichment() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .and(query_param("_pgn", "1"))
        .and(query_param("_ipg", "60"))
        .respond_with(html(results_page(
            &base_url,
            &[
                ("111111111", "Brass Lamp", Some("$10.00 sold")),
                ("222222222", "Desk Lamp", None),
            ],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .and(query_param("_pgn", "2"))
        .respond_with(html("<html><body><p>No results</p></body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/itm/111111111"))
        .respond_with(html(
            r#"<html><head><meta property="og:brand" content="Acme"></head><body>
               <nav class="breadcrumbs"><a>Home</a><a>Lamps</a></nav>
               <div class="ux-layout-section-evo__row">
                 <div class="ux-labels-values__labels">MPN</div>
                 <div class="ux-labels-values__values">AL-100</div>
               </div>
               </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/itm/222222222"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut settings = Settings::default();
    settings.http = test_http_settings();
    settings.input.delay_seconds = 0.0;
    settings.input.max_items = 10;
    settings.input.follow_item_page = true;

    // rt= is telemetry and must not reach the server
    let seeds = vec![format!("{}/sch/i.html?_nkw=lamp&rt=nc", base_url)];
    let report = scrape(&settings, &seeds, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.records.len(), 2);

    let lamp = &report.records[0];
    assert_eq!(lamp.title.as_deref(), Some("Brass Lamp"));
    assert_eq!(lamp.price, Some(10.0));
    assert_eq!(lamp.item_number.as_deref(), Some("111111111"));
    assert_eq!(lamp.brand.as_deref(), Some("Acme"));
    assert_eq!(lamp.mpn.as_deref(), Some("AL-100"));
    assert_eq!(
        lamp.categories,
        Some(vec!["Home".to_string(), "Lamps".to_string()])
    );

    let desk = &report.records[1];
    assert_eq!(desk.title.as_deref(), Some("Desk Lamp"));
    assert_eq!(desk.price, None);
    assert_eq!(desk.brand, None);

    assert_eq!(report.seeds.len(), 1);
    assert_eq!(report.seeds[0].outcome, SeedOutcome::Exhausted);
    assert_eq!(report.seeds[0].pages_fetched, 2);
    assert_eq!(report.seeds[0].enrichment_failures, 1);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| !r.url.query_pairs().any(|(k, _)| k == "rt")));
}

#[tokio::test]
async fn test_cap_stops_network_calls() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .and(query_param("_pgn", "1"))
        .respond_with(html(results_page(
            &base_url,
            &[
                ("111111111", "A", None),
                ("222222222", "B", None),
                ("333333333", "C", None),
            ],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Neither page 2 nor the second seed may be requested
    Mock::given(method("GET"))
        .and(query_param("_pgn", "2"))
        .respond_with(html("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/other"))
        .respond_with(html("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = SearchCrawler::new(
        fetcher(),
        CrawlOptions {
            max_items: 2,
            delay: Duration::ZERO,
            follow_item_page: false,
            drop_empty_records: false,
        },
    );
    let seeds = vec![
        format!("{}/sch/i.html?_nkw=a", base_url),
        format!("{}/other?_nkw=b", base_url),
    ];

    let report = crawler.run(&seeds).await;

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.seeds[0].outcome, SeedOutcome::CapReached);
    assert_eq!(report.seeds[1].outcome, SeedOutcome::Skipped);
}

#[tokio::test]
async fn test_all_seeds_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let crawler = SearchCrawler::new(
        fetcher(),
        CrawlOptions {
            delay: Duration::ZERO,
            ..CrawlOptions::default()
        },
    );
    let seeds = vec![
        format!("{}/sch/i.html?_nkw=a", mock_server.uri()),
        format!("{}/sch/i.html?_nkw=b", mock_server.uri()),
    ];

    let report = crawler.run(&seeds).await;

    assert!(report.is_empty());
    assert!(report.all_failed());
}

#[tokio::test]
async fn test_scrape_then_export() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(query_param("_pgn", "1"))
        .respond_with(html(results_page(
            &base_url,
            &[("111111111", "Lamp, brass", Some("£7.50"))],
        )))
        .mount(&mock_server)
        .await;

    let crawler = SearchCrawler::new(
        fetcher(),
        CrawlOptions {
            delay: Duration::ZERO,
            ..CrawlOptions::default()
        },
    );
    let report = crawler
        .run(&[format!("{}/sch/i.html?_nkw=lamp", base_url)])
        .await;
    assert_eq!(report.records.len(), 1);

    let dir = TempDir::new().unwrap();
    let outcome = export_all(
        &report.records,
        dir.path(),
        &[ExportFormat::Csv, ExportFormat::Xml],
        chrono::Local::now(),
    )
    .unwrap();
    assert_eq!(outcome.written.len(), 3);

    let csv_path = outcome
        .written
        .iter()
        .find(|p| p.extension().is_some_and(|e| e == "csv"))
        .unwrap();
    let mut reader = csv::Reader::from_path(csv_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][3], "Lamp, brass");
    assert_eq!(&rows[0][7], "£7.50");

    let json_path = outcome
        .written
        .iter()
        .find(|p| p.extension().is_some_and(|e| e == "json"))
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json[0]["price"], 7.5);
    assert_eq!(json[0]["priceWithCurrency"], "£7.50");
}
