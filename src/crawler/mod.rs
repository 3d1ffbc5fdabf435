//! Crawler module for search page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with retry logic and proxy rotation
//! - The per-seed page cursor and its state machine
//! - Overall crawl coordination across seed URLs

mod coordinator;
mod fetcher;
mod pages;
mod proxy;
mod report;
mod retry;

pub use coordinator::{CrawlOptions, SearchCrawler};
pub use fetcher::{build_http_client, decode_html, HttpFetcher, PageSource};
pub use pages::SearchPages;
pub use proxy::ProxyRotator;
pub use report::{ScrapeReport, SeedReport};
pub use retry::{is_retriable, retry_with_backoff, RetryPolicy, RETRY_STATUSES};

use crate::config::Settings;
use crate::ScrapeError;
use tokio_util::sync::CancellationToken;

/// Runs a complete scrape over the given search URLs
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP fetcher and one client per configured proxy
/// 2. Crawl every seed URL in order, sharing the item cap
/// 3. Return the collected records with a per-seed report
///
/// Seed failures are recorded in the report rather than returned; only an
/// unusable HTTP or proxy setup fails the call.
///
/// # Example
///
/// ```no_run
/// use ebay_scraper::config::Settings;
/// use ebay_scraper::crawler::scrape;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seeds = vec!["https://www.ebay.com/sch/i.html?_nkw=lamp".to_string()];
/// let report = scrape(&Settings::default(), &seeds, CancellationToken::new()).await?;
/// println!("{} records", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(
    settings: &Settings,
    seeds: &[String],
    cancel: CancellationToken,
) -> Result<ScrapeReport, ScrapeError> {
    let fetcher = HttpFetcher::new(settings.http.clone());
    let proxies = ProxyRotator::from_settings(&settings.proxies);

    if proxies.is_direct() {
        fetcher.prepare(None)?;
    }
    for endpoint in proxies.endpoints() {
        fetcher.prepare(Some(endpoint))?;
    }

    let crawler = SearchCrawler::new(fetcher, CrawlOptions::from_settings(&settings.input))
        .with_proxies(proxies)
        .with_cancellation(cancel);

    Ok(crawler.run(seeds).await)
}
