//! Crawler coordinator - main scrape orchestration logic
//!
//! This module contains the loop over seed URLs that coordinates:
//! - Seed URL normalization
//! - The shared item budget across seeds
//! - Page fetching and detail-page enrichment through a [`PageSource`]
//! - Polite delays and cancellation
//! - The per-seed run report

use crate::config::{InputSettings, Settings};
use crate::crawler::fetcher::PageSource;
use crate::crawler::pages::SearchPages;
use crate::crawler::proxy::ProxyRotator;
use crate::crawler::report::{ScrapeReport, SeedReport};
use crate::extract::{parse_detail_page, DetailFields};
use crate::state::{ItemBudget, SeedOutcome};
use crate::url::normalize_search_url;
use crate::{FetchError, UrlError};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Behavior knobs of a crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOptions {
    /// Global cap on emitted records, across all seeds
    pub max_items: usize,
    /// Pause after each search page and each successful enrichment
    pub delay: Duration,
    pub follow_item_page: bool,
    pub drop_empty_records: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self::from_settings(&InputSettings::default())
    }
}

impl CrawlOptions {
    pub fn from_settings(input: &InputSettings) -> Self {
        Self {
            max_items: input.max_items,
            delay: Duration::try_from_secs_f64(input.delay_seconds).unwrap_or(Duration::ZERO),
            follow_item_page: input.follow_item_page,
            drop_empty_records: input.drop_empty_records,
        }
    }
}

/// Main crawler structure
///
/// Seeds are processed strictly one after the other, and pages within a
/// seed in order. All network access goes through the [`PageSource`].
pub struct SearchCrawler<S: PageSource> {
    source: S,
    proxies: ProxyRotator,
    options: CrawlOptions,
    cancel: CancellationToken,
}

impl<S: PageSource> SearchCrawler<S> {
    /// Creates a crawler with direct connections and its own cancellation token
    pub fn new(source: S, options: CrawlOptions) -> Self {
        Self {
            source,
            proxies: ProxyRotator::direct(),
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a crawler configured from a settings file
    pub fn from_settings(source: S, settings: &Settings) -> Self {
        Self::new(source, CrawlOptions::from_settings(&settings.input))
            .with_proxies(ProxyRotator::from_settings(&settings.proxies))
    }

    pub fn with_proxies(mut self, proxies: ProxyRotator) -> Self {
        self.proxies = proxies;
        self
    }

    /// Uses `cancel` to stop the crawl from outside
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Opens the record cursor of one seed URL
    ///
    /// The URL is normalized first; a malformed seed is an error.
    pub fn pages<'a>(
        &'a self,
        seed: &str,
        budget: &'a ItemBudget,
    ) -> Result<SearchPages<'a, S>, UrlError> {
        let base = normalize_search_url(seed)?;
        tracing::debug!("Seed {} normalized to {}", seed, base);
        Ok(SearchPages::new(self, budget, seed, base))
    }

    /// Runs the crawl over every seed URL
    ///
    /// # Crawl Loop
    ///
    /// 1. Skip the seed if the item cap is reached or the run is cancelled
    /// 2. Normalize the seed; a malformed seed is recorded as failed
    /// 3. Pull records from the seed's cursor into the report
    /// 4. Record the seed outcome and continue with the next seed
    ///
    /// A failing seed never aborts the run.
    pub async fn run(&self, seeds: &[String]) -> ScrapeReport {
        let budget = ItemBudget::new(self.options.max_items);
        let mut report = ScrapeReport::default();
        let start_time = Instant::now();

        tracing::info!(
            "Starting scrape of {} seed URLs (max {} items)",
            seeds.len(),
            self.options.max_items
        );

        for seed in seeds {
            if budget.is_exhausted() || self.is_cancelled() {
                tracing::debug!("Skipping seed {}", seed);
                report.seeds.push(SeedReport::skipped(seed.as_str()));
                continue;
            }

            let mut pages = match self.pages(seed, &budget) {
                Ok(pages) => pages,
                Err(e) => {
                    tracing::warn!("Invalid seed URL {}: {}", seed, e);
                    report.seeds.push(SeedReport {
                        outcome: SeedOutcome::Failed {
                            error: e.to_string(),
                        },
                        ..SeedReport::skipped(seed.as_str())
                    });
                    continue;
                }
            };

            while let Some(record) = pages.next().await {
                report.records.push(record);
            }

            let seed_report = pages.into_report();
            tracing::info!(
                "Seed {} finished: {} ({} records, {} pages)",
                seed_report.url,
                seed_report.outcome,
                seed_report.records,
                seed_report.pages_fetched
            );
            report.seeds.push(seed_report);
        }

        tracing::info!(
            "Scrape completed: {} records from {} seeds in {:?}",
            report.records.len(),
            seeds.len(),
            start_time.elapsed()
        );

        report
    }

    /// Fetches a search page; `None` if cancelled first
    pub(crate) async fn fetch_search_page(&self, url: &str) -> Option<Result<String, FetchError>> {
        let proxy = self.proxies.next();
        self.cancellable(self.source.fetch_page(url, proxy)).await
    }

    /// Fetches and parses an item page; `None` if cancelled first
    pub(crate) async fn fetch_detail(&self, url: &str) -> Option<Result<DetailFields, FetchError>> {
        let proxy = self.proxies.next();
        let html = self.cancellable(self.source.fetch_page(url, proxy)).await?;
        Some(html.map(|html| parse_detail_page(&html)))
    }

    /// Sleeps for the configured delay; false if cancelled meanwhile
    pub(crate) async fn pause(&self) -> bool {
        if self.options.delay.is_zero() {
            return !self.is_cancelled();
        }
        self.cancellable(tokio::time::sleep(self.options.delay))
            .await
            .is_some()
    }

    async fn cancellable<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            output = fut => Some(output),
        }
    }
}
