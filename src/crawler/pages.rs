//! Page-by-page record cursor for a single seed URL

use crate::crawler::coordinator::SearchCrawler;
use crate::crawler::fetcher::PageSource;
use crate::crawler::report::SeedReport;
use crate::extract::parse_search_page;
use crate::record::ListingRecord;
use crate::state::{CrawlState, ItemBudget, SeedOutcome};
use crate::url::set_page;
use std::collections::VecDeque;
use url::Url;

/// Results page every seed starts from; the seed's own `_pgn` is replaced
const FIRST_PAGE: u32 = 1;

/// Pull-based cursor over the records of one seed URL
///
/// Each call to [`next`](Self::next) does only the network work needed to
/// produce one more record. The cursor is finite and cannot be restarted:
/// it ends when a page has no result cards, when the shared item budget is
/// spent, when a search page cannot be fetched, or on cancellation.
pub struct SearchPages<'a, S: PageSource> {
    crawler: &'a SearchCrawler<S>,
    budget: &'a ItemBudget,
    seed: String,
    base: Url,
    page: u32,
    state: CrawlState,
    pending: VecDeque<ListingRecord>,
    current: Option<ListingRecord>,
    outcome: Option<SeedOutcome>,
    pages_fetched: u32,
    emitted: usize,
    enrichment_failures: usize,
}

impl<'a, S: PageSource> SearchPages<'a, S> {
    pub(crate) fn new(
        crawler: &'a SearchCrawler<S>,
        budget: &'a ItemBudget,
        seed: &str,
        base: Url,
    ) -> Self {
        Self {
            crawler,
            budget,
            seed: seed.to_string(),
            base,
            page: FIRST_PAGE,
            state: CrawlState::Init,
            pending: VecDeque::new(),
            current: None,
            outcome: None,
            pages_fetched: 0,
            emitted: 0,
            enrichment_failures: 0,
        }
    }

    /// Current state of the per-seed state machine
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Page number that is being, or will next be, fetched
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Produces the next record, or `None` once the cursor is done
    pub async fn next(&mut self) -> Option<ListingRecord> {
        loop {
            if self.state.is_terminal() {
                return None;
            }
            if self.crawler.is_cancelled() {
                self.finish(SeedOutcome::Cancelled);
                return None;
            }
            if self.budget.is_exhausted() {
                self.finish(SeedOutcome::CapReached);
                return None;
            }

            match self.state {
                CrawlState::Init => self.transition(CrawlState::FetchingPage),
                CrawlState::FetchingPage => self.fetch_page().await,
                CrawlState::ParsingCards => {
                    if let Some(record) = self.next_card() {
                        return self.emit(record);
                    }
                }
                CrawlState::Enriching => {
                    if let Some(record) = self.enrich_current().await {
                        return self.emit(record);
                    }
                }
                CrawlState::Advancing => {
                    let Some(next_page) = self.page.checked_add(1) else {
                        tracing::debug!("{}: no page after {}", self.seed, self.page);
                        self.finish(SeedOutcome::Exhausted);
                        return None;
                    };
                    self.page = next_page;
                    if !self.crawler.pause().await {
                        self.finish(SeedOutcome::Cancelled);
                        return None;
                    }
                    self.transition(CrawlState::FetchingPage);
                }
                CrawlState::Done => return None,
            }
        }
    }

    /// Consumes the cursor into its per-seed report
    pub fn into_report(self) -> SeedReport {
        SeedReport {
            url: self.seed,
            outcome: self.outcome.unwrap_or(SeedOutcome::Cancelled),
            pages_fetched: self.pages_fetched,
            records: self.emitted,
            enrichment_failures: self.enrichment_failures,
        }
    }

    async fn fetch_page(&mut self) {
        let url = set_page(&self.base, self.page);

        let html = match self.crawler.fetch_search_page(url.as_str()).await {
            None => return self.finish(SeedOutcome::Cancelled),
            Some(Err(e)) => {
                tracing::warn!("Search page {} failed: {}", url, e);
                return self.finish(SeedOutcome::Failed {
                    error: e.to_string(),
                });
            }
            Some(Ok(html)) => html,
        };

        self.pages_fetched += 1;
        let cards = parse_search_page(&html);
        tracing::debug!("Page {} of {} has {} cards", self.page, self.seed, cards.len());

        if cards.is_empty() {
            self.finish(SeedOutcome::Exhausted);
        } else {
            self.pending = cards.into();
            self.transition(CrawlState::ParsingCards);
        }
    }

    /// Takes the next card of the page
    ///
    /// Returns the record when it can be emitted as is. Records that need
    /// enrichment are parked in `current` and the state moves to
    /// `Enriching`; an empty page queue moves the state to `Advancing`.
    fn next_card(&mut self) -> Option<ListingRecord> {
        let Some(record) = self.pending.pop_front() else {
            self.transition(CrawlState::Advancing);
            return None;
        };

        let options = self.crawler.options();
        if options.drop_empty_records && record.is_placeholder() {
            tracing::debug!("Dropping card without title or URL on page {}", self.page);
            return None;
        }

        if options.follow_item_page && record.url.is_some() {
            self.current = Some(record);
            self.transition(CrawlState::Enriching);
            return None;
        }

        Some(record)
    }

    async fn enrich_current(&mut self) -> Option<ListingRecord> {
        let mut record = self.current.take()?;
        self.transition(CrawlState::ParsingCards);

        let Some(url) = record.url.clone() else {
            return Some(record);
        };

        match self.crawler.fetch_detail(&url).await {
            None => {
                self.finish(SeedOutcome::Cancelled);
                None
            }
            Some(Err(e)) => {
                self.enrichment_failures += 1;
                tracing::debug!("Enrichment of {} failed: {}", url, e);
                Some(record)
            }
            Some(Ok(detail)) => {
                record.merge_detail(detail);
                if self.crawler.pause().await {
                    Some(record)
                } else {
                    self.finish(SeedOutcome::Cancelled);
                    None
                }
            }
        }
    }

    fn emit(&mut self, record: ListingRecord) -> Option<ListingRecord> {
        if self.budget.try_claim() {
            self.emitted += 1;
            Some(record)
        } else {
            self.finish(SeedOutcome::CapReached);
            None
        }
    }

    fn transition(&mut self, next: CrawlState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("{}: {} -> {}", self.seed, self.state, next);
        self.state = next;
    }

    fn finish(&mut self, outcome: SeedOutcome) {
        tracing::trace!("{}: {} -> done ({})", self.seed, self.state, outcome);
        self.state = CrawlState::Done;
        self.outcome = Some(outcome);
    }
}
