use crate::record::ListingRecord;
use crate::state::SeedOutcome;

/// What happened to one seed URL
#[derive(Debug, Clone, PartialEq)]
pub struct SeedReport {
    pub url: String,
    pub outcome: SeedOutcome,
    pub pages_fetched: u32,
    /// Records emitted from this seed
    pub records: usize,
    /// Detail pages that could not be fetched
    pub enrichment_failures: usize,
}

impl SeedReport {
    pub fn skipped(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outcome: SeedOutcome::Skipped,
            pages_fetched: 0,
            records: 0,
            enrichment_failures: 0,
        }
    }
}

/// Result of a whole scrape run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeReport {
    /// Collected records, in emission order
    pub records: Vec<ListingRecord>,
    /// One entry per seed URL, in input order
    pub seeds: Vec<SeedReport>,
}

impl ScrapeReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True if there were seeds, every one of them failed, and nothing was
    /// collected
    pub fn all_failed(&self) -> bool {
        self.records.is_empty()
            && !self.seeds.is_empty()
            && self.seeds.iter().all(|s| s.outcome.is_failure())
    }

    pub fn pages_fetched(&self) -> u32 {
        self.seeds.iter().map(|s| s.pages_fetched).sum()
    }

    pub fn enrichment_failures(&self) -> usize {
        self.seeds.iter().map(|s| s.enrichment_failures).sum()
    }

    pub fn was_cancelled(&self) -> bool {
        self.seeds
            .iter()
            .any(|s| matches!(s.outcome, SeedOutcome::Cancelled))
    }

    /// Number of seeds that ended with the given outcome kind
    pub fn count_outcome(&self, kind: &str) -> usize {
        self.seeds
            .iter()
            .filter(|s| s.outcome.as_str() == kind)
            .count()
    }
}
