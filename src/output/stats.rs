//! Run statistics
//!
//! This module condenses a [`ScrapeReport`] into summary counts and prints
//! them to stdout at the end of a run.

use crate::crawler::ScrapeReport;
use std::path::PathBuf;

/// Summary counts of a scrape run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub seeds: usize,
    pub seeds_exhausted: usize,
    pub seeds_cap_reached: usize,
    pub seeds_failed: usize,
    pub seeds_cancelled: usize,
    pub seeds_skipped: usize,
    pub pages_fetched: u32,
    pub enrichment_failures: usize,
}

impl RunSummary {
    pub fn from_report(report: &ScrapeReport) -> Self {
        Self {
            records: report.records.len(),
            seeds: report.seeds.len(),
            seeds_exhausted: report.count_outcome("exhausted"),
            seeds_cap_reached: report.count_outcome("cap_reached"),
            seeds_failed: report.count_outcome("failed"),
            seeds_cancelled: report.count_outcome("cancelled"),
            seeds_skipped: report.count_outcome("skipped"),
            pages_fetched: report.pages_fetched(),
            enrichment_failures: report.enrichment_failures(),
        }
    }

    /// Seeds that ran to the end or to the item cap
    pub fn seeds_completed(&self) -> usize {
        self.seeds_exhausted + self.seeds_cap_reached
    }

    /// Share of started seeds that completed, as a percentage
    pub fn success_rate(&self) -> f64 {
        let started = self.seeds - self.seeds_skipped;
        if started == 0 {
            return 0.0;
        }
        (self.seeds_completed() as f64 / started as f64) * 100.0
    }
}

/// Prints the run summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The finished run
/// * `written` - Export files produced from the run
pub fn print_report(report: &ScrapeReport, written: &[PathBuf]) {
    let summary = RunSummary::from_report(report);

    println!("=== Scrape Summary ===\n");

    println!("Overview:");
    println!("  Records collected: {}", summary.records);
    println!("  Pages fetched: {}", summary.pages_fetched);
    println!("  Enrichment failures: {}", summary.enrichment_failures);
    println!();

    println!("Seeds ({}):", summary.seeds);
    println!("  Completed: {}", summary.seeds_completed());
    println!("  Failed: {}", summary.seeds_failed);
    println!("  Cancelled: {}", summary.seeds_cancelled);
    println!("  Skipped: {}", summary.seeds_skipped);
    println!();

    let failed: Vec<_> = report
        .seeds
        .iter()
        .filter(|s| s.outcome.is_failure())
        .collect();
    if !failed.is_empty() {
        println!("Failed Seeds:");
        for seed in failed {
            println!("  - {}: {}", seed.url, seed.outcome);
        }
        println!();
    }

    if !written.is_empty() {
        println!("Files Written:");
        for path in written {
            println!("  - {}", path.display());
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} seeds completed)",
        summary.success_rate(),
        summary.seeds_completed(),
        summary.seeds - summary.seeds_skipped
    );
}
