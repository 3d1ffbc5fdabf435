/// Crawl state definitions for a single seed URL
///
/// A seed URL moves through these states while its result pages are walked.
use std::fmt;

/// Represents where the page cursor of one seed URL currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Seed URL accepted but not normalized or fetched yet
    Init,

    /// A search results page is being requested
    FetchingPage,

    /// Result cards of the last fetched page are being turned into records
    ParsingCards,

    /// A record is being enriched from its item page
    Enriching,

    /// Moving to the next results page
    Advancing,

    // ===== Terminal State =====
    /// No more records will be produced for this seed URL
    Done,
}

impl CrawlState {
    /// Returns true once the cursor can no longer produce records
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    ///
    /// Any active state may jump straight to `Done` (cap reached, fetch
    /// failure, cancellation). `Done` never transitions anywhere.
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        use CrawlState::*;

        match (self, next) {
            (Done, _) => false,
            (_, Done) => true,
            (Init, FetchingPage) => true,
            (FetchingPage, ParsingCards) => true,
            (ParsingCards, Enriching | ParsingCards | Advancing) => true,
            (Enriching, ParsingCards | Advancing) => true,
            (Advancing, FetchingPage) => true,
            _ => false,
        }
    }

    /// Short lowercase name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::FetchingPage => "fetching_page",
            Self::ParsingCards => "parsing_cards",
            Self::Enriching => "enriching",
            Self::Advancing => "advancing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a seed URL stopped producing records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// A results page came back without any result cards
    Exhausted,

    /// The global item cap was reached while on this seed URL
    CapReached,

    /// A results page could not be fetched
    Failed { error: String },

    /// The run was cancelled from outside
    Cancelled,

    /// The cap was already spent before this seed URL got its turn
    Skipped,
}

impl SeedOutcome {
    /// Returns true for outcomes that represent a hard failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Short lowercase name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::CapReached => "cap_reached",
            Self::Failed { .. } => "failed",
            Self::Cancelled => "cancelled",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for SeedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { error } => write!(f, "failed ({})", error),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!CrawlState::Init.is_terminal());
        assert!(!CrawlState::FetchingPage.is_terminal());
        assert!(!CrawlState::ParsingCards.is_terminal());
        assert!(!CrawlState::Enriching.is_terminal());
        assert!(!CrawlState::Advancing.is_terminal());
        assert!(CrawlState::Done.is_terminal());
    }

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            CrawlState::Init,
            CrawlState::FetchingPage,
            CrawlState::ParsingCards,
            CrawlState::Enriching,
            CrawlState::ParsingCards,
            CrawlState::Advancing,
            CrawlState::FetchingPage,
            CrawlState::Done,
        ];

        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!CrawlState::Init.can_transition_to(CrawlState::ParsingCards));
        assert!(!CrawlState::FetchingPage.can_transition_to(CrawlState::Enriching));
        assert!(!CrawlState::Advancing.can_transition_to(CrawlState::ParsingCards));
        assert!(!CrawlState::Done.can_transition_to(CrawlState::FetchingPage));
        assert!(!CrawlState::Done.can_transition_to(CrawlState::Done));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CrawlState::FetchingPage), "fetching_page");
        assert_eq!(format!("{}", SeedOutcome::CapReached), "cap_reached");
        assert_eq!(
            format!(
                "{}",
                SeedOutcome::Failed {
                    error: "HTTP 503".to_string()
                }
            ),
            "failed (HTTP 503)"
        );
    }

    #[test]
    fn test_only_failed_is_failure() {
        assert!(SeedOutcome::Failed {
            error: String::new()
        }
        .is_failure());
        assert!(!SeedOutcome::Exhausted.is_failure());
        assert!(!SeedOutcome::CapReached.is_failure());
        assert!(!SeedOutcome::Cancelled.is_failure());
        assert!(!SeedOutcome::Skipped.is_failure());
    }
}
