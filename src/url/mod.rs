//! URL handling module for ebay-scraper
//!
//! This module provides the market→domain table, keyword search URL
//! construction, search URL normalization and pagination, and item number
//! extraction from listing URLs.

mod normalize;
mod region;

// Re-export main functions
pub use normalize::{
    item_number_from_url, keyword_to_url, normalize_search_url, set_page, DEFAULT_PAGE_SIZE,
    PAGE_PARAM, PAGE_SIZE_PARAM,
};
pub use region::{base_url_for_region, REGION_DOMAINS};

use crate::config::SeedInput;

/// Resolves the seed input into the ordered list of search URLs to crawl
///
/// Explicit URLs come first, then one search URL per keyword, both in input
/// order. Blank entries are skipped.
///
/// # Examples
///
/// ```
/// use ebay_scraper::config::SeedInput;
/// use ebay_scraper::url::resolve_search_urls;
///
/// let input = SeedInput {
///     urls: vec!["https://www.ebay.com/sch/i.html?_nkw=fan".to_string()],
///     keywords: vec!["lamp".to_string()],
/// };
/// let urls = resolve_search_urls(&input, "UK");
/// assert_eq!(urls[1], "https://www.ebay.co.uk/sch/i.html?_nkw=lamp");
/// ```
pub fn resolve_search_urls(input: &SeedInput, region: &str) -> Vec<String> {
    let base = base_url_for_region(region);

    input
        .urls()
        .map(str::to_string)
        .chain(input.keywords().map(|kw| keyword_to_url(base, kw)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_before_keywords() {
        let input = SeedInput {
            urls: vec![
                "https://www.ebay.com/sch/i.html?_nkw=a".to_string(),
                " ".to_string(),
            ],
            keywords: vec!["b".to_string(), "c d".to_string()],
        };

        let urls = resolve_search_urls(&input, "US");
        assert_eq!(
            urls,
            vec![
                "https://www.ebay.com/sch/i.html?_nkw=a",
                "https://www.ebay.com/sch/i.html?_nkw=b",
                "https://www.ebay.com/sch/i.html?_nkw=c+d",
            ]
        );
    }

    #[test]
    fn test_unknown_region_uses_us_domain() {
        let input = SeedInput {
            urls: vec![],
            keywords: vec!["lamp".to_string()],
        };
        let urls = resolve_search_urls(&input, "XX");
        assert_eq!(urls, vec!["https://www.ebay.com/sch/i.html?_nkw=lamp"]);
    }
}
