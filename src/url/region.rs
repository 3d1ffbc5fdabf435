/// Market code to eBay base URL
///
/// The first entry is the fallback for unknown codes.
pub const REGION_DOMAINS: &[(&str, &str)] = &[
    ("US", "https://www.ebay.com"),
    ("UK", "https://www.ebay.co.uk"),
    ("DE", "https://www.ebay.de"),
    ("AU", "https://www.ebay.com.au"),
    ("CA", "https://www.ebay.ca"),
    ("IN", "https://www.ebay.in"),
    ("FR", "https://www.ebay.fr"),
    ("IT", "https://www.ebay.it"),
    ("ES", "https://www.ebay.es"),
    // ebay.nl redirects to the Belgian Dutch-language site
    ("NL", "https://www.benl.ebay.be"),
];

/// Returns the base URL for a two-letter market code
///
/// Lookup is case-insensitive and ignores surrounding whitespace. Unknown
/// codes fall back to the US domain.
///
/// # Examples
///
/// ```
/// use ebay_scraper::url::base_url_for_region;
///
/// assert_eq!(base_url_for_region("de"), "https://www.ebay.de");
/// assert_eq!(base_url_for_region("ZZ"), "https://www.ebay.com");
/// ```
pub fn base_url_for_region(code: &str) -> &'static str {
    let code = code.trim();
    REGION_DOMAINS
        .iter()
        .find(|(region, _)| region.eq_ignore_ascii_case(code))
        .map(|(_, base)| *base)
        .unwrap_or(REGION_DOMAINS[0].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_regions() {
        assert_eq!(base_url_for_region("US"), "https://www.ebay.com");
        assert_eq!(base_url_for_region("UK"), "https://www.ebay.co.uk");
        assert_eq!(base_url_for_region("AU"), "https://www.ebay.com.au");
        assert_eq!(base_url_for_region("NL"), "https://www.benl.ebay.be");
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(base_url_for_region("fr"), "https://www.ebay.fr");
        assert_eq!(base_url_for_region(" It "), "https://www.ebay.it");
    }

    #[test]
    fn test_unknown_region_falls_back_to_us() {
        assert_eq!(base_url_for_region("JP"), "https://www.ebay.com");
        assert_eq!(base_url_for_region(""), "https://www.ebay.com");
        assert_eq!(base_url_for_region("GB"), "https://www.ebay.com");
    }

    #[test]
    fn test_table_has_ten_markets() {
        assert_eq!(REGION_DOMAINS.len(), 10);
        assert_eq!(REGION_DOMAINS[0].0, "US");
    }
}
