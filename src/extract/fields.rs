//! Free-text field parsers
//!
//! Pure functions shared by the card extractor and the detail page parser.
//! None of them fail: text that does not contain what they look for yields
//! `None`.

use regex::Regex;
use std::sync::LazyLock;

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(US\s*\$|\$|€|£|AUD|\bUSD\b|\bEUR\b|\bGBP\b|\bCAD\b|\bINR\b)")
        .expect("valid currency regex")
});
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d{1,2})?").expect("valid price regex"));
static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,6}").expect("valid count regex"));
static NEW_LISTING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNew Listing\b").expect("valid boilerplate regex"));

/// Extracts a numeric price and its currency token from display text
///
/// The currency is the leftmost token of the recognized set
/// (`US $`, `$`, `€`, `£`, `AUD`, `USD`, `EUR`, `GBP`, `CAD`, `INR`).
/// Thousands separators are stripped before the first `\d+(\.\d{1,2})?`
/// number is read.
///
/// # Examples
///
/// ```
/// use ebay_scraper::extract::parse_price;
///
/// assert_eq!(parse_price("US $39.00"), (Some(39.0), Some("US $".to_string())));
/// assert_eq!(parse_price("EUR 12,345.67"), (Some(12345.67), Some("EUR".to_string())));
/// assert_eq!(parse_price(""), (None, None));
/// ```
pub fn parse_price(text: &str) -> (Option<f64>, Option<String>) {
    if text.is_empty() {
        return (None, None);
    }

    let currency = CURRENCY_RE
        .find(text)
        .map(|m| m.as_str().trim().to_string());

    let digits = text.replace(',', "");
    let value = PRICE_RE
        .find(&digits)
        .and_then(|m| m.as_str().parse::<f64>().ok());

    (value, currency)
}

/// Returns the first run of one to six digits as an integer
///
/// Thousands separators are stripped first, so `"1,234 sold"` yields 1234.
pub fn extract_count(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }

    let digits = text.replace(',', "");
    COUNT_RE
        .find(&digits)
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Collapses whitespace runs to a single space and trims both ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes the "New Listing" badge text and normalizes whitespace
pub fn clean_title(text: &str) -> String {
    normalize_whitespace(&NEW_LISTING_RE.replace_all(text, ""))
}
