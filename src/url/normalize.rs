use crate::UrlError;
use regex::Regex;
use std::sync::LazyLock;
use url::{form_urlencoded, Url};

/// Query parameter holding the 1-based results page number
pub const PAGE_PARAM: &str = "_pgn";

/// Query parameter holding the number of results per page
pub const PAGE_SIZE_PARAM: &str = "_ipg";

/// Results per page requested when the seed URL does not say
pub const DEFAULT_PAGE_SIZE: u32 = 60;

/// Prefix (case-insensitive) of volatile telemetry parameters
const TELEMETRY_PREFIX: &str = "rt";

static ITEM_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d{9,})\b").expect("valid item number regex"));

/// Builds the search URL for a keyword on the given base domain
///
/// # Examples
///
/// ```
/// use ebay_scraper::url::keyword_to_url;
///
/// let url = keyword_to_url("https://www.ebay.com", "desk lamp");
/// assert_eq!(url, "https://www.ebay.com/sch/i.html?_nkw=desk+lamp");
/// ```
pub fn keyword_to_url(base: &str, keyword: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(keyword.as_bytes()).collect();
    format!("{}/sch/i.html?_nkw={}", base.trim_end_matches('/'), encoded)
}

/// Normalizes a search URL so that pagination is explicit
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or not HTTP(S)
/// 2. Keep the first value of each query parameter, drop blank values
/// 3. Default `_pgn` to 1 and `_ipg` to 60 when absent
/// 4. Remove every parameter whose name starts with `rt` (any case)
///
/// Parameter order is otherwise preserved. Applying the function to its own
/// output returns the same URL.
///
/// # Examples
///
/// ```
/// use ebay_scraper::url::normalize_search_url;
///
/// let url = normalize_search_url("https://www.ebay.com/sch/i.html?_nkw=lamp&rt=nc").unwrap();
/// assert_eq!(url.as_str(), "https://www.ebay.com/sch/i.html?_nkw=lamp&_pgn=1&_ipg=60");
/// ```
pub fn normalize_search_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    let mut params = query_params(&url);

    if !has_param(&params, PAGE_PARAM) {
        params.push((PAGE_PARAM.to_string(), "1".to_string()));
    }
    if !has_param(&params, PAGE_SIZE_PARAM) {
        params.push((PAGE_SIZE_PARAM.to_string(), DEFAULT_PAGE_SIZE.to_string()));
    }

    params.retain(|(key, _)| !is_telemetry_param(key));

    write_query(&mut url, &params);
    Ok(url)
}

/// Returns a copy of `url` pointing at results page `page`
///
/// The `_pgn` parameter keeps its position if present, otherwise it is
/// appended.
pub fn set_page(url: &Url, page: u32) -> Url {
    let mut params = query_params(url);
    let value = page.to_string();

    match params.iter_mut().find(|(key, _)| key == PAGE_PARAM) {
        Some((_, existing)) => *existing = value,
        None => params.push((PAGE_PARAM.to_string(), value)),
    }

    let mut paged = url.clone();
    write_query(&mut paged, &params);
    paged
}

/// Extracts the eBay item number from a listing URL
///
/// The item number is the first run of nine or more digits directly after a
/// path separator.
pub fn item_number_from_url(url: &str) -> Option<String> {
    ITEM_NUMBER_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Collects query parameters: first value per key, blank values dropped
fn query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();

    for (key, value) in url.query_pairs() {
        if value.is_empty() || has_param(&params, &key) {
            continue;
        }
        params.push((key.into_owned(), value.into_owned()));
    }

    params
}

fn has_param(params: &[(String, String)], name: &str) -> bool {
    params.iter().any(|(key, _)| key == name)
}

/// Checks if a query parameter is volatile telemetry
fn is_telemetry_param(key: &str) -> bool {
    key.get(..TELEMETRY_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(TELEMETRY_PREFIX))
}

fn write_query(url: &mut Url, params: &[(String, String)]) {
    url.set_query(None);
    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
}
