//! Search-result card extraction

use crate::extract::dom::{non_empty, SelectorChain};
use crate::extract::fields::{extract_count, normalize_whitespace, parse_price};
use crate::record::ListingRecord;
use crate::url::item_number_from_url;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

static CARDS: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&["ul.srp-results li.s-item", "li.s-item"]));

static TITLE: LazyLock<SelectorChain> = LazyLock::new(|| SelectorChain::new(&["h3.s-item__title"]));
static TITLE_IMAGE: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&["img.s-item__image-img[alt]"]));
static LINK: LazyLock<SelectorChain> = LazyLock::new(|| SelectorChain::new(&["a.s-item__link"]));
static PRICE: LazyLock<SelectorChain> = LazyLock::new(|| SelectorChain::new(&[".s-item__price"]));
static WAS_PRICE: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&[".s-item__dynamic .STRIKETHROUGH", ".s-item__wasPrice"])
});
static AVAILABLE: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&[".s-item__availability", ".s-item__quantity"]));
static SOLD: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&[".s-item__hotness", ".s-item__quantitySold"]));
static IMAGE: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&["img.s-item__image-img"]));
static SELLER: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&[".s-item__seller-info-text a"]));
static LOCATION: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&[".s-item__location.s-item__itemLocation"]));
static SUBTITLE: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&[".s-item__subtitle"]));
// One comma group so badges come out in document order
static BADGES: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&[
        ".s-item__dynamic .s-item__freeReturns, .s-item__dynamic .s-item__shipping, .s-item__dynamic .s-item__hotness",
    ])
});

/// Parses a search-results page into one record per result card
///
/// Cards are selected with `ul.srp-results li.s-item`, falling back to any
/// `li.s-item` when the results list is laid out differently. An empty
/// vector means the page has no more results.
pub fn parse_search_page(html: &str) -> Vec<ListingRecord> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    select_cards(root).into_iter().map(extract_listing).collect()
}

/// Selects result-card elements, trying each card selector in turn
pub fn select_cards(root: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    for (attempt, selector) in CARDS.selectors().iter().enumerate() {
        let cards: Vec<_> = root.select(selector).collect();
        if !cards.is_empty() {
            if attempt > 0 {
                tracing::trace!("Card selector fallback #{} matched {} cards", attempt, cards.len());
            }
            return cards;
        }
    }

    Vec::new()
}

/// Builds a record from one result card
///
/// Never fails: fields missing from the card stay `None`.
pub fn extract_listing(card: ElementRef<'_>) -> ListingRecord {
    let mut record = ListingRecord::default();

    record.title = TITLE.first_text(card).or_else(|| {
        let alt = TITLE_IMAGE.first_attr(card, "alt")?;
        tracing::trace!("Title taken from image alt text");
        non_empty(normalize_whitespace(&alt))
    });

    record.url = LINK.first_attr(card, "href");
    record.item_number = record.url.as_deref().and_then(item_number_from_url);

    if let Some(text) = PRICE.first_text(card) {
        let (value, currency) = parse_price(&text);
        record.price = value;
        record.price_with_currency = display_price(text, value, currency);
    }

    if let Some(text) = WAS_PRICE.first_text(card) {
        let (value, currency) = parse_price(&text);
        record.was_price = value;
        record.was_price_with_currency = display_price(text, value, currency);
    }

    if let Some(text) = AVAILABLE.first_text(card) {
        record.available = extract_count(&text);
        record.available_text = Some(text);
    }

    record.sold = SOLD.first_text(card).and_then(|text| extract_count(&text));
    record.image = image_source(card);
    record.seller = SELLER.first_text(card);
    record.item_location = LOCATION.first_text(card);
    record.sub_title = SUBTITLE.first_text(card);

    let badges = BADGES.all_texts(card);
    if !badges.is_empty() {
        record.why_to_buy = Some(badges);
    }

    record
}

/// Display text when present, else `"<currency> <value>"` when both parsed
fn display_price(text: String, value: Option<f64>, currency: Option<String>) -> Option<String> {
    if !text.is_empty() {
        return Some(text);
    }

    match (currency, value) {
        (Some(currency), Some(value)) => Some(format!("{} {}", currency, value)),
        _ => None,
    }
}

/// Image URL, preferring the lazy-load source over a placeholder gif
fn image_source(card: ElementRef<'_>) -> Option<String> {
    let selector = IMAGE.selectors().first()?;
    let img = card.select(selector).next()?;

    let src = img.value().attr("src").map(str::trim).unwrap_or_default();
    let lazy = img
        .value()
        .attr("data-src")
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match lazy {
        Some(lazy) if src.is_empty() || src.contains("gif") => Some(lazy.to_string()),
        _ => non_empty(src.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <ul class="srp-results">
          <li class="s-item">
            <a class="s-item__link" href=" https://www.ebay.com/itm/325678901234?hash=x ">
              <h3 class="s-item__title"><span>New Listing</span> Vintage   Brass Lamp</h3>
            </a>
            <img class="s-item__image-img" src="https://ir.ebaystatic.com/s.gif"
                 data-src="https://i.ebayimg.com/images/lamp.jpg" alt="Vintage Brass Lamp">
            <div class="s-item__subtitle">Pre-Owned</div>
            <span class="s-item__price">$10.00 sold</span>
            <div class="s-item__dynamic">
              <span class="STRIKETHROUGH">US $15.00</span>
              <span class="s-item__shipping">Free shipping</span>
              <span class="s-item__freeReturns">Free returns</span>
              <span class="s-item__hotness">1,234 sold</span>
            </div>
            <span class="s-item__availability">More than 10 available</span>
            <span class="s-item__seller-info-text"><a>lamp-store</a> (99.1%)</span>
            <span class="s-item__location s-item__itemLocation">from Germany</span>
          </li>
          <li class="s-item">
            <a class="s-item__link" href="https://www.ebay.com/itm/Desk-Fan/1234567890"></a>
            <img class="s-item__image-img" src="https://i.ebayimg.com/images/fan.jpg" alt="Desk Fan">
          </li>
        </ul>
        </body></html>
    "#;

    #[test]
    fn test_parse_search_page_extracts_all_fields() {
        let records = parse_search_page(PAGE);
        assert_eq!(records.len(), 2);

        let lamp = &records[0];
        assert_eq!(lamp.title.as_deref(), Some("Vintage Brass Lamp"));
        assert_eq!(
            lamp.url.as_deref(),
            Some("https://www.ebay.com/itm/325678901234?hash=x")
        );
        assert_eq!(lamp.item_number.as_deref(), Some("325678901234"));
        assert_eq!(lamp.price, Some(10.0));
        assert_eq!(lamp.price_with_currency.as_deref(), Some("$10.00 sold"));
        assert_eq!(lamp.was_price, Some(15.0));
        assert_eq!(lamp.was_price_with_currency.as_deref(), Some("US $15.00"));
        assert_eq!(lamp.available, Some(10));
        assert_eq!(lamp.available_text.as_deref(), Some("More than 10 available"));
        assert_eq!(lamp.sold, Some(1234));
        assert_eq!(
            lamp.image.as_deref(),
            Some("https://i.ebayimg.com/images/lamp.jpg")
        );
        assert_eq!(lamp.seller.as_deref(), Some("lamp-store"));
        assert_eq!(lamp.item_location.as_deref(), Some("from Germany"));
        assert_eq!(lamp.sub_title.as_deref(), Some("Pre-Owned"));
        assert_eq!(
            lamp.why_to_buy,
            Some(vec![
                "Free shipping".to_string(),
                "Free returns".to_string(),
                "1,234 sold".to_string(),
            ])
        );
    }

    #[test]
    fn test_missing_fields_stay_none() {
        let records = parse_search_page(PAGE);
        let fan = &records[1];

        // No h3 title, so the image alt text is used
        assert_eq!(fan.title.as_deref(), Some("Desk Fan"));
        assert_eq!(fan.item_number.as_deref(), Some("1234567890"));
        assert_eq!(fan.price, None);
        assert_eq!(fan.price_with_currency, None);
        assert_eq!(fan.available, None);
        assert_eq!(fan.available_text, None);
        assert_eq!(fan.sold, None);
        assert_eq!(fan.why_to_buy, None);
        assert_eq!(fan.image.as_deref(), Some("https://i.ebayimg.com/images/fan.jpg"));
    }

    #[test]
    fn test_fallback_card_selector() {
        let html = r#"<div><li class="s-item"><h3 class="s-item__title">Only card</h3></li></div>"#;
        let records = parse_search_page(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("Only card"));
    }

    #[test]
    fn test_no_cards() {
        assert!(parse_search_page("<html><body><p>No results</p></body></html>").is_empty());
        assert!(parse_search_page("").is_empty());
    }

    #[test]
    fn test_empty_card_is_placeholder() {
        let records = parse_search_page(r#"<ul class="srp-results"><li class="s-item"></li></ul>"#);
        assert_eq!(records.len(), 1);
        assert!(records[0].is_placeholder());
    }

    #[test]
    fn test_price_without_number_keeps_text() {
        let html = r#"<li class="s-item"><span class="s-item__price">See price</span></li>"#;
        let records = parse_search_page(html);
        assert_eq!(records[0].price, None);
        assert_eq!(records[0].price_with_currency.as_deref(), Some("See price"));
    }

    #[test]
    fn test_display_price_synthesized() {
        assert_eq!(
            display_price(String::new(), Some(3.5), Some("EUR".to_string())),
            Some("EUR 3.5".to_string())
        );
        assert_eq!(display_price(String::new(), Some(3.5), None), None);
    }
}
