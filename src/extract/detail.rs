//! Item detail page parsing
//!
//! Detail pages carry fields the search card does not: category
//! breadcrumbs, seller, item location and the item-specifics table
//! (brand, UPC, EAN, MPN, type). The markup varies a lot between listing
//! templates, so every field is looked up through several strategies.

use crate::extract::dom::{element_text, non_empty, SelectorChain};
use crate::extract::fields::normalize_whitespace;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

// Comma groups keep document order across alternate layouts
static BREADCRUMBS: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&["#vi-VR-brumb-lnkLst a, nav.breadcrumbs a"]));
static SELLER: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&[
        "#RightSummaryPanel .ux-seller-section__item--seller a",
        ".x-about-this-seller__about-seller-info a",
    ])
});
static LOCATION: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&[
        "#itemLocation",
        ".ux-layout-section__textual-display .ux-textspans",
    ])
});
static BRAND_META: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&[
        r#"meta[property="og:brand"], meta[name="og:brand"]"#,
        r#"meta[property="product:brand"], meta[name="product:brand"]"#,
    ])
});
static ARIA_LABELLED: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&["[aria-label]"]));
static SPECIFICS_ROW: LazyLock<SelectorChain> =
    LazyLock::new(|| SelectorChain::new(&["div.ux-layout-section-evo__row"]));
static SPECIFICS_CELL: LazyLock<SelectorChain> = LazyLock::new(|| {
    SelectorChain::new(&[".ux-labels-values__labels, .ux-labels-values__values"])
});

static LOCATION_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)item location\s*:?").expect("valid location label regex"));

/// Fields read from an item detail page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailFields {
    pub categories: Vec<String>,
    pub seller: Option<String>,
    pub item_location: Option<String>,
    pub brand: Option<String>,
    pub upc: Option<String>,
    pub ean: Option<String>,
    pub mpn: Option<String>,
    pub product_type: Option<String>,
}

impl DetailFields {
    /// Returns true if the page yielded nothing usable
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parses an item detail page
pub fn parse_detail_page(html: &str) -> DetailFields {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let brand = BRAND_META
        .first_attr(root, "content")
        .and_then(|b| non_empty(normalize_whitespace(&b)))
        .or_else(|| find_specific(root, &["Brand"]));

    DetailFields {
        categories: BREADCRUMBS.all_texts(root),
        seller: SELLER.first_text(root),
        item_location: LOCATION
            .first_text(root)
            .or_else(|| labelled_location(root)),
        brand,
        upc: find_specific(root, &["UPC"]),
        ean: find_specific(root, &["EAN"]),
        mpn: find_specific(root, &["MPN"]),
        product_type: find_specific(root, &["Type", "Product Type"]),
    }
}

/// Looks up an item-specifics value by label
///
/// Strategies, in order:
///
/// 1. For each key, a text node starting with the key as a whole word
///    (case-insensitive); the value is the next element sibling of the text
///    node's parent. Failing that, an element whose `aria-label` contains
///    the key.
/// 2. The label/value grid: the first row whose label cell contains any key
///    as a whole word yields its value cell.
pub fn find_specific(root: ElementRef<'_>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = labelled_sibling(root, key).or_else(|| aria_labelled(root, key)) {
            return Some(value);
        }
    }

    let value = specifics_grid(root, keys);
    if value.is_some() {
        tracing::trace!("Item specific {:?} found in label grid", keys);
    }
    value
}

fn labelled_sibling(root: ElementRef<'_>, key: &str) -> Option<String> {
    let key = key.to_lowercase();

    root.descendants()
        .filter(|node| {
            node.value()
                .as_text()
                .is_some_and(|text| starts_with_word(&text.trim_start().to_lowercase(), &key))
        })
        .filter_map(|node| node.parent().and_then(ElementRef::wrap))
        .find_map(|parent| {
            let sibling = parent.next_siblings().find_map(ElementRef::wrap)?;
            non_empty(element_text(sibling))
        })
}

fn aria_labelled(root: ElementRef<'_>, key: &str) -> Option<String> {
    let selector = ARIA_LABELLED.selectors().first()?;
    let key = key.to_lowercase();

    root.select(selector)
        .filter(|el| {
            el.value()
                .attr("aria-label")
                .is_some_and(|label| label.to_lowercase().contains(&key))
        })
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn specifics_grid(root: ElementRef<'_>, keys: &[&str]) -> Option<String> {
    let row_selector = SPECIFICS_ROW.selectors().first()?;
    let cell_selector = SPECIFICS_CELL.selectors().first()?;
    let keys: Vec<String> = keys.iter().map(|key| key.to_lowercase()).collect();

    root.select(row_selector).find_map(|row| {
        let cells: Vec<String> = row.select(cell_selector).map(element_text).collect();
        let (label, value) = (cells.first()?, cells.get(1)?);

        let label = label.to_lowercase();
        if keys.iter().any(|key| contains_word(&label, key)) {
            non_empty(value.clone())
        } else {
            None
        }
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True if `text` begins with `word` and the word ends there
fn starts_with_word(text: &str, word: &str) -> bool {
    !word.is_empty()
        && text
            .strip_prefix(word)
            .is_some_and(|rest| !rest.starts_with(is_word_char))
}

/// True if `word` occurs in `text` between word boundaries
fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }

    text.match_indices(word).any(|(start, found)| {
        let before = text[..start].chars().next_back();
        let after = text[start + found.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Falls back to a free-text "Item location" label anywhere on the page
fn labelled_location(root: ElementRef<'_>) -> Option<String> {
    root.descendants()
        .filter_map(|node| {
            let text: &str = node.value().as_text()?;
            let label = LOCATION_LABEL_RE.find(text)?;
            Some((node, text[label.end()..].to_string()))
        })
        .find_map(|(node, rest)| {
            let inline = normalize_whitespace(&rest);
            if !inline.is_empty() {
                return Some(inline);
            }

            let parent = node.parent().and_then(ElementRef::wrap)?;
            let sibling = parent.next_siblings().find_map(ElementRef::wrap)?;
            non_empty(element_text(sibling))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"
        <html><head>
          <meta property="og:brand" content=" Acme  Lighting ">
        </head><body>
          <nav class="breadcrumbs">
            <a>Home &amp; Garden</a><a> </a><a>Lamps   &amp; Lighting</a>
          </nav>
          <div id="RightSummaryPanel">
            <div class="ux-seller-section__item--seller"><a><span>brass-house</span></a></div>
          </div>
          <div class="ux-layout-section__textual-display">
            <span class="ux-textspans">Located in: Berlin, Germany</span>
          </div>
          <div class="ux-layout-section-evo__row">
            <div class="ux-labels-values__labels"><span>UPC</span></div>
            <div class="ux-labels-values__values"><span>012345678905</span></div>
          </div>
          <div class="ux-layout-section-evo__row">
            <div class="ux-labels-values__labels"><span>Item Type:</span></div>
            <div class="ux-labels-values__values"><span>Desk Lamp</span></div>
          </div>
          <dl>
            <dt>MPN</dt>
            <dd>AL-100</dd>
          </dl>
          <button aria-label="EAN code">4006381333931</button>
        </body></html>
    "#;

    #[test]
    fn test_parse_detail_page() {
        let detail = parse_detail_page(DETAIL);

        assert_eq!(
            detail.categories,
            vec!["Home & Garden".to_string(), "Lamps & Lighting".to_string()]
        );
        assert_eq!(detail.seller.as_deref(), Some("brass-house"));
        assert_eq!(
            detail.item_location.as_deref(),
            Some("Located in: Berlin, Germany")
        );
        assert_eq!(detail.brand.as_deref(), Some("Acme Lighting"));
    }

    #[test]
    fn test_specifics_strategies() {
        let detail = parse_detail_page(DETAIL);

        // Text node label followed by a sibling element
        assert_eq!(detail.mpn.as_deref(), Some("AL-100"));
        // aria-label match
        assert_eq!(detail.ean.as_deref(), Some("4006381333931"));
        // Label/value grid
        assert_eq!(detail.upc.as_deref(), Some("012345678905"));
        assert_eq!(detail.product_type.as_deref(), Some("Desk Lamp"));
    }

    #[test]
    fn test_brand_from_specifics_when_no_meta() {
        let html = r#"<div><span>Brand</span><span>Sunbeam</span></div>"#;
        let detail = parse_detail_page(html);
        assert_eq!(detail.brand.as_deref(), Some("Sunbeam"));
    }

    #[test]
    fn test_label_must_be_whole_word() {
        let html = r#"<div><span>Brandname</span><span>Wrong</span></div>"#;
        let detail = parse_detail_page(html);
        assert_eq!(detail.brand, None);
    }

    #[test]
    fn test_item_location_text_fallback() {
        let html = r#"<div><span>Item location:</span><span>Leeds, United Kingdom</span></div>"#;
        let detail = parse_detail_page(html);
        assert_eq!(
            detail.item_location.as_deref(),
            Some("Leeds, United Kingdom")
        );

        let inline = r#"<p>Item Location: Lyon, France</p>"#;
        assert_eq!(
            parse_detail_page(inline).item_location.as_deref(),
            Some("Lyon, France")
        );
    }

    #[test]
    fn test_find_specific_key_order() {
        let html = r#"
            <div><span>Product Type</span><span>Floor lamp</span></div>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(
            find_specific(document.root_element(), &["Type", "Product Type"]),
            Some("Floor lamp".to_string())
        );
        assert_eq!(find_specific(document.root_element(), &["Color"]), None);
    }

    #[test]
    fn test_empty_page() {
        let detail = parse_detail_page("<html><body></body></html>");
        assert!(detail.is_empty());
    }

    #[test]
    fn test_word_matching() {
        assert!(starts_with_word("mpn: al-100", "mpn"));
        assert!(starts_with_word("mpn", "mpn"));
        assert!(!starts_with_word("mpns", "mpn"));
        assert!(!starts_with_word("", "mpn"));

        assert!(contains_word("product type", "type"));
        assert!(contains_word("type:", "type"));
        assert!(!contains_word("prototype", "type"));
        assert!(!contains_word("types", "type"));
        assert!(contains_word("types, type", "type"));
        assert!(!contains_word("anything", ""));
    }
}
