//! The listing record produced for every search-result card

use crate::extract::DetailFields;
use serde::Serialize;
use std::borrow::Cow;

/// Serialized field names, in output order
pub const FIELD_NAMES: [&str; 21] = [
    "url",
    "categories",
    "itemNumber",
    "title",
    "subTitle",
    "whyToBuy",
    "price",
    "priceWithCurrency",
    "wasPrice",
    "wasPriceWithCurrency",
    "available",
    "availableText",
    "sold",
    "image",
    "seller",
    "itemLocation",
    "brand",
    "ean",
    "upc",
    "mpn",
    "type",
];

/// One flat listing record
///
/// Every field is optional. A field is `None` when the page did not carry
/// the information; no field is ever filled with a placeholder default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub url: Option<String>,
    pub categories: Option<Vec<String>>,
    pub item_number: Option<String>,
    pub title: Option<String>,
    pub sub_title: Option<String>,
    pub why_to_buy: Option<Vec<String>>,
    pub price: Option<f64>,
    pub price_with_currency: Option<String>,
    pub was_price: Option<f64>,
    pub was_price_with_currency: Option<String>,
    pub available: Option<u32>,
    pub available_text: Option<String>,
    pub sold: Option<u32>,
    pub image: Option<String>,
    pub seller: Option<String>,
    pub item_location: Option<String>,
    pub brand: Option<String>,
    pub ean: Option<String>,
    pub upc: Option<String>,
    pub mpn: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
}

/// A single field value, flattened for tabular exporters
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Text(Cow<'a, str>),
    List(&'a [String]),
}

impl FieldValue<'_> {
    /// Cell text: lists joined with `separator`, missing values empty
    pub fn to_cell(&self, separator: &str) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Text(text) => text.to_string(),
            Self::List(values) => values.join(separator),
        }
    }
}

impl ListingRecord {
    /// Returns true if the card yielded neither a title nor a URL
    pub fn is_placeholder(&self) -> bool {
        self.title.is_none() && self.url.is_none()
    }

    /// Field values paired with their serialized names, in output order
    pub fn fields(&self) -> [(&'static str, FieldValue<'_>); 21] {
        let values = [
            text(&self.url),
            list(&self.categories),
            text(&self.item_number),
            text(&self.title),
            text(&self.sub_title),
            list(&self.why_to_buy),
            float(self.price),
            text(&self.price_with_currency),
            float(self.was_price),
            text(&self.was_price_with_currency),
            count(self.available),
            text(&self.available_text),
            count(self.sold),
            text(&self.image),
            text(&self.seller),
            text(&self.item_location),
            text(&self.brand),
            text(&self.ean),
            text(&self.upc),
            text(&self.mpn),
            text(&self.product_type),
        ];

        let mut names = FIELD_NAMES.into_iter();
        values.map(|value| (names.next().unwrap_or_default(), value))
    }

    /// Applies detail-page fields to the record
    ///
    /// A field is only overwritten when the detail page produced a non-empty
    /// value, so enrichment never blanks out card data.
    pub fn merge_detail(&mut self, detail: DetailFields) {
        if !detail.categories.is_empty() {
            self.categories = Some(detail.categories);
        }

        overwrite(&mut self.seller, detail.seller);
        overwrite(&mut self.item_location, detail.item_location);
        overwrite(&mut self.brand, detail.brand);
        overwrite(&mut self.upc, detail.upc);
        overwrite(&mut self.ean, detail.ean);
        overwrite(&mut self.mpn, detail.mpn);
        overwrite(&mut self.product_type, detail.product_type);
    }
}

fn overwrite(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        *slot = Some(value);
    }
}

fn text(value: &Option<String>) -> FieldValue<'_> {
    match value {
        Some(v) => FieldValue::Text(Cow::Borrowed(v.as_str())),
        None => FieldValue::Missing,
    }
}

fn list(value: &Option<Vec<String>>) -> FieldValue<'_> {
    match value {
        Some(v) => FieldValue::List(v.as_slice()),
        None => FieldValue::Missing,
    }
}

fn float(value: Option<f64>) -> FieldValue<'static> {
    match value {
        // Whole amounts keep one decimal, as in the JSON output
        Some(v) if v.fract() == 0.0 => FieldValue::Text(Cow::Owned(format!("{:.1}", v))),
        Some(v) => FieldValue::Text(Cow::Owned(v.to_string())),
        None => FieldValue::Missing,
    }
}

fn count(value: Option<u32>) -> FieldValue<'static> {
    match value {
        Some(v) => FieldValue::Text(Cow::Owned(v.to_string())),
        None => FieldValue::Missing,
    }
}
