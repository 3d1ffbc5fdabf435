//! DOM-to-record extraction
//!
//! This module turns fetched HTML into listing data:
//! - Result cards on a search page become [`ListingRecord`](crate::record::ListingRecord)s
//! - Item detail pages become [`DetailFields`] merged into those records
//! - Free-text prices and counts are parsed by the helpers in `fields`

mod card;
mod detail;
mod dom;
mod fields;

pub use card::{extract_listing, parse_search_page, select_cards};
pub use detail::{find_specific, parse_detail_page, DetailFields};
pub use fields::{clean_title, extract_count, normalize_whitespace, parse_price};
