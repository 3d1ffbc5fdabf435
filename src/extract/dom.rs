//! Small DOM access helpers over `scraper`
//!
//! Fallback chains are ordered lists of CSS selectors tried one after the
//! other; the first selector yielding a non-empty result wins.

use crate::extract::fields::clean_title;
use scraper::{ElementRef, Selector};

/// An ordered list of selectors tried in sequence
#[derive(Debug)]
pub(crate) struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Compiles a chain; selectors that fail to parse are left out
    pub(crate) fn new(css: &[&str]) -> Self {
        let selectors = css
            .iter()
            .filter_map(|c| match Selector::parse(c) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    tracing::error!("Invalid selector {:?}: {:?}", c, e);
                    None
                }
            })
            .collect();

        Self { selectors }
    }

    pub(crate) fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Returns the first non-empty element text along the chain
    pub(crate) fn first_text(&self, root: ElementRef<'_>) -> Option<String> {
        self.selectors.iter().find_map(|selector| {
            root.select(selector)
                .map(element_text)
                .find(|text| !text.is_empty())
        })
    }

    /// Returns the first non-empty attribute value along the chain
    pub(crate) fn first_attr(&self, root: ElementRef<'_>, attr: &str) -> Option<String> {
        self.selectors.iter().find_map(|selector| {
            root.select(selector)
                .filter_map(|el| el.value().attr(attr))
                .map(str::trim)
                .find(|value| !value.is_empty())
                .map(str::to_string)
        })
    }

    /// Returns the texts of every element matched by the first selector that
    /// matches anything with text
    pub(crate) fn all_texts(&self, root: ElementRef<'_>) -> Vec<String> {
        self.selectors
            .iter()
            .map(|selector| {
                root.select(selector)
                    .map(element_text)
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
            })
            .find(|texts| !texts.is_empty())
            .unwrap_or_default()
    }
}

/// Visible text of an element
///
/// Text nodes are trimmed, joined with single spaces, and cleaned of the
/// "New Listing" badge.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let joined = element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    clean_title(&joined)
}

/// Maps an empty string to `None`
pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
