//! Markup-to-record extraction.
//!
//! Every extractor takes raw markup and emits the typed records of the
//! public API. Extraction never touches a browser, so the whole layer runs
//! identically against live page content and captured snapshots.

pub mod atc;
pub mod cart;
pub mod orders;
pub mod product;
pub mod search;

use scraper::{ElementRef, Selector};

use crate::types::valid_asin;

/// Element text with whitespace collapsed to single spaces.
pub(crate) fn text_of(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first match under `element`, if non-empty.
pub(crate) fn first_text(element: ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(text_of)
        .filter(|s| !s.is_empty())
}

/// Attribute of the first match under `element`.
pub(crate) fn first_attr(element: ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(str::to_string)
}

/// Pull a catalog identifier out of a product link.
pub(crate) fn asin_from_href(href: &str) -> Option<String> {
    for token in ["/dp/", "/gp/product/"] {
        if let Some(idx) = href.find(token) {
            let code: String = href[idx + token.len()..].chars().take(10).collect();
            if valid_asin(&code) {
                return Some(code);
            }
        }
    }
    None
}
