//! Search results extraction.

use scraper::Html;
use tracing::debug;

use super::{first_text, text_of};
use crate::selectors::search as sel;
use crate::types::{ProductSummary, valid_asin};

/// One record per result card. A card without a catalog identifier or a
/// price is dropped rather than emitted with placeholders.
pub fn search_results(html: &str) -> Vec<ProductSummary> {
    let doc = Html::parse_document(html);
    let mut results = Vec::new();

    for card in doc.select(&sel::RESULT) {
        let asin = card
            .value()
            .attr(sel::ASIN_ATTR)
            .map(str::trim)
            .filter(|a| valid_asin(a));
        let Some(asin) = asin else {
            debug!("Dropping result card without a catalog identifier");
            continue;
        };
        let Some(price) = first_text(card, &sel::PRICE) else {
            debug!("Dropping result card {} without a price", asin);
            continue;
        };

        results.push(ProductSummary {
            asin: asin.to_string(),
            title: first_text(card, &sel::TITLE).unwrap_or_default(),
            price,
            prime: card.select(&sel::PRIME_BADGE).next().is_some(),
            sponsored: text_of(card).contains(sel::SPONSORED_TEXT),
        });
    }

    results
}
