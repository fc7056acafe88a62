//! Add-to-cart confirmation extraction.

use scraper::Html;

use super::text_of;
use crate::selectors::atc as sel;
use crate::types::AddToCartResult;

/// Judge an add-to-cart confirmation element solely by its text: success is
/// one of the fixed acceptance phrases, anything else is a failure with the
/// observed text preserved for diagnosis.
pub fn confirmation(html: &str) -> AddToCartResult {
    let doc = Html::parse_document(html);
    let observed = text_of(doc.root_element());
    let lowered = observed.to_lowercase();

    AddToCartResult {
        added: sel::ACCEPTANCE_PHRASES
            .iter()
            .any(|phrase| lowered.contains(phrase)),
        confirmation: observed,
    }
}
