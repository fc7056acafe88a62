//! Product detail extraction.

use anyhow::Result;
use scraper::Html;

use super::{first_attr, first_text};
use crate::errors::ShopprobeError;
use crate::selectors::product as sel;
use crate::types::{ProductDetail, ReviewSummary, valid_asin};

/// Extract a product detail page. The title is the structural anchor; its
/// absence means the markup is not a product page.
pub fn product_detail(html: &str, requested_asin: &str) -> Result<ProductDetail> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let title = first_text(root, &sel::TITLE).ok_or_else(|| ShopprobeError::ContentMissing {
        operation: "product".to_string(),
        marker: sel::TITLE_MARKER.to_string(),
    })?;

    let asin = first_attr(root, &sel::ASIN_INPUT, "value")
        .filter(|a| valid_asin(a))
        .unwrap_or_else(|| requested_asin.to_string());

    let rating = first_text(root, &sel::RATING).and_then(|t| parse_rating(&t));
    let count = first_text(root, &sel::REVIEW_COUNT).and_then(|t| parse_count(&t));

    Ok(ProductDetail {
        asin,
        title,
        price: first_text(root, &sel::PRICE),
        reviews: rating
            .zip(count)
            .map(|(rating, count)| ReviewSummary { rating, count }),
        subscribe_and_save: root.select(&sel::SUBSCRIBE).next().is_some(),
        image: first_attr(root, &sel::IMAGE, "src")
            .or_else(|| first_attr(root, &sel::IMAGE, "data-old-hires")),
    })
}

/// "4.3 out of 5 stars" -> 4.3
fn parse_rating(text: &str) -> Option<f32> {
    text.split_whitespace().next()?.parse().ok()
}

/// "1,234 ratings" -> 1234
fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DETAIL_PAGE: &str = r#"
        <div id="dp">
          <input type="hidden" name="ASIN" value="B0ABCDEF12">
          <span id="productTitle"> USB-C Cable, 2m, Braided </span>
          <div id="corePrice_feature_div">
            <span class="a-price"><span class="a-offscreen">$12.99</span></span>
          </div>
          <span id="acrPopover"><span class="a-icon-alt">4.6 out of 5 stars</span></span>
          <span id="acrCustomerReviewText">12,345 ratings</span>
          <div id="snsAccordionRowMiddle"></div>
          <img id="landingImage" src="https://img.example/cable.jpg">
        </div>"#;

    #[test]
    fn test_full_detail_page() {
        let detail = product_detail(DETAIL_PAGE, "B000000000").unwrap();

        assert_eq!(detail.asin, "B0ABCDEF12");
        assert_eq!(detail.title, "USB-C Cable, 2m, Braided");
        assert_eq!(detail.price, Some("$12.99".to_string()));
        assert_eq!(
            detail.reviews,
            Some(ReviewSummary {
                rating: 4.6,
                count: 12345
            })
        );
        assert!(detail.subscribe_and_save);
        assert_eq!(detail.image, Some("https://img.example/cable.jpg".to_string()));
    }

    #[test]
    fn test_missing_title_is_content_missing() {
        let err = product_detail("<div id='dp'></div>", "B0ABCDEF12").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ShopprobeError>(),
            Some(ShopprobeError::ContentMissing { .. })
        ));
    }

    #[test]
    fn test_requested_asin_backfills_missing_input() {
        let html = r#"<span id="productTitle">Widget</span>"#;
        let detail = product_detail(html, "B0ABCDEF99").unwrap();
        assert_eq!(detail.asin, "B0ABCDEF99");
        assert_eq!(detail.price, None);
        assert_eq!(detail.reviews, None);
        assert!(!detail.subscribe_and_save);
    }

    #[test]
    fn test_partial_review_aggregate_is_dropped() {
        // Rating present but no count: no aggregate is better than a fake one
        let html = r#"
            <span id="productTitle">Widget</span>
            <span id="acrPopover"><span class="a-icon-alt">3.9 out of 5 stars</span></span>"#;
        let detail = product_detail(html, "B0ABCDEF12").unwrap();
        assert_eq!(detail.reviews, None);
    }

    #[test]
    fn test_count_parsing_strips_thousands_separators() {
        assert_eq!(parse_count("1,234 ratings"), Some(1234));
        assert_eq!(parse_count("87 ratings"), Some(87));
        assert_eq!(parse_count("ratings"), None);
    }
}
