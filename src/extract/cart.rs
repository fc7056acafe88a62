//! Cart extraction.

use scraper::Html;
use tracing::debug;

use super::{first_attr, first_text, text_of};
use crate::selectors::cart as sel;
use crate::types::{CartItem, CartView};

/// Extract the active cart.
///
/// Emptiness is decided by the fixed marker phrase in the container's text,
/// checked before any item extraction: an empty cart page keeps item-like
/// recommendation nodes around, and extracting those would fabricate lines.
pub fn cart_view(html: &str) -> CartView {
    let doc = Html::parse_document(html);
    let root = doc.root_element();
    let container = doc.select(&sel::ACTIVE_CART).next().unwrap_or(root);

    if text_of(container).contains(sel::EMPTY_CART_PHRASE) {
        return CartView {
            is_empty: true,
            items: Vec::new(),
            subtotal: None,
            item_count: 0,
        };
    }

    let mut items = Vec::new();
    for line in container.select(&sel::ITEM) {
        let title = first_text(line, &sel::TITLE);
        let price = first_text(line, &sel::PRICE);
        if title.is_none() && price.is_none() {
            // Partial data is worse than no data for a cart line
            debug!("Dropping cart line with neither title nor price");
            continue;
        }

        let quantity = first_attr(line, &sel::QUANTITY, "value")
            .and_then(|v| v.trim().parse().ok())
            .or_else(|| {
                first_text(line, &sel::QUANTITY_DROPDOWN).and_then(|v| v.trim().parse().ok())
            })
            .unwrap_or(1);

        let selected = line
            .select(&sel::CHECKBOX)
            .next()
            .map(|c| c.value().attr("checked").is_some())
            .unwrap_or(false);

        items.push(CartItem {
            title: title.unwrap_or_default(),
            price,
            quantity,
            image: first_attr(line, &sel::IMAGE, "src"),
            link: first_attr(line, &sel::LINK, "href"),
            asin: line
                .value()
                .attr(sel::ASIN_ATTR)
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
            availability: first_text(line, &sel::AVAILABILITY),
            selected,
        });
    }

    let subtotal = first_text(container, &sel::SUBTOTAL);
    let item_count = first_text(container, &sel::SUBTOTAL_LABEL)
        .and_then(|label| embedded_count(&label))
        .unwrap_or(items.len() as u32);

    CartView {
        is_empty: false,
        items,
        subtotal,
        item_count,
    }
}

/// Delete controls visible in cart markup; the mock clear-cart path uses
/// this as its observed count.
pub fn delete_control_count(html: &str) -> usize {
    let doc = Html::parse_document(html);
    doc.select(&sel::DELETE_CONTROL).count()
}

/// "Subtotal (3 items):" -> 3
fn embedded_count(label: &str) -> Option<u32> {
    let open = label.find('(')?;
    let digits: String = label[open + 1..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
