//! Order history extraction.
//!
//! Collection and return dates are not structured in the markup; they are
//! pattern-matched out of status and return-eligibility text. Absence of a
//! phrase yields an absent date, never an empty string.

use scraper::{ElementRef, Html};
use tracing::debug;

use super::{asin_from_href, first_attr, first_text, text_of};
use crate::selectors::orders as sel;
use crate::types::{DeliveryAddress, Order, OrderItem};

/// One record per order card; a card without an order number is dropped.
pub fn order_history(html: &str) -> Vec<Order> {
    let doc = Html::parse_document(html);
    let mut orders = Vec::new();

    for card in doc.select(&sel::CARD) {
        let Some(order_number) = first_text(card, &sel::ORDER_ID) else {
            debug!("Dropping order card without an order number");
            continue;
        };

        let (date, total) = header_fields(card);
        let status = first_text(card, &sel::STATUS);
        let collected_on = status.as_deref().and_then(collected_date);

        orders.push(Order {
            order_number,
            date,
            total,
            status,
            collected_on,
            address: delivery_address(card),
            items: card.select(&sel::ITEM).filter_map(order_item).collect(),
        });
    }

    orders
}

/// Zip the header's label/value pairs and pick out date and total.
fn header_fields(card: ElementRef) -> (Option<String>, Option<String>) {
    let mut date = None;
    let mut total = None;

    let labels = card.select(&sel::HEADER_LABEL).map(text_of);
    let values = card.select(&sel::HEADER_VALUE).map(text_of);
    for (label, value) in labels.zip(values) {
        let label = label.to_lowercase();
        if label.contains(sel::LABEL_ORDER_PLACED) {
            date.get_or_insert(value);
        } else if label.contains(sel::LABEL_TOTAL) {
            total.get_or_insert(value);
        }
    }

    (date, total)
}

fn delivery_address(card: ElementRef) -> Option<DeliveryAddress> {
    let address = DeliveryAddress {
        name: first_text(card, &sel::ADDRESS_NAME),
        address: first_text(card, &sel::ADDRESS_LINE),
        country: first_text(card, &sel::ADDRESS_COUNTRY),
    };
    if address.name.is_none() && address.address.is_none() && address.country.is_none() {
        None
    } else {
        Some(address)
    }
}

fn order_item(node: ElementRef) -> Option<OrderItem> {
    // The first link with text is the product title; image-only links come first
    let title_link = node
        .select(&sel::ITEM_LINK)
        .find(|link| !text_of(*link).is_empty())?;

    let link = title_link
        .value()
        .attr("href")
        .map(str::to_string);
    let item_text = text_of(node);

    Some(OrderItem {
        title: text_of(title_link),
        image: first_attr(node, &sel::ITEM_IMAGE, "src"),
        asin: link.as_deref().and_then(asin_from_href),
        link,
        return_eligible: item_text.contains(sel::RETURN_KEYWORD),
        return_by: return_by(&item_text),
    })
}

/// "Collected on 12 July 2025" -> "12 July 2025"
fn collected_date(status: &str) -> Option<String> {
    status
        .trim()
        .strip_prefix(sel::COLLECTED_PREFIX)
        .map(|rest| rest.trim().trim_end_matches('.').to_string())
        .filter(|d| !d.is_empty())
}

/// "Return or replace items: Eligible until 31 January 2026" -> "31 January 2026"
fn return_by(text: &str) -> Option<String> {
    let idx = text.find(sel::RETURN_UNTIL_TOKEN)?;
    let rest = text[idx + sel::RETURN_UNTIL_TOKEN.len()..]
        .trim()
        .trim_end_matches('.');
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}
