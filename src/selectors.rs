//! CSS selectors and text patterns for storefront markup, grouped per
//! record type.
//!
//! Selectors are specific to the target site's current markup and are the
//! expected breakage point when that markup changes. Keep fixes here; the
//! extraction code reads these tables and never hard-codes a selector.
//!
//! Raw `&str` forms exist alongside parsed [`Selector`]s because live waits
//! go through CDP, which takes selector strings.

use scraper::Selector;
use std::sync::LazyLock;

fn parse(selector: &str) -> Selector {
    Selector::parse(selector).expect("selector table entry must parse")
}

/// Sign-in page detection. Presence of identity-provider form fields means
/// the storefront redirected us to authenticate.
pub mod auth {
    use super::*;

    pub const SIGNIN_MARKER: &str = "#ap_email, #ap_email_login, form[name='signIn'], #signInSubmit";

    pub static SIGNIN: LazyLock<Selector> = LazyLock::new(|| parse(SIGNIN_MARKER));

    /// URL fragment of the identity-provider pages.
    pub const SIGNIN_PATH: &str = "/ap/signin";
}

/// Selectors for search results pages.
pub mod search {
    use super::*;

    pub const RESULT_MARKER: &str = "div[data-component-type='s-search-result']";
    pub const RESULTS_ROOT: &str = "div.s-main-slot";

    /// Product card container - main search result item.
    pub static RESULT: LazyLock<Selector> = LazyLock::new(|| parse(RESULT_MARKER));

    /// Catalog identifier attribute on the result card.
    pub const ASIN_ATTR: &str = "data-asin";

    /// Product title text.
    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| parse("h2 a span, h2 span.a-text-normal, .a-size-medium.a-text-normal"));

    /// Current price, screen-reader form ("$12.99").
    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| parse(".a-price .a-offscreen"));

    /// Prime badge.
    pub static PRIME_BADGE: LazyLock<Selector> =
        LazyLock::new(|| parse("i.a-icon-prime, .a-icon-prime"));

    /// Label text marking a paid placement.
    pub const SPONSORED_TEXT: &str = "Sponsored";
}

/// Selectors for product detail pages.
pub mod product {
    use super::*;

    pub const TITLE_MARKER: &str = "#productTitle";

    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| parse(TITLE_MARKER));

    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| {
        parse("#corePrice_feature_div .a-price .a-offscreen, .a-price .a-offscreen")
    });

    /// Star rating text, e.g. "4.3 out of 5 stars".
    pub static RATING: LazyLock<Selector> =
        LazyLock::new(|| parse("#acrPopover span.a-icon-alt, i.a-icon-star span.a-icon-alt"));

    /// Review count text, e.g. "1,234 ratings".
    pub static REVIEW_COUNT: LazyLock<Selector> = LazyLock::new(|| parse("#acrCustomerReviewText"));

    /// Subscription purchase option present on the page.
    pub static SUBSCRIBE: LazyLock<Selector> = LazyLock::new(|| {
        parse("#snsAccordionRowMiddle, #sns-base-price, #rcx-subscribe-submit-button-announce")
    });

    /// Main product image.
    pub static IMAGE: LazyLock<Selector> =
        LazyLock::new(|| parse("#landingImage, #imgTagWrapperId img"));

    /// Hidden form input carrying the catalog identifier.
    pub static ASIN_INPUT: LazyLock<Selector> =
        LazyLock::new(|| parse("input#ASIN, input[name='ASIN']"));
}

/// Selectors for the shopping cart page.
pub mod cart {
    use super::*;

    pub const ACTIVE_CART_MARKER: &str = "#sc-active-cart";

    pub static ACTIVE_CART: LazyLock<Selector> = LazyLock::new(|| parse(ACTIVE_CART_MARKER));

    /// Phrase whose presence in the cart container's text marks an empty
    /// cart; checked before any item extraction.
    pub const EMPTY_CART_PHRASE: &str = "Cart is empty";

    pub static ITEM: LazyLock<Selector> = LazyLock::new(|| parse("div.sc-list-item"));

    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| parse(".sc-product-title, span.a-truncate-full"));

    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| parse(".sc-product-price, .sc-badge-price-to-pay .a-offscreen"));

    /// Quantity text field; dropdown carts surface the value in a prompt span.
    pub static QUANTITY: LazyLock<Selector> =
        LazyLock::new(|| parse("input[name='quantityBox'], .sc-quantity-textfield"));
    pub static QUANTITY_DROPDOWN: LazyLock<Selector> =
        LazyLock::new(|| parse("span.a-dropdown-prompt"));

    pub static IMAGE: LazyLock<Selector> = LazyLock::new(|| parse("img.sc-product-image"));

    pub static LINK: LazyLock<Selector> = LazyLock::new(|| parse("a.sc-product-link"));

    pub static AVAILABILITY: LazyLock<Selector> =
        LazyLock::new(|| parse(".sc-product-availability"));

    pub static CHECKBOX: LazyLock<Selector> = LazyLock::new(|| parse("input[type='checkbox']"));

    /// Per-line delete control; re-queried after every deletion because
    /// removing one line reflows the rest.
    pub const DELETE_CONTROL_MARKER: &str =
        "input[value='Delete'], input[data-action='delete'], .sc-action-delete input";
    pub static DELETE_CONTROL: LazyLock<Selector> =
        LazyLock::new(|| parse(DELETE_CONTROL_MARKER));

    /// Subtotal amount and its label (the label embeds the item count).
    pub static SUBTOTAL: LazyLock<Selector> = LazyLock::new(|| {
        parse("#sc-subtotal-amount-activecart .sc-price, #sc-subtotal-amount-buybox .sc-price")
    });
    pub static SUBTOTAL_LABEL: LazyLock<Selector> = LazyLock::new(|| {
        parse("#sc-subtotal-label-activecart, #sc-subtotal-label-buybox")
    });

    /// Catalog identifier attribute on the cart line.
    pub const ASIN_ATTR: &str = "data-asin";
}

/// Selectors for the add-to-cart flow on a product page.
pub mod atc {
    use super::*;

    /// "One-time purchase" option shown when the product defaults to a
    /// recurring subscription; must be selected before adding.
    pub const ONE_TIME_OPTION: &str = "#oneTime-label, input[id^='oneTime']";

    pub const ADD_BUTTON_MARKER: &str = "#add-to-cart-button, input[name='submit.add-to-cart']";

    /// Supplemental-coverage upsell decline control; its absence is expected.
    pub const DECLINE_COVERAGE: &str =
        "input[aria-labelledby='attachSiNoCoverage-announce'], #attachSiNoCoverage";

    /// Confirmation element whose text decides success.
    pub const CONFIRMATION_MARKER: &str =
        "#NATC_SMART_WAGON_CONF_MSG_SUCCESS, #sw-atc-details, #huc-v2-order-row-confirm-text";

    /// The only texts accepted as a successful add (compared
    /// case-insensitively); anything else is a failure.
    pub const ACCEPTANCE_PHRASES: [&str; 2] = ["added to cart", "added to basket"];
}

/// Selectors for the order history page.
pub mod orders {
    use super::*;

    pub const CARD_MARKER: &str = ".order-card, .js-order-card";

    pub static CARD: LazyLock<Selector> = LazyLock::new(|| parse(CARD_MARKER));

    /// Order number, rendered LTR inside the order-id block.
    pub static ORDER_ID: LazyLock<Selector> =
        LazyLock::new(|| parse(".yohtmlc-order-id span[dir='ltr'], .yohtmlc-order-id bdi"));

    /// Header label/value pairs ("Order placed" / "Total" / ...).
    pub static HEADER_LABEL: LazyLock<Selector> = LazyLock::new(|| parse("span.a-color-secondary.label, span.label"));
    pub static HEADER_VALUE: LazyLock<Selector> = LazyLock::new(|| parse("span.a-color-secondary.value, span.value"));

    pub const LABEL_ORDER_PLACED: &str = "order placed";
    pub const LABEL_TOTAL: &str = "total";

    /// Shipment status line.
    pub static STATUS: LazyLock<Selector> = LazyLock::new(|| {
        parse(".delivery-box .a-row .a-size-medium, .js-shipment-info, .shipment .a-size-medium")
    });

    /// Delivery address block.
    pub static ADDRESS_NAME: LazyLock<Selector> =
        LazyLock::new(|| parse(".displayAddressFullName"));
    pub static ADDRESS_LINE: LazyLock<Selector> =
        LazyLock::new(|| parse(".displayAddressAddressLine1"));
    pub static ADDRESS_COUNTRY: LazyLock<Selector> =
        LazyLock::new(|| parse(".displayAddressCountryName"));

    /// One purchased item inside a shipment.
    pub static ITEM: LazyLock<Selector> = LazyLock::new(|| parse(".yohtmlc-item, .item-box"));

    pub static ITEM_LINK: LazyLock<Selector> = LazyLock::new(|| parse("a.a-link-normal"));
    pub static ITEM_IMAGE: LazyLock<Selector> = LazyLock::new(|| parse("img"));

    /// Text-pattern prefixes for dates embedded in status/return text.
    pub const COLLECTED_PREFIX: &str = "Collected on ";
    pub const RETURN_UNTIL_TOKEN: &str = " until ";
    pub const RETURN_KEYWORD: &str = "Return";
}
