use serde::{Deserialize, Serialize};

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format for programmatic consumption
    Json,
    /// Human-readable simple format
    Simple,
}

/// Catalog identifiers are fixed-length alphanumeric codes.
pub fn valid_asin(s: &str) -> bool {
    s.len() == 10 && s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// One row of a search results page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Catalog identifier (10-character code)
    pub asin: String,
    pub title: String,
    /// Displayed price text, currency symbol included
    pub price: String,
    /// Prime-eligible badge present
    pub prime: bool,
    /// Row is a paid placement
    pub sponsored: bool,
}

/// Review aggregate from a product detail page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReviewSummary {
    pub rating: f32,
    pub count: u32,
}

/// A product detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub asin: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<ReviewSummary>,
    /// Product can be bought on a recurring subscription
    pub subscribe_and_save: bool,
    /// Primary image URL when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One line of the shopping cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    /// Checkbox state: line is selected for checkout
    pub selected: bool,
}

/// Cart contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartView {
    pub is_empty: bool,
    pub items: Vec<CartItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<String>,
    /// Count from the subtotal label when present, else the number of lines
    pub item_count: u32,
}

/// Outcome of the add-to-cart flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddToCartResult {
    pub added: bool,
    /// Text observed in the confirmation element
    pub confirmation: String,
}

/// Outcome of the clear-cart loop; `removed` may trail `observed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearCartResult {
    /// Delete controls present when the cart was first inspected
    pub observed: usize,
    /// Items actually removed
    pub removed: usize,
}

/// Delivery address attached to an order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// One line item of a past order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,
    pub return_eligible: bool,
    /// Deadline parsed from the return-eligibility text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by: Option<String>,
}

/// One entry of the order history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Pickup date parsed from a "Collected on ..." status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<DeliveryAddress>,
    pub items: Vec<OrderItem>,
}

/// Structured prompt returned when an identity-scoped operation runs
/// without a confirmed profile. Intended for a calling agent to render as
/// a choice and resubmit as a confirm/switch call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationPrompt {
    /// Type tag for the calling agent
    #[serde(rename = "type")]
    pub kind: String,
    pub active_profile: String,
    pub available_profiles: Vec<String>,
    pub question: String,
    pub options: Vec<PromptOption>,
}

/// One selectable option of a [`ConfirmationPrompt`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptOption {
    pub label: String,
    /// Profile name to resubmit
    pub value: String,
    pub description: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
