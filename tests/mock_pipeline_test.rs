// End-to-end extraction against captured snapshots: the mock source feeds
// the same extractors the live pipeline uses, no browser required.

use shopprobe::source::{MarkupSource, Operation, SnapshotSource, latest_snapshot, write_snapshot};
use shopprobe::{ShopprobeError, extract};
use tempfile::TempDir;

const CART_SNAPSHOT: &str = r#"
<div id="sc-active-cart">
  <div class="sc-list-item" data-asin="B0ABCDEF12">
    <a class="sc-product-link" href="/dp/B0ABCDEF12">
      <span class="sc-product-title">USB-C Cable, 2m</span>
    </a>
    <span class="sc-product-price">$12.99</span>
    <input name="quantityBox" value="2">
    <span class="sc-action-delete"><input value="Delete"></span>
  </div>
  <span id="sc-subtotal-label-activecart">Subtotal (2 items):</span>
  <span id="sc-subtotal-amount-activecart"><span class="sc-price">$25.98</span></span>
</div>"#;

#[tokio::test]
async fn cart_snapshot_feeds_cart_extraction() {
    let dir = TempDir::new().unwrap();
    write_snapshot(dir.path(), Operation::CartView, CART_SNAPSHOT).unwrap();

    let source = SnapshotSource::new(dir.path().to_path_buf());
    let html = source
        .acquire(Operation::CartView, "https://unused.example/", &[])
        .await
        .unwrap();

    let cart = extract::cart::cart_view(&html);
    assert!(!cart.is_empty);
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.subtotal.as_deref(), Some("$25.98"));

    // The same snapshot drives the mock clear-cart observed count
    assert_eq!(extract::cart::delete_control_count(&html), 1);
}

#[tokio::test]
async fn add_to_cart_snapshot_judged_by_acceptance_phrases() {
    let dir = TempDir::new().unwrap();
    write_snapshot(
        dir.path(),
        Operation::AddToCart,
        r#"<h1 id="NATC_SMART_WAGON_CONF_MSG_SUCCESS">Added to cart</h1>"#,
    )
    .unwrap();

    let source = SnapshotSource::new(dir.path().to_path_buf());
    let html = source
        .acquire(Operation::AddToCart, "https://unused.example/", &[])
        .await
        .unwrap();

    let outcome = extract::atc::confirmation(&html);
    assert!(outcome.added);

    // A newer capture with a rejection text wins, and is judged a failure
    write_snapshot(
        dir.path(),
        Operation::AddToCart,
        "<h1>Item temporarily unavailable</h1>",
    )
    .unwrap();
    // Distinguish captures taken within the same second
    std::fs::rename(
        latest_snapshot(dir.path(), Operation::AddToCart).unwrap(),
        dir.path().join("add-to-cart-29991231-235959.html"),
    )
    .unwrap();

    let html = source
        .acquire(Operation::AddToCart, "https://unused.example/", &[])
        .await
        .unwrap();
    let outcome = extract::atc::confirmation(&html);
    assert!(!outcome.added);
    assert_eq!(outcome.confirmation, "Item temporarily unavailable");
}

#[tokio::test]
async fn missing_snapshot_is_a_distinct_not_found_error() {
    let dir = TempDir::new().unwrap();
    let source = SnapshotSource::new(dir.path().to_path_buf());

    let err = source
        .acquire(Operation::Orders, "https://unused.example/", &[])
        .await
        .unwrap_err();

    match err.downcast_ref::<ShopprobeError>() {
        Some(ShopprobeError::SnapshotNotFound { operation, .. }) => {
            assert_eq!(operation, "orders");
        }
        other => panic!("expected SnapshotNotFound, got {other:?}"),
    }
}
