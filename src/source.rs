//! Markup sources: live browser navigation and snapshot replay.
//!
//! Extraction is fed through the [`MarkupSource`] strategy so the pipeline
//! never branches on mock/live itself. The live source drives a fresh
//! browser session per call; the snapshot source replays the most recent
//! capture for the operation, which makes every extractor testable without
//! a browser or network.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::browser::{BrowserSession, element_exists, wait_for_selector};
use crate::config::Config;
use crate::cookies::Cookie;
use crate::errors::ShopprobeError;
use crate::selectors::{atc, auth, cart};
use crate::types::ClearCartResult;

/// Upper bound on reaching network quiescence after navigation.
const NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on an operation's structural marker appearing.
const MARKER_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on the add-to-cart confirmation element appearing.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(10);

/// Short bounded wait for the coverage upsell; absence is expected.
const UPSELL_TIMEOUT: Duration = Duration::from_secs(3);

/// Fixed settle delay after an interaction.
const SETTLE: Duration = Duration::from_secs(1);

/// The storefront operations the pipeline knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Product,
    CartView,
    AddToCart,
    ClearCart,
    Orders,
}

impl Operation {
    /// Snapshot filename prefix and log name.
    pub fn slug(self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::Product => "product",
            Operation::CartView => "cart",
            Operation::AddToCart => "add-to-cart",
            Operation::ClearCart => "clear-cart",
            Operation::Orders => "orders",
        }
    }

    /// Structural marker whose presence means the relevant content loaded.
    pub fn marker(self) -> &'static str {
        match self {
            Operation::Search => crate::selectors::search::RESULT_MARKER,
            Operation::Product => crate::selectors::product::TITLE_MARKER,
            Operation::CartView | Operation::ClearCart => cart::ACTIVE_CART_MARKER,
            Operation::AddToCart => atc::ADD_BUTTON_MARKER,
            Operation::Orders => crate::selectors::orders::CARD_MARKER,
        }
    }

    /// Substructure captured into snapshots (falls back to the whole
    /// document when absent).
    pub fn capture_root(self) -> &'static str {
        match self {
            Operation::Search => crate::selectors::search::RESULTS_ROOT,
            Operation::Product => "#dp",
            Operation::CartView | Operation::ClearCart => cart::ACTIVE_CART_MARKER,
            Operation::AddToCart => atc::CONFIRMATION_MARKER,
            Operation::Orders => "#ordersContainer",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Where an operation's markup comes from.
#[async_trait]
pub trait MarkupSource: Send + Sync {
    /// Produce the markup the operation's extractor will run on. For
    /// read operations that is page content; for add-to-cart it is the
    /// confirmation element.
    async fn acquire(&self, op: Operation, url: &str, cookies: &[Cookie]) -> Result<String>;
}

/// Build the configured markup source.
pub fn markup_source(config: &Config) -> Box<dyn MarkupSource> {
    if config.mock {
        Box::new(SnapshotSource::new(config.snapshots_dir()))
    } else {
        Box::new(LiveSource::new(config))
    }
}

/// Drives a fresh browser session per call.
pub struct LiveSource {
    headless: bool,
    capture: bool,
    snapshots_dir: PathBuf,
}

impl LiveSource {
    pub fn new(config: &Config) -> Self {
        LiveSource {
            headless: config.headless,
            capture: config.capture,
            snapshots_dir: config.snapshots_dir(),
        }
    }

    /// Iteratively delete every cart line, re-querying the delete controls
    /// after each deletion. Loop invariant: query remaining controls; if
    /// none, stop; else delete one — bounded by the initially observed
    /// count so a stuck page cannot spin forever.
    pub async fn clear_cart(&self, url: &str, cookies: &[Cookie]) -> Result<ClearCartResult> {
        let session = BrowserSession::open(self.headless, cookies).await?;
        let outcome = self.drive_clear_cart(session.page(), url).await;
        session.close().await;
        outcome
    }

    async fn drive_clear_cart(&self, page: &Page, url: &str) -> Result<ClearCartResult> {
        self.navigate_and_guard(Operation::ClearCart, page, url)
            .await?;

        let observed = delete_controls(page).await.len();
        debug!("Observed {} deletable cart lines", observed);

        for _ in 0..observed {
            // Never cache controls across deletions: each removal reflows
            // the remaining lines
            let Some(control) = delete_controls(page).await.into_iter().next() else {
                break;
            };
            if let Err(e) = control.click().await {
                warn!("Cart deletion failed, continuing: {e}");
            }
            tokio::time::sleep(SETTLE).await;
        }

        let remaining = delete_controls(page).await.len();
        let removed = observed.saturating_sub(remaining);
        if removed < observed {
            warn!("Removed {removed} of {observed} cart items");
        }
        Ok(ClearCartResult { observed, removed })
    }

    /// Steps shared by every live operation: navigate, wait for quiescence,
    /// fail fast on a sign-in redirect, then wait for the operation's
    /// structural marker. The two wait failures stay distinct: a sign-in
    /// redirect means re-authenticate, a missing marker means markup drift.
    async fn navigate_and_guard(&self, op: Operation, page: &Page, url: &str) -> Result<()> {
        info!("Navigating to {} for '{}'", url, op);
        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(NAV_TIMEOUT, navigation).await {
            Ok(result) => result.with_context(|| format!("Navigation to {url} failed"))?,
            Err(_) => {
                return Err(ShopprobeError::NavigationTimeout {
                    operation: op.slug().to_string(),
                    url: url.to_string(),
                }
                .into());
            }
        }

        let current = page.url().await.ok().flatten().unwrap_or_default();
        if current.contains(auth::SIGNIN_PATH) || element_exists(page, auth::SIGNIN_MARKER).await {
            return Err(ShopprobeError::AuthRequired {
                operation: op.slug().to_string(),
            }
            .into());
        }

        let marker = op.marker();
        if wait_for_selector(page, marker, MARKER_TIMEOUT).await.is_none() {
            return Err(ShopprobeError::ContentMissing {
                operation: op.slug().to_string(),
                marker: marker.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Conditional add-to-cart flow: select one-time purchase if the product
    /// defaults to a subscription, click add, decline the coverage upsell if
    /// it shows up, then hand back the confirmation element for judgment.
    async fn drive_add_to_cart(&self, page: &Page) -> Result<String> {
        if let Ok(option) = page.find_element(atc::ONE_TIME_OPTION).await {
            debug!("Product defaults to subscription, selecting one-time purchase");
            option
                .click()
                .await
                .context("Unable to select one-time purchase")?;
            tokio::time::sleep(SETTLE).await;
        }

        page.find_element(atc::ADD_BUTTON_MARKER)
            .await
            .context("Add-to-cart control disappeared")?
            .click()
            .await
            .context("Unable to click add to cart")?;

        if let Some(decline) = wait_for_selector(page, atc::DECLINE_COVERAGE, UPSELL_TIMEOUT).await
        {
            debug!("Declining coverage upsell");
            if let Err(e) = decline.click().await {
                warn!("Upsell decline failed, continuing: {e}");
            }
            tokio::time::sleep(SETTLE).await;
        }

        if wait_for_selector(page, atc::CONFIRMATION_MARKER, CONFIRM_TIMEOUT)
            .await
            .is_none()
        {
            return Err(ShopprobeError::ContentMissing {
                operation: Operation::AddToCart.slug().to_string(),
                marker: atc::CONFIRMATION_MARKER.to_string(),
            }
            .into());
        }

        outer_html(page, atc::CONFIRMATION_MARKER).await
    }
}

#[async_trait]
impl MarkupSource for LiveSource {
    async fn acquire(&self, op: Operation, url: &str, cookies: &[Cookie]) -> Result<String> {
        let session = BrowserSession::open(self.headless, cookies).await?;

        // Everything that can fail runs before teardown; teardown runs
        // regardless
        let outcome = async {
            self.navigate_and_guard(op, session.page(), url).await?;
            match op {
                Operation::AddToCart => self.drive_add_to_cart(session.page()).await,
                _ => session.page().content().await.context("Unable to read page content"),
            }
        }
        .await;

        let fragment = if self.capture && outcome.is_ok() {
            outer_html(session.page(), op.capture_root()).await.ok()
        } else {
            None
        };

        session.close().await;

        let markup = outcome?;
        if let Some(fragment) = fragment {
            match write_snapshot(&self.snapshots_dir, op, &fragment) {
                Ok(path) => info!("Captured snapshot {}", path.display()),
                Err(e) => warn!("Snapshot capture failed: {e}"),
            }
        }
        Ok(markup)
    }
}

/// Replays the most recent capture for the operation.
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn new(dir: PathBuf) -> Self {
        SnapshotSource { dir }
    }
}

#[async_trait]
impl MarkupSource for SnapshotSource {
    async fn acquire(&self, op: Operation, _url: &str, _cookies: &[Cookie]) -> Result<String> {
        let path = latest_snapshot(&self.dir, op)?;
        info!("Reading snapshot {}", path.display());
        fs::read_to_string(&path)
            .with_context(|| format!("Unable to read snapshot {}", path.display()))
    }
}

async fn delete_controls(page: &Page) -> Vec<chromiumoxide::Element> {
    page.find_elements(cart::DELETE_CONTROL_MARKER)
        .await
        .unwrap_or_default()
}

async fn outer_html(page: &Page, selector: &str) -> Result<String> {
    let script = format!(
        "(() => {{ const el = document.querySelector({selector:?}); \
         return el ? el.outerHTML : document.documentElement.outerHTML; }})()"
    );
    page.evaluate(script)
        .await
        .context("Unable to read element markup")?
        .into_value::<String>()
        .context("Element markup was not a string")
}

/// Write a timestamped snapshot for the operation.
pub fn write_snapshot(dir: &Path, op: Operation, markup: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("{}-{stamp}.html", op.slug()));
    fs::write(&path, markup)?;
    Ok(path)
}

/// Newest snapshot for the operation, by timestamped filename.
pub fn latest_snapshot(dir: &Path, op: Operation) -> Result<PathBuf> {
    let prefix = format!("{}-", op.slug());
    let mut newest: Option<String> = None;

    if dir.exists() {
        for entry in fs::read_dir(dir)? {
            let file_name = entry?.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.starts_with(&prefix) && name.ends_with(".html") {
                if newest.as_deref().is_none_or(|current| name > current) {
                    newest = Some(name.to_string());
                }
            }
        }
    }

    newest.map(|name| dir.join(name)).ok_or_else(|| {
        ShopprobeError::SnapshotNotFound {
            operation: op.slug().to_string(),
            dir: dir.to_path_buf(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_roundtrip_and_prefix_isolation() {
        let dir = TempDir::new().unwrap();

        write_snapshot(dir.path(), Operation::CartView, "<div id='sc-active-cart'></div>")
            .unwrap();
        write_snapshot(dir.path(), Operation::AddToCart, "<h1>Added to cart</h1>").unwrap();

        let cart = latest_snapshot(dir.path(), Operation::CartView).unwrap();
        assert!(cart.file_name().unwrap().to_str().unwrap().starts_with("cart-"));

        let atc = latest_snapshot(dir.path(), Operation::AddToCart).unwrap();
        assert!(
            atc.file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("add-to-cart-")
        );

        let missing = latest_snapshot(dir.path(), Operation::Orders).unwrap_err();
        assert!(matches!(
            missing.downcast_ref::<ShopprobeError>(),
            Some(ShopprobeError::SnapshotNotFound { .. })
        ));
    }

    #[test]
    fn test_latest_snapshot_picks_newest_stamp() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("orders-20260101-000000.html"), "old").unwrap();
        fs::write(dir.path().join("orders-20260301-000000.html"), "new").unwrap();

        let path = latest_snapshot(dir.path(), Operation::Orders).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "orders-20260301-000000.html"
        );
        assert_eq!(fs::read_to_string(path).unwrap(), "new");
    }

    #[test]
    fn test_operation_markers_are_wired() {
        assert_eq!(Operation::CartView.marker(), Operation::ClearCart.marker());
        assert_eq!(Operation::Search.slug(), "search");
        assert_eq!(Operation::AddToCart.to_string(), "add-to-cart");
    }
}
