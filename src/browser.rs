//! Browser session provisioning over the Chrome DevTools Protocol.
//!
//! Each operation gets exactly one session: launch, seed cookies, navigate,
//! tear down. Sessions are never shared or reused, and `close()` must run on
//! every exit path; the operation layer guarantees that.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    CookieParam, CookieSameSite, SetCookiesParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cookies::{Cookie, SameSite};
use crate::errors::ShopprobeError;

/// Fixed desktop user agent presented to the storefront.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Fixed desktop viewport.
pub const VIEWPORT: (u32, u32) = (1280, 800);

/// Removes the automation-detection property before any page script runs.
const STEALTH_INIT: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// Poll interval for selector waits.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A provisioned browser session seeded with a profile's cookies.
///
/// The caller owns the session's lifetime and must call [`close`] when done,
/// success or failure alike.
///
/// [`close`]: BrowserSession::close
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    // Keeps the throwaway Chrome profile dir alive for the session
    _user_data: TempDir,
}

impl BrowserSession {
    /// Launch Chrome with the fixed flag set and inject `cookies` before any
    /// navigation. An empty cookie set is a warning, not an error: public
    /// operations still work unauthenticated.
    ///
    /// Launch failure is fatal to the operation and not retried here.
    pub async fn open(headless: bool, cookies: &[Cookie]) -> Result<BrowserSession> {
        let user_data = tempfile::Builder::new().prefix("shopprobe-").tempdir()?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(user_data.path())
            .window_size(VIEWPORT.0, VIEWPORT.1)
            // Automation markers off
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            // Containers and CI need the sandbox off
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");
        if !headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| ShopprobeError::Browser(format!("Invalid browser config: {e}")))?;

        info!("Launching browser (headless={})", headless);
        let (browser, mut handler_stream) = Browser::launch(config)
            .await
            .map_err(|e| ShopprobeError::Browser(format!("Unable to launch Chrome: {e}")))?;

        // Drain CDP protocol messages for the session's lifetime
        let handler = tokio::spawn(async move {
            while let Some(event) = handler_stream.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Unable to open a page")?;

        page.execute(SetUserAgentOverrideParams::new(USER_AGENT))
            .await
            .context("Unable to override user agent")?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_INIT))
            .await
            .context("Unable to install init script")?;

        if cookies.is_empty() {
            warn!("Active profile has no cookies, proceeding unauthenticated");
        } else {
            let params: Vec<CookieParam> = cookies.iter().filter_map(cookie_param).collect();
            debug!("Injecting {} cookies", params.len());
            page.execute(SetCookiesParams::new(params))
                .await
                .context("Unable to inject cookies")?;
        }

        Ok(BrowserSession {
            browser,
            page,
            handler,
            _user_data: user_data,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Tear the browser process down. Always runs the full shutdown even if
    /// the operation that used the session failed.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {e}");
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
    }
}

fn cookie_param(cookie: &Cookie) -> Option<CookieParam> {
    let mut builder = CookieParam::builder()
        .name(&cookie.name)
        .value(&cookie.value)
        .domain(&cookie.domain)
        .path(&cookie.path);

    if let Some(secure) = cookie.secure {
        builder = builder.secure(secure);
    }
    if let Some(http_only) = cookie.http_only {
        builder = builder.http_only(http_only);
    }
    if let Some(same_site) = cookie.same_site {
        builder = builder.same_site(match same_site {
            SameSite::Strict => CookieSameSite::Strict,
            SameSite::Lax => CookieSameSite::Lax,
            SameSite::None => CookieSameSite::None,
        });
    }

    match builder.build() {
        Ok(param) => Some(param),
        Err(e) => {
            warn!("Skipping cookie '{}': {e}", cookie.name);
            None
        }
    }
}

/// Poll for a selector until it appears or `timeout` elapses.
pub async fn wait_for_selector(page: &Page, selector: &str, timeout: Duration) -> Option<Element> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Ok(element) = page.find_element(selector).await {
            return Some(element);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Single probe for a selector, for elements whose absence is expected.
pub async fn element_exists(page: &Page, selector: &str) -> bool {
    page.find_element(selector).await.is_ok()
}
