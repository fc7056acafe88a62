//! CLI command handlers.
//!
//! Each storefront operation is one handler with scalar inputs; results go
//! to stdout as JSON (or simple text), logs go to stderr.

pub mod cart;
pub mod orders;
pub mod product;
pub mod profile;
pub mod search;

use anyhow::Result;
use url::Url;

use crate::config::Config;
use crate::session::SessionController;
use crate::source::{MarkupSource, Operation, markup_source};

/// Identity gate shared by cart and order commands.
///
/// When the session is unconfirmed this prints the structured confirmation
/// prompt and reports `false`: the command stops there, successfully, and no
/// browser session is ever opened. The calling agent renders the prompt and
/// resubmits with `--confirm` (and optionally `--profile`).
pub(crate) async fn gate(session: &SessionController) -> Result<bool> {
    match session.require_confirmation().await {
        Some(prompt) => {
            println!("{}", serde_json::to_string_pretty(&prompt)?);
            Ok(false)
        }
        None => Ok(true),
    }
}

/// Run an operation's markup acquisition through the configured source.
pub(crate) async fn acquire(
    config: &Config,
    session: &SessionController,
    op: Operation,
    url: &str,
) -> Result<String> {
    let source: Box<dyn MarkupSource> = markup_source(config);
    let cookies = session.cookies().await;
    source.acquire(op, url, &cookies).await
}

pub(crate) fn storefront_url(domain: &str, path: &str) -> String {
    format!("https://{domain}{path}")
}

pub(crate) fn search_url(domain: &str, query: &str) -> Result<String> {
    let url = Url::parse_with_params(&format!("https://{domain}/s"), &[("k", query)])?;
    Ok(url.to_string())
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
