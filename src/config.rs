//! Runtime configuration resolved from the environment and CLI flags.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Storefront domain used when no cookie reveals one.
pub const DEFAULT_DOMAIN: &str = "www.amazon.com";

/// Token identifying storefront cookies during domain derivation.
pub const BRAND_TOKEN: &str = "amazon";

/// Resolved runtime configuration.
///
/// Marketplace defaults are environment-overridable rather than hard-coded:
/// point `SHOPPROBE_DEFAULT_DOMAIN` at another storefront to change the
/// fallback used for cookie-less sessions.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root data directory (profiles, snapshots, legacy cookie file)
    pub data_dir: PathBuf,
    /// Fallback storefront domain when no cookie carries the brand token
    pub default_domain: String,
    /// Brand token scanned for in cookie domains
    pub brand_token: String,
    /// Serve markup from captured snapshots instead of a live browser
    pub mock: bool,
    /// Capture page markup to timestamped snapshot files
    pub capture: bool,
    /// Run Chrome headless
    pub headless: bool,
}

impl Config {
    /// Resolve configuration from the environment, with CLI flag overrides.
    pub fn load(mock: bool, capture: bool, no_headless: bool) -> Result<Self> {
        let data_dir = match std::env::var_os("SHOPPROBE_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .context("Unable to determine home directory")?
                .join(".shopprobe"),
        };

        let default_domain = std::env::var("SHOPPROBE_DEFAULT_DOMAIN")
            .unwrap_or_else(|_| DEFAULT_DOMAIN.to_string());

        Ok(Config {
            data_dir,
            default_domain,
            brand_token: BRAND_TOKEN.to_string(),
            mock: mock || env_flag("SHOPPROBE_MOCK"),
            capture: capture || env_flag("SHOPPROBE_CAPTURE"),
            headless: !no_headless,
        })
    }

    /// Directory holding one `<name>.json` cookie file per profile.
    pub fn profiles_dir(&self) -> PathBuf {
        self.data_dir.join("profiles")
    }

    /// Pre-profiles single cookie file, read once for the default profile.
    pub fn legacy_cookie_file(&self) -> PathBuf {
        self.data_dir.join("cookies.json")
    }

    /// Directory holding timestamped markup snapshots.
    pub fn snapshots_dir(&self) -> PathBuf {
        self.data_dir.join("snapshots")
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}
