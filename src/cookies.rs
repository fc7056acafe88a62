//! Cookie model and the on-disk profile store.
//!
//! A profile is one JSON file under `<data_dir>/profiles/<name>.json` holding
//! the array a browser cookie extension exports. Files are only ever replaced
//! whole; there are no partial cookie updates.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::ShopprobeError;

/// Profile assumed when none was ever selected.
pub const DEFAULT_PROFILE: &str = "personal";

/// Same-site policy restricted to the recognized set.
///
/// Anything else in an imported payload (including absent/null) collapses to
/// unset rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    /// Normalize a raw same-site string. `no_restriction` is the legacy
    /// extension-export alias for `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" | "no_restriction" => Some(SameSite::None),
            _ => Option::None,
        }
    }
}

fn de_same_site<'de, D>(deserializer: D) -> Result<Option<SameSite>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(SameSite::parse))
}

fn default_path() -> String {
    "/".to_string()
}

/// One browser cookie, in the field layout cookie extensions export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<bool>,
    #[serde(
        default,
        deserialize_with = "de_same_site",
        skip_serializing_if = "Option::is_none"
    )]
    pub same_site: Option<SameSite>,
}

impl Cookie {
    fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.value = self.value.trim().to_string();
        self.domain = self.domain.trim().to_string();
        if self.path.trim().is_empty() {
            self.path = default_path();
        }
        self
    }

    /// Name, value, and domain must be non-empty after normalization.
    fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.value.is_empty() && !self.domain.is_empty()
    }
}

/// Profile names are lowercase alphanumeric plus hyphens.
pub fn valid_profile_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Scan a cookie sequence for the storefront domain it belongs to.
///
/// A dot-prefixed domain (stripped of the dot) wins over a `www.`-prefixed
/// one (stripped of the prefix); a bare match comes last. Returns `None`
/// when no cookie carries the brand token.
pub fn storefront_domain(cookies: &[Cookie], brand_token: &str) -> Option<String> {
    let mut dotted = None;
    let mut www = None;
    let mut bare = None;

    for cookie in cookies {
        if !cookie.domain.contains(brand_token) {
            continue;
        }
        if let Some(rest) = cookie.domain.strip_prefix('.') {
            dotted.get_or_insert_with(|| rest.to_string());
        } else if let Some(rest) = cookie.domain.strip_prefix("www.") {
            www.get_or_insert_with(|| rest.to_string());
        } else {
            bare.get_or_insert_with(|| cookie.domain.clone());
        }
    }

    dotted.or(www).or(bare)
}

/// One row of `list()`: a corrupt file still shows up, with zero cookies
/// and no domain.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub cookies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// On-disk collection of named cookie profiles.
pub struct CookieStore {
    profiles_dir: PathBuf,
    legacy_file: PathBuf,
    brand_token: String,
}

impl CookieStore {
    pub fn open(config: &Config) -> Result<Self> {
        let profiles_dir = config.profiles_dir();
        fs::create_dir_all(&profiles_dir)
            .with_context(|| format!("Unable to create {}", profiles_dir.display()))?;

        Ok(CookieStore {
            profiles_dir,
            legacy_file: config.legacy_cookie_file(),
            brand_token: config.brand_token.clone(),
        })
    }

    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.profiles_dir.join(format!("{name}.json"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.profile_path(name).exists()
            || (name == DEFAULT_PROFILE && self.legacy_file.exists())
    }

    /// Names of all saved profiles, sorted.
    pub fn available(&self) -> Vec<String> {
        self.list()
            .map(|profiles| profiles.into_iter().map(|p| p.name).collect())
            .unwrap_or_default()
    }

    /// Enumerate all profile files, reporting cookie count and derived
    /// domain for each; parse failures are reported, not hidden.
    pub fn list(&self) -> Result<Vec<ProfileSummary>> {
        let mut summaries = Vec::new();
        if !self.profiles_dir.exists() {
            return Ok(summaries);
        }

        for entry in fs::read_dir(&self.profiles_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let parsed = fs::read_to_string(&path)
                .ok()
                .and_then(|raw| parse_cookie_file(&raw).ok());

            summaries.push(match parsed {
                Some(cookies) => ProfileSummary {
                    name: name.to_string(),
                    cookies: cookies.len(),
                    domain: storefront_domain(&cookies, &self.brand_token),
                },
                None => {
                    warn!("Profile file {} could not be parsed", path.display());
                    ProfileSummary {
                        name: name.to_string(),
                        cookies: 0,
                        domain: None,
                    }
                }
            });
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    /// Read and normalize a profile's cookies.
    ///
    /// A missing file fails distinctly from a file that fails to parse. The
    /// default profile falls back to the legacy single-file layout once,
    /// migrating it so the fallback never runs again.
    pub fn load(&self, name: &str) -> Result<Vec<Cookie>> {
        let path = self.profile_path(name);

        if !path.exists() {
            if name == DEFAULT_PROFILE && self.legacy_file.exists() {
                return self.migrate_legacy();
            }
            return Err(ShopprobeError::ProfileNotFound {
                name: name.to_string(),
                available: self.available(),
            }
            .into());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Unable to read {}", path.display()))?;
        parse_cookie_file(&raw)
            .with_context(|| format!("Profile '{name}' is not a valid cookie file"))
    }

    /// Validate and atomically overwrite a profile with a raw cookie payload.
    ///
    /// Validation failures name their cause and leave the disk untouched.
    pub fn save(&self, name: &str, payload: &str) -> Result<Vec<Cookie>> {
        if !valid_profile_name(name) {
            return Err(ShopprobeError::Validation(format!(
                "Profile name must be lowercase letters, digits, and hyphens, got '{name}'"
            ))
            .into());
        }

        let value: serde_json::Value = serde_json::from_str(payload).map_err(|e| {
            ShopprobeError::Validation(format!("Cookie payload is not valid JSON: {e}"))
        })?;

        let Some(entries) = value.as_array() else {
            return Err(ShopprobeError::Validation(
                "Cookie payload must be a JSON array of cookie objects".to_string(),
            )
            .into());
        };
        if entries.is_empty() {
            return Err(ShopprobeError::Validation(
                "Cookie payload is empty, expected at least one cookie".to_string(),
            )
            .into());
        }
        for (index, entry) in entries.iter().enumerate() {
            for field in ["name", "value", "domain"] {
                let present = entry
                    .get(field)
                    .and_then(|v| v.as_str())
                    .is_some_and(|s| !s.trim().is_empty());
                if !present {
                    return Err(ShopprobeError::Validation(format!(
                        "Cookie at index {index} is missing required field '{field}'"
                    ))
                    .into());
                }
            }
        }

        let cookies: Vec<Cookie> = serde_json::from_value(value).map_err(|e| {
            ShopprobeError::Validation(format!("Cookie payload could not be parsed: {e}"))
        })?;
        let cookies: Vec<Cookie> = cookies.into_iter().map(Cookie::normalized).collect();

        self.write_profile(name, &cookies)?;
        info!("Saved profile '{}' ({} cookies)", name, cookies.len());
        Ok(cookies)
    }

    fn write_profile(&self, name: &str, cookies: &[Cookie]) -> Result<()> {
        fs::create_dir_all(&self.profiles_dir)?;
        let json = serde_json::to_string_pretty(cookies)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.profiles_dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(self.profile_path(name)).map_err(|e| e.error)?;
        Ok(())
    }

    fn migrate_legacy(&self) -> Result<Vec<Cookie>> {
        let raw = fs::read_to_string(&self.legacy_file)
            .with_context(|| format!("Unable to read {}", self.legacy_file.display()))?;
        let cookies = parse_cookie_file(&raw).with_context(|| {
            format!(
                "Legacy cookie file {} is not a valid cookie file",
                self.legacy_file.display()
            )
        })?;

        self.write_profile(DEFAULT_PROFILE, &cookies)?;
        info!(
            "Migrated legacy cookie file {} to profile '{}'",
            self.legacy_file.display(),
            DEFAULT_PROFILE
        );
        Ok(cookies)
    }
}

fn parse_cookie_file(raw: &str) -> Result<Vec<Cookie>> {
    let cookies: Vec<Cookie> = serde_json::from_str(raw)?;
    let total = cookies.len();

    let cookies: Vec<Cookie> = cookies
        .into_iter()
        .map(Cookie::normalized)
        .filter(Cookie::is_complete)
        .collect();

    if cookies.len() < total {
        debug!(
            "Dropped {} cookie(s) with empty name, value, or domain",
            total - cookies.len()
        );
    }
    Ok(cookies)
}

#[cfg(test)]
#[path = "cookies_test.rs"]
mod cookies_test;
