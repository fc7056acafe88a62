//! Profile/session state machine and the confirmation gate.
//!
//! The controller is the single owner and mutation point of session state:
//! which profile is active, its in-memory cookie set, and whether the caller
//! has confirmed that identity. Identity-scoped operations consult
//! [`SessionController::require_confirmation`] before touching a browser.

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::cookies::{
    Cookie, CookieStore, DEFAULT_PROFILE, storefront_domain, valid_profile_name,
};
use crate::errors::ShopprobeError;
use crate::types::{ConfirmationPrompt, PromptOption};

#[derive(Debug)]
struct SessionState {
    active_profile: String,
    cookies: Vec<Cookie>,
    confirmed: bool,
}

/// Result of a successful profile switch.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SwitchSummary {
    pub profile: String,
    pub cookies: usize,
    pub domain: String,
}

/// Owns session state behind a lock so a confirm/switch interleaving can
/// never leave a wrong-profile, confirmed state.
pub struct SessionController {
    store: CookieStore,
    brand_token: String,
    default_domain: String,
    state: Mutex<SessionState>,
}

impl SessionController {
    /// Start on the default profile, unconfirmed. A missing default profile
    /// is fine: public operations still run unauthenticated.
    pub fn new(store: CookieStore, config: &Config) -> Self {
        let cookies = store.load(DEFAULT_PROFILE).unwrap_or_else(|e| {
            debug!("No cookies for default profile yet: {e:#}");
            Vec::new()
        });

        SessionController {
            store,
            brand_token: config.brand_token.clone(),
            default_domain: config.default_domain.clone(),
            state: Mutex::new(SessionState {
                active_profile: DEFAULT_PROFILE.to_string(),
                cookies,
                confirmed: false,
            }),
        }
    }

    pub fn store(&self) -> &CookieStore {
        &self.store
    }

    pub async fn active_profile(&self) -> String {
        self.state.lock().await.active_profile.clone()
    }

    pub async fn is_confirmed(&self) -> bool {
        self.state.lock().await.confirmed
    }

    /// Snapshot of the active profile's cookies.
    pub async fn cookies(&self) -> Vec<Cookie> {
        self.state.lock().await.cookies.clone()
    }

    /// Storefront domain of the active profile. Falling back to the default
    /// domain is a low-confidence condition worth logging, not an error.
    pub async fn domain(&self) -> String {
        let state = self.state.lock().await;
        match storefront_domain(&state.cookies, &self.brand_token) {
            Some(domain) => domain,
            None => {
                warn!(
                    "No {} cookie in profile '{}', falling back to {}",
                    self.brand_token, state.active_profile, self.default_domain
                );
                self.default_domain.clone()
            }
        }
    }

    /// Make `name` the active profile and clear the confirmed flag.
    ///
    /// On any failure the active profile and the flag are left untouched.
    pub async fn switch_profile(&self, name: &str) -> Result<SwitchSummary> {
        let mut state = self.state.lock().await;
        self.switch_locked(&mut state, name)
    }

    /// Set the confirmed flag, optionally switching first. A failed switch
    /// is returned unchanged and leaves the flag unset; confirming an
    /// already-confirmed session is a no-op.
    pub async fn confirm_session(&self, profile: Option<&str>) -> Result<SwitchSummary> {
        let mut state = self.state.lock().await;

        if let Some(name) = profile
            && name != state.active_profile
        {
            self.switch_locked(&mut state, name)?;
        }

        state.confirmed = true;
        info!("Session confirmed for profile '{}'", state.active_profile);

        Ok(SwitchSummary {
            profile: state.active_profile.clone(),
            cookies: state.cookies.len(),
            domain: storefront_domain(&state.cookies, &self.brand_token)
                .unwrap_or_else(|| self.default_domain.clone()),
        })
    }

    /// Gate consulted by every identity-scoped operation: `None` means
    /// proceed, otherwise the caller gets a prompt to render and resubmit.
    pub async fn require_confirmation(&self) -> Option<ConfirmationPrompt> {
        let state = self.state.lock().await;
        if state.confirmed {
            return None;
        }
        Some(self.build_prompt(&state))
    }

    fn switch_locked(&self, state: &mut SessionState, name: &str) -> Result<SwitchSummary> {
        if !valid_profile_name(name) {
            return Err(ShopprobeError::Validation(format!(
                "Profile name must be lowercase letters, digits, and hyphens, got '{name}'"
            ))
            .into());
        }
        if !self.store.exists(name) {
            return Err(ShopprobeError::ProfileNotFound {
                name: name.to_string(),
                available: self.store.available(),
            }
            .into());
        }

        let cookies = self.store.load(name)?;
        let domain = storefront_domain(&cookies, &self.brand_token)
            .unwrap_or_else(|| self.default_domain.clone());

        state.active_profile = name.to_string();
        state.cookies = cookies;
        // An identity change always invalidates a prior confirmation
        state.confirmed = false;

        info!(
            "Switched to profile '{}' ({} cookies, {})",
            name,
            state.cookies.len(),
            domain
        );
        Ok(SwitchSummary {
            profile: name.to_string(),
            cookies: state.cookies.len(),
            domain,
        })
    }

    fn build_prompt(&self, state: &SessionState) -> ConfirmationPrompt {
        let mut available = self.store.available();
        if !available.contains(&state.active_profile) {
            available.push(state.active_profile.clone());
            available.sort();
        }

        let options = available
            .iter()
            .map(|name| {
                if *name == state.active_profile {
                    PromptOption {
                        label: format!("{name} (active)"),
                        value: name.clone(),
                        description: "Continue with the active profile".to_string(),
                    }
                } else {
                    PromptOption {
                        label: name.clone(),
                        value: name.clone(),
                        description: format!("Switch to profile '{name}' and continue"),
                    }
                }
            })
            .collect();

        ConfirmationPrompt {
            kind: "profile_confirmation".to_string(),
            active_profile: state.active_profile.clone(),
            available_profiles: available,
            question: format!(
                "This operation acts on the '{}' account. Which profile should it use?",
                state.active_profile
            ),
            options,
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
