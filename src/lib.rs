//! # shopprobe
//!
//! CLI tool that drives an Amazon storefront through an authenticated headless
//! browser, designed for LLM agents and automation.
//!
//! Every storefront operation is a subcommand with scalar inputs and a JSON
//! result on stdout: catalog search, product detail, cart view/add/clear, and
//! order history. Authentication rides on named cookie profiles captured from
//! a real browser session, and a confirmation gate keeps identity-scoped
//! operations from running against the wrong account.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Save a cookie profile (JSON array exported by a cookie extension)
//! shopprobe profile save personal --cookies cookies.json
//!
//! # Public operations run under the active profile without confirmation
//! shopprobe search "usb c cable"
//! shopprobe product B0ABCDEF12
//!
//! # Identity-scoped operations return a confirmation prompt first
//! shopprobe cart show
//! # ...and proceed once the caller confirms the profile
//! shopprobe cart show --confirm
//! shopprobe orders --profile work --confirm
//!
//! # Extraction can be exercised against captured markup, no browser needed
//! shopprobe cart show --confirm --capture   # capture a snapshot while live
//! shopprobe cart show --confirm --mock      # replay the newest snapshot
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use shopprobe::config::Config;
//! use shopprobe::cookies::CookieStore;
//! use shopprobe::session::SessionController;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load(false, false, false)?;
//! let store = CookieStore::open(&config)?;
//! let session = SessionController::new(store, &config);
//!
//! session.switch_profile("work").await?;
//! session.confirm_session(None).await?;
//! assert!(session.is_confirmed().await);
//! # Ok(())
//! # }
//! ```

/// Browser session provisioning over the Chrome DevTools Protocol
pub mod browser;

/// CLI command handlers
pub mod commands;

/// Runtime configuration
pub mod config;

/// Cookie model and the on-disk profile store
pub mod cookies;

/// Typed errors with process exit codes
pub mod errors;

/// Markup-to-record extraction
pub mod extract;

/// CSS selector tables, grouped per record type
pub mod selectors;

/// Profile/session state machine and the confirmation gate
pub mod session;

/// Live and snapshot markup sources
pub mod source;

/// Domain record types
pub mod types;

pub use config::Config;
pub use cookies::{Cookie, CookieStore, SameSite};
pub use errors::ShopprobeError;
pub use session::SessionController;
pub use source::{MarkupSource, Operation};
pub use types::{
    AddToCartResult, CartItem, CartView, ClearCartResult, ConfirmationPrompt, Order, OrderItem,
    OutputFormat, ProductDetail, ProductSummary,
};
