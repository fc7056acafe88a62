use std::fmt;
use std::path::PathBuf;

/// Custom error type that includes exit codes
///
/// One variant per failure class: validation, not-found, authentication,
/// structural/navigation, and browser provisioning. Partial-success
/// conditions (clear-cart removing fewer items than observed, domain
/// fallback) are not errors and are reported inside successful results.
#[derive(Debug)]
pub enum ShopprobeError {
    /// Malformed profile name or cookie payload; nothing was touched (exit code 2)
    Validation(String),
    /// Requested profile does not exist (exit code 3)
    ProfileNotFound {
        name: String,
        available: Vec<String>,
    },
    /// Mock sourcing requested but no snapshot captured yet (exit code 3)
    SnapshotNotFound { operation: String, dir: PathBuf },
    /// The storefront redirected to its sign-in page (exit code 4)
    AuthRequired { operation: String },
    /// Navigation did not reach network quiescence in time (exit code 5)
    NavigationTimeout { operation: String, url: String },
    /// The operation's structural marker never appeared (exit code 5)
    ContentMissing { operation: String, marker: String },
    /// A marker appeared but carried text outside the accepted set (exit code 5)
    UnexpectedContent { operation: String, observed: String },
    /// Browser process launch or CDP failure (exit code 6)
    Browser(String),
}

impl ShopprobeError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ShopprobeError::Validation(_) => 2,
            ShopprobeError::ProfileNotFound { .. } => 3,
            ShopprobeError::SnapshotNotFound { .. } => 3,
            ShopprobeError::AuthRequired { .. } => 4,
            ShopprobeError::NavigationTimeout { .. } => 5,
            ShopprobeError::ContentMissing { .. } => 5,
            ShopprobeError::UnexpectedContent { .. } => 5,
            ShopprobeError::Browser(_) => 6,
        }
    }
}

impl fmt::Display for ShopprobeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopprobeError::Validation(msg) => write!(f, "{}", msg),
            ShopprobeError::ProfileNotFound { name, available } => {
                if available.is_empty() {
                    write!(f, "Profile '{}' not found (no profiles saved yet)", name)
                } else {
                    write!(
                        f,
                        "Profile '{}' not found. Available profiles: {}",
                        name,
                        available.join(", ")
                    )
                }
            }
            ShopprobeError::SnapshotNotFound { operation, dir } => {
                write!(
                    f,
                    "No snapshot captured for '{}' under {} (run the operation live with --capture first)",
                    operation,
                    dir.display()
                )
            }
            ShopprobeError::AuthRequired { operation } => {
                write!(
                    f,
                    "Not authenticated: '{}' was redirected to the sign-in page. \
                     Refresh the active profile's cookies and retry.",
                    operation
                )
            }
            ShopprobeError::NavigationTimeout { operation, url } => {
                write!(f, "Navigation timed out during '{}' at {}", operation, url)
            }
            ShopprobeError::ContentMissing { operation, marker } => {
                write!(
                    f,
                    "Expected content not found during '{}': marker '{}' never appeared \
                     (the page markup may have changed)",
                    operation, marker
                )
            }
            ShopprobeError::UnexpectedContent {
                operation,
                observed,
            } => {
                write!(
                    f,
                    "'{}' did not complete as expected, observed: \"{}\"",
                    operation, observed
                )
            }
            ShopprobeError::Browser(msg) => write!(f, "Browser session failed: {}", msg),
        }
    }
}

impl std::error::Error for ShopprobeError {}

/// Exit code for an arbitrary error chain: the typed code when a
/// [`ShopprobeError`] is at the root, 1 otherwise.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ShopprobeError>()
        .map(|e| e.exit_code())
        .unwrap_or(1)
}
