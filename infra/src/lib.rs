//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators `cn_core` depends on.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **HTTP**: a `reqwest` transport and the credential renewal endpoint
//! - **Storage**: a JSON file credential store
//! - **Session**: a terminator that clears credentials and publishes a
//!   sign-in redirect for the UI

/// HTTP module - transport and renewal endpoint over reqwest
pub mod http;

/// Storage module - persistent credential stores
pub mod storage;

/// Session module - session termination and events
pub mod session;

pub use http::{HttpRenewalEndpoint, ReqwestTransport};
pub use session::{RedirectingTerminator, SessionEvent};
pub use storage::FileCredentialStore;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL or endpoint path does not form a valid URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InfrastructureError {
    pub(crate) fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
