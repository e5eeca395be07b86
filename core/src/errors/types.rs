//! Error types for the collaborators the client depends on
//!
//! Every type here is `Clone` so a single renewal outcome can be handed to
//! every caller that waited on it.

use thiserror::Error;

/// Failure of a single request/response exchange
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),
}

/// Failure reading or writing the credential store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Credential storage I/O error: {0}")]
    Io(String),

    #[error("Credential serialization error: {0}")]
    Serialization(String),
}

/// Failure of the renewal endpoint call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenewalError {
    #[error("Renewal rejected with status {status}")]
    Rejected { status: u16 },

    #[error("Renewal request failed: {0}")]
    Network(String),

    #[error("Invalid renewal response: {0}")]
    InvalidResponse(String),
}

/// Why a renewal cycle ended without a new access credential
///
/// Every caller of the failed cycle receives the same value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenewalFailure {
    #[error("No refresh credential available")]
    MissingRefreshCredential,

    #[error(transparent)]
    Renewal(#[from] RenewalError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Renewal ended before settling")]
    Abandoned,
}
