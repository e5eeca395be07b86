//! Client error taxonomy.

mod types;

pub use types::{RenewalError, RenewalFailure, StoreError, TransportError};

use cn_shared::ErrorResponse;
use thiserror::Error;

use crate::domain::entities::request::HttpMethod;

/// Errors surfaced to callers of the authenticated client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network failure on an ordinary request; no renewal is involved
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-success status other than a first-attempt 401
    #[error("Request failed with status {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: Option<ErrorResponse>,
    },

    /// The renewal cycle this request depended on failed; the session is gone
    #[error("Unauthenticated: {0}")]
    Unauthenticated(#[from] RenewalFailure),

    /// The request was still unauthorized after being replayed with a renewed credential
    #[error("{method} {path} rejected as unauthorized after credential renewal")]
    ReplayRejected { method: HttpMethod, path: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Build a status error from a raw response body
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let parsed = ErrorResponse::from_body(body);
        let message = match &parsed {
            Some(error) => error.message(),
            None if body.is_empty() => String::from("empty response body"),
            None => String::from_utf8_lossy(body).chars().take(200).collect(),
        };
        ClientError::Status {
            status,
            message,
            body: parsed,
        }
    }

    /// HTTP status carried by this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::ReplayRejected { .. } => Some(401),
            _ => None,
        }
    }

    /// Whether the user has to sign in again
    pub fn requires_sign_in(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthenticated(_) | ClientError::ReplayRejected { .. }
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
