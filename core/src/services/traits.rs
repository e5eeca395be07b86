//! Traits for the transport, renewal endpoint and session terminator

use async_trait::async_trait;

use crate::domain::entities::credential::{RefreshToken, RenewedCredential};
use crate::domain::entities::request::{ApiResponse, RequestDescriptor};
use crate::errors::{RenewalError, TransportError};

/// Performs a single outbound request/response exchange
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a fully formed request; any HTTP status is a successful exchange
    async fn send(&self, request: &RequestDescriptor) -> Result<ApiResponse, TransportError>;
}

/// Trades a refresh credential for a new access credential
#[async_trait]
pub trait RenewalEndpoint: Send + Sync {
    async fn renew(&self, refresh: &RefreshToken) -> Result<RenewedCredential, RenewalError>;
}

/// Ends the session when renewal is impossible
///
/// Clears stored credentials and sends the user back to sign-in. Must be
/// idempotent and must never fail; concurrent calls are allowed.
#[async_trait]
pub trait SessionTerminator: Send + Sync {
    async fn terminate(&self);
}
