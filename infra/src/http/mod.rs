//! HTTP collaborators backed by reqwest

mod renewal;
mod transport;

pub use renewal::HttpRenewalEndpoint;
pub use transport::ReqwestTransport;

use cn_core::errors::TransportError;
use cn_shared::ApiConfig;
use reqwest::Url;
use std::time::Duration;

use crate::InfrastructureError;

/// Parse the configured base URL, keeping its path prefix for relative joins
pub(crate) fn base_url(config: &ApiConfig) -> Result<Url, InfrastructureError> {
    let raw = config.normalized_base_url();
    Url::parse(&raw).map_err(|e| InfrastructureError::invalid_url(raw, e))
}

/// Join a request path onto the base URL
///
/// A leading slash is ignored so `/apartments/` and `apartments/` both stay
/// under the base path.
pub(crate) fn join(base: &Url, path: &str) -> Result<Url, String> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| format!("cannot join '{}' onto {}: {}", path, base, e))
}

/// Build a reqwest client with the configured timeouts
pub(crate) fn build_client(
    config: &ApiConfig,
    default_headers: reqwest::header::HeaderMap,
) -> Result<reqwest::Client, InfrastructureError> {
    if config.request_timeout_secs == 0 {
        return Err(InfrastructureError::Config(
            "request_timeout_secs must be greater than zero".to_string(),
        ));
    }
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout().max(Duration::from_secs(1)))
        .default_headers(default_headers)
        .build()?;
    Ok(client)
}

/// Classify a reqwest failure
pub(crate) fn transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}

