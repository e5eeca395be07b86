//! Credential renewal endpoint over HTTP

use async_trait::async_trait;
use cn_core::domain::entities::credential::{RefreshToken, RenewedCredential};
use cn_core::errors::RenewalError;
use cn_core::services::traits::RenewalEndpoint;
use cn_shared::{mask_token, ApiConfig};
use reqwest::header::HeaderMap;
use reqwest::Url;
use serde::Serialize;
use tracing::{debug, warn};

use super::{base_url, build_client, join};
use crate::InfrastructureError;

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh: &'a str,
}

/// `POST {base}/token/refresh/` with `{"refresh": "..."}`
///
/// Uses its own HTTP client, so renewal never goes through the augmenting
/// client or the refresh coordinator.
#[derive(Debug, Clone)]
pub struct HttpRenewalEndpoint {
    client: reqwest::Client,
    url: Url,
}

impl HttpRenewalEndpoint {
    pub fn new(config: &ApiConfig) -> Result<Self, InfrastructureError> {
        let base = base_url(config)?;
        let url = join(&base, &config.refresh_path)
            .map_err(|reason| InfrastructureError::invalid_url(config.refresh_path.clone(), reason))?;
        let client = build_client(config, HeaderMap::new())?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RenewalEndpoint for HttpRenewalEndpoint {
    async fn renew(&self, refresh: &RefreshToken) -> Result<RenewedCredential, RenewalError> {
        debug!(refresh = %mask_token(refresh.as_str()), url = %self.url, "Requesting credential renewal");

        let response = self
            .client
            .post(self.url.clone())
            .json(&RefreshBody {
                refresh: refresh.as_str(),
            })
            .send()
            .await
            .map_err(|e| RenewalError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Renewal endpoint rejected the refresh credential");
            return Err(RenewalError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RenewalError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| RenewalError::InvalidResponse(e.to_string()))
    }
}
