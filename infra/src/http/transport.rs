//! reqwest-backed transport for the marketplace API

use async_trait::async_trait;
use cn_core::domain::entities::request::{ApiResponse, HttpMethod, RequestDescriptor};
use cn_core::errors::TransportError;
use cn_core::services::traits::Transport;
use cn_shared::ApiConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::{base_url, build_client, join, transport_error};
use crate::InfrastructureError;

/// Sends request descriptors to the API over HTTP
///
/// Paths are joined onto the configured base URL. Every request carries
/// `Content-Type: application/json` unless the descriptor overrides it.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build a transport from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, InfrastructureError> {
        let base_url = base_url(config)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = build_client(config, headers)?;

        info!(
            "HTTP transport initialized for {} (timeout {}s)",
            base_url, config.request_timeout_secs
        );
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL a descriptor path resolves to
    pub fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        join(&self.base_url, path).map_err(TransportError::Request)
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, url = %url, "HTTP request");

        let mut builder = self.client.request(method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        debug!(status, bytes = body.len(), "HTTP response");
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
