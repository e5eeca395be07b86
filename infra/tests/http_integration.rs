//! Integration tests for the reqwest transport and renewal endpoint
//!
//! Both run against a local wiremock server.

use cn_core::domain::entities::credential::RefreshToken;
use cn_core::domain::entities::request::RequestDescriptor;
use cn_core::errors::{RenewalError, TransportError};
use cn_core::services::traits::{RenewalEndpoint, Transport};
use cn_infra::{HttpRenewalEndpoint, ReqwestTransport};
use cn_shared::ApiConfig;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ApiConfig {
    ApiConfig::new(format!("{}/api/", server.uri()))
}

#[tokio::test]
async fn test_transport_sends_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/apartments/"))
        .and(header("Authorization", "Bearer T1"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"title": "Two-bed near campus", "rent": 650})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&config_for(&server)).unwrap();
    let request = RequestDescriptor::post("apartments/")
        .with_header("Authorization", "Bearer T1")
        .with_json(&json!({"title": "Two-bed near campus", "rent": 650}))
        .unwrap();

    let response = transport.send(&request).await.unwrap();
    assert_eq!(response.status, 201);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["id"], 42);
    assert!(response.headers.contains_key("content-type"));
}

#[tokio::test]
async fn test_transport_returns_error_statuses_as_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type",
            "code": "token_not_valid"
        })))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&config_for(&server)).unwrap();
    let response = transport.send(&RequestDescriptor::get("accounts/me/")).await.unwrap();
    assert!(response.is_unauthorized());
    assert!(response.text().contains("token_not_valid"));
}

#[tokio::test]
async fn test_transport_timeout_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apartments/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&config_for(&server).with_timeout_secs(1)).unwrap();
    let error = transport.send(&RequestDescriptor::get("apartments/")).await.unwrap_err();
    assert!(matches!(error, TransportError::Timeout(_)), "got {error:?}");
}

#[tokio::test]
async fn test_transport_connection_refused() {
    // Bind and drop a server so nothing listens on its port
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let transport = ReqwestTransport::new(&ApiConfig::new(format!("{}/api/", uri))).unwrap();
    let error = transport.send(&RequestDescriptor::get("apartments/")).await.unwrap_err();
    assert!(matches!(error, TransportError::Connect(_)), "got {error:?}");
}

#[tokio::test]
async fn test_renewal_success_without_rotation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = HttpRenewalEndpoint::new(&config_for(&server)).unwrap();
    let renewed = endpoint.renew(&RefreshToken::new("R1")).await.unwrap();
    assert_eq!(renewed.access.as_str(), "T2");
    assert!(renewed.refresh.is_none());
}

#[tokio::test]
async fn test_renewal_success_with_rotation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "T2", "refresh": "R2"})))
        .mount(&server)
        .await;

    let endpoint = HttpRenewalEndpoint::new(&config_for(&server)).unwrap();
    let renewed = endpoint.renew(&RefreshToken::new("R1")).await.unwrap();
    assert_eq!(renewed.refresh.unwrap().as_str(), "R2");
}

#[tokio::test]
async fn test_renewal_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })))
        .mount(&server)
        .await;

    let endpoint = HttpRenewalEndpoint::new(&config_for(&server)).unwrap();
    let error = endpoint.renew(&RefreshToken::new("R1")).await.unwrap_err();
    assert_eq!(error, RenewalError::Rejected { status: 401 });
}

#[tokio::test]
async fn test_renewal_invalid_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let endpoint = HttpRenewalEndpoint::new(&config_for(&server)).unwrap();
    let error = endpoint.renew(&RefreshToken::new("R1")).await.unwrap_err();
    assert!(matches!(error, RenewalError::InvalidResponse(_)));
}
