//! Outbound request descriptors and the responses they produce.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::credential::AccessToken;

/// Header carrying the bearer credential
pub const AUTHORIZATION: &str = "Authorization";

/// HTTP status signalling an expired or invalid access credential
pub const STATUS_UNAUTHORIZED: u16 = 401;

/// HTTP method of an outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully formed outbound call: method, path, headers and body
///
/// Paths are relative to the configured API base URL (`apartments/`,
/// `accounts/me/`). Header names are stored as given.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    /// Create a descriptor with no headers and no body
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Set a header, replacing any previous value
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a JSON body
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Current value of the authorization header, if any
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION).map(String::as_str)
    }
}

/// One logical caller request paired with its "renewal attempted" tag
///
/// The tag starts false and can only ever be set. A request whose tag is
/// set is never handed to the refresh coordinator again, which bounds
/// every call to at most one replay.
#[derive(Debug, Clone)]
pub struct TrackedRequest {
    descriptor: RequestDescriptor,
    retried: bool,
    sent_with: Option<AccessToken>,
}

impl TrackedRequest {
    pub fn new(descriptor: RequestDescriptor) -> Self {
        Self {
            descriptor,
            retried: false,
            sent_with: None,
        }
    }

    /// Remember the access credential the first attempt carried
    pub fn with_credential(mut self, access: Option<AccessToken>) -> Self {
        self.sent_with = access;
        self
    }

    /// Access credential the first attempt carried, if any
    pub fn sent_with(&self) -> Option<&AccessToken> {
        self.sent_with.as_ref()
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Record that this request is about to be replayed after a renewal
    pub fn mark_retried(&mut self) {
        self.retried = true;
    }
}

impl From<RequestDescriptor> for TrackedRequest {
    fn from(descriptor: RequestDescriptor) -> Self {
        Self::new(descriptor)
    }
}

/// Response returned by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Response with a serialized JSON body
    pub fn json_body<T: Serialize>(status: u16, body: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(status, serde_json::to_vec(body)?)
            .with_header("content-type", "application/json"))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// 2xx and 3xx statuses are handed back to the caller as-is
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == STATUS_UNAUTHORIZED
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Body as text, lossily decoded
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_builders() {
        let descriptor = RequestDescriptor::post("apartments/")
            .with_header("X-Trace", "abc")
            .with_json(&json!({"title": "Studio near campus"}))
            .unwrap();

        assert_eq!(descriptor.method, HttpMethod::Post);
        assert_eq!(descriptor.path, "apartments/");
        assert_eq!(descriptor.headers.get("X-Trace").unwrap(), "abc");
        assert_eq!(descriptor.body.as_ref().unwrap()["title"], "Studio near campus");
        assert!(descriptor.authorization().is_none());
    }

    #[test]
    fn test_tracked_request_flag_is_one_way() {
        let mut request = TrackedRequest::new(RequestDescriptor::get("accounts/me/"));
        assert!(!request.is_retried());

        request.mark_retried();
        assert!(request.is_retried());

        request.mark_retried();
        assert!(request.is_retried());
    }

    #[test]
    fn test_response_status_classes() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(ApiResponse::new(302, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
        assert!(!ApiResponse::new(500, "").is_success());

        let unauthorized = ApiResponse::new(401, "");
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_success());
    }

    #[test]
    fn test_response_json_decoding() {
        let response = ApiResponse::json_body(200, &json!({"id": 7})).unwrap();
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(response.headers.get("content-type").unwrap(), "application/json");
        assert_eq!(response.text(), r#"{"id":7}"#);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(serde_json::to_value(HttpMethod::Delete).unwrap(), "DELETE");
    }
}
