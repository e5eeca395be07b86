//! Marketplace API configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Connection and endpoint settings for the marketplace API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL every request path is joined onto (trailing slash expected)
    pub base_url: String,

    /// Credential renewal endpoint, relative to `base_url`
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    /// Sign-in endpoint, relative to `base_url`
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Sign-up endpoint, relative to `base_url`
    #[serde(default = "default_signup_path")]
    pub signup_path: String,

    /// Current user profile endpoint, relative to `base_url`
    #[serde(default = "default_profile_path")]
    pub profile_path: String,

    /// Where the UI should navigate once the session is terminated
    #[serde(default = "default_sign_in_route")]
    pub sign_in_route: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Persist credentials to this file; in-memory only when absent
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://127.0.0.1:8000/api/"),
            refresh_path: default_refresh_path(),
            login_path: default_login_path(),
            signup_path: default_signup_path(),
            profile_path: default_profile_path(),
            sign_in_route: default_sign_in_route(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            credentials_path: None,
        }
    }
}

impl ApiConfig {
    /// Create a new API configuration for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout in seconds
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Persist credentials to a file
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Apply `API_BASE_URL`, `API_TIMEOUT_SECS` and `CREDENTIALS_PATH` overrides
    pub fn merge_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("API_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(secs) = std::env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.request_timeout_secs = secs;
        }
        if let Ok(path) = std::env::var("CREDENTIALS_PATH") {
            self.credentials_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Connect timeout as a `Duration`
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Base URL guaranteed to end with a slash, so relative joins keep the `/api/` prefix
    pub fn normalized_base_url(&self) -> String {
        if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        }
    }
}

fn default_refresh_path() -> String {
    String::from("token/refresh/")
}

fn default_login_path() -> String {
    String::from("accounts/login/")
}

fn default_signup_path() -> String {
    String::from("accounts/signup/")
}

fn default_profile_path() -> String {
    String::from("accounts/me/")
}

fn default_sign_in_route() -> String {
    String::from("/signin")
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}
