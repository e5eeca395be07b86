//! Configuration for the session service

use cn_shared::ApiConfig;

/// Accounts endpoints, relative to the API base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionServiceConfig {
    pub login_path: String,
    pub signup_path: String,
    pub profile_path: String,
}

impl Default for SessionServiceConfig {
    fn default() -> Self {
        Self::from_api_config(&ApiConfig::default())
    }
}

impl SessionServiceConfig {
    pub fn from_api_config(api: &ApiConfig) -> Self {
        Self {
            login_path: api.login_path.clone(),
            signup_path: api.signup_path.clone(),
            profile_path: api.profile_path.clone(),
        }
    }
}
