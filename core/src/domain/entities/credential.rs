//! Credential entities held by the credential store.

use cn_shared::mask_token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Short-lived credential authorizing API calls
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

/// Longer-lived credential used solely to obtain a new access credential
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

macro_rules! token_impls {
    ($name:ident) => {
        impl $name {
            /// Wrap a raw token value
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Raw token value, for building headers and request bodies
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name))
                    .field(&mask_token(&self.0))
                    .finish()
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

token_impls!(AccessToken);
token_impls!(RefreshToken);

/// Current access/refresh credentials
///
/// Serialized with the backend's field names: `{"access": "...", "refresh": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Access credential attached to every outbound request
    pub access: AccessToken,

    /// Refresh credential; absent when the session cannot be renewed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<RefreshToken>,
}

impl CredentialPair {
    /// Pair with only an access credential
    pub fn new(access: impl Into<AccessToken>) -> Self {
        Self {
            access: access.into(),
            refresh: None,
        }
    }

    /// Pair with both credentials
    pub fn with_refresh(access: impl Into<AccessToken>, refresh: impl Into<RefreshToken>) -> Self {
        Self {
            access: access.into(),
            refresh: Some(refresh.into()),
        }
    }

    /// Whether a renewal is possible with this pair
    pub fn has_refresh(&self) -> bool {
        self.refresh.is_some()
    }
}

/// Result of a successful renewal call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewedCredential {
    /// Fresh access credential
    pub access: AccessToken,

    /// Rotated refresh credential, when the backend rotates them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<RefreshToken>,
}

impl RenewedCredential {
    /// Build the pair to store, keeping `previous` when no rotated refresh credential came back
    pub fn merge_into(self, previous: RefreshToken) -> CredentialPair {
        CredentialPair {
            access: self.access,
            refresh: Some(self.refresh.unwrap_or(previous)),
        }
    }
}
