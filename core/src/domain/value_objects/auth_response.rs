//! Authentication response value object returned by sign-in and sign-up.

use serde::{Deserialize, Serialize};

use crate::domain::entities::credential::{AccessToken, CredentialPair, RefreshToken};
use crate::domain::entities::user::UserProfile;

/// Body of a successful sign-in or sign-up
///
/// The backend returns `{"user": {...}, "access": "...", "refresh": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// Profile of the authenticated user
    pub user: UserProfile,

    /// Access credential
    pub access: AccessToken,

    /// Refresh credential
    pub refresh: RefreshToken,
}

impl AuthResponse {
    /// Split into the session handed to the caller
    pub fn into_session(self) -> AuthSession {
        AuthSession {
            credentials: CredentialPair {
                access: self.access,
                refresh: Some(self.refresh),
            },
            user: self.user,
        }
    }
}

/// A signed-in session: who the user is and the credentials now in the store
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user: UserProfile,
    pub credentials: CredentialPair,
}
