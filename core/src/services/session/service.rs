//! Session service implementation

use tracing::{debug, info};

use crate::domain::entities::request::RequestDescriptor;
use crate::domain::entities::user::UserProfile;
use crate::domain::value_objects::{AuthResponse, AuthSession, LoginRequest, SignupRequest};
use crate::errors::ClientResult;
use crate::services::client::AuthenticatedClient;

use super::config::SessionServiceConfig;

/// Sign-in, sign-up and sign-out on top of an [`AuthenticatedClient`]
#[derive(Debug, Clone)]
pub struct SessionService {
    client: AuthenticatedClient,
    config: SessionServiceConfig,
}

impl SessionService {
    pub fn new(client: AuthenticatedClient, config: SessionServiceConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    /// Sign in with email and password
    ///
    /// On success the returned pair replaces whatever the store held.
    /// Wrong credentials come back as a status error; nothing is stored.
    pub async fn sign_in(&self, request: LoginRequest) -> ClientResult<AuthSession> {
        debug!(email = %request.email, "Signing in");
        let descriptor = RequestDescriptor::post(self.config.login_path.as_str()).with_json(&request)?;
        self.start_session(descriptor).await
    }

    /// Register a new account and sign it in
    pub async fn sign_up(&self, request: SignupRequest) -> ClientResult<AuthSession> {
        debug!(username = %request.username, role = %request.role.as_str(), "Signing up");
        let descriptor = RequestDescriptor::post(self.config.signup_path.as_str()).with_json(&request)?;
        self.start_session(descriptor).await
    }

    /// Drop both credentials
    pub async fn sign_out(&self) -> ClientResult<()> {
        self.client.store().clear().await?;
        info!("Signed out");
        Ok(())
    }

    pub async fn is_signed_in(&self) -> ClientResult<bool> {
        Ok(self.client.store().get().await?.is_some())
    }

    /// Profile of the signed-in user
    pub async fn current_user(&self) -> ClientResult<UserProfile> {
        self.client
            .execute_json(RequestDescriptor::get(self.config.profile_path.as_str()))
            .await
    }

    async fn start_session(&self, descriptor: RequestDescriptor) -> ClientResult<AuthSession> {
        let response = self.client.send_anonymous(descriptor).await?;
        let session = response.json::<AuthResponse>()?.into_session();
        self.client.store().set(session.credentials.clone()).await?;

        info!(
            user_id = session.user.id,
            role = %session.user.role.as_str(),
            "Signed in"
        );
        Ok(session)
    }
}
