//! Marketplace client and its factory
//!
//! This module wires the infrastructure collaborators into the core
//! authenticated client and exposes typed calls for the marketplace screens.

use cn_core::domain::entities::request::RequestDescriptor;
use cn_core::domain::entities::user::UserProfile;
use cn_core::domain::value_objects::{AuthSession, LoginRequest, SignupRequest};
use cn_core::errors::ClientResult;
use cn_core::repositories::{CredentialStore, InMemoryCredentialStore};
use cn_core::services::{
    AuthenticatedClient, CoordinatorStatus, RenewalEndpoint, SessionService, SessionServiceConfig,
    SessionTerminator, Transport,
};
use cn_infra::{
    FileCredentialStore, HttpRenewalEndpoint, InfrastructureError, RedirectingTerminator,
    ReqwestTransport, SessionEvent,
};
use cn_shared::{ApiConfig, AppConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Client for the CampusNest marketplace API
///
/// Every call goes through the authenticated client, so concurrent calls
/// that hit an expired access credential share a single renewal.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    session: SessionService,
    redirects: Option<Arc<RedirectingTerminator>>,
}

impl MarketplaceClient {
    /// Create a client with the default collaborators for `config`
    pub fn from_config(config: &AppConfig) -> Result<Self, InfrastructureError> {
        Self::builder(config.api.clone()).build()
    }

    pub fn builder(api: ApiConfig) -> MarketplaceClientBuilder {
        MarketplaceClientBuilder::new(api)
    }

    pub fn client(&self) -> &AuthenticatedClient {
        self.session.client()
    }

    /// Refresh state, for diagnostics
    pub fn coordinator_status(&self) -> CoordinatorStatus {
        self.client().coordinator().status()
    }

    /// Session events from the default terminator
    ///
    /// `None` when a custom terminator was injected.
    pub fn session_events(&self) -> Option<watch::Receiver<SessionEvent>> {
        self.redirects.as_ref().map(|terminator| terminator.subscribe())
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<AuthSession> {
        let session = self.session.sign_in(LoginRequest::new(email, password)).await?;
        self.mark_active();
        Ok(session)
    }

    pub async fn sign_up(&self, request: SignupRequest) -> ClientResult<AuthSession> {
        let session = self.session.sign_up(request).await?;
        self.mark_active();
        Ok(session)
    }

    pub async fn sign_out(&self) -> ClientResult<()> {
        self.session.sign_out().await
    }

    pub async fn is_signed_in(&self) -> ClientResult<bool> {
        self.session.is_signed_in().await
    }

    /// `GET accounts/me/`
    pub async fn profile(&self) -> ClientResult<UserProfile> {
        self.session.current_user().await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.client().execute_json(RequestDescriptor::get(path)).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.client()
            .execute_json(RequestDescriptor::post(path).with_json(body)?)
            .await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.client()
            .execute_json(RequestDescriptor::put(path).with_json(body)?)
            .await
    }

    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.client()
            .execute_json(RequestDescriptor::patch(path).with_json(body)?)
            .await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.client().execute(RequestDescriptor::delete(path)).await?;
        Ok(())
    }

    fn mark_active(&self) {
        if let Some(terminator) = &self.redirects {
            terminator.reset();
        }
    }
}

/// Builder for [`MarketplaceClient`]
///
/// Collaborators left unset get their defaults:
/// - store: [`FileCredentialStore`] when `credentials_path` is configured,
///   in-memory otherwise
/// - transport: [`ReqwestTransport`]
/// - renewal endpoint: [`HttpRenewalEndpoint`]
/// - terminator: [`RedirectingTerminator`] over the chosen store
pub struct MarketplaceClientBuilder {
    api: ApiConfig,
    store: Option<Arc<dyn CredentialStore>>,
    transport: Option<Arc<dyn Transport>>,
    renewal: Option<Arc<dyn RenewalEndpoint>>,
    terminator: Option<Arc<dyn SessionTerminator>>,
}

impl MarketplaceClientBuilder {
    pub fn new(api: ApiConfig) -> Self {
        Self {
            api,
            store: None,
            transport: None,
            renewal: None,
            terminator: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_renewal_endpoint(mut self, renewal: Arc<dyn RenewalEndpoint>) -> Self {
        self.renewal = Some(renewal);
        self
    }

    pub fn with_terminator(mut self, terminator: Arc<dyn SessionTerminator>) -> Self {
        self.terminator = Some(terminator);
        self
    }

    pub fn build(self) -> Result<MarketplaceClient, InfrastructureError> {
        let api = self.api;

        let store: Arc<dyn CredentialStore> = match (self.store, &api.credentials_path) {
            (Some(store), _) => store,
            (None, Some(path)) => {
                info!(path = %path.display(), "Using file credential store");
                Arc::new(FileCredentialStore::new(path))
            }
            (None, None) => Arc::new(InMemoryCredentialStore::new()),
        };

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&api)?),
        };

        let renewal: Arc<dyn RenewalEndpoint> = match self.renewal {
            Some(renewal) => renewal,
            None => Arc::new(HttpRenewalEndpoint::new(&api)?),
        };

        let (terminator, redirects) = match self.terminator {
            Some(terminator) => (terminator, None),
            None => {
                let redirects = Arc::new(RedirectingTerminator::from_config(store.clone(), &api));
                let terminator: Arc<dyn SessionTerminator> = redirects.clone();
                (terminator, Some(redirects))
            }
        };

        let client = AuthenticatedClient::new(store, transport, renewal, terminator);
        let session = SessionService::new(client, SessionServiceConfig::from_api_config(&api));
        Ok(MarketplaceClient { session, redirects })
    }
}
