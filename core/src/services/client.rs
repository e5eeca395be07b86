//! Authenticated HTTP client: augmentation, dispatch and unauthorized handling

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::request::{ApiResponse, RequestDescriptor, TrackedRequest};
use crate::errors::{ClientError, ClientResult};
use crate::repositories::CredentialStore;
use crate::services::augment::augment;
use crate::services::refresh::RefreshCoordinator;
use crate::services::traits::{RenewalEndpoint, SessionTerminator, Transport};

/// Client that attaches the stored access credential to every request and
/// recovers from expiry through the [`RefreshCoordinator`]
///
/// Clones share the store, the transport and the coordinator.
#[derive(Clone)]
pub struct AuthenticatedClient {
    store: Arc<dyn CredentialStore>,
    transport: Arc<dyn Transport>,
    coordinator: RefreshCoordinator,
}

impl AuthenticatedClient {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        transport: Arc<dyn Transport>,
        renewal: Arc<dyn RenewalEndpoint>,
        terminator: Arc<dyn SessionTerminator>,
    ) -> Self {
        let coordinator = RefreshCoordinator::new(store.clone(), transport.clone(), renewal, terminator);
        Self {
            store,
            transport,
            coordinator,
        }
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Send a request with the current access credential
    ///
    /// A first-attempt 401 is handed to the coordinator and the caller sees
    /// the replayed response. Other non-success statuses become
    /// [`ClientError::Status`]; network failures are returned as-is.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> ClientResult<ApiResponse> {
        let credentials = self.store.get().await?;
        let request = TrackedRequest::new(descriptor)
            .with_credential(credentials.as_ref().map(|pair| pair.access.clone()));
        let outbound = augment(request.descriptor(), credentials.as_ref());

        debug!(method = %outbound.method, path = %outbound.path, "Sending request");
        let response = self.transport.send(&outbound).await?;

        let response = if response.is_unauthorized() {
            debug!(path = %outbound.path, "Access credential rejected");
            self.coordinator.handle_unauthorized(request).await?
        } else {
            response
        };
        into_result(response)
    }

    /// [`execute`](Self::execute) and decode the JSON body
    pub async fn execute_json<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> ClientResult<T> {
        let response = self.execute(descriptor).await?;
        Ok(response.json()?)
    }

    /// Send without credentials and without unauthorized handling
    ///
    /// Used for sign-in and sign-up, where a 401 means bad input rather
    /// than an expired session.
    pub async fn send_anonymous(&self, descriptor: RequestDescriptor) -> ClientResult<ApiResponse> {
        debug!(method = %descriptor.method, path = %descriptor.path, "Sending anonymous request");
        let response = self.transport.send(&descriptor).await?;
        into_result(response)
    }
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

fn into_result(response: ApiResponse) -> ClientResult<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ClientError::from_status(response.status, &response.body))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::domain::entities::credential::CredentialPair;
    use crate::errors::TransportError;
    use crate::services::refresh::tests::mocks::{Harness, MockRenewal, MockTransport};

    #[derive(Debug, Deserialize)]
    struct Listing {
        id: u64,
        title: String,
    }

    fn signed_in(transport: MockTransport) -> Harness {
        Harness::new(
            Some(CredentialPair::with_refresh("T1", "R1")),
            transport,
            MockRenewal::succeeding("T2"),
        )
    }

    #[tokio::test]
    async fn test_attaches_stored_credential() {
        let h = signed_in(MockTransport::accepting("T1"));

        let response = h.client.execute(RequestDescriptor::get("apartments/")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(h.transport.sent()[0].authorization(), Some("Bearer T1"));
        assert_eq!(h.renewal.calls(), 0);
    }

    #[tokio::test]
    async fn test_execute_json_decodes_body() {
        let h = signed_in(MockTransport::responding(|_| {
            Ok(ApiResponse::json_body(200, &json!({"id": 3, "title": "Room in shared flat"})).unwrap())
        }));

        let listing: Listing = h.client.execute_json(RequestDescriptor::get("apartments/3/")).await.unwrap();
        assert_eq!(listing.id, 3);
        assert_eq!(listing.title, "Room in shared flat");
    }

    #[tokio::test]
    async fn test_execute_json_reports_bad_body() {
        let h = signed_in(MockTransport::responding(|_| Ok(ApiResponse::new(200, "<html>"))));

        let result: ClientResult<Listing> = h.client.execute_json(RequestDescriptor::get("apartments/3/")).await;
        assert!(matches!(result, Err(ClientError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_status_errors_carry_backend_message() {
        let h = signed_in(MockTransport::responding(|_| {
            Ok(ApiResponse::json_body(404, &json!({"detail": "Not found."})).unwrap())
        }));

        let error = h.client.execute(RequestDescriptor::get("apartments/99/")).await.unwrap_err();
        match error {
            ClientError::Status { status, message, .. } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not found.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_error_does_not_renew() {
        let h = signed_in(MockTransport::responding(|_| Err(TransportError::Timeout("30s".into()))));

        let error = h.client.execute(RequestDescriptor::get("apartments/")).await.unwrap_err();
        assert!(matches!(error, ClientError::Transport(TransportError::Timeout(_))));
        assert_eq!(h.renewal.calls(), 0);
    }

    #[tokio::test]
    async fn test_replayed_error_status_is_classified() {
        let h = signed_in(MockTransport::responding(|request| match request.authorization() {
            Some("Bearer T2") => Ok(ApiResponse::json_body(403, &json!({"detail": "Landlords only."})).unwrap()),
            _ => Ok(ApiResponse::new(401, "")),
        }));

        let error = h.client.execute(RequestDescriptor::post("apartments/")).await.unwrap_err();
        assert_eq!(error.status(), Some(403));
        assert_eq!(h.renewal.calls(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_request_skips_credentials_and_renewal() {
        let h = signed_in(MockTransport::always(401));

        let error = h
            .client
            .send_anonymous(RequestDescriptor::post("accounts/login/"))
            .await
            .unwrap_err();
        assert_eq!(error.status(), Some(401));
        assert!(h.transport.sent()[0].authorization().is_none());
        assert_eq!(h.renewal.calls(), 0);
        assert_eq!(h.terminator.calls(), 0);
    }
}
