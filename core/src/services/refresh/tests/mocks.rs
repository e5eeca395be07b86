//! Mock collaborators for coordinator, client and session tests

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use crate::domain::entities::credential::{AccessToken, CredentialPair, RefreshToken, RenewedCredential};
use crate::domain::entities::request::{ApiResponse, RequestDescriptor};
use crate::errors::{RenewalError, TransportError};
use crate::repositories::InMemoryCredentialStore;
use crate::services::client::AuthenticatedClient;
use crate::services::refresh::RefreshCoordinator;
use crate::services::traits::{RenewalEndpoint, SessionTerminator, Transport};

type Responder = Box<dyn Fn(&RequestDescriptor) -> Result<ApiResponse, TransportError> + Send + Sync>;

/// Transport answering from a closure and recording every request it sees
pub struct MockTransport {
    responder: Responder,
    sent: Mutex<Vec<RequestDescriptor>>,
}

impl MockTransport {
    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&RequestDescriptor) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// 200 for requests bearing `token`, 401 for anything else
    pub fn accepting(token: &str) -> Self {
        let expected = format!("Bearer {}", token);
        Self::responding(move |request| {
            if request.authorization() == Some(expected.as_str()) {
                Ok(ApiResponse::json_body(200, &json!({ "path": request.path })).unwrap())
            } else {
                Ok(ApiResponse::json_body(401, &json!({
                    "detail": "Given token not valid for any token type",
                    "code": "token_not_valid"
                }))
                .unwrap())
            }
        })
    }

    /// Same status for every request
    pub fn always(status: u16) -> Self {
        Self::responding(move |_| Ok(ApiResponse::new(status, "")))
    }

    pub fn sent(&self) -> Vec<RequestDescriptor> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of requests sent with the given access credential
    pub fn sent_with(&self, token: &str) -> usize {
        let expected = format!("Bearer {}", token);
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.authorization() == Some(expected.as_str()))
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ApiResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

/// Renewal endpoint with a scripted result and an optional gate
pub struct MockRenewal {
    result: Mutex<Result<RenewedCredential, RenewalError>>,
    gate: Option<Notify>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl MockRenewal {
    fn with_result(result: Result<RenewedCredential, RenewalError>) -> Self {
        Self {
            result: Mutex::new(result),
            gate: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Returns `access` and no rotated refresh credential
    pub fn succeeding(access: &str) -> Self {
        Self::with_result(Ok(RenewedCredential {
            access: AccessToken::new(access),
            refresh: None,
        }))
    }

    /// Returns `access` and a rotated refresh credential
    pub fn rotating(access: &str, refresh: &str) -> Self {
        Self::with_result(Ok(RenewedCredential {
            access: AccessToken::new(access),
            refresh: Some(RefreshToken::new(refresh)),
        }))
    }

    pub fn failing(error: RenewalError) -> Self {
        Self::with_result(Err(error))
    }

    /// Hold every renewal until [`MockRenewal::release`] is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn set_result(&self, result: Result<RenewedCredential, RenewalError>) {
        *self.result.lock().unwrap() = result;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Refresh credentials presented to the endpoint, in call order
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenewalEndpoint for MockRenewal {
    async fn renew(&self, refresh: &RefreshToken) -> Result<RenewedCredential, RenewalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(refresh.as_str().to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct CountingTerminator {
    calls: AtomicUsize,
}

impl CountingTerminator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionTerminator for CountingTerminator {
    async fn terminate(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// An authenticated client wired to mock collaborators
pub struct Harness {
    pub store: InMemoryCredentialStore,
    pub transport: Arc<MockTransport>,
    pub renewal: Arc<MockRenewal>,
    pub terminator: Arc<CountingTerminator>,
    pub client: AuthenticatedClient,
}

impl Harness {
    pub fn new(credentials: Option<CredentialPair>, transport: MockTransport, renewal: MockRenewal) -> Self {
        let store = match credentials {
            Some(pair) => InMemoryCredentialStore::with_pair(pair),
            None => InMemoryCredentialStore::new(),
        };
        let transport = Arc::new(transport);
        let renewal = Arc::new(renewal);
        let terminator = Arc::new(CountingTerminator::default());
        let client = AuthenticatedClient::new(
            Arc::new(store.clone()),
            transport.clone(),
            renewal.clone(),
            terminator.clone(),
        );
        Self {
            store,
            transport,
            renewal,
            terminator,
            client,
        }
    }

    /// Signed in as T1/R1 against a backend that only accepts T2
    pub fn expired(renewal: MockRenewal) -> Self {
        Self::new(
            Some(CredentialPair::with_refresh("T1", "R1")),
            MockTransport::accepting("T2"),
            renewal,
        )
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        self.client.coordinator()
    }
}

/// Poll `condition` until it holds, failing the test after a few seconds
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..5_000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached in time");
}
