//! Single-flight credential renewal

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cn_shared::mask_token;
use futures_util::FutureExt;
use tracing::{debug, error, info, warn};

use crate::domain::entities::credential::AccessToken;
use crate::domain::entities::request::{ApiResponse, TrackedRequest};
use crate::errors::{ClientError, ClientResult, RenewalFailure};
use crate::repositories::CredentialStore;
use crate::services::augment::augment_with;
use crate::services::traits::{RenewalEndpoint, SessionTerminator, Transport};

use super::state::{Admission, CoordinatorState, CoordinatorStatus, RenewalOutcome};

/// Serializes credential renewal across concurrent requests
///
/// The first request to come back unauthorized starts a renewal; every
/// other request that comes back unauthorized while it is in flight waits
/// for the same outcome instead of starting its own. Once the renewal
/// settles, each caller is replayed exactly once with the renewed access
/// credential, or rejected with the shared failure.
///
/// Cloning is cheap and clones share the same state.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<CoordinatorState>,
    store: Arc<dyn CredentialStore>,
    transport: Arc<dyn Transport>,
    renewal: Arc<dyn RenewalEndpoint>,
    terminator: Arc<dyn SessionTerminator>,
}

impl RefreshCoordinator {
    /// Create an idle coordinator over the given collaborators
    ///
    /// # Arguments
    ///
    /// * `store` - Holder of the current credential pair
    /// * `transport` - Used to replay requests after a renewal
    /// * `renewal` - Trades the refresh credential for a new access credential
    /// * `terminator` - Ends the session when renewal is impossible
    pub fn new(
        store: Arc<dyn CredentialStore>,
        transport: Arc<dyn Transport>,
        renewal: Arc<dyn RenewalEndpoint>,
        terminator: Arc<dyn SessionTerminator>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CoordinatorState::new()),
                store,
                transport,
                renewal,
                terminator,
            }),
        }
    }

    /// Current refresh state and number of queued requests
    pub fn status(&self) -> CoordinatorStatus {
        self.inner.lock_state().status()
    }

    /// Handle a request whose response came back unauthorized
    ///
    /// Returns the replayed response whatever its status, except a second
    /// 401 which becomes [`ClientError::ReplayRejected`]. Status
    /// classification of the replayed response is left to the caller.
    ///
    /// A request that was already replayed is rejected immediately and never
    /// triggers another renewal. A request sent with an access credential
    /// that has since been replaced is replayed with the stored one instead
    /// of starting a renewal.
    pub async fn handle_unauthorized(&self, request: TrackedRequest) -> ClientResult<ApiResponse> {
        if request.is_retried() {
            warn!(
                method = %request.descriptor().method,
                path = %request.descriptor().path,
                "Replayed request rejected as unauthorized"
            );
            return Err(replay_rejected(&request));
        }

        if let Some(current) = self.renewed_since(&request).await? {
            debug!(path = %request.descriptor().path, "Credential already renewed, replaying");
            return self.replay(request, Ok(current)).await;
        }

        // Observing the state and joining or starting the cycle is one critical section
        let admission = self.inner.lock_state().admit();

        let outcome = match admission {
            Admission::Leader => {
                info!(path = %request.descriptor().path, "Starting credential renewal");
                let inner = Arc::clone(&self.inner);
                // The renewal owns its own task so it settles even if this caller is dropped
                match tokio::spawn(inner.run_renewal()).await {
                    Ok(outcome) => outcome,
                    Err(join_error) => {
                        error!(error = %join_error, "Credential renewal task did not complete");
                        Err(RenewalFailure::Abandoned)
                    }
                }
            }
            Admission::Waiter(receiver) => {
                debug!(path = %request.descriptor().path, "Renewal in flight, request queued");
                receiver.await.unwrap_or(Err(RenewalFailure::Abandoned))
            }
        };

        self.replay(request, outcome).await
    }

    /// Stored access credential, when it differs from the one the request carried
    async fn renewed_since(&self, request: &TrackedRequest) -> ClientResult<Option<AccessToken>> {
        let Some(sent) = request.sent_with() else {
            return Ok(None);
        };
        let current = self.inner.store.get().await?;
        Ok(current.map(|pair| pair.access).filter(|access| access != sent))
    }

    async fn replay(&self, mut request: TrackedRequest, outcome: RenewalOutcome) -> ClientResult<ApiResponse> {
        let access = outcome?;

        request.mark_retried();
        let outbound = augment_with(request.descriptor(), &access);
        debug!(
            method = %outbound.method,
            path = %outbound.path,
            "Replaying request with renewed credential"
        );

        let response = self.inner.transport.send(&outbound).await?;
        if response.is_unauthorized() {
            warn!(
                method = %outbound.method,
                path = %outbound.path,
                "Request still unauthorized after credential renewal"
            );
            return Err(replay_rejected(&request));
        }
        Ok(response)
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("status", &self.status())
            .finish()
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, CoordinatorState> {
        // The lock is never held across user code, so a poisoned state is still consistent
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one renewal cycle to completion and settle every waiter
    async fn run_renewal(self: Arc<Self>) -> RenewalOutcome {
        let mut guard = SettleGuard {
            inner: &self,
            settled: false,
        };

        let outcome = match AssertUnwindSafe(self.renew()).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Credential renewal panicked");
                Err(RenewalFailure::Abandoned)
            }
        };
        match &outcome {
            Ok(access) => {
                info!(access = %mask_token(access.as_str()), "Credential renewal succeeded");
            }
            Err(failure) => {
                warn!(error = %failure, "Credential renewal failed, ending session");
                self.end_session().await;
            }
        }

        guard.settle(&outcome);
        outcome
    }

    async fn renew(&self) -> RenewalOutcome {
        let refresh = self
            .store
            .refresh_token()
            .await?
            .ok_or(RenewalFailure::MissingRefreshCredential)?;

        let renewed = self.renewal.renew(&refresh).await?;
        let access = renewed.access.clone();
        self.store.set(renewed.merge_into(refresh)).await?;
        Ok(access)
    }

    async fn end_session(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear credentials after renewal failure");
        }
        self.terminator.terminate().await;
    }

    /// Return to idle and deliver the outcome to every queued request
    fn settle(&self, outcome: &RenewalOutcome) {
        let waiters = self.lock_state().settle();
        let count = waiters.len();
        for waiter in waiters {
            // A closed receiver means that caller went away
            let _ = waiter.send(outcome.clone());
        }
        debug!(waiters = count, success = outcome.is_ok(), "Renewal queue drained");
    }
}

/// Settles the cycle as abandoned if the renewal task is cancelled before settling
struct SettleGuard<'a> {
    inner: &'a Inner,
    settled: bool,
}

impl SettleGuard<'_> {
    fn settle(&mut self, outcome: &RenewalOutcome) {
        self.settled = true;
        self.inner.settle(outcome);
    }
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            error!("Credential renewal abandoned before settling");
            self.inner.settle(&Err(RenewalFailure::Abandoned));
        }
    }
}

fn replay_rejected(request: &TrackedRequest) -> ClientError {
    ClientError::ReplayRejected {
        method: request.descriptor().method,
        path: request.descriptor().path.clone(),
    }
}
