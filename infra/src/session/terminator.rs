//! Session terminator that asks the UI to return to sign-in

use async_trait::async_trait;
use cn_core::repositories::CredentialStore;
use cn_core::services::traits::SessionTerminator;
use cn_shared::ApiConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Session state published to the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Nothing to do
    Active,
    /// Credentials are gone; navigate to `redirect_to`
    SignInRequired { redirect_to: String },
}

/// Clears the credential store and publishes [`SessionEvent::SignInRequired`]
///
/// Subscribers see the latest event only, so repeated terminations collapse
/// into one redirect.
pub struct RedirectingTerminator {
    store: Arc<dyn CredentialStore>,
    redirect_to: String,
    events: watch::Sender<SessionEvent>,
    terminations: AtomicUsize,
}

impl RedirectingTerminator {
    pub fn new(store: Arc<dyn CredentialStore>, redirect_to: impl Into<String>) -> Self {
        let (events, _) = watch::channel(SessionEvent::Active);
        Self {
            store,
            redirect_to: redirect_to.into(),
            events,
            terminations: AtomicUsize::new(0),
        }
    }

    /// Redirect to the configured sign-in route
    pub fn from_config(store: Arc<dyn CredentialStore>, config: &ApiConfig) -> Self {
        Self::new(store, config.sign_in_route.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Latest published event
    pub fn current(&self) -> SessionEvent {
        self.events.borrow().clone()
    }

    /// Mark the session active again after a successful sign-in
    pub fn reset(&self) {
        self.events.send_replace(SessionEvent::Active);
    }

    /// Number of times the session was terminated
    pub fn terminations(&self) -> usize {
        self.terminations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionTerminator for RedirectingTerminator {
    async fn terminate(&self) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear credentials while ending session");
        }
        let count = self.terminations.fetch_add(1, Ordering::SeqCst) + 1;
        self.events.send_replace(SessionEvent::SignInRequired {
            redirect_to: self.redirect_to.clone(),
        });
        info!(redirect_to = %self.redirect_to, terminations = count, "Session ended, sign-in required");
    }
}

impl std::fmt::Debug for RedirectingTerminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectingTerminator")
            .field("redirect_to", &self.redirect_to)
            .field("terminations", &self.terminations())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cn_core::domain::entities::credential::CredentialPair;
    use cn_core::repositories::InMemoryCredentialStore;

    #[tokio::test]
    async fn test_terminate_clears_and_redirects() {
        let store = InMemoryCredentialStore::with_pair(CredentialPair::with_refresh("T1", "R1"));
        let terminator = RedirectingTerminator::new(Arc::new(store.clone()), "/signin");
        let mut events = terminator.subscribe();
        assert_eq!(*events.borrow(), SessionEvent::Active);

        terminator.terminate().await;

        events.changed().await.unwrap();
        assert_eq!(
            *events.borrow(),
            SessionEvent::SignInRequired {
                redirect_to: "/signin".into()
            }
        );
        assert!(store.get().await.unwrap().is_none());
        assert_eq!(terminator.terminations(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_terminations_are_harmless() {
        let store = InMemoryCredentialStore::new();
        let terminator = Arc::new(RedirectingTerminator::from_config(
            Arc::new(store.clone()),
            &ApiConfig::default(),
        ));

        let calls: Vec<_> = (0..8)
            .map(|_| {
                let terminator = terminator.clone();
                tokio::spawn(async move { terminator.terminate().await })
            })
            .collect();
        for call in calls {
            call.await.unwrap();
        }

        assert_eq!(terminator.terminations(), 8);
        assert_eq!(store.clear_count(), 8);
        assert_eq!(
            terminator.current(),
            SessionEvent::SignInRequired {
                redirect_to: "/signin".into()
            }
        );

        terminator.reset();
        assert_eq!(terminator.current(), SessionEvent::Active);
    }
}
