//! Refresh state and the waiter queue.

use tokio::sync::oneshot;

use crate::domain::entities::credential::AccessToken;
use crate::errors::RenewalFailure;

/// Outcome of one renewal cycle, shared by every request that waited on it
pub type RenewalOutcome = Result<AccessToken, RenewalFailure>;

/// Whether a renewal is currently in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// Read-only snapshot of the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorStatus {
    pub state: RefreshState,
    /// Requests waiting on the in-flight renewal
    pub queued: usize,
}

impl CoordinatorStatus {
    /// Idle with nothing queued
    pub fn is_settled(&self) -> bool {
        self.state == RefreshState::Idle && self.queued == 0
    }
}

/// What an unauthorized request must do after observing the state
pub(crate) enum Admission {
    /// The state was idle and is now refreshing; this caller runs the renewal
    Leader,
    /// A renewal is already in flight; wait for its outcome
    Waiter(oneshot::Receiver<RenewalOutcome>),
}

/// Refresh state plus waiter queue
///
/// Invariant: `waiters` is empty whenever `state` is `Idle`.
pub(crate) struct CoordinatorState {
    state: RefreshState,
    waiters: Vec<oneshot::Sender<RenewalOutcome>>,
}

impl CoordinatorState {
    pub(crate) fn new() -> Self {
        Self {
            state: RefreshState::Idle,
            waiters: Vec::new(),
        }
    }

    /// Observe the state and act on it in one step
    pub(crate) fn admit(&mut self) -> Admission {
        match self.state {
            RefreshState::Idle => {
                self.state = RefreshState::Refreshing;
                Admission::Leader
            }
            RefreshState::Refreshing => {
                let (tx, rx) = oneshot::channel();
                self.waiters.push(tx);
                Admission::Waiter(rx)
            }
        }
    }

    /// Return to idle and hand back every queued waiter
    pub(crate) fn settle(&mut self) -> Vec<oneshot::Sender<RenewalOutcome>> {
        self.state = RefreshState::Idle;
        std::mem::take(&mut self.waiters)
    }

    pub(crate) fn status(&self) -> CoordinatorStatus {
        CoordinatorStatus {
            state: self.state,
            queued: self.waiters.len(),
        }
    }
}
