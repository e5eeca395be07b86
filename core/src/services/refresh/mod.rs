//! Refresh coordinator module
//!
//! Ensures that when many in-flight requests discover an expired access
//! credential at the same time, exactly one renewal call is made and every
//! affected request is replayed with the renewed credential, or rejected
//! together when renewal fails.

mod coordinator;
mod state;

#[cfg(test)]
pub(crate) mod tests;

pub use coordinator::RefreshCoordinator;
pub use state::{CoordinatorStatus, RefreshState, RenewalOutcome};
