//! Client services: augmentation, the refresh coordinator and the session flows.

pub mod augment;
pub mod client;
pub mod refresh;
pub mod session;
pub mod traits;

// Re-export commonly used types
pub use augment::{augment, augment_with};
pub use client::AuthenticatedClient;
pub use refresh::{CoordinatorStatus, RefreshCoordinator, RefreshState, RenewalOutcome};
pub use session::{SessionService, SessionServiceConfig};
pub use traits::{RenewalEndpoint, SessionTerminator, Transport};
