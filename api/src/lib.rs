//! CampusNest marketplace client
//!
//! Composition root wiring `cn_infra` collaborators into `cn_core`, plus
//! the `campus-nest` command line.

pub mod app;
pub mod cli;
pub mod telemetry;

pub use app::{MarketplaceClient, MarketplaceClientBuilder};
pub use cn_core::{AuthSession, ClientError, ClientResult, SignupRequest, UserProfile, UserRole};
pub use cn_infra::SessionEvent;
