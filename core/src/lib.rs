//! # CampusNest Core
//!
//! Core client logic for the CampusNest marketplace API.
//! This crate contains the credential and request entities, the collaborator
//! traits, the single-flight refresh coordinator and the authenticated
//! client built on top of it. It performs no I/O of its own; concrete
//! transports and stores live in `cn_infra`.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    AccessToken, ApiResponse, CredentialPair, HttpMethod, RefreshToken, RenewedCredential,
    RequestDescriptor, TrackedRequest, UserAccount, UserProfile, UserRole,
};
pub use domain::value_objects::{AuthResponse, AuthSession, LoginRequest, SignupRequest};
pub use errors::{ClientError, ClientResult, RenewalError, RenewalFailure, StoreError, TransportError};
pub use repositories::{CredentialStore, InMemoryCredentialStore};
pub use services::{
    AuthenticatedClient, CoordinatorStatus, RefreshCoordinator, RefreshState, RenewalEndpoint,
    SessionService, SessionServiceConfig, SessionTerminator, Transport,
};
