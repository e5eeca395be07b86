//! Domain entities representing the client's core objects.

pub mod credential;
pub mod request;
pub mod user;

// Re-export commonly used types
pub use credential::{AccessToken, CredentialPair, RefreshToken, RenewedCredential};
pub use request::{
    ApiResponse, HttpMethod, RequestDescriptor, TrackedRequest, AUTHORIZATION, STATUS_UNAUTHORIZED,
};
pub use user::{UserAccount, UserProfile, UserRole};
