//! Value objects exchanged with the accounts API.

pub mod auth_request;
pub mod auth_response;

// Re-export commonly used types
pub use auth_request::{LoginRequest, SignupRequest};
pub use auth_response::{AuthResponse, AuthSession};
