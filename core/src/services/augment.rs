//! Request augmentation: attaching the access credential to outbound requests.

use crate::domain::entities::credential::{AccessToken, CredentialPair};
use crate::domain::entities::request::{RequestDescriptor, AUTHORIZATION};

/// Attach the pair's access credential as a bearer header
///
/// Without a credential the descriptor passes through unchanged; that is
/// not an error at this stage.
pub fn augment(descriptor: &RequestDescriptor, credentials: Option<&CredentialPair>) -> RequestDescriptor {
    match credentials {
        Some(pair) => augment_with(descriptor, &pair.access),
        None => descriptor.clone(),
    }
}

/// Attach a specific access credential, replacing any existing authorization header
pub fn augment_with(descriptor: &RequestDescriptor, access: &AccessToken) -> RequestDescriptor {
    descriptor
        .clone()
        .with_header(AUTHORIZATION, format!("Bearer {}", access.as_str()))
}
