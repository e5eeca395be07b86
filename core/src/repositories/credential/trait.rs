//! Credential store trait defining the contract for holding the current credential pair.

use async_trait::async_trait;

use crate::domain::entities::credential::{CredentialPair, RefreshToken};
use crate::errors::StoreError;

/// Holder of the current access/refresh credentials
///
/// The refresh coordinator reads and mutates credentials only through this
/// trait and never keeps a private copy beyond a single operation.
/// Implementations decide where credentials live (memory, a file, a
/// platform keychain).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Current credential pair
    ///
    /// # Returns
    /// * `Ok(Some(pair))` - Signed in
    /// * `Ok(None)` - No credentials stored
    /// * `Err(StoreError)` - Storage could not be read
    async fn get(&self) -> Result<Option<CredentialPair>, StoreError>;

    /// Replace the stored pair
    async fn set(&self, pair: CredentialPair) -> Result<(), StoreError>;

    /// Remove all stored credentials; clearing an empty store succeeds
    async fn clear(&self) -> Result<(), StoreError>;

    /// Refresh credential of the stored pair, if both exist
    async fn refresh_token(&self) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self.get().await?.and_then(|pair| pair.refresh))
    }
}
