//! In-memory credential store

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::credential::CredentialPair;
use crate::errors::StoreError;

use super::r#trait::CredentialStore;

/// Process-local credential store
///
/// Clones share the same underlying slot. Writes and clears are counted so
/// callers can observe how often the session changed.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    pair: Arc<RwLock<Option<CredentialPair>>>,
    writes: Arc<AtomicUsize>,
    clears: Arc<AtomicUsize>,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `pair`
    pub fn with_pair(pair: CredentialPair) -> Self {
        Self {
            pair: Arc::new(RwLock::new(Some(pair))),
            ..Self::default()
        }
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of `clear` calls
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self) -> Result<Option<CredentialPair>, StoreError> {
        Ok(self.pair.read().await.clone())
    }

    async fn set(&self, pair: CredentialPair) -> Result<(), StoreError> {
        *self.pair.write().await = Some(pair);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.pair.write().await = None;
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
