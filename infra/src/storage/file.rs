//! File-based credential storage with owner-only permissions.

use async_trait::async_trait;
use cn_core::domain::entities::credential::CredentialPair;
use cn_core::errors::StoreError;
use cn_core::repositories::CredentialStore;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Credential store persisting the pair as JSON
///
/// A missing or empty file means no credentials. Each write goes to its own
/// staging file in the same directory, created owner-only before any
/// content is written, and is renamed into place, so readers never see a
/// partial document. Writes through one store and its clones are
/// serialized.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileCredentialStore {
    /// Create storage at the specified path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(path: &Path, error: impl std::fmt::Display) -> StoreError {
        StoreError::Io(format!("{}: {}", path.display(), error))
    }

    fn read(&self) -> Result<Option<CredentialPair>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn write(&self, pair: &CredentialPair) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| Self::io_error(dir, e))?;

        let content =
            serde_json::to_vec_pretty(pair).map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Unique per write; tempfile creates it with 0600 on Unix
        let mut staging = tempfile::Builder::new()
            .prefix(".credentials-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| Self::io_error(dir, e))?;
        staging
            .write_all(&content)
            .and_then(|()| staging.as_file().sync_all())
            .map_err(|e| Self::io_error(staging.path(), e))?;

        staging
            .persist(&self.path)
            .map_err(|e| Self::io_error(&self.path, e.error))?;
        debug!(path = %self.path.display(), "Credentials saved");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<CredentialPair>, StoreError> {
        self.read()
    }

    async fn set(&self, pair: CredentialPair) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(&pair)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Credentials removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&self.path, e)),
        }
    }
}
