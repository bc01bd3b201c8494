use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    application::{error::ApplicationError, repositories::entry_store::EntryStore},
    domain::models::entry::StoredEntry,
    services::StorageError,
};

/// Process-memory store. The document is kept serialized so a corrupt
/// value behaves the same as it would on disk.
#[derive(Default)]
pub struct InMemoryEntryStore {
    raw: RwLock<Option<String>>,
    reject_writes: AtomicBool,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn raw(&self) -> Option<String> {
        self.raw.read().await.clone()
    }

    pub async fn set_raw(&self, raw: impl Into<String>) {
        *self.raw.write().await = Some(raw.into());
    }

    /// Makes every following write fail, as a full storage quota would.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn read_all(&self) -> Result<Vec<StoredEntry>, ApplicationError> {
        match self.raw.read().await.as_deref() {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(raw).map_err(StorageError::from)?),
        }
    }

    async fn write_all(&self, entries: &[StoredEntry]) -> Result<(), ApplicationError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("storage quota exceeded".to_string()).into());
        }
        let json = serde_json::to_string(entries).map_err(StorageError::from)?;
        *self.raw.write().await = Some(json);
        Ok(())
    }
}
