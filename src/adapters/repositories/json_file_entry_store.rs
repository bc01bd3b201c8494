use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::{
    application::{error::ApplicationError, repositories::entry_store::EntryStore},
    domain::models::entry::StoredEntry,
    services::StorageError,
};

/// Keeps the whole entry list as one JSON document at
/// `<dir>/<storage_key>.json`.
pub struct JsonFileEntryStore {
    path: PathBuf,
}

impl JsonFileEntryStore {
    pub fn new(dir: impl Into<PathBuf>, storage_key: &str) -> Self {
        Self {
            path: dir.into().join(format!("{}.json", storage_key)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl EntryStore for JsonFileEntryStore {
    async fn read_all(&self) -> Result<Vec<StoredEntry>, ApplicationError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No entry document at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::Unavailable(e.to_string()).into()),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries = serde_json::from_str(&raw).map_err(StorageError::from)?;
        Ok(entries)
    }

    async fn write_all(&self, entries: &[StoredEntry]) -> Result<(), ApplicationError> {
        let json = serde_json::to_vec(entries).map_err(StorageError::from)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            }
        }

        // Replace the document in one step so readers never see a partial write.
        let temp_path = self.path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&temp_path, &json).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::Unavailable(e.to_string()).into());
        }
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        debug!(
            "Wrote {} entries ({} bytes) to {}",
            entries.len(),
            json.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::demo_entries;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_document_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileEntryStore::new(dir.path(), "geodatabase_entries");
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_replaces_whole_document() {
        let dir = tempdir().unwrap();
        let store = JsonFileEntryStore::new(dir.path().join("nested"), "entries");

        let entries = demo_entries();
        store.write_all(&entries).await.unwrap();
        assert_eq!(store.read_all().await.unwrap().len(), 2);

        store.write_all(&entries[..1]).await.unwrap();
        let read = store.read_all().await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].id, "map_1");
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn document_uses_camel_case_fields() {
        let dir = tempdir().unwrap();
        let store = JsonFileEntryStore::new(dir.path(), "entries");
        store.write_all(&demo_entries()).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &json[0];
        assert_eq!(first["uploadDate"], "2023-10-26T10:00:00Z");
        assert_eq!(first["previewImage"]["type"], "image/png");
        assert_eq!(first["associatedFiles"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn corrupt_document_is_reported() {
        let dir = tempdir().unwrap();
        let store = JsonFileEntryStore::new(dir.path(), "entries");
        std::fs::write(store.path(), "[{\"id\": ").unwrap();

        assert!(matches!(
            store.read_all().await,
            Err(ApplicationError::StorageError(_))
        ));
    }
}
