use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use tracing::debug;

use crate::domain::models::file::{FileData, Locator};

/// Process-local table of decoded file content, addressed by file id.
///
/// Registering the same id twice replaces the previous content, so
/// re-listing entries does not grow the table.
#[derive(Clone, Default)]
pub struct BlobRegistry {
    blobs: Arc<RwLock<HashMap<String, FileData>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: &str, file: FileData) -> Locator {
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(id.to_string(), file);
        Locator::Blob(id.to_string())
    }

    pub fn resolve(&self, id: &str) -> Option<FileData> {
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        blobs.get(id).cloned()
    }

    pub fn revoke(&self, id: &str) -> bool {
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        let removed = blobs.remove(id).is_some();
        if removed {
            debug!("Released blob {}", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_resolve_revoke() {
        let registry = BlobRegistry::new();
        let file = FileData::new(vec![1, 2, 3], "a.bin".to_string(), String::new());

        let locator = registry.register("file_a", file.clone());
        assert_eq!(locator, Locator::Blob("file_a".to_string()));
        assert_eq!(registry.resolve("file_a").unwrap().filename, "a.bin");

        registry.register("file_a", file);
        assert_eq!(registry.len(), 1);

        assert!(registry.revoke("file_a"));
        assert!(!registry.revoke("file_a"));
        assert!(registry.resolve("file_a").is_none());
        assert!(registry.is_empty());
    }
}
