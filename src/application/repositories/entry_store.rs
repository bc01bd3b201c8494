use async_trait::async_trait;

use crate::{application::error::ApplicationError, domain::models::entry::StoredEntry};

/// A single durable slot holding the whole ordered list of entries.
///
/// There is no incremental primitive: callers read the full sequence,
/// modify it in memory and write the full sequence back.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn read_all(&self) -> Result<Vec<StoredEntry>, ApplicationError>;
    async fn write_all(&self, entries: &[StoredEntry]) -> Result<(), ApplicationError>;
}
