use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use futures::future::{try_join, try_join_all};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        dto::entry_dto::NewEntry, error::ApplicationError,
        repositories::entry_store::EntryStore,
    },
    domain::models::entry::{Entry, MapEntry, StoredEntry},
    services::{blob_registry::BlobRegistry, codec, error::CodecError},
};

/// CRUD over catalog entries.
///
/// Files are encoded on the way in and decoded into blobs on the way out;
/// every operation first waits `latency` to mimic a remote backend.
pub struct EntryService {
    store: Arc<dyn EntryStore>,
    blobs: BlobRegistry,
    latency: Duration,
}

impl EntryService {
    pub fn new(store: Arc<dyn EntryStore>, blobs: BlobRegistry, latency: Duration) -> Self {
        Self {
            store,
            blobs,
            latency,
        }
    }

    pub fn blobs(&self) -> &BlobRegistry {
        &self.blobs
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Reads the stored document. A store that cannot be read or parsed
    /// looks empty.
    async fn load(&self) -> Vec<StoredEntry> {
        match self.store.read_all().await {
            Ok(entries) => entries,
            Err(e) => {
                error!("Error reading stored entries: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<MapEntry>, ApplicationError> {
        self.simulate_latency().await;

        let stored = self.load().await;
        let mut entries = stored
            .iter()
            .map(|entry| decode_entry(entry, &self.blobs))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));

        debug!("Listed {} entries", entries.len());
        Ok(entries)
    }

    pub async fn get(&self, id: &str) -> Result<MapEntry, ApplicationError> {
        self.simulate_latency().await;

        let stored = self.load().await;
        let entry = stored
            .iter()
            .find(|e| e.id == id)
            .ok_or(ApplicationError::NotFound)?;
        Ok(decode_entry(entry, &self.blobs)?)
    }

    /// Encodes every file, then prepends the entry to the stored document.
    /// Nothing is persisted unless all encodings succeed.
    pub async fn add(&self, new_entry: NewEntry) -> Result<StoredEntry, ApplicationError> {
        self.simulate_latency().await;

        let NewEntry {
            title,
            description,
            preview,
            associated_files,
        } = new_entry;

        let (preview_image, associated_files) = try_join(
            codec::encode(&preview),
            try_join_all(associated_files.iter().map(|file| codec::encode(file))),
        )
        .await
        .map_err(|e| {
            error!("Failed to add map entry: {}", e);
            ApplicationError::from(e)
        })?;

        let mut entries = self.load().await;
        let entry = StoredEntry {
            id: format!("map_{}", Uuid::new_v4()),
            title,
            description,
            upload_date: next_upload_date(&entries),
            preview_image: Some(preview_image),
            associated_files,
        };
        entries.insert(0, entry.clone());

        self.store.write_all(&entries).await.map_err(|e| {
            error!("Error writing stored entries: {}", e);
            e
        })?;

        info!(
            "Added entry {} '{}' with {} associated files",
            entry.id,
            entry.title,
            entry.associated_files.len()
        );
        Ok(entry)
    }

    /// Removes the entry with `id` and releases its blobs. Unknown ids are
    /// ignored.
    pub async fn remove(&self, id: &str) -> Result<(), ApplicationError> {
        self.simulate_latency().await;

        let (removed, kept): (Vec<StoredEntry>, Vec<StoredEntry>) =
            self.load().await.into_iter().partition(|e| e.id == id);

        if removed.is_empty() {
            debug!("Entry {} not found, nothing to remove", id);
        }

        if let Err(e) = self.store.write_all(&kept).await {
            error!("Error writing stored entries: {}", e);
        }

        for entry in &removed {
            for file_id in entry.file_ids() {
                self.blobs.revoke(&file_id);
            }
            info!("Removed entry {} '{}'", entry.id, entry.title);
        }
        Ok(())
    }

    /// Overwrites title and description of the stored entry. File changes in
    /// `entry` are ignored. Returns `entry` as given.
    pub async fn update(&self, entry: MapEntry) -> Result<MapEntry, ApplicationError> {
        self.simulate_latency().await;
        warn!("update is a stub and does not handle file updates");

        let mut entries = self.load().await;
        match entries.iter().position(|e| e.id == entry.id) {
            Some(index) => {
                entries[index].title = entry.title.clone();
                entries[index].description = entry.description.clone();
                if let Err(e) = self.store.write_all(&entries).await {
                    error!("Error writing stored entries: {}", e);
                }
            }
            None => debug!("Entry {} not found, nothing to update", entry.id),
        }

        Ok(entry)
    }

    /// Writes `entries` when the store holds nothing yet.
    pub async fn seed_if_empty(
        &self,
        entries: Vec<StoredEntry>,
    ) -> Result<usize, ApplicationError> {
        if !self.load().await.is_empty() {
            return Ok(0);
        }
        let count = entries.len();
        self.store.write_all(&entries).await?;
        info!("Seeded store with {} demo entries", count);
        Ok(count)
    }

    pub async fn entry_count(&self) -> usize {
        self.load().await.len()
    }
}

fn decode_entry(entry: &StoredEntry, blobs: &BlobRegistry) -> Result<MapEntry, CodecError> {
    let preview_image = entry
        .preview_image
        .as_ref()
        .map(|file| codec::decode(file, blobs))
        .transpose()?;
    let associated_files = entry
        .associated_files
        .iter()
        .map(|file| codec::decode(file, blobs))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Entry {
        id: entry.id.clone(),
        title: entry.title.clone(),
        description: entry.description.clone(),
        upload_date: entry.upload_date,
        preview_image,
        associated_files,
    })
}

/// Creation times stay strictly increasing even if the clock has not moved
/// since the newest stored entry.
fn next_upload_date(entries: &[StoredEntry]) -> DateTime<Utc> {
    let now = Utc::now();
    match entries.iter().map(|e| e.upload_date).max() {
        Some(latest) if latest >= now => latest + chrono::Duration::milliseconds(1),
        _ => now,
    }
}
