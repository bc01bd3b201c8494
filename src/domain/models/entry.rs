use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::file::{MapFile, StoredFile};

/// One cataloged map dataset. `F` is the file representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "F: Deserialize<'de>"))]
pub struct Entry<F> {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "uploadDate")]
    pub upload_date: DateTime<Utc>,
    #[serde(rename = "previewImage", default)]
    pub preview_image: Option<F>,
    #[serde(rename = "associatedFiles", default)]
    pub associated_files: Vec<F>,
}

pub type StoredEntry = Entry<StoredFile>;
pub type MapEntry = Entry<MapFile>;

impl<F> Entry<F> {
    /// Preview first, then associated files in order.
    pub fn files(&self) -> impl Iterator<Item = &F> {
        self.preview_image.iter().chain(self.associated_files.iter())
    }
}

impl StoredEntry {
    pub fn file_ids(&self) -> Vec<String> {
        self.files().map(|f| f.id.clone()).collect()
    }
}

impl MapEntry {
    pub fn find_file(&self, file_id: &str) -> Option<&MapFile> {
        self.files().find(|f| f.id == file_id)
    }
}
