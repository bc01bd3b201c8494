use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    application::dto::entry_dto::EntryPatch,
    domain::models::{
        entry::{MapEntry, StoredEntry},
        file::{Locator, MapFile, StoredFile},
    },
};

#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub url: String,
}

fn file_route(entry_id: &str, file_id: &str) -> String {
    format!("/api/v1/entries/{}/files/{}", entry_id, file_id)
}

impl FileResponse {
    pub fn from_working(entry_id: &str, file: &MapFile) -> Self {
        let url = match &file.locator {
            Locator::Blob(_) => file_route(entry_id, &file.id),
            other => other.to_string(),
        };
        Self {
            id: file.id.clone(),
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size,
            url,
        }
    }

    pub fn from_stored(entry_id: &str, file: &StoredFile) -> Self {
        let url = if file.data.starts_with("data:") {
            file_route(entry_id, &file.id)
        } else {
            file.data.clone()
        };
        Self {
            id: file.id.clone(),
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size,
            url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "uploadDate")]
    pub upload_date: DateTime<Utc>,
    #[serde(rename = "previewImage")]
    pub preview_image: Option<FileResponse>,
    #[serde(rename = "associatedFiles")]
    pub associated_files: Vec<FileResponse>,
    #[serde(rename = "archiveUrl")]
    pub archive_url: String,
}

impl From<&MapEntry> for EntryResponse {
    fn from(entry: &MapEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            upload_date: entry.upload_date,
            preview_image: entry
                .preview_image
                .as_ref()
                .map(|f| FileResponse::from_working(&entry.id, f)),
            associated_files: entry
                .associated_files
                .iter()
                .map(|f| FileResponse::from_working(&entry.id, f))
                .collect(),
            archive_url: format!("/api/v1/entries/{}/archive", entry.id),
        }
    }
}

impl From<&StoredEntry> for EntryResponse {
    fn from(entry: &StoredEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            upload_date: entry.upload_date,
            preview_image: entry
                .preview_image
                .as_ref()
                .map(|f| FileResponse::from_stored(&entry.id, f)),
            associated_files: entry
                .associated_files
                .iter()
                .map(|f| FileResponse::from_stored(&entry.id, f))
                .collect(),
            archive_url: format!("/api/v1/entries/{}/archive", entry.id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateEntryRequest> for EntryPatch {
    fn from(value: UpdateEntryRequest) -> Self {
        EntryPatch {
            title: value.title,
            description: value.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SavedArchiveResponse {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub location: String,
    pub size: u64,
    pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::demo_entries;

    #[test]
    fn stored_entry_response_exposes_locators_not_payloads() {
        let entry = &demo_entries()[0];
        let response = EntryResponse::from(entry);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json["previewImage"]["url"],
            "https://picsum.photos/seed/lusaka/800/600"
        );
        assert_eq!(json["associatedFiles"][0]["url"], "#");
        assert_eq!(json["archiveUrl"], "/api/v1/entries/map_1/archive");
        assert!(json["associatedFiles"][0].get("data").is_none());
    }

    #[test]
    fn embedded_files_point_at_file_route() {
        let file = StoredFile {
            id: "file_9".to_string(),
            name: "a.csv".to_string(),
            mime_type: "text/csv".to_string(),
            size: 1,
            data: "data:text/csv;base64,YQ==".to_string(),
        };
        let response = FileResponse::from_stored("map_3", &file);
        assert_eq!(response.url, "/api/v1/entries/map_3/files/file_9");
    }
}
