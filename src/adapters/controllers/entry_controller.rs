use std::sync::Arc;

use axum::{
    body::Body,
    extract::{multipart::Field, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use tracing::{debug, info, warn};

use crate::{
    adapters::dto::entry_dto::{EntryResponse, SavedArchiveResponse, UpdateEntryRequest},
    application::{
        dto::{entry_draft::EntryDraft, entry_dto::EntryPatch},
        error::ApplicationError,
        services::{ContentResolver, DownloadSink},
    },
    domain::{config::catalog::CatalogConfig, models::file::FileData},
    services::{ArchiveBuilder, EntryService},
};

const ARCHIVE_CONTENT_TYPE: &str = "application/zstd";

pub struct EntryController;

async fn read_text(field: Field<'_>, name: &str) -> Result<String, ApplicationError> {
    field.text().await.map_err(|e| {
        warn!("Invalid {} field: {}", name, e);
        ApplicationError::BadRequest("Invalid request data".to_string())
    })
}

/// Reads a file part. A part sent for an empty file input (no file name and
/// no content) yields `None`.
async fn read_file(field: Field<'_>) -> Result<Option<FileData>, ApplicationError> {
    let filename = field.file_name().unwrap_or("").to_string();
    let mime_type = field.content_type().unwrap_or("").to_string();
    let bytes = field.bytes().await.map_err(|e| {
        warn!("Cannot read bytes of {}: {}", filename, e);
        ApplicationError::BadRequest("Invalid file data".to_string())
    })?;

    if filename.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    let filename = if filename.is_empty() {
        "unnamed".to_string()
    } else {
        filename
    };
    Ok(Some(FileData::new(bytes.to_vec(), filename, mime_type)))
}

/// Quote and control characters cannot appear in the header value.
fn disposition_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect()
}

fn attachment(
    content_type: &str,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<Response, ApplicationError> {
    let content_type = if content_type.is_empty() {
        "application/octet-stream"
    } else {
        content_type
    };
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", disposition_name(file_name)),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApplicationError::InternalError(e.to_string()))
}

impl EntryController {
    /// GET /api/v1/entries
    pub async fn list_entries(
        State(entry_service): State<Arc<EntryService>>,
    ) -> Result<Json<Vec<EntryResponse>>, ApplicationError> {
        let entries = entry_service.list().await?;
        Ok(Json(entries.iter().map(EntryResponse::from).collect()))
    }

    /// POST /api/v1/entries
    /// Multipart fields: `title`, `description`, `preview` (image), `files` (repeatable)
    pub async fn create_entry(
        State(config): State<Arc<CatalogConfig>>,
        State(entry_service): State<Arc<EntryService>>,
        mut multipart: Multipart,
    ) -> Result<(StatusCode, Json<EntryResponse>), ApplicationError> {
        let mut draft = EntryDraft::new(config.max_associated_files);

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!("Invalid multipart data: {}", e);
            ApplicationError::BadRequest("Invalid request format".to_string())
        })? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "title" => draft.title = read_text(field, "title").await?,
                "description" => draft.description = read_text(field, "description").await?,
                "preview" => {
                    if let Some(file) = read_file(field).await? {
                        draft.set_preview(file)?;
                    }
                }
                "files" if !draft.can_add_files() => {
                    info!(
                        "Dropped file beyond the limit of {} associated files",
                        config.max_associated_files
                    );
                }
                "files" => {
                    if let Some(file) = read_file(field).await? {
                        draft.add_files([file]);
                    }
                }
                _ => {}
            }
        }

        debug!(
            "Creating entry with {} associated files",
            draft.associated_files().len()
        );
        let new_entry = draft.submit()?;
        let created = entry_service.add(new_entry).await?;

        Ok((StatusCode::CREATED, Json(EntryResponse::from(&created))))
    }

    /// PATCH /api/v1/entries/{id}
    /// Only title and description can change.
    pub async fn update_entry(
        State(entry_service): State<Arc<EntryService>>,
        Path(entry_id): Path<String>,
        Json(body): Json<UpdateEntryRequest>,
    ) -> Result<Json<EntryResponse>, ApplicationError> {
        let mut entry = entry_service.get(&entry_id).await?;

        let mut patch = EntryPatch::from(body);
        patch.sanitize();
        if patch.is_empty() {
            return Ok(Json(EntryResponse::from(&entry)));
        }

        if let Some(title) = patch.title {
            entry.title = title;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }

        let updated = entry_service.update(entry).await?;
        Ok(Json(EntryResponse::from(&updated)))
    }

    /// DELETE /api/v1/entries/{id}
    pub async fn delete_entry(
        State(entry_service): State<Arc<EntryService>>,
        Path(entry_id): Path<String>,
    ) -> Result<StatusCode, ApplicationError> {
        entry_service.remove(&entry_id).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /api/v1/entries/{id}/files/{file_id}
    pub async fn download_file(
        State(entry_service): State<Arc<EntryService>>,
        State(content_resolver): State<Arc<dyn ContentResolver>>,
        Path((entry_id, file_id)): Path<(String, String)>,
    ) -> Result<Response, ApplicationError> {
        let entry = entry_service.get(&entry_id).await?;
        let file = entry
            .find_file(&file_id)
            .ok_or(ApplicationError::NotFound)?;

        if !file.locator.is_resolvable() {
            return Err(ApplicationError::NotFound);
        }

        let bytes = match &file.file {
            Some(handle) => handle
                .read()
                .await
                .map_err(|e| ApplicationError::InternalError(e.to_string()))?,
            None => content_resolver.fetch(&file.locator).await?,
        };

        attachment(&file.mime_type, &file.name, bytes.to_vec())
    }

    /// GET /api/v1/entries/{id}/archive
    pub async fn download_archive(
        State(entry_service): State<Arc<EntryService>>,
        State(archive_builder): State<Arc<ArchiveBuilder>>,
        Path(entry_id): Path<String>,
    ) -> Result<Response, ApplicationError> {
        let entry = entry_service.get(&entry_id).await?;
        let archive = archive_builder.build_entry(&entry).await?;

        attachment(ARCHIVE_CONTENT_TYPE, &archive.file_name, archive.bytes)
    }

    /// POST /api/v1/entries/{id}/archive
    /// Builds the archive and saves it through the configured download sink.
    pub async fn save_archive(
        State(entry_service): State<Arc<EntryService>>,
        State(archive_builder): State<Arc<ArchiveBuilder>>,
        State(download_sink): State<Arc<dyn DownloadSink>>,
        Path(entry_id): Path<String>,
    ) -> Result<(StatusCode, Json<SavedArchiveResponse>), ApplicationError> {
        let entry = entry_service.get(&entry_id).await?;
        let archive = archive_builder.build_entry(&entry).await?;
        let location = archive_builder
            .save(&archive, download_sink.as_ref())
            .await?;

        Ok((
            StatusCode::CREATED,
            Json(SavedArchiveResponse {
                file_name: archive.file_name,
                location,
                size: archive.bytes.len() as u64,
                members: archive.members,
            }),
        ))
    }
}
