//! Bundles an entry's files into one `.tar.zst` download.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tar::{Builder, Header};
use tracing::{info, warn};

use crate::{
    application::{
        error::ApplicationError,
        services::{ContentResolver, DownloadSink},
    },
    domain::{
        config::catalog::DEFAULT_ARCHIVE_COMPRESSION_LEVEL,
        models::{entry::MapEntry, file::MapFile},
    },
    services::error::ArchiveError,
};

pub const ARCHIVE_SUFFIX: &str = "_files.tar.zst";

#[derive(Debug, Clone)]
pub struct Archive {
    pub file_name: String,
    /// Member names in the order they were appended.
    pub members: Vec<String>,
    pub bytes: Vec<u8>,
}

struct ArchiveMember {
    name: String,
    content: Arc<[u8]>,
}

impl ArchiveMember {
    fn text(name: String, text: String) -> Self {
        Self {
            name,
            content: Arc::from(text.into_bytes()),
        }
    }
}

pub struct ArchiveBuilder {
    resolver: Arc<dyn ContentResolver>,
    compression_level: i32,
}

impl ArchiveBuilder {
    pub fn new(resolver: Arc<dyn ContentResolver>) -> Self {
        Self {
            resolver,
            compression_level: DEFAULT_ARCHIVE_COMPRESSION_LEVEL,
        }
    }

    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    /// Builds the archive for `preview` followed by `files`.
    ///
    /// Every file yields a member: its real content, or a text placeholder
    /// when it has no backing content or could not be fetched. A failing
    /// file never aborts the archive.
    pub async fn build(
        &self,
        title: &str,
        preview: Option<&MapFile>,
        files: &[MapFile],
    ) -> Result<Archive, ArchiveError> {
        let inputs: Vec<&MapFile> = preview.into_iter().chain(files.iter()).collect();
        if inputs.is_empty() {
            return Err(ArchiveError::Empty);
        }

        let members = join_all(inputs.into_iter().map(|file| self.materialize(file))).await;
        let bytes = pack(&members, self.compression_level)?;

        let archive = Archive {
            file_name: archive_file_name(title),
            members: members.into_iter().map(|m| m.name).collect(),
            bytes,
        };
        info!(
            "Built archive {} with {} members ({} bytes)",
            archive.file_name,
            archive.members.len(),
            archive.bytes.len()
        );
        Ok(archive)
    }

    pub async fn build_entry(&self, entry: &MapEntry) -> Result<Archive, ArchiveError> {
        self.build(
            &entry.title,
            entry.preview_image.as_ref(),
            &entry.associated_files,
        )
        .await
    }

    /// Hands a built archive to the host download mechanism.
    pub async fn save(
        &self,
        archive: &Archive,
        sink: &dyn DownloadSink,
    ) -> Result<String, ApplicationError> {
        sink.save(&archive.file_name, &archive.bytes).await
    }

    async fn materialize(&self, file: &MapFile) -> ArchiveMember {
        let name = member_name(&file.name, &file.id);
        if !file.locator.is_resolvable() {
            return ArchiveMember::text(
                name,
                format!(
                    "This is a placeholder for the file: {}\nSize: {}",
                    file.name,
                    human_size(file.size)
                ),
            );
        }

        let fetched = match &file.file {
            Some(handle) => handle.read().await.map_err(|e| e.to_string()),
            None => self
                .resolver
                .fetch(&file.locator)
                .await
                .map_err(|e| e.to_string()),
        };

        match fetched {
            Ok(content) => ArchiveMember { name, content },
            Err(message) => {
                warn!("Could not download {}: {}", file.name, message);
                ArchiveMember::text(
                    format!("DOWNLOAD_ERROR_{}.txt", name),
                    format!(
                        "Failed to download file: {}\nError: {}",
                        file.name, message
                    ),
                )
            }
        }
    }
}

fn pack(members: &[ArchiveMember], compression_level: i32) -> Result<Vec<u8>, ArchiveError> {
    let mut buffer = Vec::new();
    let encoder = zstd::Encoder::new(&mut buffer, compression_level)
        .map_err(|e| ArchiveError::Compression(format!("zstd encoder: {}", e)))?;
    let mut builder = Builder::new(encoder);
    let mtime = Utc::now().timestamp().max(0) as u64;

    // Same-named members are all appended; extraction keeps the last one.
    for member in members {
        let mut header = Header::new_gnu();
        header.set_size(member.content.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(mtime);
        builder
            .append_data(&mut header, &member.name, &member.content[..])
            .map_err(|e| ArchiveError::Archive(format!("append '{}': {}", member.name, e)))?;
    }

    let encoder = builder
        .into_inner()
        .map_err(|e| ArchiveError::Archive(format!("tar finish: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| ArchiveError::Compression(format!("zstd finish: {}", e)))?;

    Ok(buffer)
}

/// Relative tar path for an uploaded file name. Root, `.` and `..`
/// components and NUL bytes are dropped; an empty result falls back to
/// `fallback`.
fn member_name(name: &str, fallback: &str) -> String {
    let cleaned: Vec<String> = name
        .split(['/', '\\'])
        .map(|part| part.replace('\0', ""))
        .filter(|part| !part.is_empty() && part != "." && part != "..")
        .collect();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.join("/")
    }
}

/// `"Lusaka Map (2023)"` becomes `"lusaka_map__2023__files.tar.zst"`.
pub fn archive_file_name(title: &str) -> String {
    let safe_title: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", safe_title, ARCHIVE_SUFFIX)
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
