use std::{fmt, path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_LOCATOR: &str = "#";
pub const BLOB_SCHEME: &str = "blob:";

/// Where the bytes of an uploaded file live.
#[derive(Debug, Clone)]
pub enum FileContent {
    Memory(Arc<[u8]>),
    Disk(PathBuf),
}

/// A binary file handle as handed to the catalog by the presentation layer.
#[derive(Debug, Clone)]
pub struct FileData {
    pub content: FileContent,
    pub filename: String,
    pub mime_type: String,
}

impl FileData {
    pub fn new(content: Vec<u8>, filename: String, mime_type: String) -> Self {
        Self {
            content: FileContent::Memory(Arc::from(content)),
            filename,
            mime_type,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>, filename: String, mime_type: String) -> Self {
        Self {
            content: FileContent::Disk(path.into()),
            filename,
            mime_type,
        }
    }

    /// Reads the full content into memory.
    pub async fn read(&self) -> std::io::Result<Arc<[u8]>> {
        match &self.content {
            FileContent::Memory(bytes) => Ok(bytes.clone()),
            FileContent::Disk(path) => {
                let bytes = tokio::fs::read(path).await?;
                Ok(Arc::from(bytes))
            }
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Durable form of a file: the full content travels inside `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub data: String,
}

/// Reference to the binary content of a working-form file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Content registered in this process, keyed by file id.
    Blob(String),
    /// Content reachable over HTTP.
    Remote(String),
    /// Seed data with nothing behind it.
    Placeholder,
}

impl Locator {
    pub fn parse(value: &str) -> Option<Self> {
        if value == PLACEHOLDER_LOCATOR {
            Some(Locator::Placeholder)
        } else if let Some(id) = value.strip_prefix(BLOB_SCHEME) {
            Some(Locator::Blob(id.to_string()))
        } else if value.starts_with("http://") || value.starts_with("https://") {
            Some(Locator::Remote(value.to_string()))
        } else {
            None
        }
    }

    pub fn is_resolvable(&self) -> bool {
        !matches!(self, Locator::Placeholder)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Blob(id) => write!(f, "{}{}", BLOB_SCHEME, id),
            Locator::Remote(url) => f.write_str(url),
            Locator::Placeholder => f.write_str(PLACEHOLDER_LOCATOR),
        }
    }
}

/// Working form of a file, valid only within the current process.
#[derive(Debug, Clone)]
pub struct MapFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub locator: Locator,
    pub file: Option<FileData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_parses_known_forms() {
        assert_eq!(Locator::parse("#"), Some(Locator::Placeholder));
        assert_eq!(
            Locator::parse("blob:file_1"),
            Some(Locator::Blob("file_1".to_string()))
        );
        assert_eq!(
            Locator::parse("https://picsum.photos/seed/lusaka/800/600"),
            Some(Locator::Remote(
                "https://picsum.photos/seed/lusaka/800/600".to_string()
            ))
        );
        assert_eq!(Locator::parse("ftp://example.org/a.shp"), None);
    }

    #[test]
    fn locator_display_matches_parse() {
        let locator = Locator::Blob("file_42".to_string());
        assert_eq!(locator.to_string(), "blob:file_42");
        assert_eq!(Locator::parse(&locator.to_string()), Some(locator));
        assert!(!Locator::Placeholder.is_resolvable());
    }

    #[tokio::test]
    async fn read_reports_missing_disk_file() {
        let file = FileData::from_path(
            "/definitely/not/here.shp",
            "here.shp".to_string(),
            "application/octet-stream".to_string(),
        );
        assert!(file.read().await.is_err());
    }

    #[test]
    fn stored_file_uses_type_key() {
        let file = StoredFile {
            id: "file_1".to_string(),
            name: "a.txt".to_string(),
            mime_type: "text/plain".to_string(),
            size: 1,
            data: "data:text/plain;base64,YQ==".to_string(),
        };
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["type"], "text/plain");
        assert!(json.get("mime_type").is_none());
    }
}
