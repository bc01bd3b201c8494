use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::{
    application::{error::ApplicationError, services::DownloadSink},
    services::StorageError,
};

/// Saves downloads into a directory on the local filesystem.
pub struct FsDownloadSink {
    dir: PathBuf,
}

impl FsDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for FsDownloadSink {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<String, ApplicationError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn saves_into_directory() {
        let dir = tempdir().unwrap();
        let sink = FsDownloadSink::new(dir.path().join("downloads"));

        let location = sink.save("lusaka_map_files.tar.zst", b"bundle").await.unwrap();

        assert!(location.ends_with("lusaka_map_files.tar.zst"));
        let saved = std::fs::read(dir.path().join("downloads/lusaka_map_files.tar.zst")).unwrap();
        assert_eq!(saved, b"bundle");
    }
}
