use async_trait::async_trait;

use crate::application::error::ApplicationError;

/// Host mechanism that saves a produced download.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Saves `bytes` under `file_name` and returns where it ended up.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<String, ApplicationError>;
}
