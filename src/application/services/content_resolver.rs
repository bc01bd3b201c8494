use std::sync::Arc;

use async_trait::async_trait;

use crate::{application::error::ApplicationError, domain::models::file::Locator};

#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Fetches the bytes behind a working-form locator.
    async fn fetch(&self, locator: &Locator) -> Result<Arc<[u8]>, ApplicationError>;
}
