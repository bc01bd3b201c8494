use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    application::{error::ApplicationError, services::ContentResolver},
    domain::models::file::Locator,
    services::{blob_registry::BlobRegistry, error::StorageError},
};

/// Resolves `blob:` locators from the registry and remote ones over HTTP.
pub struct LocatorResolver {
    client: Client,
    blobs: BlobRegistry,
}

impl LocatorResolver {
    pub fn new(blobs: BlobRegistry) -> Self {
        Self {
            client: Client::new(),
            blobs,
        }
    }

    async fn fetch_remote(&self, url: &str) -> Result<Arc<[u8]>, StorageError> {
        debug!("Fetching remote content from {}", url);
        let response = self.client.get(url).send().await?;

        if response.status().as_u16() == 404 {
            return Err(StorageError::NotFound(url.to_string()));
        }

        if !response.status().is_success() {
            return Err(StorageError::ProviderError(format!(
                "Download failed with status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        Ok(Arc::from(bytes.as_ref()))
    }
}

#[async_trait]
impl ContentResolver for LocatorResolver {
    async fn fetch(&self, locator: &Locator) -> Result<Arc<[u8]>, ApplicationError> {
        match locator {
            Locator::Blob(id) => {
                let file = self
                    .blobs
                    .resolve(id)
                    .ok_or_else(|| StorageError::NotFound(locator.to_string()))?;
                let bytes = file
                    .read()
                    .await
                    .map_err(|e| StorageError::Unavailable(e.to_string()))?;
                Ok(bytes)
            }
            Locator::Remote(url) => Ok(self.fetch_remote(url).await?),
            Locator::Placeholder => {
                Err(StorageError::NotFound("placeholder has no content".to_string()).into())
            }
        }
    }
}
