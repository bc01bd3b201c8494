use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Storage medium unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Remote provider error: {0}")]
    ProviderError(String),
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(msg) => {
                ApplicationError::StorageError(format!("not found: {}", msg))
            }
            StorageError::NetworkError(msg)
            | StorageError::Unavailable(msg)
            | StorageError::Serialization(msg)
            | StorageError::ProviderError(msg) => ApplicationError::StorageError(msg),
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StorageError::NetworkError("Request timeout".to_string())
        } else if error.is_connect() {
            StorageError::NetworkError(format!("Connection failed: {}", error))
        } else if let Some(status) = error.status() {
            match status.as_u16() {
                404 => StorageError::NotFound(error.to_string()),
                _ => StorageError::ProviderError(error.to_string()),
            }
        } else {
            StorageError::NetworkError(error.to_string())
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::Serialization(error.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to read file '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed file encoding: {0}")]
    Malformed(String),
}

impl From<CodecError> for ApplicationError {
    fn from(error: CodecError) -> Self {
        match error {
            CodecError::Read { .. } => ApplicationError::InternalError(error.to_string()),
            CodecError::Malformed(msg) => ApplicationError::MalformedInput(msg),
        }
    }
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("No files to download.")]
    Empty,

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Compression error: {0}")]
    Compression(String),
}

impl From<ArchiveError> for ApplicationError {
    fn from(error: ArchiveError) -> Self {
        match error {
            ArchiveError::Empty => ApplicationError::BadRequest(error.to_string()),
            ArchiveError::Archive(msg) | ArchiveError::Compression(msg) => {
                ApplicationError::InternalError(format!("Archive error: {}", msg))
            }
        }
    }
}
