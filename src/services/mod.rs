pub mod archive;
pub mod blob_registry;
pub mod codec;
pub mod entry_service;
mod error;
pub mod locator_resolver;

pub use archive::{Archive, ArchiveBuilder};
pub use blob_registry::BlobRegistry;
pub use entry_service::EntryService;
pub use error::{ArchiveError, CodecError, StorageError};
pub use locator_resolver::LocatorResolver;
