use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    application::services::{ContentResolver, DownloadSink},
    domain::config::catalog::CatalogConfig,
    services::{ArchiveBuilder, EntryService},
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<CatalogConfig>,
    pub entry_service: Arc<EntryService>,
    pub archive_builder: Arc<ArchiveBuilder>,
    pub content_resolver: Arc<dyn ContentResolver>,
    pub download_sink: Arc<dyn DownloadSink>,
}
