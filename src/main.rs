use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch},
    Router,
};
use geo_catalog::{
    adapters::{
        controllers::{entry_controller::EntryController, health_controller::HealthController},
        fs_download_sink::FsDownloadSink,
        repositories::JsonFileEntryStore,
        state::AppState,
    },
    application::{
        repositories::entry_store::EntryStore,
        services::{ContentResolver, DownloadSink},
    },
    domain::{config::catalog::CatalogConfig, seed::demo_entries},
    services::{ArchiveBuilder, BlobRegistry, EntryService, LocatorResolver},
};
use tower_http::cors::{Any, CorsLayer};

fn load_config() -> CatalogConfig {
    let defaults = CatalogConfig::default();

    CatalogConfig {
        store_dir: std::env::var("STORE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.store_dir),
        storage_key: std::env::var("STORAGE_KEY").unwrap_or(defaults.storage_key),
        download_dir: std::env::var("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir),
        simulated_latency: std::env::var("SIMULATED_LATENCY_MS")
            .map(|v| {
                Duration::from_millis(
                    v.parse::<u64>()
                        .expect("SIMULATED_LATENCY_MS must be a number of milliseconds"),
                )
            })
            .unwrap_or(defaults.simulated_latency),
        max_associated_files: std::env::var("MAX_ASSOCIATED_FILES")
            .map(|v| {
                v.parse::<usize>()
                    .expect("MAX_ASSOCIATED_FILES must be a valid usize")
            })
            .unwrap_or(defaults.max_associated_files),
        seed_demo_entries: std::env::var("SEED_DEMO_ENTRIES")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.seed_demo_entries),
        archive_compression_level: std::env::var("ARCHIVE_COMPRESSION_LEVEL")
            .map(|v| {
                v.parse::<i32>()
                    .expect("ARCHIVE_COMPRESSION_LEVEL must be a zstd level")
            })
            .unwrap_or(defaults.archive_compression_level),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Arc::new(load_config());

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid u16");

    tracing::info!(
        "Starting geo-catalog with store {}/{}.json",
        config.store_dir.display(),
        config.storage_key
    );

    // Configure CORS
    let cors = if let Ok(allowed_origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
        let origins: Vec<_> = allowed_origins
            .split(',')
            .map(|s| s.trim().parse().expect("Invalid CORS origin"))
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Allow all origins if not specified (only for development)
        CorsLayer::permissive()
    };

    let blobs = BlobRegistry::new();
    let store = Arc::new(JsonFileEntryStore::new(
        config.store_dir.clone(),
        &config.storage_key,
    )) as Arc<dyn EntryStore>;
    let entry_service = Arc::new(EntryService::new(
        store,
        blobs.clone(),
        config.simulated_latency,
    ));

    if config.seed_demo_entries {
        match entry_service.seed_if_empty(demo_entries()).await {
            Ok(0) => tracing::info!("Store already has entries, skipping demo seed"),
            Ok(count) => tracing::info!("Seeded {} demo entries", count),
            Err(e) => tracing::error!("Failed to seed demo entries: {}", e),
        }
    }

    let content_resolver = Arc::new(LocatorResolver::new(blobs)) as Arc<dyn ContentResolver>;
    let app_state = AppState {
        archive_builder: Arc::new(
            ArchiveBuilder::new(content_resolver.clone())
                .with_compression_level(config.archive_compression_level),
        ),
        download_sink: Arc::new(FsDownloadSink::new(config.download_dir.clone()))
            as Arc<dyn DownloadSink>,
        content_resolver,
        entry_service,
        config,
    };

    let router = Router::new()
        .route("/api/v1/health", get(HealthController::health_check))
        .route(
            "/api/v1/entries",
            get(EntryController::list_entries).post(EntryController::create_entry),
        )
        .route(
            "/api/v1/entries/{entry_id}",
            patch(EntryController::update_entry)
                .delete(EntryController::delete_entry),
        )
        .route(
            "/api/v1/entries/{entry_id}/files/{file_id}",
            get(EntryController::download_file),
        )
        .route(
            "/api/v1/entries/{entry_id}/archive",
            get(EntryController::download_archive).post(EntryController::save_archive),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
