use std::{path::PathBuf, time::Duration};

pub const DEFAULT_STORAGE_KEY: &str = "geodatabase_entries";
pub const DEFAULT_MAX_ASSOCIATED_FILES: usize = 5;
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(500);
pub const DEFAULT_ARCHIVE_COMPRESSION_LEVEL: i32 = 3;

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub store_dir: PathBuf,
    pub storage_key: String,
    pub download_dir: PathBuf,
    pub simulated_latency: Duration,
    pub max_associated_files: usize,
    pub seed_demo_entries: bool,
    /// zstd level used for entry archives.
    pub archive_compression_level: i32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("./data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            download_dir: PathBuf::from("./downloads"),
            simulated_latency: DEFAULT_SIMULATED_LATENCY,
            max_associated_files: DEFAULT_MAX_ASSOCIATED_FILES,
            seed_demo_entries: false,
            archive_compression_level: DEFAULT_ARCHIVE_COMPRESSION_LEVEL,
        }
    }
}
