mod content_resolver;
mod download_sink;

pub use content_resolver::ContentResolver;
pub use download_sink::DownloadSink;
