pub mod controllers;
pub mod dto;
mod error;
pub mod fs_download_sink;
pub mod repositories;
pub mod state;
