//! Error types for the ingestion crate.

use std::path::PathBuf;

use thiserror::Error;
use tile_common::TileError;

/// Errors that can occur while loading a feature collection.
///
/// All of them are fatal for a run; nothing here is retried.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid feature collection: {0}")]
    Parse(#[from] TileError),

    #[error("Failed to write cache file {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
