//! Error types for pyramid storage.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

/// Every variant carries the path the failed operation was working on.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write tile {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to clear output root {path}: {source}")]
    Clear { path: PathBuf, source: io::Error },
}

impl StorageError {
    pub fn path(&self) -> &PathBuf {
        match self {
            StorageError::CreateDir { path, .. }
            | StorageError::Write { path, .. }
            | StorageError::Clear { path, .. } => path,
        }
    }
}
