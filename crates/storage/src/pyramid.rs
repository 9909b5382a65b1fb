//! Directory-tree writer for XYZ tiles.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tile_common::TileCoord;
use tracing::{debug, info, instrument};

use crate::error::{StorageError, StorageResult};

/// Writes encoded tiles under `{root}/{z}/{x}/{y}.{ext}`.
///
/// Holds no mutable state, so one writer can be shared by many threads.
/// Workers racing to create the same `{z}/{x}` directory all succeed.
#[derive(Debug, Clone)]
pub struct TilePyramidWriter {
    root: PathBuf,
    extension: String,
}

impl TilePyramidWriter {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn tile_path(&self, coord: TileCoord) -> PathBuf {
        self.root
            .join(coord.z.to_string())
            .join(coord.x.to_string())
            .join(format!("{}.{}", coord.y, self.extension))
    }

    /// Write one tile, creating its directory when needed.
    ///
    /// An existing file at the same key is replaced.
    pub fn write(&self, coord: TileCoord, bytes: &[u8]) -> StorageResult<PathBuf> {
        let path = self.tile_path(coord);
        if let Some(dir) = path.parent() {
            ensure_dir(dir)?;
        }

        fs::write(&path, bytes).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(tile = %coord.path_key(), size = bytes.len(), "Wrote tile");
        Ok(path)
    }

    /// Remove the whole output root.
    ///
    /// Returns `Ok(false)` when there was nothing to remove.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn clear(&self) -> StorageResult<bool> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                info!("Cleared existing tile pyramid");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Output root does not exist, nothing to clear");
                Ok(false)
            }
            Err(source) => Err(StorageError::Clear {
                path: self.root.clone(),
                source,
            }),
        }
    }
}

/// `create_dir_all` that tolerates another worker creating the same path.
fn ensure_dir(dir: &Path) -> StorageResult<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(source) => Err(StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_path_layout() {
        let writer = TilePyramidWriter::new("/tmp/tiles", "png");
        assert_eq!(
            writer.tile_path(TileCoord::new(5, 16, 11)),
            PathBuf::from("/tmp/tiles/5/16/11.png")
        );
    }

    #[test]
    fn test_extension_leading_dot_is_dropped() {
        let writer = TilePyramidWriter::new("out", ".webp");
        assert_eq!(writer.extension(), "webp");
        assert_eq!(
            writer.tile_path(TileCoord::new(0, 0, 0)),
            PathBuf::from("out/0/0/0.webp")
        );
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("3/4");
        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
