//! Filesystem tests for the tile pyramid writer.

use std::fs;

use rayon::prelude::*;
use storage::{StorageError, TilePyramidWriter};
use tile_common::TileCoord;

#[test]
fn test_write_creates_hierarchy() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("tiles");
    let writer = TilePyramidWriter::new(&root, "png");

    let path = writer.write(TileCoord::new(5, 16, 11), b"tile-bytes").unwrap();
    assert_eq!(path, root.join("5").join("16").join("11.png"));
    assert_eq!(fs::read(&path).unwrap(), b"tile-bytes");
}

#[test]
fn test_write_overwrites_existing_tile() {
    let dir = tempfile::tempdir().unwrap();
    let writer = TilePyramidWriter::new(dir.path(), "png");
    let coord = TileCoord::new(2, 1, 1);

    writer.write(coord, b"first").unwrap();
    let path = writer.write(coord, b"second").unwrap();
    assert_eq!(fs::read(path).unwrap(), b"second");
}

#[test]
fn test_concurrent_writes_share_directories() {
    let dir = tempfile::tempdir().unwrap();
    let writer = TilePyramidWriter::new(dir.path(), "png");

    // Every tile lives in the same {z}/{x} directory.
    (0..64u32).into_par_iter().for_each(|y| {
        writer
            .write(TileCoord::new(6, 33, y), &y.to_le_bytes())
            .unwrap();
    });

    let written = fs::read_dir(dir.path().join("6").join("33")).unwrap().count();
    assert_eq!(written, 64);
    assert_eq!(
        fs::read(writer.tile_path(TileCoord::new(6, 33, 17))).unwrap(),
        17u32.to_le_bytes()
    );
}

#[test]
fn test_clear_removes_previous_pyramid() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("tiles");
    let writer = TilePyramidWriter::new(&root, "png");
    writer.write(TileCoord::new(1, 0, 0), b"old").unwrap();
    fs::write(root.join("stray.txt"), b"leftover").unwrap();

    assert!(writer.clear().unwrap());
    assert!(!root.exists());
}

#[test]
fn test_clear_missing_root_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let writer = TilePyramidWriter::new(dir.path().join("never-created"), "png");
    assert!(!writer.clear().unwrap());
    assert!(!writer.clear().unwrap());
}

#[test]
fn test_write_fails_when_directory_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the zoom directory should go.
    fs::write(dir.path().join("4"), b"not a directory").unwrap();
    let writer = TilePyramidWriter::new(dir.path(), "png");

    let err = writer.write(TileCoord::new(4, 8, 5), b"tile").unwrap_err();
    assert!(matches!(err, StorageError::CreateDir { .. }));
    assert!(err.path().starts_with(dir.path()));
}
