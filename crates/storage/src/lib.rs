//! Storage for rendered tile pyramids.
//!
//! Tiles are plain files laid out as `{root}/{z}/{x}/{y}.{ext}`, the XYZ
//! convention read by slippy-map clients.

pub mod error;
pub mod pyramid;

pub use error::{StorageError, StorageResult};
pub use pyramid::TilePyramidWriter;
