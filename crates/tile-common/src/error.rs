//! Error types for tile addressing and feature parsing.

use thiserror::Error;

/// Result type alias using TileError.
pub type TileResult<T> = Result<T, TileError>;

#[derive(Debug, Error)]
pub enum TileError {
    #[error("Invalid zoom level {zoom}: must be at most {max}")]
    InvalidZoom { zoom: u32, max: u32 },

    #[error("Invalid zoom range: min {min} is greater than max {max}")]
    InvalidZoomRange { min: u32, max: u32 },

    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid GeoJSON payload: {0}")]
    Parse(#[from] serde_json::Error),
}
