//! Raster rendering of corridor line features into XYZ tiles.
//!
//! - [`style`]: corridor colour table and zoom-dependent stroke widths
//! - [`index`]: per-feature bounding boxes used to cull tiles
//! - [`raster`]: 256x256 RGBA buffer and polyline stroking
//! - [`rasterizer`]: per-tile rendering and emptiness decision
//! - [`png`]: lossless PNG encoding of finished tiles

pub mod clip;
pub mod error;
pub mod index;
pub mod png;
pub mod raster;
pub mod rasterizer;
pub mod style;

pub use error::{RenderError, RenderResult};
pub use index::{FeatureIndex, IndexedFeature};
pub use raster::{RasterBuffer, TilePixel};
pub use rasterizer::{project_line, TileRasterizer};
pub use style::{Rgb, StyleTable, WidthStep, ZoomWidthPolicy};
