//! XYZ tile addressing and Web Mercator (EPSG:3857) conversions.
//!
//! Rows grow southward, columns grow eastward and every tile is
//! [`TILE_SIZE`] pixels square. Latitudes beyond the Mercator limit
//! (~85.05°) produce non-finite values; callers are expected to stay inside it.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{TileError, TileResult};
use crate::BoundingBox;

/// Tile edge length in pixels.
pub const TILE_SIZE: u32 = 256;

/// Largest zoom whose tile indices still fit comfortably in a `u32`.
pub const MAX_SUPPORTED_ZOOM: u32 = 30;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Relative path key, "z/x/y".
    pub fn path_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }

    /// True when x and y address a tile that exists at this zoom.
    pub fn is_valid(&self) -> bool {
        if self.z > MAX_SUPPORTED_ZOOM {
            return false;
        }
        let n = tiles_per_axis(self.z);
        self.x < n && self.y < n
    }

    /// Lon/lat extent of this tile.
    pub fn bbox(&self) -> BoundingBox {
        tile_to_bbox(self.z, self.x, self.y)
    }
}

/// Inclusive rectangle of tile indices at a single zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    pub zoom: u32,
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl TileRange {
    /// Number of tiles in the range.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let cols = (self.x_max - self.x_min) as usize + 1;
        let rows = (self.y_max - self.y_min) as usize + 1;
        cols * rows
    }

    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        coord.z == self.zoom
            && (self.x_min..=self.x_max).contains(&coord.x)
            && (self.y_min..=self.y_max).contains(&coord.y)
    }

    /// Iterate tiles column by column (x outer, y inner).
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> {
        let TileRange {
            zoom,
            x_min,
            x_max,
            y_min,
            y_max,
        } = *self;
        (x_min..=x_max).flat_map(move |x| (y_min..=y_max).map(move |y| TileCoord::new(zoom, x, y)))
    }
}

/// Number of tiles along one axis at `zoom`.
pub fn tiles_per_axis(zoom: u32) -> u32 {
    1u32 << zoom.min(MAX_SUPPORTED_ZOOM)
}

/// Ensure a zoom level can be addressed with `u32` tile indices.
pub fn check_zoom(zoom: u32) -> TileResult<()> {
    if zoom > MAX_SUPPORTED_ZOOM {
        return Err(TileError::InvalidZoom {
            zoom,
            max: MAX_SUPPORTED_ZOOM,
        });
    }
    Ok(())
}

/// Mercator y as a fraction of the world height, 0 at the top.
fn mercator_y_fraction(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

/// Fractional tile coordinates of a lon/lat position at `zoom`.
pub fn lonlat_to_tile_xy(lon: f64, lat: f64, zoom: u32) -> (f64, f64) {
    let n = tiles_per_axis(zoom) as f64;
    let x = (lon + 180.0) / 360.0 * n;
    let y = mercator_y_fraction(lat) * n;
    (x, y)
}

/// World-pixel coordinates of a lon/lat position at `zoom`.
pub fn lonlat_to_world_pixel(lon: f64, lat: f64, zoom: u32) -> (f64, f64) {
    let scale = tiles_per_axis(zoom) as f64 * TILE_SIZE as f64;
    let x = (lon + 180.0) / 360.0 * scale;
    let y = mercator_y_fraction(lat) * scale;
    (x, y)
}

/// Shift world pixels into the local frame of tile (`x_tile`, `y_tile`).
///
/// The result keeps its fractional part and may fall outside `[0, 256)` for
/// vertices belonging to neighbouring tiles.
pub fn world_to_tile_pixel(world_x: f64, world_y: f64, x_tile: u32, y_tile: u32) -> (f64, f64) {
    (
        world_x - x_tile as f64 * TILE_SIZE as f64,
        world_y - y_tile as f64 * TILE_SIZE as f64,
    )
}

/// Lon/lat bounds of tile (z, x, y).
pub fn tile_to_bbox(zoom: u32, x: u32, y: u32) -> BoundingBox {
    let n = tiles_per_axis(zoom) as f64;

    let left = x as f64 / n * 360.0 - 180.0;
    let right = (x as f64 + 1.0) / n * 360.0 - 180.0;

    let row_to_lat = |row: f64| (PI - 2.0 * PI * row / n).sinh().atan().to_degrees();
    let top = row_to_lat(y as f64);
    let bottom = row_to_lat(y as f64 + 1.0);

    BoundingBox::new(left, bottom, right, top)
}

/// Tile indices covering `bbox` at `zoom`, clamped into the valid grid.
///
/// The bottom-left corner yields (x_min, y_max) and the top-right corner
/// (x_max, y_min) because rows grow southward.
pub fn bbox_to_tile_range(bbox: &BoundingBox, zoom: u32) -> TileRange {
    let (x_min_f, y_max_f) = lonlat_to_tile_xy(bbox.left, bbox.bottom, zoom);
    let (x_max_f, y_min_f) = lonlat_to_tile_xy(bbox.right, bbox.top, zoom);

    let last = tiles_per_axis(zoom) as i64 - 1;
    let clamp = |v: f64| (v.floor() as i64).clamp(0, last) as u32;

    TileRange {
        zoom,
        x_min: clamp(x_min_f),
        x_max: clamp(x_max_f),
        y_min: clamp(y_min_f),
        y_max: clamp(y_max_f),
    }
}
