//! Common types shared by the corridor tile pipeline.
//!
//! Tile addressing and Web Mercator math live in [`tile`], lon/lat boxes in
//! [`bbox`] and the GeoJSON-derived feature model in [`feature`].

pub mod bbox;
pub mod error;
pub mod feature;
pub mod tile;

pub use bbox::BoundingBox;
pub use error::{TileError, TileResult};
pub use feature::{Feature, FeatureCollection, Geometry, LonLat};
pub use tile::{
    bbox_to_tile_range, lonlat_to_tile_xy, lonlat_to_world_pixel, tile_to_bbox,
    world_to_tile_pixel, TileCoord, TileRange, MAX_SUPPORTED_ZOOM, TILE_SIZE,
};
