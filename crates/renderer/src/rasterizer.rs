//! Per-tile rendering of corridor features.
//!
//! A [`TileRasterizer`] only borrows the feature index and the style tables,
//! so one instance can be shared by every worker thread. Each call to
//! [`TileRasterizer::render_tile`] owns a fresh buffer; nothing carries over
//! from one tile to the next.

use tile_common::{lonlat_to_world_pixel, world_to_tile_pixel, LonLat, TileCoord};
use tracing::trace;

use crate::error::RenderResult;
use crate::index::FeatureIndex;
use crate::raster::{RasterBuffer, TilePixel};
use crate::style::{StyleTable, ZoomWidthPolicy};

/// Project a lon/lat line into the pixel frame of `coord`.
pub fn project_line(line: &[LonLat], coord: TileCoord) -> Vec<TilePixel> {
    line.iter()
        .map(|p| {
            let (wx, wy) = lonlat_to_world_pixel(p.lon, p.lat, coord.z);
            let (px, py) = world_to_tile_pixel(wx, wy, coord.x, coord.y);
            TilePixel::new(px, py)
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct TileRasterizer<'a> {
    index: &'a FeatureIndex,
    styles: &'a StyleTable,
    widths: &'a ZoomWidthPolicy,
}

impl<'a> TileRasterizer<'a> {
    pub fn new(
        index: &'a FeatureIndex,
        styles: &'a StyleTable,
        widths: &'a ZoomWidthPolicy,
    ) -> Self {
        Self {
            index,
            styles,
            widths,
        }
    }

    /// Draw every intersecting feature into a new buffer.
    ///
    /// Returns `None` when the finished buffer has no visible pixel.
    pub fn render_tile(&self, coord: TileCoord) -> RenderResult<Option<RasterBuffer>> {
        let tile_bbox = coord.bbox();
        let width = self.widths.width_for_zoom(coord.z);
        let mut buffer = RasterBuffer::new()?;
        let mut candidates = 0usize;

        for feature in self.index.candidates(&tile_bbox) {
            candidates += 1;
            let color = self.styles.resolve(&feature.corridor_ids);
            for line in feature.lines() {
                let pixels = project_line(line, coord);
                buffer.draw_polyline(&pixels, color, width);
            }
        }

        if buffer.is_empty() {
            trace!(tile = %coord.path_key(), candidates, "Tile is empty");
            return Ok(None);
        }

        trace!(
            tile = %coord.path_key(),
            candidates,
            painted = buffer.painted_pixels(),
            "Rendered tile"
        );
        Ok(Some(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_approx_eq, multi_line_feature};
    use tile_common::lonlat_to_tile_xy;

    #[test]
    fn test_project_line_is_tile_local() {
        let coord = TileCoord::new(5, 16, 11);
        let line = [LonLat::new(8.0, 47.0), LonLat::new(9.0, 48.0)];
        let pixels = project_line(&line, coord);

        let (fx, fy) = lonlat_to_tile_xy(8.0, 47.0, 5);
        assert_approx_eq!(pixels[0].x, (fx - 16.0) * 256.0, 1e-6);
        assert_approx_eq!(pixels[0].y, (fy - 11.0) * 256.0, 1e-6);
        assert!(pixels[1].x > pixels[0].x);
        assert!(pixels[1].y < pixels[0].y);
    }

    #[test]
    fn test_multilinestring_draws_every_part() {
        let coord = TileCoord::new(9, 267, 180);
        let bbox = coord.bbox();
        let third = bbox.width() / 3.0;
        let mid_lat = (bbox.top + bbox.bottom) / 2.0;
        let (south, north) = (mid_lat - bbox.height() / 4.0, mid_lat + bbox.height() / 4.0);
        let west = [(bbox.left + third, south), (bbox.left + third, north)];
        let east = [(bbox.left + 2.0 * third, south), (bbox.left + 2.0 * third, north)];
        let feature = multi_line_feature(&[&west, &east], &["104"]);

        let index = FeatureIndex::build(vec![feature]);
        let styles = StyleTable::default();
        let widths = ZoomWidthPolicy::default();
        let buffer = TileRasterizer::new(&index, &styles, &widths)
            .render_tile(coord)
            .unwrap()
            .expect("tile should not be empty");

        let row = 128;
        let painted: Vec<u32> = (0..256)
            .filter(|&x| buffer.pixel(x, row).map(|p| p[3]) == Some(255))
            .collect();
        // Two separate 1px verticals near x=85 and x=171.
        assert_eq!(painted.len(), 2);
        assert!(painted[0] >= 84 && painted[0] <= 86);
        assert!(painted[1] >= 169 && painted[1] <= 172);
        assert_eq!(buffer.pixel(painted[0], row), Some([0, 84, 166, 255]));
    }

    #[test]
    fn test_empty_index_gives_empty_tile() {
        let index = FeatureIndex::default();
        let styles = StyleTable::default();
        let widths = ZoomWidthPolicy::default();
        let rasterizer = TileRasterizer::new(&index, &styles, &widths);
        assert!(rasterizer.render_tile(TileCoord::new(4, 8, 5)).unwrap().is_none());
    }
}
