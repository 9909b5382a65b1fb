//! The render pipeline: index once, then render every zoom in parallel.
//!
//! Workers share the feature index, the style tables and the pyramid writer
//! read-only. Each tile gets its own buffer, so the tiles of one zoom level
//! can be rendered in any order on any thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use renderer::png::encode_tile;
use renderer::{FeatureIndex, TileRasterizer};
use storage::TilePyramidWriter;
use tile_common::{bbox_to_tile_range, FeatureCollection, TileCoord, TileRange};
use tracing::{info, instrument, warn};

use crate::config::GeneratorConfig;

/// Per-zoom tile counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoomSummary {
    pub zoom: u32,
    pub tiles_considered: usize,
    pub tiles_written: usize,
    pub tiles_empty: usize,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub zooms: Vec<ZoomSummary>,
    pub tiles_written: usize,
    pub tiles_empty: usize,
    /// Whether a previous pyramid was removed first.
    pub cleared: bool,
}

/// Render every configured zoom level of `collection` to disk.
///
/// Stops at the first tile that fails to encode or write; tiles written
/// before that stay on disk.
#[instrument(skip_all, fields(root = %config.output.root.display()))]
pub fn run(config: &GeneratorConfig, collection: FeatureCollection) -> Result<RunSummary> {
    config.validate()?;

    let index = FeatureIndex::from_collection(collection);
    if index.indexed_count() == 0 {
        warn!(features = index.len(), "No drawable corridor features, every tile will be empty");
    }

    let writer = TilePyramidWriter::new(&config.output.root, &config.output.extension);
    let cleared = if config.output.clear {
        writer.clear()?
    } else {
        false
    };

    let workers = config.worker_count();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("tile-worker-{}", i))
        .build()
        .context("Failed to create render thread pool")?;

    info!(
        features = index.len(),
        drawable = index.indexed_count(),
        min_zoom = config.min_zoom,
        max_zoom = config.max_zoom,
        workers,
        "Starting tile generation"
    );

    let rasterizer = TileRasterizer::new(&index, &config.style, &config.widths);
    let mut summary = RunSummary {
        cleared,
        ..RunSummary::default()
    };

    for zoom in config.zoom_levels() {
        let zoom_summary = pool.install(|| render_zoom(zoom, config, &rasterizer, &writer))?;
        summary.tiles_written += zoom_summary.tiles_written;
        summary.tiles_empty += zoom_summary.tiles_empty;
        summary.zooms.push(zoom_summary);
    }

    info!(
        tiles_written = summary.tiles_written,
        tiles_empty = summary.tiles_empty,
        root = %writer.root().display(),
        "Tile generation complete"
    );
    Ok(summary)
}

/// Every tile of `range`, generated column by column on the workers.
///
/// Coordinates are produced on demand; a zoom level is never materialized.
fn par_tiles(range: TileRange) -> impl ParallelIterator<Item = TileCoord> {
    let TileRange {
        zoom,
        x_min,
        x_max,
        y_min,
        y_max,
    } = range;
    (x_min..=x_max)
        .into_par_iter()
        .flat_map_iter(move |x| (y_min..=y_max).map(move |y| TileCoord::new(zoom, x, y)))
}

fn render_zoom(
    zoom: u32,
    config: &GeneratorConfig,
    rasterizer: &TileRasterizer<'_>,
    writer: &TilePyramidWriter,
) -> Result<ZoomSummary> {
    let started = Instant::now();
    let range = bbox_to_tile_range(&config.region, zoom);

    let written = AtomicUsize::new(0);
    let empty = AtomicUsize::new(0);

    par_tiles(range).try_for_each(|coord| -> Result<()> {
        let Some(buffer) = rasterizer
            .render_tile(coord)
            .with_context(|| format!("Failed to render tile {}", coord.path_key()))?
        else {
            empty.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        };

        let png = encode_tile(&buffer)
            .with_context(|| format!("Failed to encode tile {}", coord.path_key()))?;
        writer.write(coord, &png)?;
        written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    })?;

    let summary = ZoomSummary {
        zoom,
        tiles_considered: range.len(),
        tiles_written: written.into_inner(),
        tiles_empty: empty.into_inner(),
        elapsed_ms: started.elapsed().as_millis(),
    };

    info!(
        zoom,
        x_range = %format!("{}..={}", range.x_min, range.x_max),
        y_range = %format!("{}..={}", range.y_min, range.y_max),
        tiles = summary.tiles_considered,
        written = summary.tiles_written,
        empty = summary.tiles_empty,
        elapsed_ms = summary.elapsed_ms as u64,
        "Rendered zoom level"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_par_tiles_matches_range() {
        let range = TileRange {
            zoom: 6,
            x_min: 28,
            x_max: 37,
            y_min: 17,
            y_max: 26,
        };
        let mut tiles: Vec<TileCoord> = par_tiles(range).collect();
        tiles.sort();
        let mut expected: Vec<TileCoord> = range.iter().collect();
        expected.sort();
        assert_eq!(tiles, expected);
        assert_eq!(tiles.len(), range.len());
    }

    #[test]
    fn test_par_tiles_single_tile() {
        let range = TileRange {
            zoom: 0,
            x_min: 0,
            x_max: 0,
            y_min: 0,
            y_max: 0,
        };
        assert_eq!(par_tiles(range).collect::<Vec<_>>(), vec![TileCoord::new(0, 0, 0)]);
    }
}
