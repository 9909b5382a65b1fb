//! Polyline clipping to a pixel rectangle around the tile.
//!
//! At high zooms a corridor vertex can sit hundreds of thousands of pixels
//! away from the tile being drawn. Segments are cut down to a rectangle a few
//! stroke widths larger than the tile before they reach the rasterizer, so
//! the visible part of every stroke is unchanged.

use crate::raster::TilePixel;

/// Axis-aligned clip rectangle in tile pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ClipRect {
    /// The `width` x `height` canvas grown by `margin` pixels on every side.
    pub fn around_canvas(width: u32, height: u32, margin: f64) -> Self {
        Self {
            min_x: -margin,
            min_y: -margin,
            max_x: width as f64 + margin,
            max_y: height as f64 + margin,
        }
    }

    pub fn contains(&self, p: TilePixel) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Liang-Barsky segment clipping.
///
/// Returns the visible part of `a -> b`, reusing the original endpoints when
/// they are inside so consecutive segments stay exactly connected.
pub fn clip_segment(a: TilePixel, b: TilePixel, rect: &ClipRect) -> Option<(TilePixel, TilePixel)> {
    if !(a.is_finite() && b.is_finite()) {
        return None;
    }

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    let edges = [
        (-dx, a.x - rect.min_x),
        (dx, rect.max_x - a.x),
        (-dy, a.y - rect.min_y),
        (dy, rect.max_y - a.y),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    let start = if t0 == 0.0 {
        a
    } else {
        TilePixel::new(a.x + t0 * dx, a.y + t0 * dy)
    };
    let end = if t1 == 1.0 {
        b
    } else {
        TilePixel::new(a.x + t1 * dx, a.y + t1 * dy)
    };
    Some((start, end))
}

/// Split a polyline into the connected runs that fall inside `rect`.
///
/// Runs with fewer than two points are dropped.
pub fn clip_polyline(points: &[TilePixel], rect: &ClipRect) -> Vec<Vec<TilePixel>> {
    let mut runs = Vec::new();
    let mut current: Vec<TilePixel> = Vec::new();

    for segment in points.windows(2) {
        match clip_segment(segment[0], segment[1], rect) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    flush_run(&mut runs, &mut current);
                    current.push(start);
                }
                current.push(end);
            }
            None => flush_run(&mut runs, &mut current),
        }
    }
    flush_run(&mut runs, &mut current);

    runs
}

fn flush_run(runs: &mut Vec<Vec<TilePixel>>, current: &mut Vec<TilePixel>) {
    if current.len() >= 2 {
        runs.push(std::mem::take(current));
    } else {
        current.clear();
    }
}
