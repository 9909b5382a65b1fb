//! RGBA tile buffer and polyline stroking.

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use tile_common::TILE_SIZE;

use crate::clip::{clip_polyline, ClipRect};
use crate::error::{RenderError, RenderResult};
use crate::style::Rgb;

/// Extra clip margin beyond the stroke width, in pixels.
const CLIP_SLACK: f64 = 2.0;

/// A point in tile-local pixel space, origin at the tile's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePixel {
    pub x: f64,
    pub y: f64,
}

impl TilePixel {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A tile-sized RGBA canvas, fully transparent when created.
pub struct RasterBuffer {
    pixmap: Pixmap,
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl RasterBuffer {
    /// A transparent 256x256 buffer.
    pub fn new() -> RenderResult<Self> {
        Self::with_size(TILE_SIZE, TILE_SIZE)
    }

    pub fn with_size(width: u32, height: u32) -> RenderResult<Self> {
        Pixmap::new(width, height)
            .map(|pixmap| Self { pixmap })
            .ok_or(RenderError::Allocation { width, height })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Stroke a connected polyline with round joins and an opaque colour.
    ///
    /// Fewer than two points, or a line that lies entirely off the canvas,
    /// draws nothing. A line whose vertices all coincide becomes a
    /// `width`-sized square dot. Returns whether anything was drawn.
    pub fn draw_polyline(&mut self, points: &[TilePixel], color: Rgb, width: u32) -> bool {
        if points.len() < 2 {
            return false;
        }

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.0, color.1, color.2, 255);
        paint.anti_alias = false;

        let stroke = Stroke {
            width: width as f32,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        let rect = ClipRect::around_canvas(self.width(), self.height(), width as f64 + CLIP_SLACK);
        let mut stroked = false;

        for run in clip_polyline(points, &rect) {
            if run.windows(2).all(|w| w[0] == w[1]) {
                stroked |= self.stamp_dot(run[0], &paint, width);
                continue;
            }

            let mut pb = PathBuilder::new();
            pb.move_to(run[0].x as f32, run[0].y as f32);
            for point in &run[1..] {
                pb.line_to(point.x as f32, point.y as f32);
            }

            if let Some(path) = pb.finish() {
                self.pixmap
                    .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                stroked = true;
            }
        }

        stroked
    }

    /// Butt caps give a zero-length stroke no area, so fill the square instead.
    fn stamp_dot(&mut self, center: TilePixel, paint: &Paint<'_>, width: u32) -> bool {
        let size = width as f32;
        let half = size / 2.0;
        match Rect::from_xywh(center.x as f32 - half, center.y as f32 - half, size, size) {
            Some(rect) => {
                self.pixmap
                    .fill_rect(rect, paint, Transform::identity(), None);
                true
            }
            None => false,
        }
    }

    /// True when every pixel is fully transparent.
    pub fn is_empty(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixels(&self) -> usize {
        self.pixmap.pixels().iter().filter(|p| p.alpha() != 0).count()
    }

    /// Straight (non-premultiplied) RGBA value at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Row-major straight RGBA bytes, 4 per pixel.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.pixels().len() * 4);
        for p in self.pixmap.pixels() {
            let c = p.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }
}
