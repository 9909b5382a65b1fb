//! Lon/lat bounding boxes.

use serde::{Deserialize, Serialize};

use crate::error::{TileError, TileResult};

/// An axis-aligned box in lon/lat degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl BoundingBox {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut points = points.into_iter();
        let (lon, lat) = points.next()?;
        let mut bbox = Self::new(lon, lat, lon, lat);
        for (lon, lat) in points {
            bbox.left = bbox.left.min(lon);
            bbox.bottom = bbox.bottom.min(lat);
            bbox.right = bbox.right.max(lon);
            bbox.top = bbox.top.max(lat);
        }
        Some(bbox)
    }

    /// Parse "left,bottom,right,top".
    pub fn from_csv(s: &str) -> TileResult<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(TileError::InvalidBbox(format!(
                "{}: expected 'left,bottom,right,top'",
                s
            )));
        }

        let mut values = [0.0f64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| TileError::InvalidBbox(format!("invalid number '{}'", part)))?;
        }

        let bbox = Self::new(values[0], values[1], values[2], values[3]);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Reject inverted or non-finite boxes.
    pub fn validate(&self) -> TileResult<()> {
        let finite = [self.left, self.bottom, self.right, self.top]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(TileError::InvalidBbox(format!("{:?} is not finite", self)));
        }
        if self.left > self.right || self.bottom > self.top {
            return Err(TileError::InvalidBbox(format!(
                "{:?} has left > right or bottom > top",
                self
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Check if this bbox intersects another.
    ///
    /// Edges that touch count as intersecting, so a feature lying exactly on a
    /// tile boundary is drawn into both neighbours.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.top < other.bottom
            || self.bottom > other.top)
    }

    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.left && lon <= self.right && lat >= self.bottom && lat <= self.top
    }

    /// Shrink (or grow, for negative values) every edge by `dx`/`dy`.
    pub fn inset(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox::new(
            self.left + dx,
            self.bottom + dy,
            self.right - dx,
            self.top - dy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_intersect() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let right = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
        let above = BoundingBox::new(0.0, 10.0, 10.0, 20.0);
        let corner = BoundingBox::new(10.0, 10.0, 20.0, 20.0);

        assert!(a.intersects(&right));
        assert!(a.intersects(&above));
        assert!(a.intersects(&corner));
    }

    #[test]
    fn test_disjoint_boxes() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&BoundingBox::new(10.000001, 0.0, 20.0, 10.0)));
        assert!(!a.intersects(&BoundingBox::new(-5.0, -5.0, -0.1, 5.0)));
        assert!(!a.intersects(&BoundingBox::new(0.0, 10.5, 10.0, 12.0)));
        assert!(!a.intersects(&BoundingBox::new(0.0, -3.0, 10.0, -1.0)));
    }

    #[test]
    fn test_degenerate_point_box_intersects_container() {
        let tile = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let point = BoundingBox::new(5.0, 5.0, 5.0, 5.0);
        assert!(tile.intersects(&point));
        assert!(point.intersects(&tile));
    }

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points(vec![(8.0, 47.0), (9.0, 48.0), (7.5, 47.5)]).unwrap();
        assert_eq!(bbox, BoundingBox::new(7.5, 47.0, 9.0, 48.0));
        assert!(BoundingBox::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_from_csv() {
        let bbox = BoundingBox::from_csv("-13.2, 33.78, 32.53, 64.71").unwrap();
        assert_eq!(bbox.left, -13.2);
        assert_eq!(bbox.top, 64.71);

        assert!(BoundingBox::from_csv("1,2,3").is_err());
        assert!(BoundingBox::from_csv("a,2,3,4").is_err());
        assert!(BoundingBox::from_csv("10,0,5,1").is_err());
    }
}
