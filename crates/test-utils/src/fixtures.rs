//! Common test fixtures for corridor tile tests.

use tile_common::{BoundingBox, Feature};

use crate::generators::line_feature;

/// Common bounding box definitions for testing, as (left, bottom, right, top).
pub mod bbox {
    /// Europe region used by the Rail Freight Corridor map
    pub const EUROPE: (f64, f64, f64, f64) = (
        -13.205890927977881,
        33.78523007002315,
        32.53507495564878,
        64.71857967286385,
    );

    /// Switzerland and its neighbours
    pub const ALPS: (f64, f64, f64, f64) = (5.5, 45.5, 11.0, 48.5);

    /// Single point (degenerate bbox)
    pub const POINT: (f64, f64, f64, f64) = (8.5, 47.5, 8.5, 47.5);
}

/// Colour registered for corridor "101" in the default style table.
pub const RHINE_ALPINE_RGB: [u8; 3] = [195, 34, 40];

/// Default fallback colour.
pub const DEFAULT_RGB: [u8; 3] = [200, 200, 200];

pub fn to_bbox(b: (f64, f64, f64, f64)) -> BoundingBox {
    BoundingBox::new(b.0, b.1, b.2, b.3)
}

/// The single-segment Rhine-Alpine feature from (8, 47) to (9, 48).
pub fn scenario_feature() -> Feature {
    line_feature(&[(8.0, 47.0), (9.0, 48.0)], &["101"])
}
