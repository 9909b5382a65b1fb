//! Corridor colour table and zoom-dependent stroke widths.
//!
//! Both tables are plain configuration values: they are deserialized once,
//! validated, and then only read while tiles are rendered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// An opaque RGB colour.
///
/// Deserializes from either `[r, g, b]` or a `"#rrggbb"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRgb", into = "[u8; 3]")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn rgba(&self) -> [u8; 4] {
        [self.0, self.1, self.2, 255]
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.0, c.1, c.2]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRgb {
    Triple([u8; 3]),
    Hex(String),
}

impl TryFrom<RawRgb> for Rgb {
    type Error = String;

    fn try_from(raw: RawRgb) -> Result<Self, Self::Error> {
        match raw {
            RawRgb::Triple([r, g, b]) => Ok(Rgb(r, g, b)),
            RawRgb::Hex(s) => hex_to_rgb(&s).ok_or_else(|| format!("invalid colour '{}'", s)),
        }
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Rgb(r, g, b))
}

/// Corridor-ID to colour mapping with a fallback colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTable {
    #[serde(default = "default_corridor_colors")]
    pub colors: BTreeMap<String, Rgb>,
    #[serde(default = "default_fallback_color")]
    pub default_color: Rgb,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            colors: default_corridor_colors(),
            default_color: default_fallback_color(),
        }
    }
}

impl StyleTable {
    pub fn new(colors: BTreeMap<String, Rgb>, default_color: Rgb) -> Self {
        Self {
            colors,
            default_color,
        }
    }

    /// Colour registered for a single corridor ID.
    pub fn color_for(&self, corridor_id: &str) -> Option<Rgb> {
        self.colors.get(corridor_id).copied()
    }

    /// Colour of the first ID (in list order) present in the table.
    ///
    /// Falls back to the default colour when nothing matches or `ids` is empty.
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> Rgb {
        ids.iter()
            .find_map(|id| self.color_for(id.as_ref()))
            .unwrap_or(self.default_color)
    }
}

/// Rail Freight Corridor palette.
fn default_corridor_colors() -> BTreeMap<String, Rgb> {
    [
        ("101", Rgb(195, 34, 40)),   // Rhine-Alpine
        ("102", Rgb(0, 174, 239)),   // North Sea-Mediterranean
        ("103", Rgb(166, 97, 26)),   // Scandinavian-Mediterranean
        ("104", Rgb(0, 84, 166)),    // Atlantic
        ("105", Rgb(0, 166, 81)),    // Baltic-Adriatic
        ("106", Rgb(247, 148, 29)),  // Mediterranean
        ("107", Rgb(146, 39, 143)),  // Orient/East-Med
        ("108", Rgb(35, 31, 32)),    // North Sea-Baltic
        ("109", Rgb(236, 0, 140)),   // Rhine-Danube
        ("131", Rgb(0, 169, 157)),   // Amber
        ("132", Rgb(191, 144, 0)),   // Alpine-Western Balkan
    ]
    .into_iter()
    .map(|(id, color)| (id.to_string(), color))
    .collect()
}

fn default_fallback_color() -> Rgb {
    Rgb(200, 200, 200)
}

/// One step of the width policy: zooms up to and including `max_zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthStep {
    pub max_zoom: u32,
    pub width: u32,
}

/// Piecewise-constant stroke width by zoom level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomWidthPolicy {
    #[serde(default = "default_width_steps")]
    pub steps: Vec<WidthStep>,
    /// Width used above the last step.
    #[serde(default = "default_fallback_width")]
    pub fallback: u32,
}

impl Default for ZoomWidthPolicy {
    fn default() -> Self {
        Self {
            steps: default_width_steps(),
            fallback: default_fallback_width(),
        }
    }
}

fn default_width_steps() -> Vec<WidthStep> {
    vec![
        WidthStep { max_zoom: 4, width: 4 },
        WidthStep { max_zoom: 6, width: 3 },
        WidthStep { max_zoom: 8, width: 2 },
    ]
}

fn default_fallback_width() -> u32 {
    1
}

impl ZoomWidthPolicy {
    pub fn new(steps: Vec<WidthStep>, fallback: u32) -> Self {
        Self { steps, fallback }
    }

    /// Stroke width in pixels at `zoom`: the tightest step covering it.
    pub fn width_for_zoom(&self, zoom: u32) -> u32 {
        self.steps
            .iter()
            .filter(|step| zoom <= step.max_zoom)
            .min_by_key(|step| step.max_zoom)
            .map(|step| step.width)
            .unwrap_or(self.fallback)
    }

    /// Widths must be positive and step thresholds strictly increasing.
    pub fn validate(&self) -> RenderResult<()> {
        if self.fallback == 0 || self.steps.iter().any(|s| s.width == 0) {
            return Err(RenderError::InvalidStyle(
                "stroke widths must be at least 1 pixel".to_string(),
            ));
        }
        if self.steps.windows(2).any(|w| w[0].max_zoom >= w[1].max_zoom) {
            return Err(RenderError::InvalidStyle(
                "width steps must have strictly increasing max_zoom".to_string(),
            ));
        }
        Ok(())
    }
}
