//! Corridor line features decoded from a GeoJSON FeatureCollection.
//!
//! Only `geometry.type`, `geometry.coordinates` and
//! `properties.propertyDisplayValue` are read; every other member is ignored.
//! Geometry types other than LineString/MultiLineString are kept as
//! [`Geometry::Unsupported`] so callers can count and skip them.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{TileError, TileResult};
use crate::BoundingBox;

/// A (lon, lat) vertex in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    LineString(Vec<LonLat>),
    MultiLineString(Vec<Vec<LonLat>>),
    /// Any other (or missing) geometry, tagged with its GeoJSON type name.
    Unsupported(String),
}

impl Geometry {
    pub fn type_name(&self) -> &str {
        match self {
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Unsupported(name) => name,
        }
    }
}

/// A corridor centerline with its ordered corridor identifiers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawFeature")]
pub struct Feature {
    pub geometry: Geometry,
    /// `properties.propertyDisplayValue`, in source order.
    pub corridor_ids: Vec<String>,
}

impl Feature {
    pub fn new(geometry: Geometry, corridor_ids: Vec<String>) -> Self {
        Self {
            geometry,
            corridor_ids,
        }
    }

    /// Constituent lines; empty for unsupported geometry.
    pub fn lines(&self) -> Vec<&[LonLat]> {
        match &self.geometry {
            Geometry::LineString(line) => vec![line.as_slice()],
            Geometry::MultiLineString(lines) => lines.iter().map(Vec::as_slice).collect(),
            Geometry::Unsupported(_) => Vec::new(),
        }
    }

    /// Lon/lat extent over every vertex of every line.
    ///
    /// `None` for unsupported geometry or when there are no vertices at all;
    /// such features never contribute to any tile.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(
            self.lines()
                .into_iter()
                .flatten()
                .map(|p| (p.lon, p.lat)),
        )
    }
}

/// Top-level GeoJSON FeatureCollection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn from_json(json: &str) -> TileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_slice(bytes: &[u8]) -> TileResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<RawProperties>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type", default)]
    geometry_type: Option<String>,
    #[serde(default)]
    coordinates: Value,
}

#[derive(Deserialize)]
struct RawProperties {
    #[serde(rename = "propertyDisplayValue", default)]
    property_display_value: Option<Vec<Value>>,
}

impl TryFrom<RawFeature> for Feature {
    type Error = TileError;

    fn try_from(raw: RawFeature) -> Result<Self, Self::Error> {
        let geometry = match raw.geometry {
            Some(geometry) => decode_geometry(geometry)?,
            None => Geometry::Unsupported("null".to_string()),
        };

        // Non-string identifiers can never match a style entry.
        let corridor_ids = raw
            .properties
            .and_then(|p| p.property_display_value)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect();

        Ok(Feature {
            geometry,
            corridor_ids,
        })
    }
}

fn decode_geometry(raw: RawGeometry) -> TileResult<Geometry> {
    let type_name = raw.geometry_type.unwrap_or_else(|| "null".to_string());
    match type_name.as_str() {
        "LineString" => Ok(Geometry::LineString(decode_line(&raw.coordinates)?)),
        "MultiLineString" => {
            let lines = match &raw.coordinates {
                Value::Null => Vec::new(),
                Value::Array(lines) => lines.iter().map(decode_line).collect::<TileResult<_>>()?,
                other => {
                    return Err(TileError::InvalidGeometry(format!(
                        "MultiLineString coordinates must be an array, got {}",
                        other
                    )))
                }
            };
            Ok(Geometry::MultiLineString(lines))
        }
        _ => Ok(Geometry::Unsupported(type_name)),
    }
}

fn decode_line(value: &Value) -> TileResult<Vec<LonLat>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(positions) => positions.iter().map(decode_position).collect(),
        other => Err(TileError::InvalidGeometry(format!(
            "line coordinates must be an array, got {}",
            other
        ))),
    }
}

fn decode_position(value: &Value) -> TileResult<LonLat> {
    let invalid = || TileError::InvalidGeometry(format!("invalid position {}", value));
    let ordinates = value.as_array().ok_or_else(invalid)?;
    // A trailing altitude ordinate is allowed and ignored.
    match ordinates.as_slice() {
        [lon, lat, ..] => Ok(LonLat::new(
            lon.as_f64().ok_or_else(invalid)?,
            lat.as_f64().ok_or_else(invalid)?,
        )),
        _ => Err(invalid()),
    }
}
