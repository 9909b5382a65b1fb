//! Builders for synthetic corridor features and GeoJSON payloads.

use serde_json::{json, Value};
use tile_common::{Feature, FeatureCollection, Geometry, LonLat};

fn to_lonlat(points: &[(f64, f64)]) -> Vec<LonLat> {
    points.iter().map(|&(lon, lat)| LonLat::new(lon, lat)).collect()
}

fn to_ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// LineString feature with the given corridor IDs.
pub fn line_feature(points: &[(f64, f64)], ids: &[&str]) -> Feature {
    Feature::new(Geometry::LineString(to_lonlat(points)), to_ids(ids))
}

/// MultiLineString feature with the given corridor IDs.
pub fn multi_line_feature(lines: &[&[(f64, f64)]], ids: &[&str]) -> Feature {
    Feature::new(
        Geometry::MultiLineString(lines.iter().map(|l| to_lonlat(l)).collect()),
        to_ids(ids),
    )
}

/// GeoJSON object for a LineString feature, as the upstream API returns it.
pub fn line_feature_json(points: &[(f64, f64)], ids: &[&str]) -> Value {
    let coordinates: Vec<[f64; 2]> = points.iter().map(|&(lon, lat)| [lon, lat]).collect();
    json!({
        "type": "Feature",
        "geometry": {"type": "LineString", "coordinates": coordinates},
        "properties": {"propertyDisplayValue": ids, "layer": "sections"}
    })
}

/// Wrap feature objects in a FeatureCollection document.
pub fn collection_json(features: Vec<Value>) -> String {
    json!({"type": "FeatureCollection", "features": features}).to_string()
}

/// A collection of `count` short parallel corridors spread across Europe.
pub fn corridor_grid(count: usize) -> FeatureCollection {
    let ids = ["101", "102", "103", "104", "105", "106", "107", "108", "109", "131", "132"];
    let features = (0..count)
        .map(|i| {
            let lon = -10.0 + (i % 40) as f64;
            let lat = 36.0 + (i / 40) as f64 * 0.75;
            line_feature(
                &[(lon, lat), (lon + 0.6, lat + 0.3), (lon + 1.2, lat + 0.2)],
                &[ids[i % ids.len()]],
            )
        })
        .collect();
    FeatureCollection { features }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trips_through_parser() {
        let doc = collection_json(vec![line_feature_json(&[(8.0, 47.0), (9.0, 48.0)], &["101"])]);
        let parsed = FeatureCollection::from_json(&doc).unwrap();
        assert_eq!(parsed.features, vec![line_feature(&[(8.0, 47.0), (9.0, 48.0)], &["101"])]);
    }

    #[test]
    fn test_corridor_grid_size() {
        assert_eq!(corridor_grid(25).len(), 25);
    }
}
