//! End-to-end rendering tests: index, culling, styling and stroking together.

use renderer::png::encode_tile;
use renderer::{FeatureIndex, RasterBuffer, StyleTable, TileRasterizer, ZoomWidthPolicy};
use test_utils::{
    bbox, corridor_grid, line_feature, scenario_feature, to_bbox, DEFAULT_RGB, RHINE_ALPINE_RGB,
};
use tile_common::{bbox_to_tile_range, TileCoord};

fn render(index: &FeatureIndex, coord: TileCoord) -> Option<RasterBuffer> {
    let styles = StyleTable::default();
    let widths = ZoomWidthPolicy::default();
    TileRasterizer::new(index, &styles, &widths)
        .render_tile(coord)
        .unwrap()
}

fn painted_colors(buffer: &RasterBuffer) -> Vec<[u8; 4]> {
    let mut colors: Vec<[u8; 4]> = buffer
        .to_rgba()
        .chunks_exact(4)
        .filter(|p| p[3] != 0)
        .map(|p| [p[0], p[1], p[2], p[3]])
        .collect();
    colors.sort();
    colors.dedup();
    colors
}

// ============================================================================
// Single corridor scenario
// ============================================================================

#[test]
fn test_scenario_single_tile_at_zoom_5() {
    let index = FeatureIndex::build(vec![scenario_feature()]);
    let range = bbox_to_tile_range(&to_bbox(bbox::EUROPE), 5);
    let target = TileCoord::new(5, 16, 11);
    assert!(range.contains(&target));

    let mut rendered = Vec::new();
    for coord in range.iter() {
        if let Some(buffer) = render(&index, coord) {
            rendered.push((coord, buffer));
        }
    }

    assert_eq!(rendered.len(), 1, "only the tile holding the corridor is drawn");
    let (coord, buffer) = &rendered[0];
    assert_eq!(*coord, target);

    let [r, g, b] = RHINE_ALPINE_RGB;
    assert_eq!(painted_colors(buffer), vec![[r, g, b, 255]]);
    // Midpoint of the segment, roughly (193.4, 48.5) in tile pixels.
    assert_eq!(buffer.pixel(193, 48), Some([r, g, b, 255]));
    assert_eq!(buffer.pixel(10, 200), Some([0, 0, 0, 0]));

    // About 40px long at 3px wide.
    let painted = buffer.painted_pixels();
    assert!((80..=170).contains(&painted), "painted {} pixels", painted);
}

#[test]
fn test_scenario_candidates_can_render_empty() {
    let index = FeatureIndex::build(vec![scenario_feature()]);

    // Both tiles touch the feature box but sit far from the line itself.
    assert!(render(&index, TileCoord::new(8, 133, 88)).is_none());
    assert!(render(&index, TileCoord::new(8, 134, 90)).is_none());

    // The line crosses these two completely.
    assert!(render(&index, TileCoord::new(8, 133, 89)).is_some());
    assert!(render(&index, TileCoord::new(8, 134, 89)).is_some());
}

#[test]
fn test_tiles_outside_every_feature_box_are_empty() {
    let collection = corridor_grid(30);
    let index = FeatureIndex::from_collection(collection);
    let extent = index.extent().unwrap();

    let range = bbox_to_tile_range(&to_bbox(bbox::EUROPE), 6);
    let mut drawn = 0;
    for coord in range.iter() {
        let tile_bbox = coord.bbox();
        let result = render(&index, coord);
        if !tile_bbox.intersects(&extent) {
            assert!(result.is_none(), "tile {} outside extent", coord.path_key());
        }
        if result.is_some() {
            drawn += 1;
        }
    }
    assert!(drawn > 0);
}

// ============================================================================
// Style resolution and draw order
// ============================================================================

#[test]
fn test_first_known_id_wins() {
    let feature = line_feature(&[(8.0, 47.0), (9.0, 48.0)], &["999", "105", "101"]);
    let index = FeatureIndex::build(vec![feature]);
    let buffer = render(&index, TileCoord::new(5, 16, 11)).unwrap();
    assert_eq!(painted_colors(&buffer), vec![[0, 166, 81, 255]]);
}

#[test]
fn test_unknown_ids_use_default_color() {
    let unknown = line_feature(&[(8.0, 47.0), (9.0, 48.0)], &["999"]);
    let none = line_feature(&[(8.0, 47.0), (9.0, 48.0)], &[]);

    for feature in [unknown, none] {
        let index = FeatureIndex::build(vec![feature]);
        let buffer = render(&index, TileCoord::new(5, 16, 11)).unwrap();
        let [r, g, b] = DEFAULT_RGB;
        assert_eq!(painted_colors(&buffer), vec![[r, g, b, 255]]);
    }
}

#[test]
fn test_later_features_paint_over_earlier_ones() {
    let index = FeatureIndex::build(vec![
        line_feature(&[(8.0, 47.0), (9.0, 48.0)], &["101"]),
        line_feature(&[(8.0, 47.0), (9.0, 48.0)], &["104"]),
    ]);
    let buffer = render(&index, TileCoord::new(5, 16, 11)).unwrap();
    assert_eq!(painted_colors(&buffer), vec![[0, 84, 166, 255]]);
}

#[test]
fn test_repeated_vertex_renders_dot() {
    let index = FeatureIndex::build(vec![line_feature(&[(8.5, 47.5), (8.5, 47.5)], &["101"])]);
    let buffer = render(&index, TileCoord::new(5, 16, 11)).expect("dot should be drawn");

    // 3px wide at z=5.
    assert_eq!(buffer.painted_pixels(), 9);
    let [r, g, b] = RHINE_ALPINE_RGB;
    assert_eq!(painted_colors(&buffer), vec![[r, g, b, 255]]);
}

#[test]
fn test_unsupported_geometry_is_ignored() {
    let json = r#"{"features": [
        {"geometry": {"type": "Point", "coordinates": [8.5, 47.5]},
         "properties": {"propertyDisplayValue": ["101"]}},
        {"geometry": {"type": "LineString", "coordinates": []},
         "properties": {"propertyDisplayValue": ["101"]}}
    ]}"#;
    let collection = tile_common::FeatureCollection::from_json(json).unwrap();
    let index = FeatureIndex::from_collection(collection);
    assert_eq!(index.len(), 2);
    assert_eq!(index.indexed_count(), 0);
    assert!(render(&index, TileCoord::new(5, 16, 11)).is_none());
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_rendering_is_deterministic() {
    let index = FeatureIndex::from_collection(corridor_grid(60));
    let range = bbox_to_tile_range(&to_bbox(bbox::ALPS), 7);

    for coord in range.iter() {
        let first = render(&index, coord);
        let second = render(&index, coord);
        match (first, second) {
            (None, None) => {}
            (Some(a), Some(b)) => {
                assert_eq!(a.to_rgba(), b.to_rgba());
                assert_eq!(encode_tile(&a).unwrap(), encode_tile(&b).unwrap());
            }
            _ => panic!("tile {} changed emptiness between runs", coord.path_key()),
        }
    }
}

#[test]
fn test_high_zoom_tile_on_long_segment() {
    // A two-degree segment crosses hundreds of z14 tiles; a middle one must
    // still show an unbroken 1px line. Latitude 47.5 sits at y = 40.7 here.
    let index = FeatureIndex::build(vec![line_feature(&[(8.0, 47.5), (10.0, 47.5)], &["101"])]);
    let coord = TileCoord::new(14, 8601, 5729);
    let tile_bbox = coord.bbox();
    assert!(tile_bbox.left > 8.0 && tile_bbox.right < 10.0);
    assert!(tile_bbox.bottom < 47.5 && tile_bbox.top > 47.5);

    let buffer = render(&index, coord).expect("tile crossed by the corridor");
    assert_eq!(buffer.painted_pixels(), 256);
    assert!((0..256).all(|x| buffer.pixel(x, 40).map(|p| p[3]) == Some(255)));
}
