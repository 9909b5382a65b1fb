//! Per-feature bounding boxes for cheap tile culling.
//!
//! Boxes are computed once when the index is built and never change, so a
//! single index can be shared read-only by every rendering worker.

use std::collections::BTreeMap;

use tile_common::{BoundingBox, Feature, FeatureCollection};
use tracing::{debug, warn};

/// A feature paired with its precomputed lon/lat extent.
#[derive(Debug, Clone)]
pub struct IndexedFeature {
    pub feature: Feature,
    /// `None` for unsupported or empty geometry; such entries are never drawn.
    pub bbox: Option<BoundingBox>,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureIndex {
    entries: Vec<IndexedFeature>,
}

impl FeatureIndex {
    pub fn build(features: Vec<Feature>) -> Self {
        let entries: Vec<IndexedFeature> = features
            .into_iter()
            .map(|feature| {
                let bbox = feature.bbox();
                IndexedFeature { feature, bbox }
            })
            .collect();

        let index = Self { entries };

        let skipped = index.skipped_by_type();
        if !skipped.is_empty() {
            warn!(
                skipped = index.skipped_count(),
                by_type = ?skipped,
                "Features without drawable line geometry will be ignored"
            );
        }
        debug!(
            features = index.len(),
            indexed = index.indexed_count(),
            "Built feature index"
        );

        index
    }

    pub fn from_collection(collection: FeatureCollection) -> Self {
        Self::build(collection.features)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexedFeature] {
        &self.entries
    }

    /// Features with a present bounding box.
    pub fn indexed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.bbox.is_some()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.len() - self.indexed_count()
    }

    /// Count of skipped features keyed by geometry type name.
    pub fn skipped_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| e.bbox.is_none()) {
            *counts
                .entry(entry.feature.geometry.type_name().to_string())
                .or_insert(0) += 1;
        }
        counts
    }

    /// Features whose box touches or overlaps `tile_bbox`, in input order.
    pub fn candidates<'a>(
        &'a self,
        tile_bbox: &'a BoundingBox,
    ) -> impl Iterator<Item = &'a Feature> + 'a {
        self.entries.iter().filter_map(move |entry| match &entry.bbox {
            Some(bbox) if tile_bbox.intersects(bbox) => Some(&entry.feature),
            _ => None,
        })
    }

    /// Union of every present feature box.
    pub fn extent(&self) -> Option<BoundingBox> {
        let boxes = self.entries.iter().filter_map(|e| e.bbox);
        BoundingBox::from_points(boxes.flat_map(|b| [(b.left, b.bottom), (b.right, b.top)]))
    }
}
