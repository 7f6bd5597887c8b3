//! Spatial index for boundary candidate lookups.

use geo::{BoundingRect, Polygon, Rect};
use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

/// Wrapper for R-tree indexing of boundary polygons
#[derive(Debug, Clone)]
pub struct IndexedPolygon {
    pub polygon: Polygon<f64>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedPolygon {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedPolygon {
    pub fn new(polygon: Polygon<f64>) -> Option<Self> {
        let rect = polygon.bounding_rect()?;
        Some(Self {
            polygon,
            envelope: envelope_of(rect),
        })
    }
}

fn envelope_of(rect: Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

/// R-tree over boundary polygons
pub struct BoundaryIndex {
    tree: RTree<IndexedPolygon>,
}

impl BoundaryIndex {
    /// Build the index, skipping polygons without an extent
    pub fn build(polygons: Vec<Polygon<f64>>) -> Self {
        let indexed: Vec<IndexedPolygon> = polygons
            .into_iter()
            .filter_map(IndexedPolygon::new)
            .collect();

        let tree = RTree::bulk_load(indexed);
        info!("Boundary index built with {} polygons", tree.size());

        Self { tree }
    }

    /// Polygons whose envelope intersects `rect`
    pub fn candidates(&self, rect: Rect<f64>) -> Vec<&Polygon<f64>> {
        self.tree
            .locate_in_envelope_intersecting(&envelope_of(rect))
            .map(|ip| &ip.polygon)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
