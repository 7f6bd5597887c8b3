use geo::{unary_union, BooleanOps, BoundingRect, Geometry, MultiPolygon};
use geojson::{Feature, FeatureCollection, Value};
use tracing::{debug, warn};

use super::BoundaryIndex;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipReport {
    pub kept: usize,
    pub dropped: usize,
}

/// Intersect every feature with the indexed boundary.
///
/// Properties are kept as-is. Features entirely outside the boundary, or
/// with non-polygonal geometry, are dropped.
pub fn clip_collection(
    collection: FeatureCollection,
    index: &BoundaryIndex,
) -> (FeatureCollection, ClipReport) {
    let mut report = ClipReport::default();
    let mut features = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        match clip_feature(feature, index) {
            Some(clipped) => {
                features.push(clipped);
                report.kept += 1;
            }
            None => report.dropped += 1,
        }
    }

    (
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: collection.foreign_members,
        },
        report,
    )
}

fn clip_feature(mut feature: Feature, index: &BoundaryIndex) -> Option<Feature> {
    let shape = feature_shape(&feature)?;
    let rect = shape.bounding_rect()?;

    let candidates = index.candidates(rect);
    if candidates.is_empty() {
        debug!("Feature {:?} lies outside every boundary envelope", feature_id(&feature));
        return None;
    }

    // Candidates may overlap, and BooleanOps needs a valid MultiPolygon
    let boundary = if candidates.len() == 1 {
        MultiPolygon::new(vec![candidates[0].clone()])
    } else {
        unary_union(candidates)
    };
    let clipped = shape.intersection(&boundary);

    let value = match clipped.0.len() {
        0 => {
            debug!("Feature {:?} does not intersect the boundary", feature_id(&feature));
            return None;
        }
        1 => Value::from(&clipped.0[0]),
        _ => Value::from(&clipped),
    };

    feature.bbox = None;
    feature.geometry = Some(geojson::Geometry::new(value));
    Some(feature)
}

fn feature_shape(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    match Geometry::<f64>::try_from(geometry) {
        Ok(Geometry::Polygon(polygon)) => Some(MultiPolygon::new(vec![polygon])),
        Ok(Geometry::MultiPolygon(multi)) => Some(multi),
        Ok(_) => {
            debug!("Skipping non-polygonal feature {:?}", feature_id(feature));
            None
        }
        Err(e) => {
            warn!("Invalid geometry on feature {:?}: {}", feature_id(feature), e);
            None
        }
    }
}

fn feature_id(feature: &Feature) -> Option<&serde_json::Value> {
    feature.property("id")
}
