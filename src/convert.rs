//! Overpass elements to GeoJSON conversion.
//!
//! Only closed ways become features; everything else is dropped from the
//! output document and counted in the [`ConversionReport`].

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use tracing::{debug, info};

use crate::models::{Element, GeomPoint, OsmType, OverpassResponse};

/// Placeholder used for seeded properties
pub const DEFAULT_PLACEHOLDER: &str = " ";

/// Attribute names pre-seeded on every reserve so downstream editors see a
/// fixed column set.
pub const RESERVE_PROPERTY_CATALOG: &[&str] = &[
    "Year of Visitor-Counting",
    "PH",
    "Soil Type",
    "Cash Crop",
    "Rainfall Average",
    "Temperature Average",
    "Biome type",
    "Endangered species Fauna",
    "Endangered species flora",
    "Wetlands",
    "Highest peak",
    "Water table",
    "Greenhouse index",
    "CO2 emissions index",
    "ISO1",
    "ISO2",
    "ISO3",
    "ISO4",
    "ISO5",
    "OSM1",
    "OSM2",
    "OSM3",
    "OSM4567",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Property names set to `placeholder` before tags are applied
    pub seed_properties: Vec<String>,
    pub placeholder: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            seed_properties: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl ConvertOptions {
    pub fn with_reserve_catalog() -> Self {
        Self {
            seed_properties: RESERVE_PROPERTY_CATALOG
                .iter()
                .map(|name| name.to_string())
                .collect(),
            ..Self::default()
        }
    }
}

/// Why an element did not produce a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoGeometry,
    NotWay,
    OpenRing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub emitted: usize,
    pub skipped_no_geometry: usize,
    pub skipped_not_way: usize,
    pub skipped_open_ring: usize,
}

impl ConversionReport {
    pub fn skipped(&self) -> usize {
        self.skipped_no_geometry + self.skipped_not_way + self.skipped_open_ring
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NoGeometry => self.skipped_no_geometry += 1,
            SkipReason::NotWay => self.skipped_not_way += 1,
            SkipReason::OpenRing => self.skipped_open_ring += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub collection: FeatureCollection,
    pub report: ConversionReport,
}

/// Return the polygon ring of an element, or the reason it has none.
///
/// Geometry presence is checked first, so a node without geometry counts as
/// `NoGeometry` rather than `NotWay`.
pub fn polygon_ring(element: &Element) -> Result<&[GeomPoint], SkipReason> {
    let ring = match element.geometry.as_deref() {
        Some(ring) if !ring.is_empty() => ring,
        _ => return Err(SkipReason::NoGeometry),
    };

    if element.osm_type != OsmType::Way {
        return Err(SkipReason::NotWay);
    }

    // Exact comparison: Overpass repeats the first node's coordinates verbatim
    if !element.is_closed() {
        return Err(SkipReason::OpenRing);
    }

    Ok(ring)
}

/// Build the feature for an element whose ring has already been validated
pub fn build_feature(element: &Element, ring: &[GeomPoint], options: &ConvertOptions) -> Feature {
    let mut properties = JsonObject::new();
    for name in &options.seed_properties {
        properties.insert(name.clone(), JsonValue::from(options.placeholder.as_str()));
    }
    for (key, value) in &element.tags {
        properties.insert(key.clone(), JsonValue::from(value.as_str()));
    }
    properties.insert("id".to_string(), JsonValue::from(element.id));

    let exterior: Vec<Vec<f64>> = ring.iter().map(GeomPoint::position).collect();

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![exterior]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Convert elements in input order
pub fn convert_elements(elements: &[Element], options: &ConvertOptions) -> Conversion {
    let mut report = ConversionReport::default();
    let mut features = Vec::new();

    for element in elements {
        match polygon_ring(element) {
            Ok(ring) => {
                features.push(build_feature(element, ring, options));
                report.emitted += 1;
            }
            Err(reason) => {
                debug!("Skipping {} {}: {:?}", element.osm_type, element.id, reason);
                report.record_skip(reason);
            }
        }
    }

    info!(
        "Converted {} polygons ({} skipped: {} without geometry, {} not ways, {} open rings)",
        report.emitted,
        report.skipped(),
        report.skipped_no_geometry,
        report.skipped_not_way,
        report.skipped_open_ring
    );

    Conversion {
        collection: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        report,
    }
}

pub fn convert_response(response: &OverpassResponse, options: &ConvertOptions) -> Conversion {
    convert_elements(&response.elements, options)
}
