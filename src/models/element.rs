//! Raw Overpass result records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type of OSM object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
    /// Anything else Overpass may emit (areas, derived elements)
    #[serde(other)]
    Other,
}

impl std::fmt::Display for OsmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsmType::Node => write!(f, "node"),
            OsmType::Way => write!(f, "way"),
            OsmType::Relation => write!(f, "relation"),
            OsmType::Other => write!(f, "other"),
        }
    }
}

/// One vertex of a way geometry as returned by `out geom`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeomPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeomPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }

    /// GeoJSON position order: `[lon, lat]`
    pub fn position(&self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }
}

/// A single element of an Overpass JSON response.
///
/// Nodes carry `lat`/`lon` at the top level and usually no tags; those
/// fields are ignored since only way geometries are converted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: i64,

    #[serde(rename = "type")]
    pub osm_type: OsmType,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    /// Present only for ways (and relation members) when geometry was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<GeomPoint>>,
}

impl Element {
    /// `true` when the geometry exists, is non-empty and starts where it ends.
    ///
    /// A single vertex counts as closed even though its one-position ring is
    /// not a valid GeoJSON linear ring.
    pub fn is_closed(&self) -> bool {
        match self.geometry.as_deref() {
            Some([first, .., last]) => first == last,
            Some([_]) => true,
            _ => false,
        }
    }
}

/// Top-level Overpass JSON document. Only `elements` is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}
