//! Overpass QL query construction.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bounding box covering the African continent, south/west/north/east
pub const AFRICA_BBOX: [f64; 4] = [
    -36.17335693522159,
    -19.509008284679254,
    38.47939467327645,
    52.03396046532075,
];

pub const DEFAULT_TIMEOUT_SECS: u32 = 180;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryError {
    #[error("invalid bounding box: {0}")]
    InvalidBbox(String),
    #[error("tag key must not be empty")]
    EmptyTagKey,
}

/// Overpass bounding box in (south, west, north, east) order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self, QueryError> {
        let values = [south, west, north, east];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(QueryError::InvalidBbox("coordinates must be finite".into()));
        }
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(QueryError::InvalidBbox(format!(
                "latitudes {} and {} must be within ±90",
                south, north
            )));
        }
        if !(-180.0..=180.0).contains(&west) || !(-180.0..=180.0).contains(&east) {
            return Err(QueryError::InvalidBbox(format!(
                "longitudes {} and {} must be within ±180",
                west, east
            )));
        }
        if south > north {
            return Err(QueryError::InvalidBbox(format!(
                "south {} is above north {}",
                south, north
            )));
        }
        if west > east {
            return Err(QueryError::InvalidBbox(format!(
                "west {} is east of {}",
                west, east
            )));
        }
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    pub fn from_array(values: [f64; 4]) -> Result<Self, QueryError> {
        let [south, west, north, east] = values;
        Self::new(south, west, north, east)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        let [south, west, north, east] = AFRICA_BBOX;
        Self {
            south,
            west,
            north,
            east,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

/// Parses `south,west,north,east`
impl FromStr for BoundingBox {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| QueryError::InvalidBbox(format!("{}: {}", s, e)))?;

        match values.as_slice() {
            [south, west, north, east] => Self::new(*south, *west, *north, *east),
            _ => Err(QueryError::InvalidBbox(format!(
                "expected 4 comma-separated values, got {}",
                values.len()
            ))),
        }
    }
}

/// `key=value` tag selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: &str, value: &str) -> Result<Self, QueryError> {
        if key.is_empty() {
            return Err(QueryError::EmptyTagKey);
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl Default for TagFilter {
    fn default() -> Self {
        Self {
            key: "leisure".to_string(),
            value: "nature_reserve".to_string(),
        }
    }
}

/// A bbox-limited search for tagged ways, returned with full geometry
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassQuery {
    pub bbox: BoundingBox,
    pub tag: TagFilter,
    pub timeout_secs: u32,
}

impl Default for OverpassQuery {
    fn default() -> Self {
        Self {
            bbox: BoundingBox::default(),
            tag: TagFilter::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OverpassQuery {
    pub fn new(bbox: BoundingBox, tag: TagFilter, timeout_secs: u32) -> Self {
        Self {
            bbox,
            tag,
            timeout_secs,
        }
    }

    /// Render the Overpass QL text sent as the `data` parameter
    pub fn render(&self) -> String {
        format!(
            "[out:json][timeout:{}];\nway[\"{}\"=\"{}\"]({});\n(._;>;);\nout geom;\n",
            self.timeout_secs,
            escape(&self.tag.key),
            escape(&self.tag.value),
            self.bbox
        )
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
