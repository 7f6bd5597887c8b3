//! Boundary file readers.

use geo::{Geometry, MultiPolygon, Polygon};
use geojson::GeoJson;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{BoundaryError, Crs};

/// Boundary polygons in their source reference system
#[derive(Debug, Clone)]
pub struct Boundary {
    pub crs: Crs,
    pub polygons: Vec<Polygon<f64>>,
}

impl Boundary {
    /// Load by extension: `.shp` (with optional `.prj` sidecar) or
    /// `.geojson`/`.json`.
    pub fn load(path: &Path) -> Result<Self, BoundaryError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let boundary = match extension.as_str() {
            "shp" => Self::load_shapefile(path)?,
            "geojson" | "json" => Self::load_geojson(path)?,
            _ => return Err(BoundaryError::UnsupportedFormat(path.display().to_string())),
        };

        if boundary.polygons.is_empty() {
            return Err(BoundaryError::Empty(path.to_path_buf()));
        }

        info!(
            "Loaded {} boundary polygons from {} ({})",
            boundary.polygons.len(),
            path.display(),
            boundary.crs
        );
        Ok(boundary)
    }

    fn load_shapefile(path: &Path) -> Result<Self, BoundaryError> {
        let shapes = shapefile::read_shapes_as::<_, shapefile::Polygon>(path)?;

        let mut polygons = Vec::new();
        for shape in shapes {
            let multi: MultiPolygon<f64> = shape.into();
            polygons.extend(multi.0);
        }

        let prj = path.with_extension("prj");
        let crs = if prj.exists() {
            let wkt = fs::read_to_string(&prj).map_err(|source| BoundaryError::Io {
                path: prj.clone(),
                source,
            })?;
            Crs::from_wkt(&wkt)?
        } else {
            warn!("No .prj next to {}, assuming WGS 84", path.display());
            Crs::wgs84()
        };

        Ok(Self { crs, polygons })
    }

    fn load_geojson(path: &Path) -> Result<Self, BoundaryError> {
        let content = fs::read_to_string(path).map_err(|source| BoundaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let geojson: GeoJson = content.parse()?;

        let geometries: Vec<geojson::Geometry> = match geojson {
            GeoJson::Geometry(geometry) => vec![geometry],
            GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .filter_map(|f| f.geometry)
                .collect(),
        };

        let mut polygons = Vec::new();
        for geometry in geometries {
            let geometry: Geometry<f64> = geometry.try_into()?;
            collect_polygons(geometry, &mut polygons);
        }

        // RFC 7946 GeoJSON is always WGS 84
        Ok(Self {
            crs: Crs::wgs84(),
            polygons,
        })
    }

    pub fn reproject(self, target: &Crs) -> Result<Self, BoundaryError> {
        if &self.crs == target {
            return Ok(self);
        }
        info!("Reprojecting boundary from {} to {}", self.crs, target);
        let reprojected = self
            .crs
            .reproject(target, &MultiPolygon::new(self.polygons))?;
        Ok(Self {
            crs: target.clone(),
            polygons: reprojected.0,
        })
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

fn collect_polygons(geometry: Geometry<f64>, out: &mut Vec<Polygon<f64>>) {
    match geometry {
        Geometry::Polygon(polygon) => out.push(polygon),
        Geometry::MultiPolygon(multi) => out.extend(multi.0),
        Geometry::GeometryCollection(collection) => {
            for inner in collection.0 {
                collect_polygons(inner, out);
            }
        }
        other => debug!("Ignoring non-polygonal boundary geometry: {:?}", other),
    }
}
