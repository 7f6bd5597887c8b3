//! Administrative boundary clipping.
//!
//! Loads a boundary file (shapefile or GeoJSON), brings it into the
//! features' reference system and intersects every reserve with it using an
//! R-tree to narrow the candidate polygons.

mod clip;
mod crs;
mod index;
mod load;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub use clip::{clip_collection, ClipReport};
pub use crs::Crs;
pub use index::BoundaryIndex;
pub use load::Boundary;

use crate::output::{read_collection, write_collection};

#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read shapefile: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("failed to parse GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("unsupported boundary format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),

    #[error("reprojection failed: {0}")]
    Projection(#[from] proj::ProjError),

    #[error("boundary file {} contains no polygons", .0.display())]
    Empty(PathBuf),
}

/// Clip the reserves in `input` against `boundary` and write the result to
/// `output`. The reserves are taken to be WGS 84 lon/lat.
pub fn clip_file(input: &Path, boundary: &Path, output: &Path) -> Result<ClipReport> {
    info!("Clipping {} against {}", input.display(), boundary.display());

    let collection = read_collection(input)?;
    let boundary = Boundary::load(boundary)
        .and_then(|b| b.reproject(&Crs::wgs84()))
        .with_context(|| format!("Failed to load boundary {}", boundary.display()))?;
    let index = BoundaryIndex::build(boundary.polygons);

    let (clipped, report) = clip_collection(collection, &index);
    write_collection(output, &clipped)?;

    info!(
        "Clipped GeoJSON saved as {} ({} kept, {} outside boundary)",
        output.display(),
        report.kept,
        report.dropped
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Value;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_clip_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("reserves.geojson");
        let boundary = dir.path().join("country.geojson");
        let output = dir.path().join("clipped.geojson");

        let reserves = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"id": 1, "name": "Inside"},
                    "geometry": {"type": "Polygon", "coordinates": [[[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]]]}
                },
                {
                    "type": "Feature",
                    "properties": {"id": 2, "name": "Outside"},
                    "geometry": {"type": "Polygon", "coordinates": [[[20.0, 20.0], [21.0, 20.0], [21.0, 21.0], [20.0, 20.0]]]}
                }
            ]
        });
        let country = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]
        });
        fs::write(&input, reserves.to_string()).unwrap();
        fs::write(&boundary, country.to_string()).unwrap();

        let report = clip_file(&input, &boundary, &output).unwrap();
        assert_eq!(report, ClipReport { kept: 1, dropped: 1 });

        let clipped = read_collection(&output).unwrap();
        assert_eq!(clipped.features.len(), 1);
        let feature = &clipped.features[0];
        assert_eq!(feature.properties.as_ref().unwrap()["name"], json!("Inside"));
        assert!(matches!(
            feature.geometry.as_ref().unwrap().value,
            Value::Polygon(_)
        ));
    }

    #[test]
    fn test_clip_file_missing_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("reserves.geojson");
        fs::write(&input, r#"{"type": "FeatureCollection", "features": []}"#).unwrap();

        let result = clip_file(
            &input,
            &dir.path().join("missing.geojson"),
            &dir.path().join("out.geojson"),
        );
        assert!(result.is_err());
        assert!(!dir.path().join("out.geojson").exists());
    }
}
