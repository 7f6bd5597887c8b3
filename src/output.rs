//! GeoJSON file persistence.

use anyhow::{Context, Result};
use geojson::{FeatureCollection, GeoJson};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;
use tracing::debug;

const INDENT: &[u8] = b"    ";

/// Serialize a collection with a four-space indent
pub fn to_pretty_bytes(collection: &FeatureCollection) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    collection
        .serialize(&mut serializer)
        .context("Failed to serialize feature collection")?;
    Ok(buf)
}

pub fn write_collection<P: AsRef<Path>>(path: P, collection: &FeatureCollection) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_pretty_bytes(collection)?;
    fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn read_collection<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("Failed to parse GeoJSON in {}", path.display()))?;
    let collection = FeatureCollection::try_from(geojson)
        .with_context(|| format!("{} is not a FeatureCollection", path.display()))?;
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{convert_response, ConvertOptions};
    use crate::models::OverpassResponse;
    use geojson::Value;
    use serde_json::json;

    fn sample() -> FeatureCollection {
        let response: OverpassResponse = serde_json::from_value(json!({"elements": [{
            "id": 5,
            "type": "way",
            "tags": {"leisure": "nature_reserve", "name": "Test"},
            "geometry": [
                {"lon": 31.123456789012345, "lat": -24.987654321098765},
                {"lon": 31.5, "lat": -24.9},
                {"lon": 31.4, "lat": -24.5},
                {"lon": 31.123456789012345, "lat": -24.987654321098765}
            ]
        }]}))
        .unwrap();
        convert_response(&response, &ConvertOptions::default()).collection
    }

    #[test]
    fn test_round_trip_preserves_ring() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reserves.geojson");
        let collection = sample();

        write_collection(&path, &collection).unwrap();
        let read_back = read_collection(&path).unwrap();

        assert_eq!(read_back.features.len(), 1);
        let geometry = read_back.features[0].geometry.as_ref().unwrap();
        assert_eq!(
            geometry.value,
            Value::Polygon(vec![vec![
                vec![31.123456789012345, -24.987654321098765],
                vec![31.5, -24.9],
                vec![31.4, -24.5],
                vec![31.123456789012345, -24.987654321098765],
            ]])
        );
        assert_eq!(read_back.features[0].properties, collection.features[0].properties);
    }

    #[test]
    fn test_output_shape_and_indent() {
        let bytes = to_pretty_bytes(&sample()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("\n    \"features\": ["));

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["type"], json!("FeatureCollection"));
        assert_eq!(value["features"][0]["type"], json!("Feature"));
        assert_eq!(value["features"][0]["geometry"]["type"], json!("Polygon"));
        assert_eq!(value["features"][0]["properties"]["id"], json!(5));
    }

    #[test]
    fn test_identical_bytes_for_same_input() {
        assert_eq!(
            to_pretty_bytes(&sample()).unwrap(),
            to_pretty_bytes(&sample()).unwrap()
        );
    }

    #[test]
    fn test_read_rejects_non_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("point.geojson");
        fs::write(&path, r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#).unwrap();

        assert!(read_collection(&path).is_err());
    }
}
