//! Data models for Overpass results.

pub mod element;

pub use element::{Element, GeomPoint, OsmType, OverpassResponse};
