//! Sanctuary - nature reserve extraction from Overpass into GeoJSON
//!
//! This library provides shared types and modules for the fetch and clip binaries.

pub mod boundary;
pub mod config;
pub mod convert;
pub mod models;
pub mod output;
pub mod overpass;

pub use convert::{
    convert_elements, convert_response, Conversion, ConversionReport, ConvertOptions,
};
pub use models::{Element, GeomPoint, OsmType, OverpassResponse};
