//! Overpass API access: query text and the HTTP client.

mod client;
mod query;

pub use client::{OverpassClient, OverpassError, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
pub use query::{
    BoundingBox, OverpassQuery, QueryError, TagFilter, AFRICA_BBOX, DEFAULT_TIMEOUT_SECS,
};
