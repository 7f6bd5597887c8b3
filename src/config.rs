use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::ConvertOptions;
use crate::overpass::{
    BoundingBox, OverpassQuery, TagFilter, AFRICA_BBOX, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

pub const DEFAULT_OUTPUT: &str = "nature_reserves.geojson";
pub const DEFAULT_CLIP_OUTPUT: &str = "nature_reserves_clipped.geojson";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub overpass: OverpassConfig,
    pub query: QueryConfig,
    pub output: OutputConfig,
    pub clip: Option<ClipConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub timeout_secs: u32,
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QueryConfig {
    pub key: String,
    pub value: String,
    /// south, west, north, east
    pub bbox: [f64; 4],
}

impl Default for QueryConfig {
    fn default() -> Self {
        let tag = TagFilter::default();
        Self {
            key: tag.key,
            value: tag.value,
            bbox: AFRICA_BBOX,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    /// Pre-seed the reserve attribute catalog on every feature
    pub seed_properties: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
            seed_properties: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClipConfig {
    pub boundary: PathBuf,
    #[serde(default = "default_clip_output")]
    pub output: PathBuf,
}

fn default_clip_output() -> PathBuf {
    PathBuf::from(DEFAULT_CLIP_OUTPUT)
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    pub fn overpass_query(&self) -> Result<OverpassQuery> {
        let bbox = BoundingBox::from_array(self.query.bbox).context("Invalid [query] bbox")?;
        let tag = TagFilter::new(&self.query.key, &self.query.value)
            .context("Invalid [query] tag")?;
        Ok(OverpassQuery::new(bbox, tag, self.overpass.timeout_secs))
    }

    pub fn convert_options(&self) -> ConvertOptions {
        if self.output.seed_properties {
            ConvertOptions::with_reserve_catalog()
        } else {
            ConvertOptions::default()
        }
    }
}
