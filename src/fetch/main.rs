//! Overpass fetch pipeline.
//!
//! Queries nature reserves, converts closed ways to GeoJSON polygons,
//! writes them to disk and optionally clips them against a boundary file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sanctuary::boundary::clip_file;
use sanctuary::config::{ClipConfig, Config, DEFAULT_CLIP_OUTPUT};
use sanctuary::convert::convert_response;
use sanctuary::output::write_collection;
use sanctuary::overpass::{BoundingBox, OverpassClient, OverpassError};

#[derive(Parser, Debug)]
#[command(name = "fetch")]
#[command(about = "Fetch nature reserves from Overpass and save them as GeoJSON")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output GeoJSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Bounding box as south,west,north,east
    #[arg(long, allow_hyphen_values = true)]
    bbox: Option<BoundingBox>,

    /// Overpass interpreter URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Pre-seed the reserve attribute catalog on every feature
    #[arg(long)]
    seed_properties: bool,

    /// Boundary file (.shp or .geojson) to clip the result against
    #[arg(long)]
    clip: Option<PathBuf>,

    /// Output file for the clipped result
    #[arg(long)]
    clip_output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(output) = args.output {
        config.output.path = output;
    }
    if let Some(bbox) = args.bbox {
        config.query.bbox = [bbox.south, bbox.west, bbox.north, bbox.east];
    }
    if let Some(endpoint) = args.endpoint {
        config.overpass.endpoint = endpoint;
    }
    if args.seed_properties {
        config.output.seed_properties = true;
    }
    if let Some(boundary) = args.clip {
        let output = args
            .clip_output
            .or_else(|| config.clip.as_ref().map(|c| c.output.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CLIP_OUTPUT));
        config.clip = Some(ClipConfig { boundary, output });
    } else if let (Some(clip), Some(output)) = (config.clip.as_mut(), args.clip_output) {
        clip.output = output;
    }

    info!("Sanctuary Fetch");

    let query = config.overpass_query()?;
    let client = OverpassClient::new(&config.overpass.endpoint, &config.overpass.user_agent)?;

    let response = match client.fetch(&query).await {
        Ok(response) => response,
        Err(err @ OverpassError::Status { .. }) => {
            error!("{}", err);
            anyhow::bail!("Overpass query failed, {} not written", config.output.path.display());
        }
        Err(err) => return Err(err).context("Overpass query failed"),
    };

    let conversion = convert_response(&response, &config.convert_options());
    write_collection(&config.output.path, &conversion.collection)?;
    info!("GeoJSON saved as {}", config.output.path.display());

    if let Some(clip) = &config.clip {
        clip_file(&config.output.path, &clip.boundary, &clip.output)?;
    }

    Ok(())
}
