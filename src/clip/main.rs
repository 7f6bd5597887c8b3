//! Clip a reserves GeoJSON file against an administrative boundary.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sanctuary::boundary::clip_file;
use sanctuary::config::{DEFAULT_CLIP_OUTPUT, DEFAULT_OUTPUT};

#[derive(Parser, Debug)]
#[command(name = "clip")]
#[command(about = "Clip reserve polygons against a country boundary")]
struct Args {
    /// Reserves GeoJSON produced by `fetch`
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    input: PathBuf,

    /// Boundary file (.shp with optional .prj, or .geojson)
    #[arg(short, long)]
    boundary: PathBuf,

    /// Clipped GeoJSON output
    #[arg(short, long, default_value = DEFAULT_CLIP_OUTPUT)]
    output: PathBuf,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

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

    info!("Sanctuary Clip");

    let report = clip_file(&args.input, &args.boundary, &args.output)?;
    if report.kept == 0 {
        info!("No reserves intersect {}", args.boundary.display());
    }

    Ok(())
}
