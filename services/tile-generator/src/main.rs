//! Corridor tile generator.
//!
//! Loads the Rail Freight Corridor feature collection, renders it into a
//! `{z}/{x}/{y}.png` pyramid and exits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ingestion::source_from_config;
use tile_common::BoundingBox;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tile_generator::{pipeline, GeneratorConfig};

#[derive(Parser, Debug)]
#[command(name = "tile-generator")]
#[command(about = "Render Rail Freight Corridor lines into XYZ raster tiles")]
struct Args {
    /// Generator configuration file (YAML)
    #[arg(short, long, env = "TILE_CONFIG", default_value = "config/tiles.yaml")]
    config: PathBuf,

    /// Output root, overrides output.root
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Lowest zoom level to render
    #[arg(long)]
    min_zoom: Option<u32>,

    /// Highest zoom level to render
    #[arg(long)]
    max_zoom: Option<u32>,

    /// Region as "left,bottom,right,top" in degrees, overrides region
    #[arg(long, value_parser = parse_region, allow_hyphen_values = true)]
    region: Option<BoundingBox>,

    /// Delete the existing output root before rendering
    #[arg(long)]
    clear: bool,

    /// Number of render threads (default: all cores)
    #[arg(short, long, env = "TILE_WORKERS")]
    workers: Option<usize>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(root) = &self.output {
            config.output.root = root.clone();
        }
        if let Some(z) = self.min_zoom {
            config.min_zoom = z;
        }
        if let Some(z) = self.max_zoom {
            config.max_zoom = z;
        }
        if let Some(region) = self.region {
            config.region = region;
        }
        if self.clear {
            config.output.clear = true;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
    }
}

fn parse_region(s: &str) -> Result<BoundingBox, String> {
    BoundingBox::from_csv(s).map_err(|e| e.to_string())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let mut config = GeneratorConfig::load(&args.config)?;
    args.apply(&mut config);
    config.validate().context("Invalid configuration after CLI overrides")?;

    info!(config = %args.config.display(), "Starting corridor tile generator");

    let source = source_from_config(&config.source)?;
    info!(source = %source.describe(), "Loading feature collection");
    let collection = source
        .load()
        .await
        .with_context(|| format!("Failed to load features from {}", source.describe()))?;

    // Rendering is CPU-bound; keep it off the async runtime.
    let summary = tokio::task::spawn_blocking(move || pipeline::run(&config, collection))
        .await
        .context("Render task panicked")??;

    info!(
        zooms = summary.zooms.len(),
        tiles_written = summary.tiles_written,
        tiles_empty = summary.tiles_empty,
        cleared = summary.cleared,
        "Done"
    );
    Ok(())
}
