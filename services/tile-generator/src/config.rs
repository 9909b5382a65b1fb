//! Generator configuration loaded from YAML.
//!
//! Every section except `source` is optional and defaults to the Rail
//! Freight Corridor setup: Europe, zooms 4 to 10, output under `tiles/`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ingestion::SourceConfig;
use renderer::{StyleTable, ZoomWidthPolicy};
use serde::{Deserialize, Serialize};
use tile_common::{tile::check_zoom, BoundingBox, TileError};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u32,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u32,
    /// Lon/lat box whose covering tiles are rendered at every zoom.
    #[serde(default = "default_region")]
    pub region: BoundingBox,
    #[serde(default)]
    pub output: OutputConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub style: StyleTable,
    #[serde(default)]
    pub widths: ZoomWidthPolicy,
    /// Render threads; all available cores when unset.
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_root")]
    pub root: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Remove the whole output root before rendering.
    #[serde(default)]
    pub clear: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            extension: default_extension(),
            clear: false,
        }
    }
}

fn default_min_zoom() -> u32 {
    4
}

fn default_max_zoom() -> u32 {
    10
}

fn default_region() -> BoundingBox {
    BoundingBox::new(
        -13.205890927977881,
        33.78523007002315,
        32.53507495564878,
        64.71857967286385,
    )
}

fn default_output_root() -> PathBuf {
    PathBuf::from("tiles")
}

fn default_extension() -> String {
    "png".to_string()
}

impl GeneratorConfig {
    /// Config with every default and the given source.
    pub fn with_source(source: SourceConfig) -> Self {
        Self {
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            region: default_region(),
            output: OutputConfig::default(),
            source,
            style: StyleTable::default(),
            widths: ZoomWidthPolicy::default(),
            workers: None,
        }
    }

    /// Load and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!(path = %path.display(), "Loaded generator config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("Failed to parse YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_zoom > self.max_zoom {
            return Err(TileError::InvalidZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            }
            .into());
        }
        check_zoom(self.max_zoom)?;
        self.region.validate().context("Invalid region")?;
        if self.output.extension.trim_start_matches('.').is_empty() {
            bail!("output.extension must not be empty");
        }
        if self.workers == Some(0) {
            bail!("workers must be at least 1");
        }
        self.widths.validate()?;
        Ok(())
    }

    pub fn zoom_levels(&self) -> std::ops::RangeInclusive<u32> {
        self.min_zoom..=self.max_zoom
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
