//! Corridor feature ingestion.
//!
//! A [`FeatureSource`] yields the FeatureCollection that a tile run renders.
//! Two sources exist:
//!
//! - [`LocalFileSource`]: a GeoJSON file on disk
//! - [`HttpSource`]: a GET against a feature API, optionally saving the raw
//!   body so later runs can switch to the local file
//!
//! Which one is used is decided by configuration ([`SourceConfig`]), never by
//! probing the filesystem.

pub mod error;
pub mod source;

pub use error::{IngestionError, Result};
pub use source::{source_from_config, FeatureSource, HttpSource, LocalFileSource, SourceConfig};
