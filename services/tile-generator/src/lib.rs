//! Corridor tile generation: configuration and the parallel render pipeline.
//!
//! The binary in `main.rs` wires these to the command line; tests drive
//! [`pipeline::run`] directly.

pub mod config;
pub mod pipeline;

pub use config::{GeneratorConfig, OutputConfig};
pub use pipeline::{run, RunSummary, ZoomSummary};
