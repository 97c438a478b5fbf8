// Copyright 2026 Grantee Heatmap Contributors
// SPDX-License-Identifier: Apache-2.0

//! Grantee heatmap library: scrape grantee locations, geocode them,
//! aggregate per coordinate, and render a Leaflet heatmap.
//!
//! This library crate exposes the pipeline stages for the binary and for
//! integration testing.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod extract;
pub mod geocode;
pub mod pipeline;
pub mod render;
pub mod types;

pub use config::{PipelineConfig, RateLimitPolicy};
pub use error::{GeocodeError, HeatmapError, HeatmapResult};
pub use pipeline::{run, run_with, RunSummary};
pub use types::*;
