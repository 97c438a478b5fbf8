// Copyright 2026 Grantee Heatmap Contributors
// SPDX-License-Identifier: Apache-2.0

//! Linear batch run: extract → geocode → aggregate → render.
//!
//! Each stage consumes the full output of the previous one. Fatal
//! conditions surface as [`HeatmapError`]; everything else is logged.

use crate::aggregate::aggregate;
use crate::config::PipelineConfig;
use crate::error::{HeatmapError, HeatmapResult};
use crate::extract::{fetch_labels, HttpClient, LabelStrategy, SiblingTextStrategy};
use crate::geocode::{distinct_labels, geocode_labels, Geocoder, NominatimGeocoder, RateLimiter};
use crate::render::HeatmapDocument;
use crate::types::{Coordinate, LocationLabel};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub labels_scraped: usize,
    pub distinct_labels: usize,
    pub geocoded: usize,
    pub skipped: Vec<LocationLabel>,
    pub heat_points: usize,
    pub center: Coordinate,
    pub output: PathBuf,
}

/// Run the pipeline with the default strategy and Nominatim geocoder.
pub async fn run(config: &PipelineConfig) -> HeatmapResult<RunSummary> {
    config.validate()?;

    let client = HttpClient::new(config.fetch_timeout, config.page_user_agent.as_deref())?;
    let strategy = SiblingTextStrategy::new(&config.card_selector, &config.icon_selector)?;
    let geocoder = NominatimGeocoder::new(&config.geocoder_url, &config.geocoder_user_agent)?;

    run_with(config, &client, &strategy, &geocoder).await
}

/// Run the pipeline with caller-supplied collaborators.
pub async fn run_with(
    config: &PipelineConfig,
    client: &HttpClient,
    strategy: &dyn LabelStrategy,
    geocoder: &dyn Geocoder,
) -> HeatmapResult<RunSummary> {
    let started = Instant::now();

    info!("step 1: scraping grantee locations from {}", config.source_url);
    let extraction = fetch_labels(client, &config.source_url, strategy).await?;
    if extraction.labels.is_empty() {
        return Err(HeatmapError::NoLocations);
    }

    info!("step 2: geocoding locations");
    let distinct = distinct_labels(&extraction.labels);
    let mut limiter = RateLimiter::new(&config.rate_limit);
    let report = geocode_labels(geocoder, &mut limiter, &config.rate_limit, &distinct).await;
    if report.points.is_empty() {
        return Err(HeatmapError::NoGeocodedLocations);
    }

    info!(
        "step 3: aggregating data for heatmap (weight = {})",
        config.weight_mode
    );
    let aggregation = aggregate(&report.points, config.weight_mode);
    info!("prepared {} data points for heatmap", aggregation.points.len());

    info!("step 4: creating heatmap visualization");
    let document = HeatmapDocument::new(&aggregation.points, aggregation.center, config.zoom);
    document.save(&config.output_path)?;
    info!(
        "wrote {} in {:.1}s",
        config.output_path.display(),
        started.elapsed().as_secs_f64()
    );

    Ok(RunSummary {
        labels_scraped: extraction.labels.len(),
        distinct_labels: distinct.len(),
        geocoded: report.points.len(),
        skipped: report.skipped,
        heat_points: document.heat.len(),
        center: document.center,
        output: config.output_path.clone(),
    })
}
