// Copyright 2026 Grantee Heatmap Contributors
// SPDX-License-Identifier: Apache-2.0

//! Map renderer: compose a Leaflet heatmap page and write it to disk.
//!
//! The page template is embedded at compile time. The view and layer data
//! are injected as JSON, so the output is one self-contained HTML file that
//! only needs the Leaflet CDN and tile server when opened.

use crate::error::{HeatmapError, HeatmapResult};
use crate::types::{Coordinate, WeightedPoint};
use serde::Serialize;
use std::path::Path;

const TEMPLATE: &str = include_str!("heatmap.html");

const DEFAULT_TITLE: &str = "XRPL Grantees Heatmap";

/// Options passed to `L.heatLayer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatLayerOptions {
    pub radius: u32,
    pub blur: u32,
    pub min_opacity: f64,
    pub max_zoom: u32,
}

impl Default for HeatLayerOptions {
    fn default() -> Self {
        Self {
            radius: 25,
            blur: 15,
            min_opacity: 0.5,
            max_zoom: 18,
        }
    }
}

/// One heat layer entry, serialized as `[lat, lon, intensity]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatEntry(pub f64, pub f64, pub u32);

impl From<&WeightedPoint> for HeatEntry {
    fn from(p: &WeightedPoint) -> Self {
        HeatEntry(p.latitude, p.longitude, p.weight)
    }
}

/// A composed map view with its heat overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapDocument {
    pub title: String,
    pub center: Coordinate,
    pub zoom: u8,
    pub heat: Vec<HeatEntry>,
    pub options: HeatLayerOptions,
}

impl HeatmapDocument {
    /// Build the document. A missing center falls back to (0, 0).
    pub fn new(points: &[WeightedPoint], center: Option<Coordinate>, zoom: u8) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            center: center.unwrap_or_else(Coordinate::origin),
            zoom,
            heat: points.iter().map(HeatEntry::from).collect(),
            options: HeatLayerOptions::default(),
        }
    }

    /// Render the full HTML page.
    pub fn to_html(&self) -> HeatmapResult<String> {
        let center = serde_json::to_string(&[self.center.latitude, self.center.longitude])?;
        let heat = serde_json::to_string(&self.heat)?;
        let options = serde_json::to_string(&self.options)?;

        Ok(TEMPLATE
            .replace("{{TITLE}}", &escape_html(&self.title))
            .replace("{{CENTER}}", &center)
            .replace("{{ZOOM}}", &self.zoom.to_string())
            .replace("{{HEAT_DATA}}", &heat)
            .replace("{{HEAT_OPTIONS}}", &options))
    }

    /// Write the page to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> HeatmapResult<()> {
        let html = self.to_html()?;
        std::fs::write(path, html).map_err(|source| HeatmapError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
