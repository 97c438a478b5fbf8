// Copyright 2026 Grantee Heatmap Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core data types shared by the pipeline stages.

use serde::{Deserialize, Serialize};

/// A trimmed, non-empty place name scraped from the source page.
pub type LocationLabel = String;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The map origin, used when there is nothing to center on.
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A label after exact-string deduplication, with its mention count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinctLabel {
    pub label: LocationLabel,
    /// How many times the label occurred on the page (always >= 1).
    pub mentions: u32,
}

/// A distinct label that resolved to a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPoint {
    pub name: LocationLabel,
    pub latitude: f64,
    pub longitude: f64,
    /// Mentions carried over from [`DistinctLabel`].
    pub mentions: u32,
}

impl GeocodedPoint {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            mentions: 1,
        }
    }

    pub fn with_mentions(mut self, mentions: u32) -> Self {
        self.mentions = mentions;
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A distinct coordinate and how strongly it contributes to the heat layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub weight: u32,
}

impl WeightedPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// How the aggregator turns grouped points into a heat weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightMode {
    /// Sum of raw page mentions of every label at the coordinate.
    #[default]
    Mentions,
    /// Number of distinct labels that resolved to the coordinate.
    DistinctLabels,
}

impl std::fmt::Display for WeightMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mentions => write!(f, "mentions"),
            Self::DistinctLabels => write!(f, "distinct-labels"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocoded_point_defaults_to_one_mention() {
        let p = GeocodedPoint::new("Brazil", -14.2, -51.9);
        assert_eq!(p.mentions, 1);
        assert_eq!(p.coordinate(), Coordinate::new(-14.2, -51.9));
        assert_eq!(p.with_mentions(4).mentions, 4);
    }

    #[test]
    fn test_weight_mode_serde_names() {
        let json = serde_json::to_string(&WeightMode::DistinctLabels).unwrap();
        assert_eq!(json, "\"distinct-labels\"");
        assert_eq!(WeightMode::default(), WeightMode::Mentions);
        assert_eq!(WeightMode::Mentions.to_string(), "mentions");
    }
}
