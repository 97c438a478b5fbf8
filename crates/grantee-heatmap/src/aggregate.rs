// Copyright 2026 Grantee Heatmap Contributors
// SPDX-License-Identifier: Apache-2.0

//! Aggregator: group geocoded points by exact coordinate.

use crate::types::{Coordinate, GeocodedPoint, WeightMode, WeightedPoint};
use std::collections::HashMap;

/// Weighted points plus the unweighted mean of their coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// One entry per distinct coordinate, ascending by (lat, lon).
    pub points: Vec<WeightedPoint>,
    /// `None` when there are no points.
    pub center: Option<Coordinate>,
}

/// Exact-equality key. `-0.0` folds into `0.0` so it groups the way `==` compares.
fn coordinate_key(lat: f64, lon: f64) -> (u64, u64) {
    ((lat + 0.0).to_bits(), (lon + 0.0).to_bits())
}

/// Group `points` on exact (latitude, longitude) equality.
pub fn aggregate(points: &[GeocodedPoint], mode: WeightMode) -> Aggregation {
    let mut groups: HashMap<(u64, u64), WeightedPoint> = HashMap::new();

    for p in points {
        let add = match mode {
            WeightMode::Mentions => p.mentions.max(1),
            WeightMode::DistinctLabels => 1,
        };
        groups
            .entry(coordinate_key(p.latitude, p.longitude))
            .and_modify(|w| w.weight += add)
            .or_insert(WeightedPoint {
                latitude: p.latitude + 0.0,
                longitude: p.longitude + 0.0,
                weight: add,
            });
    }

    let mut points: Vec<WeightedPoint> = groups.into_values().collect();
    points.sort_by(|a, b| {
        a.latitude
            .total_cmp(&b.latitude)
            .then(a.longitude.total_cmp(&b.longitude))
    });

    let center = mean_center(&points);
    Aggregation { points, center }
}

/// Arithmetic mean over distinct coordinates; weights are ignored.
pub fn mean_center(points: &[WeightedPoint]) -> Option<Coordinate> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(la, lo), p| (la + p.latitude, lo + p.longitude));
    Some(Coordinate::new(lat_sum / n, lon_sum / n))
}
