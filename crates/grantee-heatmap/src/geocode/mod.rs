//! Geocoder: resolve distinct location labels to coordinates.
//!
//! Lookups are strictly sequential. Each one goes through the run's
//! [`RateLimiter`], and a label that fails for any reason is logged and
//! dropped rather than aborting the run.

pub mod nominatim;
pub mod rate_limiter;

pub use nominatim::NominatimGeocoder;
pub use rate_limiter::RateLimiter;

use crate::config::RateLimitPolicy;
use crate::error::GeocodeError;
use crate::types::{Coordinate, DistinctLabel, GeocodedPoint, LocationLabel};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

/// A free-text place lookup service.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `query`. `Ok(None)` means the service found nothing.
    async fn lookup(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Option<Coordinate>, GeocodeError>;
}

/// Outcome of geocoding every distinct label.
#[derive(Debug, Clone, Default)]
pub struct GeocodeReport {
    pub points: Vec<GeocodedPoint>,
    /// Labels that were not found or failed.
    pub skipped: Vec<LocationLabel>,
}

/// Deduplicate on exact string equality, counting mentions.
///
/// Order is first appearance. Case and inner whitespace are significant.
pub fn distinct_labels(labels: &[LocationLabel]) -> Vec<DistinctLabel> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<DistinctLabel> = Vec::new();
    for label in labels {
        match index.get(label.as_str()) {
            Some(&i) => out[i].mentions += 1,
            None => {
                index.insert(label.as_str(), out.len());
                out.push(DistinctLabel {
                    label: label.clone(),
                    mentions: 1,
                });
            }
        }
    }
    out
}

/// Geocode each distinct label in order through `limiter`.
///
/// `policy.post_lookup_delay` is slept after every label, whatever the
/// outcome, in addition to the limiter's own spacing.
pub async fn geocode_labels(
    geocoder: &dyn Geocoder,
    limiter: &mut RateLimiter,
    policy: &RateLimitPolicy,
    labels: &[DistinctLabel],
) -> GeocodeReport {
    let mut report = GeocodeReport::default();
    let total = labels.len();

    for (i, distinct) in labels.iter().enumerate() {
        let name = distinct.label.as_str();
        info!("geocoding '{name}' ({}/{total})", i + 1);

        let outcome = limiter
            .run(|| geocoder.lookup(name, policy.lookup_timeout))
            .await;

        match outcome {
            Ok(Some(c)) => report.points.push(GeocodedPoint {
                name: distinct.label.clone(),
                latitude: c.latitude,
                longitude: c.longitude,
                mentions: distinct.mentions,
            }),
            Ok(None) => {
                warn!("could not geocode '{name}'");
                report.skipped.push(distinct.label.clone());
            }
            Err(e) => {
                warn!("error geocoding '{name}': {e}");
                report.skipped.push(distinct.label.clone());
            }
        }

        tokio::time::sleep(policy.post_lookup_delay).await;
    }

    info!("successfully geocoded {} unique locations", report.points.len());
    report
}
