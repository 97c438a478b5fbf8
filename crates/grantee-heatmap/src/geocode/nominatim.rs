//! Nominatim (OpenStreetMap) search client.

use super::Geocoder;
use crate::error::{GeocodeError, HeatmapError, HeatmapResult};
use crate::types::Coordinate;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// One hit from `/search?format=json`. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    search_url: url::Url,
}

impl NominatimGeocoder {
    /// `base_url` is the service root, e.g. `https://nominatim.openstreetmap.org`.
    pub fn new(base_url: &str, user_agent: &str) -> HeatmapResult<Self> {
        let mut base = url::Url::parse(base_url)
            .map_err(|e| HeatmapError::Config(format!("geocoder URL {base_url:?}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let search_url = base
            .join("search")
            .map_err(|e| HeatmapError::Config(format!("geocoder URL {base_url:?}: {e}")))?;

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| HeatmapError::Config(format!("failed to build geocoder client: {e}")))?;

        Ok(Self { client, search_url })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Option<Coordinate>, GeocodeError> {
        let resp = self
            .client
            .get(self.search_url.clone())
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .timeout(timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        parse_search_response(&body)
    }
}

fn parse_search_response(body: &str) -> Result<Option<Coordinate>, GeocodeError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Decode(e.to_string()))?;

    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let latitude = parse_degrees(&place.lat, "lat")?;
    let longitude = parse_degrees(&place.lon, "lon")?;
    if let Some(name) = &place.display_name {
        tracing::debug!("resolved to {name}");
    }
    Ok(Some(Coordinate::new(latitude, longitude)))
}

fn parse_degrees(raw: &str, field: &str) -> Result<f64, GeocodeError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| GeocodeError::Decode(format!("{field} {raw:?} is not a number")))?;
    if !value.is_finite() {
        return Err(GeocodeError::Decode(format!("{field} {raw:?} is not finite")));
    }
    Ok(value)
}
