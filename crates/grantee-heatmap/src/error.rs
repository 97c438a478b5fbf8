// Copyright 2026 Grantee Heatmap Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the heatmap pipeline.

/// Failures that stop the run, plus configuration problems.
#[derive(thiserror::Error, Debug)]
pub enum HeatmapError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("no locations were scraped; check the page structure or the selectors")]
    NoLocations,

    #[error("no locations were successfully geocoded; cannot create heatmap")]
    NoGeocodedLocations,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single geocoding lookup did not produce a coordinate.
#[derive(thiserror::Error, Debug)]
pub enum GeocodeError {
    #[error("lookup timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("geocoder returned HTTP {0}")]
    Status(u16),

    #[error("could not decode geocoder response: {0}")]
    Decode(String),
}

impl GeocodeError {
    /// Whether the rate limiter should retry the lookup.
    pub fn is_transient(&self) -> bool {
        match self {
            GeocodeError::Timeout | GeocodeError::Transport(_) => true,
            GeocodeError::Status(code) => *code == 429 || *code >= 500,
            GeocodeError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GeocodeError::Timeout
        } else if e.is_decode() {
            GeocodeError::Decode(e.to_string())
        } else {
            GeocodeError::Transport(e.to_string())
        }
    }
}

pub type HeatmapResult<T> = Result<T, HeatmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GeocodeError::Timeout.is_transient());
        assert!(GeocodeError::Transport("reset".into()).is_transient());
        assert!(GeocodeError::Status(429).is_transient());
        assert!(GeocodeError::Status(503).is_transient());
        assert!(!GeocodeError::Status(404).is_transient());
        assert!(!GeocodeError::Decode("bad json".into()).is_transient());
    }

    #[test]
    fn test_fetch_error_message() {
        let e = HeatmapError::Fetch {
            url: "https://example.com".into(),
            reason: "HTTP 500".into(),
        };
        assert_eq!(e.to_string(), "failed to fetch https://example.com: HTTP 500");
    }
}
