// Copyright 2026 Grantee Heatmap Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pipeline configuration and its defaults.

use crate::error::{HeatmapError, HeatmapResult};
use crate::types::WeightMode;
use std::path::PathBuf;
use std::time::Duration;

/// Grantee listing scraped when no URL is given.
pub const DEFAULT_SOURCE_URL: &str = "https://xrplgrants.org/grantees";

/// Heatmap file written to the working directory by default.
pub const DEFAULT_OUTPUT_FILE: &str = "xrpl_grantees_heatmap.html";

/// Public Nominatim instance.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying User-Agent.
pub const GEOCODER_USER_AGENT: &str = "xrpl-grantee-heatmap-analyzer";

pub const DEFAULT_CARD_SELECTOR: &str = "div.card-grantee";
pub const DEFAULT_ICON_SELECTOR: &str = "div.icon-location";

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_ZOOM: u8 = 2;

/// Pacing and retry rules for geocoding lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitPolicy {
    /// Minimum spacing between the start of two lookup attempts.
    pub min_delay: Duration,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// Wait between a failed attempt and its retry.
    pub error_wait: Duration,
    /// Extra pause after each label, on top of `min_delay`.
    pub post_lookup_delay: Duration,
    /// Timeout for a single lookup attempt.
    pub lookup_timeout: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(1500),
            max_retries: 3,
            error_wait: Duration::from_secs(5),
            post_lookup_delay: Duration::from_millis(500),
            lookup_timeout: Duration::from_secs(10),
        }
    }
}

impl RateLimitPolicy {
    /// A policy with no waiting at all. Retry count is kept.
    pub fn immediate() -> Self {
        Self {
            min_delay: Duration::ZERO,
            error_wait: Duration::ZERO,
            post_lookup_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Everything a run needs. `Default` reproduces the parameterless run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source_url: String,
    pub fetch_timeout: Duration,
    /// User-Agent for the page fetch. `None` uses the browser-like default.
    pub page_user_agent: Option<String>,
    pub card_selector: String,
    pub icon_selector: String,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub rate_limit: RateLimitPolicy,
    pub weight_mode: WeightMode,
    pub output_path: PathBuf,
    pub zoom: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            page_user_agent: None,
            card_selector: DEFAULT_CARD_SELECTOR.to_string(),
            icon_selector: DEFAULT_ICON_SELECTOR.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            geocoder_user_agent: GEOCODER_USER_AGENT.to_string(),
            rate_limit: RateLimitPolicy::default(),
            weight_mode: WeightMode::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl PipelineConfig {
    /// Check the URLs before any network traffic happens.
    pub fn validate(&self) -> HeatmapResult<()> {
        for (what, raw) in [
            ("source URL", &self.source_url),
            ("geocoder URL", &self.geocoder_url),
        ] {
            let parsed = url::Url::parse(raw)
                .map_err(|e| HeatmapError::Config(format!("{what} {raw:?}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(HeatmapError::Config(format!(
                    "{what} {raw:?} must be http or https"
                )));
            }
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(HeatmapError::Config("output path is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parameterless_run() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.source_url, "https://xrplgrants.org/grantees");
        assert_eq!(cfg.output_path, PathBuf::from("xrpl_grantees_heatmap.html"));
        assert_eq!(cfg.zoom, 2);
        assert_eq!(cfg.rate_limit.min_delay, Duration::from_millis(1500));
        assert_eq!(cfg.rate_limit.max_retries, 3);
        assert_eq!(cfg.rate_limit.error_wait, Duration::from_secs(5));
        assert_eq!(cfg.rate_limit.post_lookup_delay, Duration::from_millis(500));
        assert_eq!(cfg.rate_limit.lookup_timeout, Duration::from_secs(10));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let cfg = PipelineConfig {
            source_url: "not a url".into(),
            ..PipelineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(HeatmapError::Config(_))));

        let cfg = PipelineConfig {
            geocoder_url: "ftp://example.com".into(),
            ..PipelineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(HeatmapError::Config(_))));
    }

    #[test]
    fn test_immediate_policy_keeps_retries() {
        let p = RateLimitPolicy::immediate();
        assert_eq!(p.min_delay, Duration::ZERO);
        assert_eq!(p.max_retries, 3);
    }
}
