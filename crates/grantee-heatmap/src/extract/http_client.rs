//! Single-shot HTTP page fetch wrapping reqwest.
//!
//! The source page is fetched exactly once per run. There is no retry:
//! a transport failure or non-2xx status becomes [`HeatmapError::Fetch`].

use crate::error::{HeatmapError, HeatmapResult};
use std::time::Duration;

const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// HTTP client for the page fetch.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with the given timeout and User-Agent.
    ///
    /// `None` falls back to a desktop Chrome User-Agent, since some hosts
    /// serve a stripped page to unknown clients.
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> HeatmapResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent.unwrap_or(BROWSER_UA))
            .build()
            .map_err(|e| HeatmapError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    /// Perform a single GET. Any non-2xx status is an error.
    pub async fn get(&self, url: &str) -> HeatmapResult<HttpResponse> {
        let fetch_err = |reason: String| HeatmapError::Fetch {
            url: url.to_string(),
            reason,
        };

        let r = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    fetch_err(format!("timed out after {}ms", self.timeout.as_millis()))
                } else {
                    fetch_err(e.to_string())
                }
            })?;

        let status = r.status();
        let final_url = r.url().to_string();

        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {}", status.as_u16())));
        }

        let body = r
            .text()
            .await
            .map_err(|e| fetch_err(format!("failed to read body: {e}")))?;

        Ok(HttpResponse {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}
