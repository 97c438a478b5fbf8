//! Location extractor: fetch the grantee page and pull location labels.

pub mod http_client;
pub mod strategy;

pub use http_client::{HttpClient, HttpResponse};
pub use strategy::{Extraction, LabelStrategy, SiblingTextStrategy};

use crate::error::HeatmapResult;
use scraper::Html;
use tracing::{debug, info, warn};

/// Number of labels echoed to the log as a sanity check.
const EXAMPLE_LABELS: usize = 5;

/// Fetch `url` once and extract labels with `strategy`.
///
/// A fetch failure is fatal. A page with no matching cards is not: it logs
/// a warning and returns an empty extraction.
pub async fn fetch_labels(
    client: &HttpClient,
    url: &str,
    strategy: &dyn LabelStrategy,
) -> HeatmapResult<Extraction> {
    let resp = client.get(url).await?;
    debug!(
        "fetched {} ({} bytes, status {}, final url {})",
        resp.url,
        resp.body.len(),
        resp.status,
        resp.final_url
    );
    Ok(extract_labels(&resp.body, strategy))
}

/// Parse `html` and run the strategy over it.
pub fn extract_labels(html: &str, strategy: &dyn LabelStrategy) -> Extraction {
    let document = Html::parse_document(html);
    let extraction = strategy.extract(&document);

    if extraction.cards == 0 {
        warn!(
            "no grantee cards matched the {} strategy; the page layout may have changed",
            strategy.name()
        );
    }
    info!("found {} potential grantee cards", extraction.cards);
    info!("scraped {} potential locations", extraction.labels.len());
    if !extraction.labels.is_empty() {
        let end = extraction.labels.len().min(EXAMPLE_LABELS);
        info!("example locations: {:?}", &extraction.labels[..end]);
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CARD_SELECTOR, DEFAULT_ICON_SELECTOR};
    use crate::error::HeatmapError;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn strategy() -> SiblingTextStrategy {
        SiblingTextStrategy::new(DEFAULT_CARD_SELECTOR, DEFAULT_ICON_SELECTOR).unwrap()
    }

    fn card(label: &str) -> String {
        format!(r#"<div class="card-grantee"><h4>Team</h4><div class="icon-location"></div>{label}</div>"#)
    }

    #[test]
    fn test_extract_n_cards_gives_n_labels() {
        let html = format!(
            "<html><body>{}{}{}{}</body></html>",
            card(" Brazil "),
            card("Kenya"),
            card("\n  India\n"),
            card("Brazil")
        );
        let ex = extract_labels(&html, &strategy());
        assert_eq!(ex.cards, 4);
        assert_eq!(ex.labels, vec!["Brazil", "Kenya", "India", "Brazil"]);
    }

    #[test]
    fn test_extract_zero_cards_is_empty_not_error() {
        let ex = extract_labels("<html><body><p>redesigned</p></body></html>", &strategy());
        assert_eq!(ex.cards, 0);
        assert!(ex.labels.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_labels_from_server() {
        let server = MockServer::start().await;
        let body = format!("<html><body>{}{}</body></html>", card("Chile"), card("   "));
        Mock::given(method("GET"))
            .and(path("/grantees"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_secs(5), None).unwrap();
        let url = format!("{}/grantees", server.uri());
        let ex = fetch_labels(&client, &url, &strategy()).await.unwrap();
        assert_eq!(ex.cards, 2);
        assert_eq!(ex.labels, vec!["Chile"]);
    }

    #[tokio::test]
    async fn test_fetch_labels_propagates_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new(Duration::from_secs(5), None).unwrap();
        let err = fetch_labels(&client, &server.uri(), &strategy())
            .await
            .unwrap_err();
        assert!(matches!(err, HeatmapError::Fetch { .. }));
    }
}
