//! Label-extraction strategies.
//!
//! The grantee page is an uncontrolled collaborator, so the rule that turns
//! its DOM into labels sits behind [`LabelStrategy`]. The `scraper` types are
//! `!Send`; strategies are synchronous and run after the fetch completes.

use crate::error::{HeatmapError, HeatmapResult};
use crate::types::LocationLabel;
use scraper::{ElementRef, Html, Selector};

/// Labels pulled from one document, plus how many cards were matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Number of elements matching the card marker.
    pub cards: usize,
    /// Trimmed, non-empty labels in document order.
    pub labels: Vec<LocationLabel>,
}

/// A rule for turning a parsed page into location labels.
pub trait LabelStrategy: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;
    /// Extract candidate labels from the document.
    fn extract(&self, document: &Html) -> Extraction;
}

/// Reads the text node directly after a location icon inside each card.
///
/// ```html
/// <div class="card-grantee">
///   <h3>Acme</h3>
///   <div class="icon-location"></div> Brazil
/// </div>
/// ```
///
/// Only the adjacent sibling is considered. If it is an element rather than
/// text, the card yields nothing, so markup nested elsewhere in the card
/// never leaks into a label.
#[derive(Debug, Clone)]
pub struct SiblingTextStrategy {
    card: Selector,
    icon: Selector,
}

impl SiblingTextStrategy {
    pub fn new(card_selector: &str, icon_selector: &str) -> HeatmapResult<Self> {
        Ok(Self {
            card: parse_selector(card_selector)?,
            icon: parse_selector(icon_selector)?,
        })
    }

    fn label_for_card(&self, card: ElementRef<'_>) -> Option<LocationLabel> {
        let icon = card.select(&self.icon).next()?;
        let sibling = icon.next_sibling()?;
        let text = sibling.value().as_text()?;
        let label = text.trim();
        if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        }
    }
}

impl LabelStrategy for SiblingTextStrategy {
    fn name(&self) -> &str {
        "sibling-text"
    }

    fn extract(&self, document: &Html) -> Extraction {
        let mut out = Extraction::default();
        for card in document.select(&self.card) {
            out.cards += 1;
            if let Some(label) = self.label_for_card(card) {
                out.labels.push(label);
            }
        }
        out
    }
}

fn parse_selector(raw: &str) -> HeatmapResult<Selector> {
    Selector::parse(raw).map_err(|e| HeatmapError::Config(format!("invalid selector {raw:?}: {e}")))
}
