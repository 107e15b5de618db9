//! Alternative.me fear & greed fetcher
//!
//! One bounded reading: 0 (extreme fear) to 100 (extreme greed) plus its
//! textual classification. An unavailable feed reads as the neutral
//! midpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use chaos_core::{FeedKind, FeedOutcome, Harvest, SentimentReport};

use crate::client::{get_json, FeedError};
use crate::endpoints::FEAR_GREED_URL;
use crate::source::FeedSource;

pub struct SentimentFeed {
    client: Client,
}

impl SentimentFeed {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self) -> Result<SentimentReport, FeedError> {
        let response: FngResponse = get_json(&self.client, FEAR_GREED_URL).await?;
        summarize(response)
            .ok_or_else(|| FeedError::Malformed("empty fear/greed series".to_string()))
    }
}

#[async_trait]
impl FeedSource for SentimentFeed {
    fn name(&self) -> &'static str {
        "Alternative.me"
    }

    fn kind(&self) -> FeedKind {
        FeedKind::Sentiment
    }

    async fn collect(&self, harvest: &mut Harvest) {
        harvest.sentiment = match self.fetch().await {
            Ok(report) => {
                info!(
                    "Fear & greed: {} ({})",
                    report.value, report.classification
                );
                FeedOutcome::live(report)
            }
            Err(e) => {
                warn!("Fear/greed feed degraded: {}", e);
                FeedOutcome::fallback(e.to_string())
            }
        };
    }
}

fn summarize(response: FngResponse) -> Option<SentimentReport> {
    let latest = response.data.into_iter().next()?;
    let value = coerce_index(&latest.value).unwrap_or(50);
    let classification = if latest.classification.is_empty() {
        "Neutral".to_string()
    } else {
        latest.classification
    };
    Some(SentimentReport {
        value,
        classification,
    })
}

/// The API serves the index as a string; clamp whatever arrives to 0-100
fn coerce_index(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    Some(raw.clamp(0.0, 100.0) as u8)
}

// Alternative.me /fng/ response types
#[derive(Debug, Deserialize)]
struct FngResponse {
    #[serde(default)]
    data: Vec<FngEntry>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    #[serde(default)]
    value: Value,
    #[serde(rename = "value_classification", default)]
    classification: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_takes_latest_entry() {
        let response: FngResponse = serde_json::from_value(json!({
            "data": [
                {"value": "27", "value_classification": "Fear"},
                {"value": "44", "value_classification": "Fear"}
            ]
        }))
        .unwrap();
        let report = summarize(response).unwrap();
        assert_eq!(report.value, 27);
        assert_eq!(report.classification, "Fear");
    }

    #[test]
    fn test_empty_series_is_missing() {
        let response: FngResponse = serde_json::from_value(json!({"data": []})).unwrap();
        assert!(summarize(response).is_none());
    }

    #[test]
    fn test_coerce_index_clamps_and_defaults() {
        assert_eq!(coerce_index(&json!("150")), Some(100));
        assert_eq!(coerce_index(&json!(-5)), Some(0));
        assert_eq!(coerce_index(&json!(72)), Some(72));
        assert_eq!(coerce_index(&json!(null)), None);
    }

    #[test]
    fn test_unparseable_value_reads_neutral() {
        let response: FngResponse = serde_json::from_value(json!({
            "data": [{"value": "n/a", "value_classification": ""}]
        }))
        .unwrap();
        let report = summarize(response).unwrap();
        assert_eq!(report.value, 50);
        assert_eq!(report.classification, "Neutral");
    }
}
