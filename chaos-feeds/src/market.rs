//! CoinGecko market fetcher
//!
//! Reads the global market summary: 24h market-cap swing, USD volume, and
//! BTC dominance. All values default to zero when absent.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use chaos_core::{FeedKind, FeedOutcome, Harvest, MarketReport};

use crate::client::{get_json, FeedError};
use crate::endpoints::COINGECKO_GLOBAL_URL;
use crate::source::FeedSource;

pub struct MarketFeed {
    client: Client,
}

impl MarketFeed {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self) -> Result<MarketReport, FeedError> {
        let global: CoinGeckoGlobal = get_json(&self.client, COINGECKO_GLOBAL_URL).await?;
        Ok(summarize(global))
    }
}

#[async_trait]
impl FeedSource for MarketFeed {
    fn name(&self) -> &'static str {
        "CoinGecko"
    }

    fn kind(&self) -> FeedKind {
        FeedKind::Crypto
    }

    async fn collect(&self, harvest: &mut Harvest) {
        harvest.market = match self.fetch().await {
            Ok(report) => {
                info!(
                    "CoinGecko: market cap {:+.2}%, BTC dominance {:.1}%",
                    report.cap_change_pct, report.btc_dominance
                );
                FeedOutcome::live(report)
            }
            Err(e) => {
                warn!("CoinGecko feed degraded: {}", e);
                FeedOutcome::fallback(e.to_string())
            }
        };
    }
}

fn summarize(global: CoinGeckoGlobal) -> MarketReport {
    let data = global.data;
    MarketReport {
        cap_change_pct: round2(data.cap_change_pct),
        volume_24h: data
            .total_volume
            .get("usd")
            .copied()
            .unwrap_or(0.0)
            .max(0.0) as u64,
        btc_dominance: round1(data.market_cap_percentage.get("btc").copied().unwrap_or(0.0)),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

// CoinGecko /global response types
#[derive(Debug, Deserialize)]
struct CoinGeckoGlobal {
    #[serde(default)]
    data: CoinGeckoData,
}

#[derive(Debug, Default, Deserialize)]
struct CoinGeckoData {
    #[serde(rename = "market_cap_change_percentage_24h_usd", default)]
    cap_change_pct: f64,
    #[serde(default)]
    total_volume: HashMap<String, f64>,
    #[serde(default)]
    market_cap_percentage: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_extracts_nested_values() {
        let global: CoinGeckoGlobal = serde_json::from_value(json!({
            "data": {
                "market_cap_change_percentage_24h_usd": -3.14159,
                "total_volume": {"usd": 98765432109.9, "eur": 1.0},
                "market_cap_percentage": {"btc": 54.321, "eth": 17.0}
            }
        }))
        .unwrap();
        let report = summarize(global);
        assert_eq!(report.cap_change_pct, -3.14);
        assert_eq!(report.volume_24h, 98765432109);
        assert_eq!(report.btc_dominance, 54.3);
    }

    #[test]
    fn test_summarize_defaults_missing_fields() {
        let global: CoinGeckoGlobal = serde_json::from_value(json!({"data": {}})).unwrap();
        let report = summarize(global);
        assert_eq!(report.cap_change_pct, 0.0);
        assert_eq!(report.volume_24h, 0);
        assert_eq!(report.btc_dominance, 0.0);
    }

    #[test]
    fn test_summarize_empty_document() {
        let global: CoinGeckoGlobal = serde_json::from_value(json!({})).unwrap();
        let report = summarize(global);
        assert_eq!(report.volume_24h, 0);
    }
}
