//! Keyed threat-intel fetchers (AbuseIPDB, AlienVault OTX)
//!
//! Both providers require an API key and are skipped when it is absent.
//! Their counters feed the snapshot stats and logs only, never the index.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use chaos_core::{FeedKind, FeedOutcome, Harvest, ThreatIntelReport};

use crate::client::FeedError;
use crate::endpoints::{ABUSEIPDB_BLACKLIST_URL, OTX_PULSES_URL};
use crate::source::FeedSource;

pub struct ThreatIntelFeed {
    client: Client,
    abuseipdb_key: Option<String>,
    otx_key: Option<String>,
}

impl ThreatIntelFeed {
    pub fn new(client: Client, abuseipdb_key: Option<String>, otx_key: Option<String>) -> Self {
        Self {
            client,
            abuseipdb_key,
            otx_key,
        }
    }

    async fn fetch_abuseipdb(&self, key: &str) -> Result<usize, FeedError> {
        let response = self
            .client
            .get(ABUSEIPDB_BLACKLIST_URL)
            .header("Key", key)
            .header("Accept", "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }
        let blacklist: AbuseIpdbResponse = response.json().await?;
        Ok(blacklist.data.len())
    }

    async fn fetch_otx(&self, key: &str) -> Result<usize, FeedError> {
        let response = self
            .client
            .get(OTX_PULSES_URL)
            .header("X-OTX-API-KEY", key)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }
        let pulses: OtxResponse = response.json().await?;
        Ok(pulses.results.len())
    }
}

#[async_trait]
impl FeedSource for ThreatIntelFeed {
    fn name(&self) -> &'static str {
        "Threat Intel"
    }

    fn kind(&self) -> FeedKind {
        FeedKind::ThreatIntel
    }

    async fn collect(&self, harvest: &mut Harvest) {
        if self.abuseipdb_key.is_none() && self.otx_key.is_none() {
            debug!("Threat-intel keys not set - skipping");
            harvest.intel = FeedOutcome::fallback("no API keys configured");
            return;
        }

        let mut report = ThreatIntelReport::default();
        let mut any_live = false;

        if let Some(key) = &self.abuseipdb_key {
            match self.fetch_abuseipdb(key).await {
                Ok(count) => {
                    info!("AbuseIPDB: {} blacklisted IPs", count);
                    report.reported_ips = count;
                    any_live = true;
                }
                Err(e) => warn!("AbuseIPDB feed degraded: {}", e),
            }
        }

        if let Some(key) = &self.otx_key {
            match self.fetch_otx(key).await {
                Ok(count) => {
                    info!("OTX: {} subscribed pulses", count);
                    report.active_pulses = count;
                    any_live = true;
                }
                Err(e) => warn!("OTX feed degraded: {}", e),
            }
        }

        harvest.intel = if any_live {
            FeedOutcome::live(report)
        } else {
            FeedOutcome::fallback("all keyed providers failed")
        };
    }
}

// AbuseIPDB blacklist response
#[derive(Debug, Deserialize)]
struct AbuseIpdbResponse {
    #[serde(default)]
    data: Vec<Value>,
}

// OTX subscribed-pulses response
#[derive(Debug, Deserialize)]
struct OtxResponse {
    #[serde(default)]
    results: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_skips_without_keys() {
        let client = Client::new();
        let feed = ThreatIntelFeed::new(client, None, None);
        let mut harvest = Harvest::default();
        feed.collect(&mut harvest).await;

        assert!(!harvest.intel.provenance.is_live());
        assert_eq!(harvest.intel.data.reported_ips, 0);
        assert_eq!(harvest.intel.data.active_pulses, 0);
    }

    #[test]
    fn test_response_shapes_parse() {
        let blacklist: AbuseIpdbResponse =
            serde_json::from_str(r#"{"data": [{"ipAddress": "1.2.3.4"}, {"ipAddress": "5.6.7.8"}]}"#)
                .unwrap();
        assert_eq!(blacklist.data.len(), 2);

        let pulses: OtxResponse =
            serde_json::from_str(r#"{"results": [{"id": "p1"}], "count": 1}"#).unwrap();
        assert_eq!(pulses.results.len(), 1);
    }
}
