//! NOAA space weather fetcher
//!
//! Reads the planetary K-index series and the 10.7 cm radio flux summary.
//! The K-index drives the solar factor; flux is carried for the storm log
//! line and is best-effort.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use chaos_core::{FeedKind, FeedOutcome, Harvest, SolarReport};

use crate::client::{get_json, FeedError};
use crate::endpoints::{NOAA_FLUX_URL, NOAA_KP_URL};
use crate::source::FeedSource;

pub struct SolarFeed {
    client: Client,
}

impl SolarFeed {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self) -> Result<SolarReport, FeedError> {
        let rows: Vec<Vec<Value>> = get_json(&self.client, NOAA_KP_URL).await?;
        let kp = latest_kp(&rows)
            .ok_or_else(|| FeedError::Malformed("empty K-index series".to_string()))?;

        // Flux is secondary; a failed reading leaves it at zero
        let flux = match get_json::<Value>(&self.client, NOAA_FLUX_URL).await {
            Ok(doc) => parse_flux(&doc).unwrap_or(0),
            Err(e) => {
                warn!("10cm flux fetch failed: {}", e);
                0
            }
        };

        Ok(SolarReport::new(kp, flux))
    }
}

#[async_trait]
impl FeedSource for SolarFeed {
    fn name(&self) -> &'static str {
        "NOAA"
    }

    fn kind(&self) -> FeedKind {
        FeedKind::Solar
    }

    async fn collect(&self, harvest: &mut Harvest) {
        harvest.solar = match self.fetch().await {
            Ok(report) => {
                info!(
                    "NOAA: Kp {} ({} storm), flux {}",
                    report.kp,
                    report.storm_level.as_str(),
                    report.flux
                );
                FeedOutcome::live(report)
            }
            Err(e) => {
                warn!("NOAA feed degraded: {}", e);
                FeedOutcome::fallback(e.to_string())
            }
        };
    }
}

/// Most recent K-index reading. The first row is the column header; an
/// unparseable cell reads as zero, a header-only series as missing.
fn latest_kp(rows: &[Vec<Value>]) -> Option<f64> {
    if rows.len() < 2 {
        return None;
    }
    let latest = rows.last()?;
    Some(coerce_f64(latest.get(1)?).unwrap_or(0.0))
}

fn parse_flux(doc: &Value) -> Option<u32> {
    match doc.get("Flux")? {
        Value::Number(n) => n.as_u64().map(|v| v as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// NOAA serves numbers as strings in some products
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_latest_kp_takes_last_row() {
        let rows: Vec<Vec<Value>> = serde_json::from_value(json!([
            ["time_tag", "Kp", "a_running", "station_count"],
            ["2026-08-07 00:00:00", "2.33", "8", "8"],
            ["2026-08-07 03:00:00", "4.67", "18", "8"]
        ]))
        .unwrap();
        assert_eq!(latest_kp(&rows), Some(4.67));
    }

    #[test]
    fn test_latest_kp_handles_numeric_cells() {
        let rows: Vec<Vec<Value>> = serde_json::from_value(json!([
            ["time_tag", "Kp"],
            ["2026-08-07 00:00:00", 3.0]
        ]))
        .unwrap();
        assert_eq!(latest_kp(&rows), Some(3.0));
    }

    #[test]
    fn test_header_only_series_is_missing() {
        let rows: Vec<Vec<Value>> =
            serde_json::from_value(json!([["time_tag", "Kp"]])).unwrap();
        assert_eq!(latest_kp(&rows), None);
        assert_eq!(latest_kp(&[]), None);
    }

    #[test]
    fn test_blank_cell_reads_as_zero() {
        let rows: Vec<Vec<Value>> = serde_json::from_value(json!([
            ["time_tag", "Kp"],
            ["2026-08-07 00:00:00", ""]
        ]))
        .unwrap();
        assert_eq!(latest_kp(&rows), Some(0.0));
    }

    #[test]
    fn test_parse_flux_string_and_number() {
        assert_eq!(parse_flux(&json!({"Flux": "155"})), Some(155));
        assert_eq!(parse_flux(&json!({"Flux": 131})), Some(131));
        assert_eq!(parse_flux(&json!({"Other": 1})), None);
    }
}
