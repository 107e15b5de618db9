//! abuse.ch malware activity fetchers
//!
//! URLhaus serves a line-delimited CSV of recently observed malware URLs;
//! FeodoTracker serves the recommended botnet C2 blocklist as a JSON
//! array. Both reduce to an activity count.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use chaos_core::{BotnetReport, FeedKind, FeedOutcome, Harvest, MalwareReport};

use crate::client::{get_json, get_text};
use crate::endpoints::{FEODO_BLOCKLIST_URL, URLHAUS_RECENT_CSV_URL};
use crate::source::FeedSource;

pub struct MalwareFeed {
    client: Client,
}

impl MalwareFeed {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for MalwareFeed {
    fn name(&self) -> &'static str {
        "URLhaus"
    }

    fn kind(&self) -> FeedKind {
        FeedKind::Malware
    }

    async fn collect(&self, harvest: &mut Harvest) {
        harvest.malware = match get_text(&self.client, URLHAUS_RECENT_CSV_URL).await {
            Ok(csv) => {
                let report = MalwareReport {
                    active_urls: count_csv_rows(&csv),
                };
                info!("URLhaus: {} malware URLs", report.active_urls);
                FeedOutcome::live(report)
            }
            Err(e) => {
                warn!("URLhaus feed degraded: {}", e);
                FeedOutcome::fallback(e.to_string())
            }
        };
    }
}

pub struct BotnetFeed {
    client: Client,
}

impl BotnetFeed {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for BotnetFeed {
    fn name(&self) -> &'static str {
        "FeodoTracker"
    }

    fn kind(&self) -> FeedKind {
        FeedKind::Botnet
    }

    async fn collect(&self, harvest: &mut Harvest) {
        harvest.botnet = match get_json::<Vec<Value>>(&self.client, FEODO_BLOCKLIST_URL).await {
            Ok(entries) => {
                let report = BotnetReport {
                    c2_ips: entries.len(),
                };
                info!("FeodoTracker: {} botnet C2 IPs", report.c2_ips);
                FeedOutcome::live(report)
            }
            Err(e) => {
                warn!("FeodoTracker feed degraded: {}", e);
                FeedOutcome::fallback(e.to_string())
            }
        };
    }
}

/// Data rows in an abuse.ch CSV export: non-empty, not `#` comments
fn count_csv_rows(csv: &str) -> usize {
    csv.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_csv_rows_skips_comments_and_blanks() {
        let csv = "\
# URLhaus database dump
# Last updated: 2026-08-07
\"3477580\",\"2026-08-07 10:01:04\",\"http://evil.example/payload.exe\"
\"3477579\",\"2026-08-07 09:58:12\",\"http://bad.example/loader.bin\"

\"3477578\",\"2026-08-07 09:55:40\",\"http://worse.example/drop.dll\"
";
        assert_eq!(count_csv_rows(csv), 3);
    }

    #[test]
    fn test_count_csv_rows_empty_payload() {
        assert_eq!(count_csv_rows(""), 0);
        assert_eq!(count_csv_rows("# only comments\n#\n"), 0);
    }
}
