//! Snapshot schema - the record one run writes for the dashboard
//!
//! Field names are a wire contract: the dashboard reads `chaosIndex`,
//! `chaosFactors`, `attacks`, `headlines`, `logs`, and `stats` under
//! exactly those names. A snapshot is created once per run and never
//! mutated after being written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ChaosFactors, Headline};

/// The complete output record for one aggregation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub run_id: Uuid,
    pub last_updated: DateTime<Utc>,
    /// Seconds until the dashboard should expect the next snapshot
    pub update_interval: u32,
    /// Weighted aggregate in [0, 100], one decimal place
    pub chaos_index: f64,
    pub chaos_factors: ChaosFactors,
    pub attacks: Vec<AttackFlow>,
    /// Tagged titles only, for the ticker
    pub headlines: Vec<String>,
    pub headlines_detailed: Vec<Headline>,
    pub logs: Vec<LogEntry>,
    pub stats: SummaryStats,
    pub sources: Vec<SourceStatus>,
}

/// A synthesized attack arc on the dashboard map. Illustrative only;
/// no invariant ties it to real telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackFlow {
    /// Origin country code
    #[serde(rename = "from")]
    pub origin: String,
    /// Target country code
    #[serde(rename = "to")]
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// 1..=10
    pub intensity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Success,
}

/// One line in the dashboard's scrolling log panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, timestamp: DateTime<Utc>, source: &str) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp,
            source: source.to_string(),
        }
    }
}

/// Headline counters for the stats strip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(rename = "totalCVEs")]
    pub total_cves: usize,
    #[serde(rename = "criticalCVEs")]
    pub critical_cves: usize,
    #[serde(rename = "activeMalwareURLs")]
    pub active_malware_urls: usize,
    #[serde(rename = "botnetIPs")]
    pub botnet_ips: usize,
    #[serde(rename = "ransomwareVictims")]
    pub ransomware_victims: usize,
    #[serde(rename = "activeRansomGroups")]
    pub active_ransom_groups: usize,
    /// Present only when the AbuseIPDB feed ran
    #[serde(rename = "reportedIPs", default, skip_serializing_if = "Option::is_none")]
    pub reported_ips: Option<usize>,
    /// Present only when the OTX feed ran
    #[serde(rename = "threatPulses", default, skip_serializing_if = "Option::is_none")]
    pub threat_pulses: Option<usize>,
}

/// Upstream feed categories, as shown in the source-status list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Solar,
    Vulnerabilities,
    Malware,
    Botnet,
    Ransomware,
    Crypto,
    Sentiment,
    News,
    ThreatIntel,
}

impl FeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedKind::Solar => "solar",
            FeedKind::Vulnerabilities => "vulnerabilities",
            FeedKind::Malware => "malware",
            FeedKind::Botnet => "botnet",
            FeedKind::Ransomware => "ransomware",
            FeedKind::Crypto => "crypto",
            FeedKind::Sentiment => "sentiment",
            FeedKind::News => "news",
            FeedKind::ThreatIntel => "threat_intel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceState {
    /// Live data made it into the snapshot
    Active,
    /// Documented defaults were substituted
    Fallback,
}

/// Per-provider status for the run that produced the snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceStatus {
    pub name: String,
    pub status: SourceState,
    #[serde(rename = "type")]
    pub kind: FeedKind,
}

impl SourceStatus {
    pub fn new(name: &str, live: bool, kind: FeedKind) -> Self {
        Self {
            name: name.to_string(),
            status: if live {
                SourceState::Active
            } else {
                SourceState::Fallback
            },
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_factors, chaos_index, Harvest};

    fn sample_snapshot() -> Snapshot {
        let harvest = Harvest::default();
        let factors = build_factors(&harvest);
        Snapshot {
            run_id: Uuid::new_v4(),
            last_updated: Utc::now(),
            update_interval: crate::UPDATE_INTERVAL_SECS,
            chaos_index: chaos_index(&factors),
            chaos_factors: factors,
            attacks: vec![AttackFlow {
                origin: "RU".to_string(),
                target: "US".to_string(),
                kind: "Ransomware".to_string(),
                intensity: 8,
                group: Some("lockbit3".to_string()),
                source: Some("RansomWatch".to_string()),
            }],
            headlines: vec!["🚨 Test".to_string()],
            headlines_detailed: vec![Headline {
                title: "🚨 Test".to_string(),
                source: "TheHackerNews".to_string(),
                url: String::new(),
            }],
            logs: vec![LogEntry::new(
                LogLevel::Success,
                "All threat feeds synchronized",
                Utc::now(),
                "System",
            )],
            stats: SummaryStats::default(),
            sources: vec![SourceStatus::new("NOAA", true, FeedKind::Solar)],
        }
    }

    #[test]
    fn test_snapshot_wire_field_names() {
        let json = serde_json::to_value(sample_snapshot()).unwrap();
        for field in [
            "runId",
            "lastUpdated",
            "updateInterval",
            "chaosIndex",
            "chaosFactors",
            "attacks",
            "headlines",
            "headlinesDetailed",
            "logs",
            "stats",
            "sources",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }

        let attack = &json["attacks"][0];
        assert_eq!(attack["from"], "RU");
        assert_eq!(attack["to"], "US");
        assert_eq!(attack["type"], "Ransomware");

        let log = &json["logs"][0];
        assert_eq!(log["type"], "success");

        let stats = &json["stats"];
        assert!(stats.get("totalCVEs").is_some());
        assert!(stats.get("activeMalwareURLs").is_some());
        // Keyed counters stay absent unless their feeds ran
        assert!(stats.get("reportedIPs").is_none());

        let source = &json["sources"][0];
        assert_eq!(source["status"], "active");
        assert_eq!(source["type"], "solar");
    }

    #[test]
    fn test_snapshot_round_trips() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.chaos_index, snapshot.chaos_index);
        assert_eq!(back.attacks, snapshot.attacks);
        assert_eq!(back.headlines, snapshot.headlines);
    }

    #[test]
    fn test_factor_map_keys_serialize_as_names() {
        let json = serde_json::to_value(sample_snapshot()).unwrap();
        let factors = json["chaosFactors"].as_object().unwrap();
        for key in ["solar", "zeroday", "malware", "botnet", "ransom", "crypto", "fear"] {
            assert!(factors.contains_key(key), "missing factor key {}", key);
        }
    }
}
