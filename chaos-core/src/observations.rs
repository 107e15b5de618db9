//! Per-feed observations and fetch provenance
//!
//! Every fetcher returns a `FeedOutcome`: the structured values it
//! extracted, plus whether they came from a live response or a fallback
//! default. Defaulting is therefore explicit and testable rather than a
//! silent in-place substitution.

use serde::{Deserialize, Serialize};

use crate::VICTIM_TITLE_MAX;

/// How a feed slot came to hold its current data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Parsed from a live upstream response
    Live,
    /// Documented default values, with the reason the feed degraded
    Fallback { reason: String },
}

impl Provenance {
    pub fn fallback(reason: impl Into<String>) -> Self {
        Provenance::Fallback {
            reason: reason.into(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Provenance::Live)
    }
}

impl Default for Provenance {
    fn default() -> Self {
        Provenance::fallback("not fetched")
    }
}

/// A feed result paired with its provenance
#[derive(Debug, Clone, Default)]
pub struct FeedOutcome<T> {
    pub data: T,
    pub provenance: Provenance,
}

impl<T> FeedOutcome<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            provenance: Provenance::Live,
        }
    }
}

impl<T: Default> FeedOutcome<T> {
    /// Default data with an explicit degradation reason
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            data: T::default(),
            provenance: Provenance::fallback(reason),
        }
    }
}

/// NOAA geomagnetic storm scale, derived from the planetary K-index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StormLevel {
    #[default]
    None,
    Minor,
    Moderate,
    Strong,
    Severe,
    Extreme,
}

impl StormLevel {
    pub fn from_kp(kp: f64) -> Self {
        if kp < 5.0 {
            StormLevel::None
        } else if kp < 6.0 {
            StormLevel::Minor
        } else if kp < 7.0 {
            StormLevel::Moderate
        } else if kp < 8.0 {
            StormLevel::Strong
        } else if kp < 9.0 {
            StormLevel::Severe
        } else {
            StormLevel::Extreme
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StormLevel::None => "none",
            StormLevel::Minor => "minor",
            StormLevel::Moderate => "moderate",
            StormLevel::Strong => "strong",
            StormLevel::Severe => "severe",
            StormLevel::Extreme => "extreme",
        }
    }
}

/// Space weather reading (NOAA)
#[derive(Debug, Clone, Default)]
pub struct SolarReport {
    /// Most recent planetary K-index reading; 0 when the feed is empty
    pub kp: f64,
    /// 10.7 cm radio flux, solar flux units
    pub flux: u32,
    pub storm_level: StormLevel,
}

impl SolarReport {
    pub fn new(kp: f64, flux: u32) -> Self {
        Self {
            kp,
            flux,
            storm_level: StormLevel::from_kp(kp),
        }
    }
}

/// CVE severity label as reported by NVD scoring metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Severity {
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CveEntry {
    pub id: String,
    pub severity: Severity,
}

/// Vulnerability feed summary (NVD)
#[derive(Debug, Clone, Default)]
pub struct VulnReport {
    /// Entries in the returned page
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    /// The inspected entries, in feed order
    pub recent: Vec<CveEntry>,
}

/// Malware URL activity (URLhaus)
#[derive(Debug, Clone, Copy, Default)]
pub struct MalwareReport {
    pub active_urls: usize,
}

/// Botnet C2 blocklist size (FeodoTracker)
#[derive(Debug, Clone, Copy, Default)]
pub struct BotnetReport {
    pub c2_ips: usize,
}

/// A ransomware leak-site victim summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Victim {
    /// Post title, cut to `VICTIM_TITLE_MAX` characters
    pub title: String,
    pub group: String,
}

impl Victim {
    pub fn new(title: &str, group: &str) -> Self {
        Self {
            title: title.chars().take(VICTIM_TITLE_MAX).collect(),
            group: group.to_string(),
        }
    }
}

/// Ransomware tracker summary (RansomWatch)
#[derive(Debug, Clone, Default)]
pub struct RansomwareReport {
    /// Post count, capped at `RANSOM_POST_CAP`
    pub recent_posts: usize,
    /// Distinct group names, at most `RANSOM_GROUP_CAP`
    pub groups: Vec<String>,
    /// Most recent victims, at most `RANSOM_VICTIM_CAP`
    pub victims: Vec<Victim>,
}

/// Crypto market summary (CoinGecko global endpoint)
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketReport {
    /// 24h market-cap change percentage, two decimal places
    pub cap_change_pct: f64,
    /// 24h USD volume
    pub volume_24h: u64,
    /// BTC dominance percentage, one decimal place
    pub btc_dominance: f64,
}

/// Fear & greed sentiment (Alternative.me)
#[derive(Debug, Clone)]
pub struct SentimentReport {
    /// 0 (extreme fear) to 100 (extreme greed)
    pub value: u8,
    pub classification: String,
}

impl Default for SentimentReport {
    fn default() -> Self {
        Self {
            value: 50,
            classification: "Neutral".to_string(),
        }
    }
}

/// Keyed threat-intel counters (AbuseIPDB + OTX); never feed the index
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreatIntelReport {
    pub reported_ips: usize,
    pub active_pulses: usize,
}

/// A news item tagged with its origin feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub url: String,
}

/// Everything one run collected, one outcome per feed slot.
///
/// `Harvest::default()` is the all-fallback state: structurally complete,
/// every slot at its documented default.
#[derive(Debug, Clone, Default)]
pub struct Harvest {
    pub solar: FeedOutcome<SolarReport>,
    pub vulns: FeedOutcome<VulnReport>,
    pub malware: FeedOutcome<MalwareReport>,
    pub botnet: FeedOutcome<BotnetReport>,
    pub ransomware: FeedOutcome<RansomwareReport>,
    pub market: FeedOutcome<MarketReport>,
    pub sentiment: FeedOutcome<SentimentReport>,
    pub news: FeedOutcome<Vec<Headline>>,
    pub intel: FeedOutcome<ThreatIntelReport>,
}
