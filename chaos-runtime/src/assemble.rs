//! Snapshot assembly
//!
//! Merges the harvest, the factor table, the computed index, and the
//! decorative layers into one record with a timestamp and the fixed
//! update interval.

use chrono::Utc;
use uuid::Uuid;

use chaos_core::{
    AttackFlow, ChaosFactors, FeedKind, Harvest, Snapshot, SourceStatus, SummaryStats,
    UPDATE_INTERVAL_SECS,
};

use crate::decor::build_logs;

pub fn assemble(
    harvest: &Harvest,
    factors: ChaosFactors,
    index: f64,
    attacks: Vec<AttackFlow>,
) -> Snapshot {
    let now = Utc::now();
    let headlines_detailed = harvest.news.data.clone();
    let headlines = headlines_detailed.iter().map(|h| h.title.clone()).collect();

    Snapshot {
        run_id: Uuid::new_v4(),
        last_updated: now,
        update_interval: UPDATE_INTERVAL_SECS,
        chaos_index: index,
        chaos_factors: factors,
        attacks,
        headlines,
        headlines_detailed,
        logs: build_logs(harvest, now),
        stats: build_stats(harvest),
        sources: source_statuses(harvest),
    }
}

pub fn build_stats(harvest: &Harvest) -> SummaryStats {
    let intel_ran = harvest.intel.provenance.is_live();
    SummaryStats {
        total_cves: harvest.vulns.data.total,
        critical_cves: harvest.vulns.data.critical,
        active_malware_urls: harvest.malware.data.active_urls,
        botnet_ips: harvest.botnet.data.c2_ips,
        ransomware_victims: harvest.ransomware.data.recent_posts,
        active_ransom_groups: harvest.ransomware.data.groups.len(),
        reported_ips: intel_ran.then_some(harvest.intel.data.reported_ips),
        threat_pulses: intel_ran.then_some(harvest.intel.data.active_pulses),
    }
}

/// Per-provider status, from the actual provenance of each slot
pub fn source_statuses(harvest: &Harvest) -> Vec<SourceStatus> {
    vec![
        SourceStatus::new("NOAA", harvest.solar.provenance.is_live(), FeedKind::Solar),
        SourceStatus::new(
            "NVD",
            harvest.vulns.provenance.is_live(),
            FeedKind::Vulnerabilities,
        ),
        SourceStatus::new(
            "URLhaus",
            harvest.malware.provenance.is_live(),
            FeedKind::Malware,
        ),
        SourceStatus::new(
            "FeodoTracker",
            harvest.botnet.provenance.is_live(),
            FeedKind::Botnet,
        ),
        SourceStatus::new(
            "RansomWatch",
            harvest.ransomware.provenance.is_live(),
            FeedKind::Ransomware,
        ),
        SourceStatus::new(
            "CoinGecko",
            harvest.market.provenance.is_live(),
            FeedKind::Crypto,
        ),
        SourceStatus::new(
            "Alternative.me",
            harvest.sentiment.provenance.is_live(),
            FeedKind::Sentiment,
        ),
        SourceStatus::new("RSS Feeds", harvest.news.provenance.is_live(), FeedKind::News),
        SourceStatus::new(
            "Threat Intel",
            harvest.intel.provenance.is_live(),
            FeedKind::ThreatIntel,
        ),
    ]
}
