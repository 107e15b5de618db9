//! Decorative snapshot layers
//!
//! The attack map and the log panel are illustrative: flows are sampled
//! from threat-origin catalogs scaled by what the harvest actually saw,
//! and log lines restate harvest findings. Neither feeds the index.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use chaos_core::{
    AttackFlow, Harvest, LogEntry, LogLevel, Severity, StormLevel, MAX_ATTACK_FLOWS,
};

/// Flows synthesized per run when malware activity is present
const MALWARE_FLOW_COUNT: usize = 3;

/// Ransomware groups that get a flow of their own
const RANSOM_FLOW_GROUPS: usize = 5;

/// Common malware-origin countries seen in threat-intel reporting
const DEFAULT_ORIGINS: &[&str] = &["CN", "RU", "KP", "IR", "BR", "IN", "VN"];

/// Jurisdictions ransomware operations typically launch from
const RANSOM_ORIGINS: &[&str] = &["RU", "CN", "KP", "IR"];

const TARGETS: &[&str] = &[
    "US", "GB", "DE", "FR", "JP", "AU", "CA", "KR", "NL", "SG", "CH", "IT", "ES", "SE", "BE",
    "IL", "AE", "TW", "PL",
];

/// Pluggable attack-map synthesizer; swap or disable without touching
/// the aggregation path.
pub trait AttackSynth: Send {
    fn synthesize(&mut self, harvest: &Harvest) -> Vec<AttackFlow>;
}

/// Disables the attack layer entirely
pub struct NoopSynth;

impl AttackSynth for NoopSynth {
    fn synthesize(&mut self, _harvest: &Harvest) -> Vec<AttackFlow> {
        Vec::new()
    }
}

/// Samples attack arcs from the origin catalogs, scaled by the harvest
pub struct ThreatMapSynth {
    rng: StdRng,
}

impl ThreatMapSynth {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic output for a given seed and harvest
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick_target(&mut self, origin: &str) -> &'static str {
        let candidates: Vec<&'static str> =
            TARGETS.iter().copied().filter(|t| *t != origin).collect();
        candidates.choose(&mut self.rng).copied().unwrap_or("US")
    }
}

impl Default for ThreatMapSynth {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackSynth for ThreatMapSynth {
    fn synthesize(&mut self, harvest: &Harvest) -> Vec<AttackFlow> {
        let mut flows = Vec::new();

        if harvest.malware.data.active_urls > 0 {
            for _ in 0..MALWARE_FLOW_COUNT {
                let origin = *DEFAULT_ORIGINS.choose(&mut self.rng).unwrap_or(&"CN");
                let target = self.pick_target(origin);
                flows.push(AttackFlow {
                    origin: origin.to_string(),
                    target: target.to_string(),
                    kind: "Malware".to_string(),
                    intensity: self.rng.gen_range(5..=10),
                    group: None,
                    source: Some("URLhaus".to_string()),
                });
            }
        }

        for group in harvest
            .ransomware
            .data
            .groups
            .iter()
            .take(RANSOM_FLOW_GROUPS)
        {
            let origin = *RANSOM_ORIGINS.choose(&mut self.rng).unwrap_or(&"RU");
            let target = self.pick_target(origin);
            flows.push(AttackFlow {
                origin: origin.to_string(),
                target: target.to_string(),
                kind: "Ransomware".to_string(),
                intensity: self.rng.gen_range(7..=10),
                group: Some(group.clone()),
                source: Some("RansomWatch".to_string()),
            });
        }

        flows.truncate(MAX_ATTACK_FLOWS);
        flows
    }
}

/// Restate harvest findings as dashboard log lines. Deterministic: the
/// same harvest and timestamp always produce the same entries.
pub fn build_logs(harvest: &Harvest, now: DateTime<Utc>) -> Vec<LogEntry> {
    let mut logs = Vec::new();

    let solar = &harvest.solar.data;
    if solar.storm_level != StormLevel::None {
        logs.push(LogEntry::new(
            LogLevel::Warn,
            format!(
                "Geomagnetic {} storm in progress (Kp {})",
                solar.storm_level.as_str(),
                solar.kp
            ),
            now,
            "NOAA",
        ));
    }

    for cve in harvest.vulns.data.recent.iter().take(5) {
        let level = match cve.severity {
            Severity::Critical | Severity::High => LogLevel::Error,
            _ => LogLevel::Warn,
        };
        logs.push(LogEntry::new(
            level,
            format!("New {} vulnerability: {}", cve.severity.as_str(), cve.id),
            now,
            "NVD",
        ));
    }

    if harvest.malware.data.active_urls > 0 {
        logs.push(LogEntry::new(
            LogLevel::Warn,
            format!(
                "URLhaus: {} active malware URLs detected",
                harvest.malware.data.active_urls
            ),
            now,
            "URLhaus",
        ));
    }

    if harvest.botnet.data.c2_ips > 0 {
        logs.push(LogEntry::new(
            LogLevel::Error,
            format!(
                "FeodoTracker: {} botnet C2 IPs blocked",
                harvest.botnet.data.c2_ips
            ),
            now,
            "FeodoTracker",
        ));
    }

    for victim in harvest.ransomware.data.victims.iter().take(3) {
        logs.push(LogEntry::new(
            LogLevel::Error,
            format!(
                "Ransomware: {} claimed victim: {}",
                victim.group, victim.title
            ),
            now,
            "RansomWatch",
        ));
    }

    if harvest.intel.provenance.is_live() {
        let intel = &harvest.intel.data;
        if intel.reported_ips > 0 {
            logs.push(LogEntry::new(
                LogLevel::Warn,
                format!(
                    "AbuseIPDB: {} IPs on high-confidence blacklist",
                    intel.reported_ips
                ),
                now,
                "AbuseIPDB",
            ));
        }
        if intel.active_pulses > 0 {
            logs.push(LogEntry::new(
                LogLevel::Info,
                format!("OTX: {} subscribed threat pulses", intel.active_pulses),
                now,
                "OTX",
            ));
        }
    }

    let (live, total) = live_public_slots(harvest);
    if live == total {
        logs.push(LogEntry::new(
            LogLevel::Success,
            "All threat feeds synchronized",
            now,
            "System",
        ));
    } else {
        logs.push(LogEntry::new(
            LogLevel::Warn,
            format!("{} of {} feeds degraded to defaults", total - live, total),
            now,
            "System",
        ));
    }

    logs
}

/// Live count over the always-on slots; keyed intel is opt-in and does
/// not count against the run.
fn live_public_slots(harvest: &Harvest) -> (usize, usize) {
    let slots = [
        harvest.solar.provenance.is_live(),
        harvest.vulns.provenance.is_live(),
        harvest.malware.provenance.is_live(),
        harvest.botnet.provenance.is_live(),
        harvest.ransomware.provenance.is_live(),
        harvest.market.provenance.is_live(),
        harvest.sentiment.provenance.is_live(),
        harvest.news.provenance.is_live(),
    ];
    (slots.iter().filter(|live| **live).count(), slots.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaos_core::{
        BotnetReport, CveEntry, FeedOutcome, MalwareReport, RansomwareReport, SolarReport,
        ThreatIntelReport, Victim, VulnReport,
    };

    fn busy_harvest() -> Harvest {
        Harvest {
            malware: FeedOutcome::live(MalwareReport { active_urls: 250 }),
            botnet: FeedOutcome::live(BotnetReport { c2_ips: 420 }),
            ransomware: FeedOutcome::live(RansomwareReport {
                recent_posts: 42,
                groups: vec![
                    "lockbit3".to_string(),
                    "play".to_string(),
                    "cl0p".to_string(),
                ],
                victims: vec![Victim::new("Acme Corp", "lockbit3")],
            }),
            ..Harvest::default()
        }
    }

    #[test]
    fn test_seeded_synth_is_deterministic() {
        let harvest = busy_harvest();
        let first = ThreatMapSynth::seeded(7).synthesize(&harvest);
        let second = ThreatMapSynth::seeded(7).synthesize(&harvest);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_flow_invariants() {
        let harvest = busy_harvest();
        let flows = ThreatMapSynth::seeded(99).synthesize(&harvest);
        assert!(flows.len() <= MAX_ATTACK_FLOWS);
        for flow in &flows {
            assert!((1..=10).contains(&flow.intensity));
            assert_ne!(flow.origin, flow.target);
        }
        // One flow per group, after the malware flows
        let ransom_flows = flows.iter().filter(|f| f.kind == "Ransomware").count();
        assert_eq!(ransom_flows, 3);
    }

    #[test]
    fn test_quiet_harvest_synthesizes_nothing() {
        let flows = ThreatMapSynth::seeded(1).synthesize(&Harvest::default());
        assert!(flows.is_empty());
        assert!(NoopSynth.synthesize(&busy_harvest()).is_empty());
    }

    #[test]
    fn test_build_logs_from_harvest() {
        let mut harvest = busy_harvest();
        harvest.vulns = FeedOutcome::live(VulnReport {
            total: 20,
            critical: 1,
            high: 0,
            recent: vec![CveEntry {
                id: "CVE-2026-0001".to_string(),
                severity: chaos_core::Severity::Critical,
            }],
        });
        harvest.solar = FeedOutcome::live(SolarReport::new(6.3, 160));

        let now = Utc::now();
        let logs = build_logs(&harvest, now);

        assert!(logs
            .iter()
            .any(|l| l.message.contains("Geomagnetic moderate storm")));
        assert!(logs
            .iter()
            .any(|l| l.level == LogLevel::Error && l.message.contains("CVE-2026-0001")));
        assert!(logs.iter().any(|l| l.source == "RansomWatch"));
        // Market, sentiment, and news slots are still fallback
        let closing = logs.last().unwrap();
        assert_eq!(closing.level, LogLevel::Warn);
        assert!(closing.message.contains("degraded to defaults"));
    }

    #[test]
    fn test_all_live_harvest_closes_with_success() {
        let mut harvest = busy_harvest();
        harvest.solar = FeedOutcome::live(SolarReport::default());
        harvest.vulns = FeedOutcome::live(VulnReport::default());
        harvest.market = FeedOutcome::live(Default::default());
        harvest.sentiment = FeedOutcome::live(Default::default());
        harvest.news = FeedOutcome::live(Vec::new());

        let logs = build_logs(&harvest, Utc::now());
        let closing = logs.last().unwrap();
        assert_eq!(closing.level, LogLevel::Success);
        assert_eq!(closing.message, "All threat feeds synchronized");
    }

    #[test]
    fn test_intel_logs_only_when_live() {
        let mut harvest = busy_harvest();
        harvest.intel = FeedOutcome::live(ThreatIntelReport {
            reported_ips: 1000,
            active_pulses: 12,
        });
        let logs = build_logs(&harvest, Utc::now());
        assert!(logs.iter().any(|l| l.source == "AbuseIPDB"));
        assert!(logs.iter().any(|l| l.source == "OTX"));

        let quiet = build_logs(&busy_harvest(), Utc::now());
        assert!(!quiet.iter().any(|l| l.source == "AbuseIPDB"));
    }
}
