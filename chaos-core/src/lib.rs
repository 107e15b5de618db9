//! ChaosMeter Core - domain model and scoring math
//!
//! This crate provides the foundational primitives:
//! - Chaos factors with declared maxima and clamped normalization
//! - The weighted chaos-index aggregation
//! - Per-feed observation types with explicit fetch provenance
//! - The snapshot schema consumed by the dashboard

pub mod factor;
pub mod observations;
pub mod snapshot;

pub use factor::*;
pub use observations::*;
pub use snapshot::*;

/// Refresh interval advertised to the dashboard, in seconds
pub const UPDATE_INTERVAL_SECS: u32 = 300;

/// Combined cap on headlines across all news feeds
pub const HEADLINE_CAP: usize = 8;

/// Victim titles are cut to this many characters
pub const VICTIM_TITLE_MAX: usize = 50;

/// Upper bound on synthesized attack flows per snapshot
pub const MAX_ATTACK_FLOWS: usize = 50;

/// Malware URL count is capped here before scaling into its factor
pub const MALWARE_URL_CAP: usize = 500;

/// Botnet C2 IP count is capped here before scaling into its factor
pub const BOTNET_IP_CAP: usize = 1000;

/// Ransomware post count is capped here before scaling into its factor
pub const RANSOM_POST_CAP: usize = 500;

/// CVE entries inspected for severity tallies
pub const CVE_SEVERITY_SAMPLE: usize = 10;

/// Ransomware posts scanned for distinct group names
pub const RANSOM_GROUP_SCAN: usize = 100;

/// Distinct ransomware group names kept per run
pub const RANSOM_GROUP_CAP: usize = 10;

/// Victim summaries kept per run
pub const RANSOM_VICTIM_CAP: usize = 5;
