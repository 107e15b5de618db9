//! Upstream endpoint registry
//!
//! Every URL the aggregator talks to, in one place. Keyed endpoints are
//! skipped entirely when their credential is absent.

use chaos_core::FeedKind;

pub const NOAA_KP_URL: &str =
    "https://services.swpc.noaa.gov/products/noaa-planetary-k-index.json";
pub const NOAA_FLUX_URL: &str = "https://services.swpc.noaa.gov/products/summary/10cm-flux.json";
pub const NVD_CVE_URL: &str =
    "https://services.nvd.nist.gov/rest/json/cves/2.0?resultsPerPage=20";
pub const URLHAUS_RECENT_CSV_URL: &str = "https://urlhaus.abuse.ch/downloads/csv_recent/";
pub const FEODO_BLOCKLIST_URL: &str =
    "https://feodotracker.abuse.ch/downloads/ipblocklist_recommended.json";
pub const RANSOMWATCH_POSTS_URL: &str =
    "https://raw.githubusercontent.com/joshhighet/ransomwatch/main/posts.json";
pub const COINGECKO_GLOBAL_URL: &str = "https://api.coingecko.com/api/v3/global";
pub const FEAR_GREED_URL: &str = "https://api.alternative.me/fng/";
pub const HACKERNEWS_RSS_URL: &str = "https://feeds.feedburner.com/TheHackersNews";
pub const BLEEPING_RSS_URL: &str = "https://www.bleepingcomputer.com/feed/";
pub const DARKREADING_RSS_URL: &str = "https://www.darkreading.com/rss.xml";
pub const ABUSEIPDB_BLACKLIST_URL: &str =
    "https://api.abuseipdb.com/api/v2/blacklist?confidenceMinimum=90";
pub const OTX_PULSES_URL: &str = "https://otx.alienvault.com/api/v1/pulses/subscribed";

/// One upstream feed endpoint
#[derive(Debug, Clone, Copy)]
pub struct FeedEndpoint {
    /// Provider name
    pub name: &'static str,
    pub url: &'static str,
    pub kind: FeedKind,
    /// Requires an API key header
    pub needs_key: bool,
}

/// Everything the aggregator polls
pub static FEED_ENDPOINTS: &[FeedEndpoint] = &[
    FeedEndpoint {
        name: "NOAA K-index",
        url: NOAA_KP_URL,
        kind: FeedKind::Solar,
        needs_key: false,
    },
    FeedEndpoint {
        name: "NOAA 10cm flux",
        url: NOAA_FLUX_URL,
        kind: FeedKind::Solar,
        needs_key: false,
    },
    FeedEndpoint {
        name: "NVD CVE",
        url: NVD_CVE_URL,
        kind: FeedKind::Vulnerabilities,
        needs_key: false,
    },
    FeedEndpoint {
        name: "URLhaus",
        url: URLHAUS_RECENT_CSV_URL,
        kind: FeedKind::Malware,
        needs_key: false,
    },
    FeedEndpoint {
        name: "FeodoTracker",
        url: FEODO_BLOCKLIST_URL,
        kind: FeedKind::Botnet,
        needs_key: false,
    },
    FeedEndpoint {
        name: "RansomWatch",
        url: RANSOMWATCH_POSTS_URL,
        kind: FeedKind::Ransomware,
        needs_key: false,
    },
    FeedEndpoint {
        name: "CoinGecko",
        url: COINGECKO_GLOBAL_URL,
        kind: FeedKind::Crypto,
        needs_key: false,
    },
    FeedEndpoint {
        name: "Alternative.me",
        url: FEAR_GREED_URL,
        kind: FeedKind::Sentiment,
        needs_key: false,
    },
    FeedEndpoint {
        name: "TheHackerNews",
        url: HACKERNEWS_RSS_URL,
        kind: FeedKind::News,
        needs_key: false,
    },
    FeedEndpoint {
        name: "BleepingComputer",
        url: BLEEPING_RSS_URL,
        kind: FeedKind::News,
        needs_key: false,
    },
    FeedEndpoint {
        name: "DarkReading",
        url: DARKREADING_RSS_URL,
        kind: FeedKind::News,
        needs_key: false,
    },
    FeedEndpoint {
        name: "AbuseIPDB",
        url: ABUSEIPDB_BLACKLIST_URL,
        kind: FeedKind::ThreatIntel,
        needs_key: true,
    },
    FeedEndpoint {
        name: "AlienVault OTX",
        url: OTX_PULSES_URL,
        kind: FeedKind::ThreatIntel,
        needs_key: true,
    },
];

/// Endpoints that can be polled without credentials
pub fn public_endpoints() -> impl Iterator<Item = &'static FeedEndpoint> {
    FEED_ENDPOINTS.iter().filter(|e| !e.needs_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_urls_are_https() {
        for endpoint in FEED_ENDPOINTS {
            assert!(
                endpoint.url.starts_with("https://"),
                "{} is not https",
                endpoint.name
            );
        }
    }

    #[test]
    fn test_public_endpoints_exclude_keyed() {
        assert!(public_endpoints().all(|e| !e.needs_key));
        assert_eq!(public_endpoints().count(), FEED_ENDPOINTS.len() - 2);
    }
}
