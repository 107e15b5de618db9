//! Chaos factors and the weighted index
//!
//! Each factor maps one real-world feed onto a `(value, max)` pair. The
//! index is the weighted average of the clamped per-factor scores, scaled
//! to 0-100. Factors flagged `reverse` contribute `1 - score` so that a
//! calm upstream reading (e.g. extreme greed) pulls the index down.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Harvest, BOTNET_IP_CAP, MALWARE_URL_CAP, RANSOM_POST_CAP};

/// The closed set of factor keys. Keys and weights are stable across runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FactorKey {
    /// Planetary K-index (NOAA)
    Solar,
    /// Critical + high CVEs in the latest NVD page
    Zeroday,
    /// Active malware distribution URLs (URLhaus)
    Malware,
    /// Botnet C2 IPs on the recommended blocklist (FeodoTracker)
    Botnet,
    /// Ransomware leak-site posts (RansomWatch)
    Ransom,
    /// 24h crypto market-cap swing (CoinGecko)
    Crypto,
    /// Fear & greed sentiment (Alternative.me), reversed
    Fear,
}

impl FactorKey {
    pub const ALL: [FactorKey; 7] = [
        FactorKey::Solar,
        FactorKey::Zeroday,
        FactorKey::Malware,
        FactorKey::Botnet,
        FactorKey::Ransom,
        FactorKey::Crypto,
        FactorKey::Fear,
    ];

    /// Weight in the index aggregation. The weights sum to 100 but the
    /// formula divides by the actual total, so that is not load-bearing.
    pub fn weight(self) -> f64 {
        match self {
            FactorKey::Solar => 15.0,
            FactorKey::Zeroday => 15.0,
            FactorKey::Malware => 15.0,
            FactorKey::Botnet => 15.0,
            FactorKey::Ransom => 20.0,
            FactorKey::Crypto => 10.0,
            FactorKey::Fear => 10.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FactorKey::Solar => "solar",
            FactorKey::Zeroday => "zeroday",
            FactorKey::Malware => "malware",
            FactorKey::Botnet => "botnet",
            FactorKey::Ransom => "ransom",
            FactorKey::Crypto => "crypto",
            FactorKey::Fear => "fear",
        }
    }
}

/// Factor table keyed by the fixed factor set
pub type ChaosFactors = BTreeMap<FactorKey, FactorValue>;

/// One normalized dimension of real-world risk/activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorValue {
    /// Raw measured value, non-negative
    pub value: f64,
    /// Declared maximum, strictly positive
    pub max: f64,
    /// Inverted factors score `1 - value/max`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reverse: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

impl FactorValue {
    pub fn new(value: f64, max: f64) -> Self {
        Self {
            value,
            max,
            reverse: false,
            unit: None,
            source: None,
            classification: None,
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn with_classification(mut self, classification: &str) -> Self {
        self.classification = Some(classification.to_string());
        self
    }

    /// Clamped score in [0, 1], regardless of out-of-range raw values
    pub fn normalized(&self) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.value / self.max).clamp(0.0, 1.0)
    }

    /// Score as it enters the weighted sum; inverted for reverse factors
    pub fn weighting_score(&self) -> f64 {
        let score = self.normalized();
        if self.reverse {
            1.0 - score
        } else {
            score
        }
    }
}

/// Map a harvest onto the fixed factor table. Pure and total: all
/// defaulting has already happened upstream in the fetchers.
pub fn build_factors(harvest: &Harvest) -> ChaosFactors {
    let mut factors = ChaosFactors::new();

    let solar = &harvest.solar.data;
    factors.insert(
        FactorKey::Solar,
        FactorValue::new(solar.kp, 9.0).with_source("NOAA"),
    );

    let vulns = &harvest.vulns.data;
    factors.insert(
        FactorKey::Zeroday,
        FactorValue::new((vulns.critical + vulns.high) as f64, 20.0).with_source("NVD"),
    );

    let malware = &harvest.malware.data;
    factors.insert(
        FactorKey::Malware,
        FactorValue::new(malware.active_urls.min(MALWARE_URL_CAP) as f64, 500.0)
            .with_source("URLhaus"),
    );

    let botnet = &harvest.botnet.data;
    factors.insert(
        FactorKey::Botnet,
        FactorValue::new(botnet.c2_ips.min(BOTNET_IP_CAP) as f64 / 100.0, 10.0)
            .with_unit("K")
            .with_source("FeodoTracker"),
    );

    let ransom = &harvest.ransomware.data;
    factors.insert(
        FactorKey::Ransom,
        FactorValue::new(ransom.recent_posts.min(RANSOM_POST_CAP) as f64, 500.0)
            .with_source("RansomWatch"),
    );

    let market = &harvest.market.data;
    factors.insert(
        FactorKey::Crypto,
        FactorValue::new(market.cap_change_pct.abs(), 20.0)
            .with_unit("%")
            .with_source("CoinGecko"),
    );

    let fear = &harvest.sentiment.data;
    factors.insert(
        FactorKey::Fear,
        FactorValue::new(f64::from(fear.value), 100.0)
            .reversed()
            .with_source("Alternative.me")
            .with_classification(&fear.classification),
    );

    factors
}

/// Weighted index over the factor table, in [0, 100], one decimal place.
///
/// Per-factor scores are clamped to 1 before weighting, so a single
/// extreme reading cannot contribute more than its weight share.
pub fn chaos_index(factors: &ChaosFactors) -> f64 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for (key, factor) in factors {
        weighted += key.weight() * factor.weighting_score();
        total_weight += key.weight();
    }

    if total_weight <= 0.0 {
        return 0.0;
    }

    round1(weighted / total_weight * 100.0)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table(value_of_max: impl Fn(f64) -> f64) -> ChaosFactors {
        let mut factors = ChaosFactors::new();
        for key in FactorKey::ALL {
            let max = 50.0;
            factors.insert(key, FactorValue::new(value_of_max(max), max));
        }
        factors
    }

    #[test]
    fn test_normalized_clamps_out_of_range() {
        assert_eq!(FactorValue::new(-3.0, 10.0).normalized(), 0.0);
        assert_eq!(FactorValue::new(25.0, 10.0).normalized(), 1.0);
        assert_eq!(FactorValue::new(5.0, 10.0).normalized(), 0.5);
    }

    #[test]
    fn test_reverse_at_max_scores_zero() {
        let factor = FactorValue::new(100.0, 100.0).reversed();
        assert_eq!(factor.weighting_score(), 0.0);
        let calm = FactorValue::new(0.0, 100.0).reversed();
        assert_eq!(calm.weighting_score(), 1.0);
    }

    #[test]
    fn test_index_bounds() {
        assert_eq!(chaos_index(&full_table(|_| 0.0)), 0.0);
        assert_eq!(chaos_index(&full_table(|max| max)), 100.0);
        // Overshooting values clamp per-factor, not in aggregate
        assert_eq!(chaos_index(&full_table(|max| max * 40.0)), 100.0);
    }

    #[test]
    fn test_index_order_invariant() {
        let mut forward = ChaosFactors::new();
        let mut backward = ChaosFactors::new();
        for (i, key) in FactorKey::ALL.iter().enumerate() {
            forward.insert(*key, FactorValue::new(i as f64, 10.0));
        }
        for (i, key) in FactorKey::ALL.iter().enumerate().rev() {
            backward.insert(*key, FactorValue::new(i as f64, 10.0));
        }
        assert_eq!(chaos_index(&forward), chaos_index(&backward));
    }

    #[test]
    fn test_single_extreme_factor_bounded_by_weight_share() {
        let mut factors = full_table(|_| 0.0);
        factors.insert(
            FactorKey::Ransom,
            FactorValue::new(1_000_000.0, 500.0),
        );
        // Ransom carries 20 of 100 weight points
        assert_eq!(chaos_index(&factors), 20.0);
    }

    #[test]
    fn test_index_rounded_to_one_decimal() {
        let mut factors = ChaosFactors::new();
        factors.insert(FactorKey::Solar, FactorValue::new(1.0, 3.0));
        let index = chaos_index(&factors);
        assert_eq!(index, 33.3);
    }

    #[test]
    fn test_weights_sum_to_hundred() {
        let total: f64 = FactorKey::ALL.iter().map(|k| k.weight()).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_build_factors_covers_all_keys() {
        let factors = build_factors(&Harvest::default());
        for key in FactorKey::ALL {
            assert!(factors.contains_key(&key), "missing factor {:?}", key);
        }
        // Neutral sentiment default contributes half its reversed weight
        let fear = &factors[&FactorKey::Fear];
        assert!(fear.reverse);
        assert_eq!(fear.value, 50.0);
    }

    #[test]
    fn test_factor_serialization_shape() {
        let factor = FactorValue::new(3.2, 9.0).with_source("NOAA");
        let json = serde_json::to_value(&factor).unwrap();
        assert_eq!(json["value"], 3.2);
        assert_eq!(json["max"], 9.0);
        assert_eq!(json["source"], "NOAA");
        // reverse is omitted unless set
        assert!(json.get("reverse").is_none());

        let reversed = serde_json::to_value(FactorValue::new(1.0, 2.0).reversed()).unwrap();
        assert_eq!(reversed["reverse"], true);
    }
}
