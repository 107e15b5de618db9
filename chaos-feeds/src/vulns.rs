//! NVD vulnerability fetcher
//!
//! Pulls the latest page of CVEs and tallies critical/high severities
//! among the first entries. CVSS v3.1 scoring metadata wins over v2 when
//! a CVE carries both.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use chaos_core::{
    CveEntry, FeedKind, FeedOutcome, Harvest, Severity, VulnReport, CVE_SEVERITY_SAMPLE,
};

use crate::client::{get_json, FeedError};
use crate::endpoints::NVD_CVE_URL;
use crate::source::FeedSource;

pub struct VulnFeed {
    client: Client,
}

impl VulnFeed {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self) -> Result<VulnReport, FeedError> {
        let response: NvdResponse = get_json(&self.client, NVD_CVE_URL).await?;
        Ok(summarize(response))
    }
}

#[async_trait]
impl FeedSource for VulnFeed {
    fn name(&self) -> &'static str {
        "NVD"
    }

    fn kind(&self) -> FeedKind {
        FeedKind::Vulnerabilities
    }

    async fn collect(&self, harvest: &mut Harvest) {
        harvest.vulns = match self.fetch().await {
            Ok(report) => {
                info!(
                    "NVD: {} CVEs ({} critical, {} high)",
                    report.total, report.critical, report.high
                );
                FeedOutcome::live(report)
            }
            Err(e) => {
                warn!("NVD feed degraded: {}", e);
                FeedOutcome::fallback(e.to_string())
            }
        };
    }
}

fn summarize(response: NvdResponse) -> VulnReport {
    let mut report = VulnReport {
        total: response.vulnerabilities.len(),
        ..VulnReport::default()
    };

    for vuln in response
        .vulnerabilities
        .into_iter()
        .take(CVE_SEVERITY_SAMPLE)
    {
        let severity = vuln.cve.severity();
        match severity {
            Severity::Critical => report.critical += 1,
            Severity::High => report.high += 1,
            _ => {}
        }
        report.recent.push(CveEntry {
            id: vuln.cve.id,
            severity,
        });
    }

    report
}

// NVD CVE API 2.0 response types
#[derive(Debug, Deserialize)]
struct NvdResponse {
    #[serde(default)]
    vulnerabilities: Vec<NvdVulnerability>,
}

#[derive(Debug, Deserialize)]
struct NvdVulnerability {
    cve: NvdCve,
}

#[derive(Debug, Deserialize)]
struct NvdCve {
    #[serde(default)]
    id: String,
    #[serde(default)]
    metrics: NvdMetrics,
}

impl NvdCve {
    fn severity(&self) -> Severity {
        if let Some(metric) = self.metrics.v31.first() {
            return Severity::from_label(&metric.cvss_data.base_severity);
        }
        if let Some(metric) = self.metrics.v2.first() {
            return Severity::from_label(&metric.base_severity);
        }
        Severity::Unknown
    }
}

#[derive(Debug, Default, Deserialize)]
struct NvdMetrics {
    #[serde(rename = "cvssMetricV31", default)]
    v31: Vec<NvdMetricV31>,
    #[serde(rename = "cvssMetricV2", default)]
    v2: Vec<NvdMetricV2>,
}

#[derive(Debug, Deserialize)]
struct NvdMetricV31 {
    #[serde(rename = "cvssData")]
    cvss_data: NvdCvssData,
}

#[derive(Debug, Deserialize)]
struct NvdCvssData {
    #[serde(rename = "baseSeverity", default)]
    base_severity: String,
}

#[derive(Debug, Deserialize)]
struct NvdMetricV2 {
    #[serde(rename = "baseSeverity", default)]
    base_severity: String,
}
