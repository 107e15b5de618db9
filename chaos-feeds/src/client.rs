//! HTTP plumbing shared by the fetchers
//!
//! One client per run, bounded timeout, fixed user agent. Keyed providers
//! read their credentials from the environment by default.

use std::env;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const USER_AGENT: &str = "ChaosMeter/0.1 (+https://github.com/chaosmeter/chaosmeter)";

/// Feed-layer configuration, supplied by the caller
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// AbuseIPDB API key; the blacklist feed is skipped when absent
    pub abuseipdb_key: Option<String>,
    /// AlienVault OTX API key; the pulse feed is skipped when absent
    pub otx_key: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            abuseipdb_key: env::var("ABUSEIPDB_KEY").ok().filter(|k| !k.is_empty()),
            otx_key: env::var("OTX_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}

/// Errors from feed retrieval and parsing
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Create the HTTP client used by every fetcher in a run
pub fn build_client(config: &FeedConfig) -> Result<Client, FeedError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FeedError::ClientBuild(e.to_string()))
}

/// GET a JSON document, surfacing non-2xx statuses as errors
pub async fn get_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
) -> Result<T, FeedError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FeedError::Status(response.status()));
    }
    Ok(response.json::<T>().await?)
}

/// GET a raw text payload, surfacing non-2xx statuses as errors
pub async fn get_text(client: &Client, url: &str) -> Result<String, FeedError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FeedError::Status(response.status()));
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedConfig {
            abuseipdb_key: None,
            otx_key: None,
            ..FeedConfig::default()
        };
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_build_client() {
        let config = FeedConfig {
            timeout_secs: 10,
            abuseipdb_key: None,
            otx_key: None,
        };
        assert!(build_client(&config).is_ok());
    }
}
