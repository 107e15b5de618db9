//! Pipeline coordinator
//!
//! Drives one aggregation pass. Feeds are collected strictly one after
//! another; an individual feed failure degrades that slot and the run
//! continues. Only a snapshot write failure aborts the run.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use chaos_core::{build_factors, chaos_index, Harvest, Snapshot};
use chaos_feeds::{
    build_client, BotnetFeed, FeedConfig, FeedError, FeedSource, MalwareFeed, MarketFeed,
    NewsFeed, RansomwareFeed, SentimentFeed, SolarFeed, ThreatIntelFeed, VulnFeed,
};

use crate::assemble::assemble;
use crate::decor::{AttackSynth, ThreatMapSynth};
use crate::output::write_snapshot;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Feed layer error: {0}")]
    Feeds(#[from] FeedError),

    #[error("Failed to write snapshot to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline configuration, supplied by the caller
pub struct PipelineConfig {
    pub feeds: FeedConfig,
    /// Snapshot destination
    pub output: PathBuf,
    /// Seed the attack synthesizer for reproducible output
    pub seed: Option<u64>,
}

/// One-shot aggregation pipeline
pub struct Pipeline {
    sources: Vec<Box<dyn FeedSource>>,
    synth: Box<dyn AttackSynth>,
    output: PathBuf,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let client = build_client(&config.feeds)?;

        let sources: Vec<Box<dyn FeedSource>> = vec![
            Box::new(SolarFeed::new(client.clone())),
            Box::new(VulnFeed::new(client.clone())),
            Box::new(MalwareFeed::new(client.clone())),
            Box::new(BotnetFeed::new(client.clone())),
            Box::new(RansomwareFeed::new(client.clone())),
            Box::new(MarketFeed::new(client.clone())),
            Box::new(SentimentFeed::new(client.clone())),
            Box::new(NewsFeed::new(client.clone())),
            Box::new(ThreatIntelFeed::new(
                client,
                config.feeds.abuseipdb_key.clone(),
                config.feeds.otx_key.clone(),
            )),
        ];

        let synth: Box<dyn AttackSynth> = match config.seed {
            Some(seed) => Box::new(ThreatMapSynth::seeded(seed)),
            None => Box::new(ThreatMapSynth::new()),
        };

        Ok(Self {
            sources,
            synth,
            output: config.output,
        })
    }

    /// Replace the attack synthesizer (or disable it with `NoopSynth`)
    pub fn with_synth(mut self, synth: Box<dyn AttackSynth>) -> Self {
        self.synth = synth;
        self
    }

    /// One pass: fetch all, normalize, aggregate, assemble, write
    pub async fn run(&mut self) -> Result<Snapshot, PipelineError> {
        info!("Starting aggregation pass ({} feeds)", self.sources.len());

        let mut harvest = Harvest::default();
        for source in &self.sources {
            debug!("Collecting {} ({})", source.name(), source.kind().as_str());
            source.collect(&mut harvest).await;
        }

        let factors = build_factors(&harvest);
        let index = chaos_index(&factors);
        info!("Chaos index: {}", index);

        let attacks = self.synth.synthesize(&harvest);
        let snapshot = assemble(&harvest, factors, index, attacks);

        write_snapshot(&snapshot, &self.output).map_err(|source| PipelineError::Write {
            path: self.output.clone(),
            source,
        })?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_registers_all_feeds() {
        let config = PipelineConfig {
            feeds: FeedConfig {
                timeout_secs: 5,
                abuseipdb_key: None,
                otx_key: None,
            },
            output: PathBuf::from("data.json"),
            seed: Some(1),
        };
        let pipeline = Pipeline::new(config).unwrap();
        assert_eq!(pipeline.sources.len(), 9);

        let names: Vec<&str> = pipeline.sources.iter().map(|s| s.name()).collect();
        assert!(names.contains(&"NOAA"));
        assert!(names.contains(&"RansomWatch"));
        assert!(names.contains(&"Threat Intel"));
    }
}
