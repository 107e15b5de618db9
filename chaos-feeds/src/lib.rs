//! ChaosMeter Feeds - one fetcher per upstream source
//!
//! Each fetcher attempts a single bounded retrieval, parses the feed's
//! minimal schema, and degrades to documented defaults on any failure.
//! Failures are recorded in the harvest slot's provenance; they never
//! propagate to the pipeline.

pub mod client;
pub mod endpoints;
pub mod source;

pub mod intel;
pub mod malware;
pub mod market;
pub mod news;
pub mod ransomware;
pub mod sentiment;
pub mod solar;
pub mod vulns;

pub use client::*;
pub use endpoints::*;
pub use source::*;

pub use intel::ThreatIntelFeed;
pub use malware::{BotnetFeed, MalwareFeed};
pub use market::MarketFeed;
pub use news::NewsFeed;
pub use ransomware::RansomwareFeed;
pub use sentiment::SentimentFeed;
pub use solar::SolarFeed;
pub use vulns::VulnFeed;
