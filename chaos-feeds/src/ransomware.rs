//! RansomWatch leak-site tracker fetcher
//!
//! The tracker publishes one JSON array of leak-site posts. A run keeps a
//! capped post count, a bounded set of distinct group names, and the most
//! recent victim summaries with truncated titles.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use chaos_core::{
    FeedKind, FeedOutcome, Harvest, RansomwareReport, Victim, RANSOM_GROUP_CAP,
    RANSOM_GROUP_SCAN, RANSOM_POST_CAP, RANSOM_VICTIM_CAP,
};

use crate::client::{get_json, FeedError};
use crate::endpoints::RANSOMWATCH_POSTS_URL;
use crate::source::FeedSource;

pub struct RansomwareFeed {
    client: Client,
}

impl RansomwareFeed {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch(&self) -> Result<RansomwareReport, FeedError> {
        let posts: Vec<RansomPost> = get_json(&self.client, RANSOMWATCH_POSTS_URL).await?;
        Ok(summarize(posts))
    }
}

#[async_trait]
impl FeedSource for RansomwareFeed {
    fn name(&self) -> &'static str {
        "RansomWatch"
    }

    fn kind(&self) -> FeedKind {
        FeedKind::Ransomware
    }

    async fn collect(&self, harvest: &mut Harvest) {
        harvest.ransomware = match self.fetch().await {
            Ok(report) => {
                info!(
                    "RansomWatch: {} posts, {} active groups",
                    report.recent_posts,
                    report.groups.len()
                );
                FeedOutcome::live(report)
            }
            Err(e) => {
                warn!("RansomWatch feed degraded: {}", e);
                FeedOutcome::fallback(e.to_string())
            }
        };
    }
}

fn summarize(posts: Vec<RansomPost>) -> RansomwareReport {
    let recent_posts = posts.len().min(RANSOM_POST_CAP);

    let mut groups: Vec<String> = Vec::new();
    for post in posts.iter().take(RANSOM_GROUP_SCAN) {
        if let Some(group) = &post.group_name {
            if !group.is_empty() && !groups.contains(group) {
                groups.push(group.clone());
            }
        }
    }
    groups.truncate(RANSOM_GROUP_CAP);

    let victims = posts
        .iter()
        .take(RANSOM_VICTIM_CAP)
        .map(|post| {
            Victim::new(
                post.post_title.as_deref().unwrap_or("Unknown"),
                post.group_name.as_deref().unwrap_or("Unknown"),
            )
        })
        .collect();

    RansomwareReport {
        recent_posts,
        groups,
        victims,
    }
}

// RansomWatch posts.json entry
#[derive(Debug, Deserialize)]
struct RansomPost {
    #[serde(default)]
    post_title: Option<String>,
    #[serde(default)]
    group_name: Option<String>,
}
