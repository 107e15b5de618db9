//! Security news fetcher
//!
//! Pulls item titles from several RSS/Atom feeds, tags each with an emoji
//! label identifying its origin, and caps the combined list. Feeds fail
//! independently; the slot goes to fallback only when every feed does.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};

use chaos_core::{FeedKind, FeedOutcome, Harvest, Headline, HEADLINE_CAP};

use crate::client::get_text;
use crate::endpoints::{BLEEPING_RSS_URL, DARKREADING_RSS_URL, HACKERNEWS_RSS_URL};
use crate::source::FeedSource;

struct NewsFeedSpec {
    name: &'static str,
    url: &'static str,
    /// Emoji prefix identifying the origin on the ticker
    tag: &'static str,
    /// Items taken from this feed before the combined cap
    per_feed_cap: usize,
}

static NEWS_FEEDS: &[NewsFeedSpec] = &[
    NewsFeedSpec {
        name: "TheHackerNews",
        url: HACKERNEWS_RSS_URL,
        tag: "\u{1f6a8}",
        per_feed_cap: 5,
    },
    NewsFeedSpec {
        name: "BleepingComputer",
        url: BLEEPING_RSS_URL,
        tag: "\u{26a0}\u{fe0f}",
        per_feed_cap: 3,
    },
    NewsFeedSpec {
        name: "DarkReading",
        url: DARKREADING_RSS_URL,
        tag: "\u{1f6e1}\u{fe0f}",
        per_feed_cap: 3,
    },
];

pub struct NewsFeed {
    client: Client,
}

impl NewsFeed {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedSource for NewsFeed {
    fn name(&self) -> &'static str {
        "RSS Feeds"
    }

    fn kind(&self) -> FeedKind {
        FeedKind::News
    }

    async fn collect(&self, harvest: &mut Harvest) {
        let mut batches = Vec::new();
        let mut any_live = false;

        for spec in NEWS_FEEDS {
            match get_text(&self.client, spec.url).await {
                Ok(xml) => {
                    let batch = parse_feed(&xml, spec);
                    debug!("{}: {} headlines", spec.name, batch.len());
                    any_live = true;
                    batches.push(batch);
                }
                Err(e) => {
                    warn!("News feed {} failed: {}", spec.name, e);
                }
            }
        }

        harvest.news = if any_live {
            FeedOutcome::live(merge_batches(batches))
        } else {
            FeedOutcome::fallback("all news feeds failed")
        };
    }
}

// Feed documents are not parsed as full XML; titles and links are pulled
// out of each item/entry block directly.
static ITEM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:item|entry)[\s>].*?</(?:item|entry)>").unwrap()
});

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title[^>]*>(.*?)</title>").unwrap());

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<link[^>]*>(.*?)</link>").unwrap());

fn parse_feed(xml: &str, spec: &NewsFeedSpec) -> Vec<Headline> {
    ITEM_REGEX
        .find_iter(xml)
        .filter_map(|item| {
            let block = item.as_str();
            let title = clean_text(TITLE_REGEX.captures(block)?.get(1)?.as_str());
            if title.is_empty() {
                return None;
            }
            let url = LINK_REGEX
                .captures(block)
                .and_then(|c| c.get(1))
                .map(|m| clean_text(m.as_str()))
                .unwrap_or_default();
            Some(Headline {
                title: format!("{} {}", spec.tag, title),
                source: spec.name.to_string(),
                url,
            })
        })
        .take(spec.per_feed_cap)
        .collect()
}

/// Combine per-feed batches in registry order, holding the global cap
fn merge_batches(batches: Vec<Vec<Headline>>) -> Vec<Headline> {
    let mut headlines: Vec<Headline> = batches.into_iter().flatten().collect();
    headlines.truncate(HEADLINE_CAP);
    headlines
}

fn clean_text(raw: &str) -> String {
    let text = raw.trim();
    let text = text.strip_prefix("<![CDATA[").unwrap_or(text);
    let text = text.strip_suffix("]]>").unwrap_or(text);
    unescape(text.trim())
}

/// Minimal entity unescape; `&amp;` last so escaped entities stay escaped
fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
