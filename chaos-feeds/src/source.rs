//! Common interface for feed fetchers

use async_trait::async_trait;
use chaos_core::{FeedKind, Harvest};

/// One upstream feed, fetched once per run.
///
/// `collect` fills the source's harvest slot(s). A failed retrieval or a
/// malformed payload leaves the slot at its documented default with a
/// fallback provenance; it never panics and never returns an error.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Provider name, for logging and status reporting
    fn name(&self) -> &'static str;

    /// Feed category
    fn kind(&self) -> FeedKind;

    async fn collect(&self, harvest: &mut Harvest);
}
