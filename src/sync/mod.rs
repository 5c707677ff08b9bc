//! Fetch, parse and merge pipeline.
//!
//! ```text
//! Fetcher → FeedParser → DedupStrategy::delta → Store
//! ```
//!
//! The engine never retries and leaves the store untouched when fetching or
//! parsing fails; retrying is the scheduler's next tick or the user's next
//! submission.

mod dedup;

use std::rc::Rc;
use std::sync::Arc;

use chrono::Utc;

use crate::app::Result;
use crate::domain::{FeedMeta, FeedSource, PostCandidate};
use crate::fetcher::Fetcher;
use crate::normalizer::FeedParser;
use crate::store::Store;

pub use dedup::DedupStrategy;

pub struct SyncEngine<S: Store> {
    store: Rc<S>,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    parser: Box<dyn FeedParser>,
    dedup: DedupStrategy,
}

impl<S: Store> SyncEngine<S> {
    pub fn new(
        store: Rc<S>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        parser: Box<dyn FeedParser>,
        dedup: DedupStrategy,
    ) -> Self {
        Self {
            store,
            fetcher,
            parser,
            dedup,
        }
    }

    pub fn store(&self) -> &Rc<S> {
        &self.store
    }

    /// Fetch and parse `url` without touching the store.
    pub async fn load(&self, url: &str) -> Result<(FeedMeta, Vec<PostCandidate>)> {
        let content = self.fetcher.fetch(url).await?;
        self.parser.parse(&content)
    }

    /// Subscribe to `url`: the new feed is appended first, then every parsed
    /// item as one batch of posts.
    pub async fn register(&self, url: &str) -> Result<FeedSource> {
        let (meta, candidates) = self.load(url).await?;

        let feed = self.store.add_feed(url, meta)?;
        let posts = self.store.add_posts(feed.id, candidates)?;

        tracing::info!(
            "Registered feed {} ({}) with {} posts",
            feed.id,
            feed.url,
            posts.len()
        );
        Ok(feed)
    }

    /// Re-fetch a tracked feed and append only items not seen before.
    /// Returns the number of posts added.
    pub async fn refresh(&self, feed: &FeedSource) -> Result<usize> {
        let (_, candidates) = self.load(&feed.url).await?;

        let existing = self.store.get_posts_by_feed(feed.id);
        let fresh = self.dedup.delta(&existing, candidates);

        self.store.touch_feed(feed.id, Utc::now())?;

        if fresh.is_empty() {
            tracing::debug!("No new posts in {}", feed.url);
            return Ok(0);
        }

        let added = self.store.add_posts(feed.id, fresh)?;
        tracing::info!("Added {} new posts from {}", added.len(), feed.url);

        Ok(added.len())
    }
}
