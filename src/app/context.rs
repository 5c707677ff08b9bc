use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use crate::app::Result;
use crate::config::Config;
use crate::controller::{PostsController, SubmissionController};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::normalizer::Normalizer;
use crate::scheduler::Scheduler;
use crate::store::MemoryStore;
use crate::sync::SyncEngine;

/// Wires the store, the sync engine and the controllers together.
pub struct AppContext {
    pub config: Config,
    pub store: Rc<MemoryStore>,
    pub engine: Rc<SyncEngine<MemoryStore>>,
    pub submissions: SubmissionController<MemoryStore>,
    pub posts: PostsController<MemoryStore>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.fetcher)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        let store = Rc::new(MemoryStore::new());
        let engine = Rc::new(SyncEngine::new(
            store.clone(),
            fetcher,
            Box::new(Normalizer::new()),
            config.polling.dedup,
        ));

        Self {
            submissions: SubmissionController::new(engine.clone()),
            posts: PostsController::new(store.clone()),
            config,
            store,
            engine,
        }
    }

    pub fn scheduler(&self) -> Scheduler<MemoryStore> {
        Scheduler::new(
            self.engine.clone(),
            Duration::from_millis(self.config.polling.interval_ms),
            self.config.polling.workers,
        )
    }
}

#[cfg(test)]
mod tests {
    use tokio::task::LocalSet;

    use super::*;
    use crate::store::Store;
    use crate::test_support::{item, rss, StaticFetcher};

    #[tokio::test]
    async fn test_submitted_feeds_are_polled() {
        let fetcher = StaticFetcher::new();
        fetcher.serve(
            "https://news.example.com/rss",
            rss("News", &[item("Morning", "https://news.example.com/1")]),
        );
        fetcher.serve(
            "https://blog.example.com/rss",
            rss("Blog", &[item("Intro", "https://blog.example.com/1")]),
        );
        let ctx = AppContext::with_fetcher(Config::default(), fetcher.clone());

        ctx.submissions.submit("https://news.example.com/rss").await.unwrap();
        ctx.submissions.submit("https://blog.example.com/rss").await.unwrap();

        fetcher.fail("https://news.example.com/rss", "503 Service Unavailable");
        fetcher.serve(
            "https://blog.example.com/rss",
            rss(
                "Blog",
                &[
                    item("Part two", "https://blog.example.com/3"),
                    item("Part one", "https://blog.example.com/2"),
                    item("Intro", "https://blog.example.com/1"),
                ],
            ),
        );

        let scheduler = ctx.scheduler();
        let report = LocalSet::new().run_until(scheduler.run_tick()).await;

        assert_eq!(report.errors, 1);
        assert_eq!(report.new_posts, 2);

        let posts = ctx.store.get_all_posts();
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        let news = ctx.store.get_feed_by_url("https://news.example.com/rss").unwrap();
        assert_eq!(ctx.store.get_posts_by_feed(news.id).len(), 1);

        let opened = ctx.posts.open_post(3).unwrap();
        assert_eq!(opened.title.as_deref(), Some("Part one"));
    }

    #[test]
    fn test_new_with_default_config() {
        let ctx = AppContext::new(Config::default()).unwrap();
        assert!(ctx.store.get_all_feeds().is_empty());
        assert_eq!(ctx.config.polling.interval_ms, 5000);
    }
}
