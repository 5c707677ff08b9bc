pub mod memory;

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::app::Result;
use crate::domain::{FeedMeta, FeedSource, FormState, LoadingState, Post, PostCandidate, SubmissionState, UiState};

pub use memory::MemoryStore;

/// Callback invoked once per store mutation.
pub type Listener = Box<dyn Fn(&Change)>;

/// Which part of the state a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatePath {
    Feeds,
    Posts,
    Form,
    FeedLoading,
    VisitedPosts,
    Preview,
}

impl StatePath {
    pub fn as_str(self) -> &'static str {
        match self {
            StatePath::Feeds => "feeds",
            StatePath::Posts => "posts",
            StatePath::Form => "submission.form",
            StatePath::FeedLoading => "submission.feedLoading",
            StatePath::VisitedPosts => "ui.visitedPosts",
            StatePath::Preview => "ui.preview",
        }
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValue {
    Feeds(Vec<FeedSource>),
    Posts(Vec<Post>),
    Form(FormState),
    FeedLoading(LoadingState),
    VisitedPosts(BTreeSet<i64>),
    Preview(Option<i64>),
}

/// One notification: the path that changed, its new value and the value it
/// held immediately before this mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: StatePath,
    pub value: StateValue,
    pub previous: StateValue,
}

impl Change {
    /// Posts appended by this change, empty for any other path.
    pub fn added_posts(&self) -> &[Post] {
        match (&self.value, &self.previous) {
            (StateValue::Posts(now), StateValue::Posts(before)) => {
                now.get(before.len()..).unwrap_or_default()
            }
            _ => &[],
        }
    }

    pub fn added_feeds(&self) -> &[FeedSource] {
        match (&self.value, &self.previous) {
            (StateValue::Feeds(now), StateValue::Feeds(before)) => {
                now.get(before.len()..).unwrap_or_default()
            }
            _ => &[],
        }
    }
}

pub trait Store {
    /// Register the listener, replacing any previous one.
    fn subscribe(&self, listener: Listener);

    // Feed operations
    fn add_feed(&self, url: &str, meta: FeedMeta) -> Result<FeedSource>;
    fn touch_feed(&self, id: i64, fetched_at: DateTime<Utc>) -> Result<()>;
    fn get_feed(&self, id: i64) -> Option<FeedSource>;
    fn get_feed_by_url(&self, url: &str) -> Option<FeedSource>;
    fn get_all_feeds(&self) -> Vec<FeedSource>;
    fn known_urls(&self) -> HashSet<String>;

    // Post operations
    fn add_posts(&self, feed_id: i64, candidates: Vec<PostCandidate>) -> Result<Vec<Post>>;
    fn get_post(&self, id: i64) -> Option<Post>;
    fn get_posts_by_feed(&self, feed_id: i64) -> Vec<Post>;
    fn get_all_posts(&self) -> Vec<Post>;

    // Submission state
    fn submission(&self) -> SubmissionState;
    fn set_form_state(&self, state: FormState);
    fn set_loading_state(&self, state: LoadingState);

    fn form_state(&self) -> FormState {
        self.submission().form
    }

    fn loading_state(&self) -> LoadingState {
        self.submission().feed_loading
    }

    // Reader state
    fn ui(&self) -> UiState;
    fn mark_visited(&self, post_id: i64) -> Result<()>;
    fn set_preview(&self, post_id: Option<i64>) -> Result<()>;

    fn is_visited(&self, post_id: i64) -> bool {
        self.ui().visited_posts.contains(&post_id)
    }

    fn preview(&self) -> Option<i64> {
        self.ui().preview
    }
}
