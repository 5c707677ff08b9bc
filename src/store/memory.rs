use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::app::{FreshetError, Result};
use crate::domain::{
    FeedMeta, FeedSource, FormState, LoadingState, Post, PostCandidate, SubmissionState, UiState,
};
use crate::store::{Change, Listener, StatePath, StateValue, Store};

#[derive(Debug, Default)]
struct State {
    feeds: Vec<FeedSource>,
    posts: Vec<Post>,
    submission: SubmissionState,
    ui: UiState,
    next_feed_id: i64,
    next_post_id: i64,
}

/// In-memory observable store.
///
/// Single-threaded: shared as `Rc<MemoryStore>` between the engine, the
/// scheduler and the controllers, all running on one `LocalSet`. The state
/// borrow is released before the listener runs, so the listener may call
/// back into the store.
#[derive(Default)]
pub struct MemoryStore {
    state: RefCell<State>,
    listener: RefCell<Option<Rc<dyn Fn(&Change)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate<T>(&self, apply: impl FnOnce(&mut State) -> Result<(T, Change)>) -> Result<T> {
        let (out, change) = apply(&mut self.state.borrow_mut())?;
        self.notify(&change);
        Ok(out)
    }

    fn notify(&self, change: &Change) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(change);
        }
    }
}

impl Store for MemoryStore {
    fn subscribe(&self, listener: Listener) {
        *self.listener.borrow_mut() = Some(Rc::from(listener));
    }

    fn add_feed(&self, url: &str, meta: FeedMeta) -> Result<FeedSource> {
        self.mutate(|state| {
            if state.feeds.iter().any(|f| f.url == url) {
                return Err(FreshetError::FeedExists(url.to_string()));
            }

            let previous = StateValue::Feeds(state.feeds.clone());
            let feed = FeedSource::new(state.next_feed_id, url.to_string(), meta);
            state.next_feed_id += 1;
            state.feeds.push(feed.clone());

            let change = Change {
                path: StatePath::Feeds,
                value: StateValue::Feeds(state.feeds.clone()),
                previous,
            };
            Ok((feed, change))
        })
    }

    fn touch_feed(&self, id: i64, fetched_at: DateTime<Utc>) -> Result<()> {
        self.mutate(|state| {
            let previous = StateValue::Feeds(state.feeds.clone());
            let feed = state
                .feeds
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or(FreshetError::FeedNotFound(id))?;
            feed.last_fetched_at = Some(fetched_at);

            let change = Change {
                path: StatePath::Feeds,
                value: StateValue::Feeds(state.feeds.clone()),
                previous,
            };
            Ok(((), change))
        })
    }

    fn get_feed(&self, id: i64) -> Option<FeedSource> {
        self.state.borrow().feeds.iter().find(|f| f.id == id).cloned()
    }

    fn get_feed_by_url(&self, url: &str) -> Option<FeedSource> {
        self.state.borrow().feeds.iter().find(|f| f.url == url).cloned()
    }

    fn get_all_feeds(&self) -> Vec<FeedSource> {
        self.state.borrow().feeds.clone()
    }

    fn known_urls(&self) -> HashSet<String> {
        self.state.borrow().feeds.iter().map(|f| f.url.clone()).collect()
    }

    fn add_posts(&self, feed_id: i64, candidates: Vec<PostCandidate>) -> Result<Vec<Post>> {
        self.mutate(|state| {
            if !state.feeds.iter().any(|f| f.id == feed_id) {
                return Err(FreshetError::FeedNotFound(feed_id));
            }

            let previous = StateValue::Posts(state.posts.clone());
            let mut added = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                let post = Post::from_candidate(state.next_post_id, feed_id, candidate);
                state.next_post_id += 1;
                added.push(post);
            }
            state.posts.extend(added.iter().cloned());

            let change = Change {
                path: StatePath::Posts,
                value: StateValue::Posts(state.posts.clone()),
                previous,
            };
            Ok((added, change))
        })
    }

    fn get_post(&self, id: i64) -> Option<Post> {
        self.state.borrow().posts.iter().find(|p| p.id == id).cloned()
    }

    fn get_posts_by_feed(&self, feed_id: i64) -> Vec<Post> {
        self.state
            .borrow()
            .posts
            .iter()
            .filter(|p| p.feed_id == feed_id)
            .cloned()
            .collect()
    }

    fn get_all_posts(&self) -> Vec<Post> {
        self.state.borrow().posts.clone()
    }

    fn submission(&self) -> SubmissionState {
        self.state.borrow().submission
    }

    fn set_form_state(&self, form: FormState) {
        let change = {
            let mut state = self.state.borrow_mut();
            let previous = std::mem::replace(&mut state.submission.form, form);
            Change {
                path: StatePath::Form,
                value: StateValue::Form(form),
                previous: StateValue::Form(previous),
            }
        };
        self.notify(&change);
    }

    fn set_loading_state(&self, loading: LoadingState) {
        let change = {
            let mut state = self.state.borrow_mut();
            let previous = std::mem::replace(&mut state.submission.feed_loading, loading);
            Change {
                path: StatePath::FeedLoading,
                value: StateValue::FeedLoading(loading),
                previous: StateValue::FeedLoading(previous),
            }
        };
        self.notify(&change);
    }

    fn ui(&self) -> UiState {
        self.state.borrow().ui.clone()
    }

    fn mark_visited(&self, post_id: i64) -> Result<()> {
        self.mutate(|state| {
            if !state.posts.iter().any(|p| p.id == post_id) {
                return Err(FreshetError::PostNotFound(post_id));
            }

            let previous = StateValue::VisitedPosts(state.ui.visited_posts.clone());
            state.ui.visited_posts.insert(post_id);

            let change = Change {
                path: StatePath::VisitedPosts,
                value: StateValue::VisitedPosts(state.ui.visited_posts.clone()),
                previous,
            };
            Ok(((), change))
        })
    }

    fn set_preview(&self, post_id: Option<i64>) -> Result<()> {
        self.mutate(|state| {
            if let Some(id) = post_id {
                if !state.posts.iter().any(|p| p.id == id) {
                    return Err(FreshetError::PostNotFound(id));
                }
            }

            let previous = std::mem::replace(&mut state.ui.preview, post_id);
            let change = Change {
                path: StatePath::Preview,
                value: StateValue::Preview(post_id),
                previous: StateValue::Preview(previous),
            };
            Ok(((), change))
        })
    }
}
