//! Plain-text presentation of store changes for the command line.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::domain::Feedback;
use crate::store::{Change, Listener, StateValue};

/// Turns store notifications into printable lines. Read-only with respect to
/// the store: everything it shows comes from the notifications themselves.
#[derive(Default)]
pub struct ConsoleView {
    feed_titles: RefCell<HashMap<i64, String>>,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, change: &Change) -> Vec<String> {
        match &change.value {
            StateValue::Feeds(feeds) => {
                let mut titles = self.feed_titles.borrow_mut();
                titles.clear();
                titles.extend(feeds.iter().map(|f| (f.id, f.display_title().to_string())));

                change
                    .added_feeds()
                    .iter()
                    .map(|f| format!("+ {} <{}>", f.display_title(), f.url))
                    .collect()
            }
            StateValue::Posts(_) => {
                let titles = self.feed_titles.borrow();
                change
                    .added_posts()
                    .iter()
                    .map(|post| {
                        let feed = titles.get(&post.feed_id).map(String::as_str).unwrap_or("?");
                        format!("[{}] {} {}", feed, post.display_title(), post.link)
                    })
                    .collect()
            }
            StateValue::Form(state) => Feedback::for_form(*state)
                .map(feedback_line)
                .into_iter()
                .collect(),
            StateValue::FeedLoading(state) => Feedback::for_loading(*state)
                .map(feedback_line)
                .into_iter()
                .collect(),
            StateValue::VisitedPosts(_) | StateValue::Preview(_) => Vec::new(),
        }
    }

    /// Listener printing every rendered line to stdout.
    pub fn into_listener(self) -> Listener {
        Box::new(move |change| {
            for line in self.render(change) {
                println!("{}", line);
            }
        })
    }
}

fn feedback_line(feedback: Feedback) -> String {
    if feedback.is_failure() {
        format!("! {}", feedback.message())
    } else {
        feedback.message().to_string()
    }
}
