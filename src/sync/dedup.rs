use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Post, PostCandidate};

/// How a freshly fetched item is matched against posts already stored for
/// the same feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    /// Equal non-empty title; for untitled items, equal description.
    #[default]
    Content,
    /// Equal guid when the item carries one, otherwise [`DedupStrategy::Content`].
    GuidFirst,
}

impl DedupStrategy {
    /// Candidates that match neither `existing` nor an earlier candidate of
    /// the same batch, in their original order.
    pub fn delta(self, existing: &[Post], candidates: Vec<PostCandidate>) -> Vec<PostCandidate> {
        let mut seen = SeenKeys::from_posts(existing);
        let mut fresh = Vec::new();

        for candidate in candidates {
            if seen.contains(self, &candidate) {
                continue;
            }
            seen.insert(&candidate);
            fresh.push(candidate);
        }

        fresh
    }
}

#[derive(Default)]
struct SeenKeys {
    titles: HashSet<String>,
    descriptions: HashSet<String>,
    guids: HashSet<String>,
    links: HashSet<String>,
}

impl SeenKeys {
    fn from_posts(posts: &[Post]) -> Self {
        let mut seen = Self::default();
        for post in posts {
            seen.record(post.title_key(), post.description_key(), post.guid_key(), &post.link);
        }
        seen
    }

    fn insert(&mut self, candidate: &PostCandidate) {
        self.record(
            candidate.title_key(),
            candidate.description_key(),
            candidate.guid_key(),
            &candidate.link,
        );
    }

    fn record(&mut self, title: Option<&str>, description: Option<&str>, guid: Option<&str>, link: &str) {
        if let Some(title) = title {
            self.titles.insert(title.to_string());
        }
        if let Some(description) = description {
            self.descriptions.insert(description.to_string());
        }
        if let Some(guid) = guid {
            self.guids.insert(guid.to_string());
        }
        self.links.insert(link.to_string());
    }

    fn contains(&self, strategy: DedupStrategy, candidate: &PostCandidate) -> bool {
        if strategy == DedupStrategy::GuidFirst {
            if let Some(guid) = candidate.guid_key() {
                return self.guids.contains(guid);
            }
        }

        if let Some(title) = candidate.title_key() {
            self.titles.contains(title)
        } else if let Some(description) = candidate.description_key() {
            self.descriptions.contains(description)
        } else {
            // Upstream documents always carry one of the two; fall back to the link.
            self.links.contains(&candidate.link)
        }
    }
}
