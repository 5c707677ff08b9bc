use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An item as produced by the parser, before it is given an id and a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostCandidate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: String,
    pub guid: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl PostCandidate {
    /// Title if present and non-empty.
    pub fn title_key(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn description_key(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    pub fn guid_key(&self) -> Option<&str> {
        non_empty(self.guid.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub feed_id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: String,
    pub guid: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn from_candidate(id: i64, feed_id: i64, candidate: PostCandidate) -> Self {
        Self {
            id,
            feed_id,
            title: candidate.title,
            description: candidate.description,
            link: candidate.link,
            guid: candidate.guid,
            published_at: candidate.published_at,
        }
    }

    pub fn title_key(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn description_key(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    pub fn guid_key(&self) -> Option<&str> {
        non_empty(self.guid.as_deref())
    }

    pub fn display_title(&self) -> &str {
        self.title_key()
            .or(self.description_key())
            .unwrap_or("(Untitled)")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
