use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel-level metadata extracted from a fetched document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl FeedSource {
    /// A feed whose document was fetched just now.
    pub fn new(id: i64, url: String, meta: FeedMeta) -> Self {
        let now = Utc::now();
        Self {
            id,
            url,
            title: meta.title.unwrap_or_default(),
            description: meta.description.unwrap_or_default(),
            created_at: now,
            last_fetched_at: Some(now),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}
