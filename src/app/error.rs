use thiserror::Error;

use crate::validation::ValidationError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum FreshetError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("Malformed feed document: {0}")]
    MalformedDocument(String),

    #[error("Feed already exists: {0}")]
    FeedExists(String),

    #[error("Feed not found: {0}")]
    FeedNotFound(i64),

    #[error("Post not found: {0}")]
    PostNotFound(i64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl FreshetError {
    pub fn network(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Network {
            url: url.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FreshetError>;
