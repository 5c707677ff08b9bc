//! URL validation gate for new subscriptions.
//!
//! Pure and deterministic: the outcome depends only on the candidate string
//! and the set of URLs already tracked.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("a feed URL is required")]
    MissingValue,

    #[error("not a valid absolute URL")]
    MalformedUrl,

    #[error("feed is already tracked")]
    Duplicate,
}

pub type ValidationOutcome = std::result::Result<(), ValidationError>;

/// Check a candidate URL. Rules apply in order, first failure wins:
/// empty after trimming, not an absolute URL with a host, already known.
pub fn validate(candidate: &str, known_urls: &HashSet<String>) -> ValidationOutcome {
    let candidate = candidate.trim();

    if candidate.is_empty() {
        return Err(ValidationError::MissingValue);
    }

    if !is_absolute_url(candidate) {
        return Err(ValidationError::MalformedUrl);
    }

    if known_urls.contains(candidate) {
        return Err(ValidationError::Duplicate);
    }

    Ok(())
}

fn is_absolute_url(s: &str) -> bool {
    Url::parse(s)
        .map(|url| url.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false)
}
